use chrono::{Duration, Local};
use clap::{Args, Subcommand};

use super::{local_midnight, OutputFormat};
use crate::db::MealRepository;
use crate::summary::{daily_summaries, weekly_summaries};

#[derive(Args)]
pub struct SummaryCommand {
    #[command(subcommand)]
    pub command: SummarySubcommand,
}

#[derive(Subcommand)]
pub enum SummarySubcommand {
    /// Nutrition totals per day
    Daily {
        /// Only the last N days (default: every day with meals)
        #[arg(long)]
        days: Option<u32>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Nutrition totals per week (Monday start)
    Weekly {
        /// Number of weeks, including the current one
        #[arg(long, default_value = "4")]
        weeks: usize,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl SummaryCommand {
    pub async fn run(&self, repo: &MealRepository) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            SummarySubcommand::Daily { days, format } => {
                let meals = match days {
                    Some(0) => return Err("--days must be at least 1".into()),
                    Some(days) => {
                        let today = Local::now().date_naive();
                        let start = local_midnight(today - Duration::days(i64::from(*days) - 1))?;
                        let end = local_midnight(today + Duration::days(1))?;
                        repo.query(start, end).await?
                    }
                    None => repo.list().await?,
                };
                let summaries = daily_summaries(&meals);

                match format {
                    OutputFormat::Json => {
                        let rows: Vec<_> = summaries
                            .iter()
                            .map(|s| {
                                serde_json::json!({
                                    "date": s.date,
                                    "meal_count": s.meals.len(),
                                    "total_nutrition": s.total_nutrition(),
                                })
                            })
                            .collect();
                        println!("{}", serde_json::to_string_pretty(&rows)?);
                    }
                    OutputFormat::Text => {
                        if summaries.is_empty() {
                            println!("No meals logged");
                            return Ok(());
                        }
                        println!(
                            "{:<12}  {:>5}  {:>9}  {:>9}  {:>8}",
                            "DATE", "MEALS", "CARBS (g)", "PROT (g)", "KCAL"
                        );
                        println!("{}", "-".repeat(51));
                        for summary in &summaries {
                            let total = summary.total_nutrition();
                            println!(
                                "{:<12}  {:>5}  {:>9.1}  {:>9.1}  {:>8.0}",
                                summary.date.format("%Y-%m-%d"),
                                summary.meals.len(),
                                total.carbohydrates,
                                total.protein,
                                total.calories
                            );
                        }
                    }
                }
                Ok(())
            }

            SummarySubcommand::Weekly { weeks, format } => {
                let meals = repo.list().await?;
                let summaries = weekly_summaries(&meals, *weeks);

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&summaries)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "{:<12}  {:>5}  {:>9}  {:>9}  {:>8}  {:>9}",
                            "WEEK OF", "MEALS", "CARBS (g)", "PROT (g)", "KCAL", "KCAL/DAY"
                        );
                        println!("{}", "-".repeat(62));
                        for summary in &summaries {
                            let total = summary.total_nutrition;
                            println!(
                                "{:<12}  {:>5}  {:>9.1}  {:>9.1}  {:>8.0}  {:>9.0}",
                                summary.week_start.format("%Y-%m-%d"),
                                summary.meal_count,
                                total.carbohydrates,
                                total.protein,
                                total.calories,
                                total.calories / 7.0
                            );
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
