use clap::{Args, Subcommand};

use super::{truncate, OutputFormat};
use crate::templates::NutritionTemplateStore;

#[derive(Args)]
pub struct DrinkCommand {
    #[command(subcommand)]
    pub command: DrinkSubcommand,
}

#[derive(Subcommand)]
pub enum DrinkSubcommand {
    /// Search the drink catalogue
    Search {
        /// Part of the drink name (empty lists everything)
        #[arg(default_value = "")]
        query: String,

        /// Only alcoholic drinks
        #[arg(long)]
        alcoholic: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl DrinkCommand {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            DrinkSubcommand::Search {
                query,
                alcoholic,
                format,
            } => {
                // Drinks never come from the dataset files
                let templates = NutritionTemplateStore::builtin();
                let drinks: Vec<_> = templates
                    .search_drinks(query)
                    .into_iter()
                    .filter(|d| !alcoholic || d.is_alcoholic)
                    .collect();

                if drinks.is_empty() {
                    println!("No drinks found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&drinks)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "{:<28}  {:<9}  {:>9}  {:>9}  {:>6}",
                            "NAME (per 100 ml)", "CATEGORY", "CARBS (g)", "PROT (g)", "KCAL"
                        );
                        println!("{}", "-".repeat(69));
                        for drink in &drinks {
                            let n = drink.nutrition_per_100ml;
                            let name = if drink.is_alcoholic {
                                format!("{} *", truncate(&drink.name, 26))
                            } else {
                                truncate(&drink.name, 28)
                            };
                            println!(
                                "{:<28}  {:<9}  {:>9.1}  {:>9.1}  {:>6.0}",
                                name, drink.category, n.carbohydrates, n.protein, n.calories
                            );
                        }
                        println!("\n* alcoholic");
                    }
                }
                Ok(())
            }
        }
    }
}
