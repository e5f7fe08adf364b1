use clap::{Args, Subcommand};

use super::{load_templates, truncate, OutputFormat};
use crate::config::Config;
use crate::models::Category;

#[derive(Args)]
pub struct FoodCommand {
    #[command(subcommand)]
    pub command: FoodSubcommand,
}

#[derive(Subcommand)]
pub enum FoodSubcommand {
    /// Search the local food catalogue
    Search {
        /// Part of the food name (empty lists everything)
        #[arg(default_value = "")]
        query: String,

        /// Only foods in this category
        #[arg(long)]
        category: Option<Category>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Search the USDA FoodData Central database
    Lookup {
        /// Food to search for
        #[arg(required_unless_present = "fdc_id")]
        query: Option<String>,

        /// Fetch a single food by its FDC ID instead of searching
        #[arg(long, conflicts_with = "query")]
        fdc_id: Option<i64>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl FoodCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            FoodSubcommand::Search {
                query,
                category,
                format,
            } => {
                let templates = load_templates(config);
                let foods: Vec<_> = templates
                    .search_foods(query)
                    .into_iter()
                    .filter(|f| category.map_or(true, |c| f.category == c))
                    .collect();

                if foods.is_empty() {
                    println!("No foods found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&foods)?);
                    }
                    OutputFormat::Text => {
                        println!(
                            "{:<32}  {:<10}  {:>9}  {:>9}  {:>6}",
                            "NAME (per 100 g)", "CATEGORY", "CARBS (g)", "PROT (g)", "KCAL"
                        );
                        println!("{}", "-".repeat(74));
                        for food in &foods {
                            let n = food.nutrition_per_100g;
                            println!(
                                "{:<32}  {:<10}  {:>9.1}  {:>9.1}  {:>6.0}",
                                truncate(&food.name, 32),
                                food.category.to_string(),
                                n.carbohydrates,
                                n.protein,
                                n.calories
                            );
                        }
                        println!("\nTotal: {} food(s)", foods.len());
                    }
                }
                Ok(())
            }

            FoodSubcommand::Lookup {
                query,
                fdc_id,
                format,
            } => {
                let client = config.lookup.client();
                let foods = match fdc_id {
                    Some(id) => vec![client.food_details(*id).await?],
                    None => client.search(query.as_deref().unwrap_or_default()).await?,
                };

                if foods.is_empty() {
                    println!("No foods found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        let rows: Vec<_> = foods
                            .iter()
                            .map(|f| {
                                serde_json::json!({
                                    "fdc_id": f.fdc_id,
                                    "description": f.description,
                                    "nutrition": f.nutrition(),
                                })
                            })
                            .collect();
                        println!("{}", serde_json::to_string_pretty(&rows)?);
                    }
                    OutputFormat::Text => {
                        for food in &foods {
                            println!("[{}] {}", food.fdc_id, food.description);
                            println!("  per 100 g: {}", food.nutrition());
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
