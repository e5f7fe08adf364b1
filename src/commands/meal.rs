use chrono::{Duration, Local};
use clap::{Args, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use uuid::Uuid;

use super::{load_templates, local_midnight, parse_date, parse_timestamp, truncate, OutputFormat};
use crate::config::Config;
use crate::db::MealRepository;
use crate::error::ValidationError;
use crate::models::{DrinkDraft, FoodDraft, ItemSpec, Meal, MealDraft};
use crate::summary::daily_summaries;
use crate::templates::NutritionTemplateStore;

#[derive(Args)]
pub struct MealCommand {
    #[command(subcommand)]
    pub command: MealSubcommand,
}

#[derive(Subcommand)]
pub enum MealSubcommand {
    /// Log a new meal
    Add {
        /// Name of the meal
        name: String,

        /// Food as NAME:GRAMS (from the catalogue) or NAME:GRAMS:CARBS:PROTEIN:KCAL (can be repeated)
        #[arg(long = "food", value_name = "ITEM")]
        foods: Vec<String>,

        /// Drink as NAME:ML or NAME:ML:CARBS:PROTEIN:KCAL (can be repeated)
        #[arg(long = "drink", value_name = "ITEM")]
        drinks: Vec<String>,

        /// Mark drinks with explicit values as alcoholic
        #[arg(long)]
        alcoholic: bool,

        /// When the meal was eaten (default: now)
        #[arg(long, value_name = "TIME")]
        at: Option<String>,

        /// Photo file to attach
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// List logged meals
    List {
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a meal's details
    Show {
        /// Meal ID (UUID)
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Edit a meal. Given foods or drinks replace the existing ones.
    Edit {
        /// Meal ID (UUID)
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// Replacement food (can be repeated)
        #[arg(long = "food", value_name = "ITEM")]
        foods: Vec<String>,

        /// Replacement drink (can be repeated)
        #[arg(long = "drink", value_name = "ITEM")]
        drinks: Vec<String>,

        /// Mark drinks with explicit values as alcoholic
        #[arg(long)]
        alcoholic: bool,

        /// Remove all foods
        #[arg(long, conflicts_with = "foods")]
        clear_foods: bool,

        /// Remove all drinks
        #[arg(long, conflicts_with = "drinks")]
        clear_drinks: bool,

        /// New time
        #[arg(long, value_name = "TIME")]
        at: Option<String>,

        /// Replace the photo
        #[arg(long)]
        photo: Option<PathBuf>,

        /// Remove the photo
        #[arg(long, conflicts_with = "photo")]
        remove_photo: bool,
    },

    /// Delete a meal and everything in it
    Delete {
        /// Meal ID (UUID)
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Log a copy of an existing meal, timestamped now
    Clone {
        /// Meal ID (UUID)
        id: String,
    },

    /// Meals of the last few days, grouped by day
    History {
        /// Number of days to show, including today
        #[arg(long, default_value = "7")]
        days: u32,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl MealCommand {
    pub async fn run(
        &self,
        repo: &MealRepository,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            MealSubcommand::Add {
                name,
                foods,
                drinks,
                alcoholic,
                at,
                photo,
            } => {
                let templates = catalogue_for(config, foods, drinks);
                let mut draft = MealDraft::new(name.trim());
                if draft.name.is_empty() {
                    return Err(ValidationError::EmptyName.into());
                }

                draft.foods = food_drafts(foods, &templates)?;
                draft.drinks = drink_drafts(drinks, &templates, *alcoholic)?;
                if let Some(at) = at {
                    draft.timestamp = parse_timestamp(at)?;
                }
                if let Some(path) = photo {
                    draft.photo = Some(std::fs::read(path)?);
                }

                let created = repo.create(&draft.into_meal()).await?;
                println!("Logged meal:");
                println!("{}", created);
                Ok(())
            }

            MealSubcommand::List { from, to, format } => {
                let start = from
                    .as_deref()
                    .map(|day| parse_date(day).and_then(local_midnight))
                    .transpose()?;
                let end = to
                    .as_deref()
                    .map(|day| parse_date(day).and_then(|d| local_midnight(d + Duration::days(1))))
                    .transpose()?;

                let meals = match (start, end) {
                    (Some(start), Some(end)) => repo.query(start, end).await?,
                    (start, end) => repo
                        .list()
                        .await?
                        .into_iter()
                        .filter(|m| start.map_or(true, |s| m.timestamp >= s))
                        .filter(|m| end.map_or(true, |e| m.timestamp < e))
                        .collect(),
                };

                if meals.is_empty() {
                    println!("No meals found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&meals)?);
                    }
                    OutputFormat::Text => print_meal_table(&meals),
                }
                Ok(())
            }

            MealSubcommand::Show { id, format } => {
                let meal = find_meal(repo, id).await?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&meal)?);
                    }
                    OutputFormat::Text => {
                        println!("{}", meal);
                    }
                }
                Ok(())
            }

            MealSubcommand::Edit {
                id,
                name,
                foods,
                drinks,
                alcoholic,
                clear_foods,
                clear_drinks,
                at,
                photo,
                remove_photo,
            } => {
                let has_updates = name.is_some()
                    || !foods.is_empty()
                    || !drinks.is_empty()
                    || *clear_foods
                    || *clear_drinks
                    || at.is_some()
                    || photo.is_some()
                    || *remove_photo;

                if !has_updates {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let meal = find_meal(repo, id).await?;
                let templates = catalogue_for(config, foods, drinks);
                let mut draft = MealDraft::from_meal(&meal);

                if let Some(new_name) = name {
                    if new_name.trim().is_empty() {
                        return Err(ValidationError::EmptyName.into());
                    }
                    draft.name = new_name.trim().to_string();
                }
                if *clear_foods {
                    draft.foods.clear();
                } else if !foods.is_empty() {
                    draft.foods = food_drafts(foods, &templates)?;
                }
                if *clear_drinks {
                    draft.drinks.clear();
                } else if !drinks.is_empty() {
                    draft.drinks = drink_drafts(drinks, &templates, *alcoholic)?;
                }
                if let Some(at) = at {
                    draft.timestamp = parse_timestamp(at)?;
                }
                if let Some(path) = photo {
                    draft.photo = Some(std::fs::read(path)?);
                }
                if *remove_photo {
                    draft.photo = None;
                }

                let updated = repo.update(&draft.apply_to(&meal)).await?;
                println!("Updated meal:");
                println!("{}", updated);
                Ok(())
            }

            MealSubcommand::Delete { id, force } => {
                let meal = find_meal(repo, id).await?;

                // Confirm deletion unless --force is used
                if !force {
                    print!(
                        "Delete meal '{}' with {} item(s)? [y/N] ",
                        meal.name,
                        meal.item_count()
                    );
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                repo.delete(meal.id).await?;
                println!("Deleted meal: {}", meal.name);
                Ok(())
            }

            MealSubcommand::Clone { id } => {
                let meal_id = parse_meal_id(id)?;
                let copy = repo.clone_meal(meal_id).await?;
                println!("Logged copy:");
                println!("{}", copy);
                Ok(())
            }

            MealSubcommand::History { days, format } => {
                if *days == 0 {
                    return Err("--days must be at least 1".into());
                }
                let today = Local::now().date_naive();
                let first = today - Duration::days(i64::from(*days) - 1);
                let start = local_midnight(first)?;
                let end = local_midnight(today + Duration::days(1))?;

                let meals = repo.query(start, end).await?;
                let summaries = daily_summaries(&meals);

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&summaries)?);
                    }
                    OutputFormat::Text => {
                        if summaries.is_empty() {
                            println!("No meals in the last {} day(s)", days);
                            return Ok(());
                        }
                        for summary in &summaries {
                            println!("{}", summary.date.format("%A, %Y-%m-%d"));
                            for meal in &summary.meals {
                                let marker = if meal.is_incomplete() { " (incomplete)" } else { "" };
                                println!(
                                    "  {}  {}{}",
                                    meal.timestamp.with_timezone(&Local).format("%H:%M"),
                                    meal.name,
                                    marker
                                );
                            }
                            println!("  Total: {}\n", summary.total_nutrition());
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

fn parse_meal_id(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id.trim()).map_err(|_| format!("Invalid meal ID: {}", id))
}

async fn find_meal(repo: &MealRepository, id: &str) -> Result<Meal, Box<dyn std::error::Error>> {
    let meal_id = parse_meal_id(id)?;
    repo.get_by_id(meal_id)
        .await?
        .ok_or_else(|| format!("Meal not found: {}", id).into())
}

// The dataset is only read when an item refers to it by name.
fn catalogue_for(config: &Config, foods: &[String], drinks: &[String]) -> NutritionTemplateStore {
    let by_name = |spec: &String| matches!(ItemSpec::parse(spec), Ok(ItemSpec::Template { .. }));
    if foods.iter().chain(drinks).any(by_name) {
        load_templates(config)
    } else {
        NutritionTemplateStore::builtin()
    }
}

fn food_drafts(
    specs: &[String],
    templates: &NutritionTemplateStore,
) -> Result<Vec<FoodDraft>, ValidationError> {
    specs
        .iter()
        .map(|spec| match ItemSpec::parse(spec)? {
            ItemSpec::Template { name, amount } => {
                let template = templates
                    .find_food(&name)
                    .ok_or(ValidationError::UnknownTemplate(name))?;
                FoodDraft::from_template(template, amount)
            }
            ItemSpec::Explicit {
                name,
                amount,
                carbs,
                protein,
                calories,
            } => FoodDraft::parse(&name, &amount, &carbs, &protein, &calories),
        })
        .collect()
}

fn drink_drafts(
    specs: &[String],
    templates: &NutritionTemplateStore,
    alcoholic: bool,
) -> Result<Vec<DrinkDraft>, ValidationError> {
    specs
        .iter()
        .map(|spec| match ItemSpec::parse(spec)? {
            ItemSpec::Template { name, amount } => {
                let template = templates
                    .find_drink(&name)
                    .ok_or(ValidationError::UnknownTemplate(name))?;
                DrinkDraft::from_template(template, amount)
            }
            ItemSpec::Explicit {
                name,
                amount,
                carbs,
                protein,
                calories,
            } => DrinkDraft::parse(&name, &amount, &carbs, &protein, &calories, alcoholic),
        })
        .collect()
}

fn print_meal_table(meals: &[Meal]) {
    println!(
        "{:<36}  {:<16}  {:<24}  {:>6}  {:>8}",
        "ID", "TIME", "NAME", "ITEMS", "KCAL"
    );
    println!("{}", "-".repeat(98));
    for meal in meals {
        let name = if meal.is_incomplete() {
            format!("{} *", truncate(&meal.name, 22))
        } else {
            truncate(&meal.name, 24)
        };
        println!(
            "{:<36}  {:<16}  {:<24}  {:>6}  {:>8.0}",
            meal.id,
            meal.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            name,
            meal.item_count(),
            meal.total_nutrition().calories
        );
    }
    println!("\nTotal: {} meal(s)", meals.len());
    if meals.iter().any(Meal::is_incomplete) {
        println!("* photo only, nutrition not entered yet");
    }
}
