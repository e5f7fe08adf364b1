use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use nutritrack::{config, db, error, models, summary, sync, templates};

use commands::{
    ConfigCommand, DrinkCommand, FoodCommand, MealCommand, SummaryCommand, SyncCommand,
};
use config::Config;
use db::{init_db, MealRepository};

#[derive(Parser)]
#[command(name = "nutritrack")]
#[command(version)]
#[command(about = "Log meals and track carbohydrates, protein and calories", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log and manage meals
    Meal(MealCommand),

    /// Daily and weekly nutrition totals
    Summary(SummaryCommand),

    /// Browse the food catalogue or look foods up online
    Food(FoodCommand),

    /// Browse the drink catalogue
    Drink(DrinkCommand),

    /// Watch the store for changes from other devices
    Sync(SyncCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nutritrack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Meal(cmd)) => {
            let repo = open_store(&config).await?;
            cmd.run(&repo, &config).await?;
        }
        Some(Commands::Summary(cmd)) => {
            let repo = open_store(&config).await?;
            cmd.run(&repo).await?;
        }
        Some(Commands::Food(cmd)) => {
            cmd.run(&config).await?;
        }
        Some(Commands::Drink(cmd)) => {
            cmd.run()?;
        }
        Some(Commands::Sync(cmd)) => {
            let repo = open_store(&config).await?;
            cmd.run(&repo, &config).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

async fn open_store(config: &Config) -> Result<MealRepository, error::StoreError> {
    let pool = init_db(&config.database_path.value).await?;
    Ok(MealRepository::new(pool))
}
