use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;

use super::OutputFormat;
use crate::config::{Config, ConfigValue};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        print_value("database_path", &config.database_path, |p| {
                            p.display().to_string()
                        });
                        print_value("dataset_dir", &config.dataset_dir, |p| {
                            p.display().to_string()
                        });
                        print_value("dataset_files", &config.dataset_files, |f| f.join(", "));
                        print_value("sync.check_interval_secs", &config.sync_interval_secs, |s| {
                            s.to_string()
                        });

                        let key = if config.lookup.api_key.is_some() {
                            "(set)"
                        } else {
                            "DEMO_KEY"
                        };
                        println!("lookup.api_key: {}", key);
                        println!("lookup.base_url: {}", config.lookup.client().base_url());
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = Config::default_config_path();

                // Check if config already exists
                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'nutritrack config show' to view current configuration.");
                    return Ok(());
                }

                // Create parent directory
                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                // Write default config
                let default_config = r#"# nutritrack configuration

# Path to SQLite database (default: platform data dir/nutritrack/nutritrack.db)
# database_path: ~/.local/share/nutritrack/nutritrack.db

# Directory with the food dataset CSV files
# dataset_dir: ~/.local/share/nutritrack/dataset
# dataset_files: [FOOD-DATA-GROUP1.csv, FOOD-DATA-GROUP2.csv]

sync:
  # Seconds between background consistency checks
  check_interval_secs: 10

lookup:
  # FoodData Central API key (https://fdc.nal.usda.gov/api-key-signup.html)
  # api_key: your-key
"#;

                let mut file = fs::File::create(&config_path)?;
                file.write_all(default_config.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}

fn print_value<T>(key: &str, value: &ConfigValue<T>, render: impl Fn(&T) -> String) {
    println!("{}: {}", key, render(&value.value));
    println!("  source: {}", value.source);
    println!();
}
