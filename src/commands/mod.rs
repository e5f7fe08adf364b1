mod config_cmd;
mod drink;
mod food;
mod meal;
mod summary_cmd;
mod sync_cmd;

pub use config_cmd::ConfigCommand;
pub use drink::DrinkCommand;
pub use food::FoodCommand;
pub use meal::MealCommand;
pub use summary_cmd::SummaryCommand;
pub use sync_cmd::SyncCommand;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::ValueEnum;

use crate::config::Config;
use crate::templates::NutritionTemplateStore;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub(crate) fn load_templates(config: &Config) -> NutritionTemplateStore {
    NutritionTemplateStore::load(&config.dataset_dir.value, config.dataset_files.value.as_slice())
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD` (local time).
pub(crate) fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, String> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| format!("Invalid time '{}'. Use YYYY-MM-DD [HH:MM]", input))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("Time '{}' does not exist in the local timezone", input))
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD", input))
}

/// Start of `date` in local time, as UTC.
pub(crate) fn local_midnight(date: NaiveDate) -> Result<DateTime<Utc>, String> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("Midnight of {} does not exist in the local timezone", date))
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() > width {
        let cut: String = name.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2025-03-10T12:30:00Z").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2025-03-10T12:30:00+00:00");

        let local = parse_timestamp("2025-03-10 12:30").unwrap();
        assert_eq!(
            local.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            "2025-03-10 12:30"
        );

        let day = parse_timestamp("2025-03-10").unwrap();
        assert_eq!(day, local_midnight(parse_date("2025-03-10").unwrap()).unwrap());

        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Lunch", 10), "Lunch");
        assert_eq!(truncate("A very long meal name", 10), "A very ...");
    }
}
