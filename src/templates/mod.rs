//! Read-only catalogue of reference foods and drinks.
//!
//! Foods come from the bundled CSV dataset; drinks are a fixed list. The
//! catalogue is built once at startup and never written back.

pub mod builtin;
mod category;
mod csv;

pub use category::categorize;
pub use csv::{split_row, title_case, ColumnLayout};

use std::path::Path;

use crate::error::IngestionWarning;
use crate::models::{DrinkTemplate, FoodTemplate, NutritionInfo};

/// Dataset files shipped with the app, in load order.
pub const DEFAULT_DATASET_FILES: [&str; 5] = [
    "FOOD-DATA-GROUP1.csv",
    "FOOD-DATA-GROUP2.csv",
    "FOOD-DATA-GROUP3.csv",
    "FOOD-DATA-GROUP4.csv",
    "FOOD-DATA-GROUP5.csv",
];

/// What happened while building the catalogue.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub sources_read: usize,
    pub rows_loaded: usize,
    pub warnings: Vec<IngestionWarning>,
    pub used_fallback: bool,
}

#[derive(Debug, Clone)]
pub struct NutritionTemplateStore {
    foods: Vec<FoodTemplate>,
    drinks: Vec<DrinkTemplate>,
    report: IngestReport,
}

impl NutritionTemplateStore {
    /// Loads `files` from `dir`. Unreadable files are skipped.
    pub fn load<S: AsRef<str>>(dir: &Path, files: &[S]) -> Self {
        let mut sources = Vec::new();
        for file in files {
            let file = file.as_ref();
            let path = dir.join(file);
            match std::fs::read_to_string(&path) {
                Ok(contents) => sources.push((file.to_string(), contents)),
                Err(e) => tracing::warn!("Could not read dataset file {}: {}", path.display(), e),
            }
        }
        Self::from_sources(sources)
    }

    /// Builds the catalogue from in-memory `(label, contents)` pairs.
    pub fn from_sources<I, L, C>(sources: I) -> Self
    where
        I: IntoIterator<Item = (L, C)>,
        L: AsRef<str>,
        C: AsRef<str>,
    {
        let mut report = IngestReport::default();
        let mut foods = Vec::new();

        for (label, contents) in sources {
            report.sources_read += 1;
            ingest_source(label.as_ref(), contents.as_ref(), &mut foods, &mut report.warnings);
        }
        report.rows_loaded = foods.len();

        if foods.is_empty() {
            tracing::warn!("No foods loaded from dataset, using built-in list");
            foods = builtin::fallback_foods();
            report.used_fallback = true;
        } else {
            tracing::info!(
                "Loaded {} foods from {} dataset files ({} rows skipped)",
                report.rows_loaded,
                report.sources_read,
                report.warnings.len()
            );
        }

        Self {
            foods,
            drinks: builtin::drinks(),
            report,
        }
    }

    /// Built-in lists only.
    pub fn builtin() -> Self {
        Self::from_sources(std::iter::empty::<(&str, &str)>())
    }

    pub fn foods(&self) -> &[FoodTemplate] {
        &self.foods
    }

    pub fn drinks(&self) -> &[DrinkTemplate] {
        &self.drinks
    }

    pub fn ingest_report(&self) -> &IngestReport {
        &self.report
    }

    /// Case-insensitive substring match on the name. An empty query
    /// returns every food.
    pub fn search_foods(&self, query: &str) -> Vec<&FoodTemplate> {
        let query = query.to_lowercase();
        self.foods
            .iter()
            .filter(|f| query.is_empty() || f.name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn search_drinks(&self, query: &str) -> Vec<&DrinkTemplate> {
        let query = query.to_lowercase();
        self.drinks
            .iter()
            .filter(|d| query.is_empty() || d.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Exact name match, ignoring case.
    pub fn find_food(&self, name: &str) -> Option<&FoodTemplate> {
        self.foods.iter().find(|f| f.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn find_drink(&self, name: &str) -> Option<&DrinkTemplate> {
        self.drinks.iter().find(|d| d.name.eq_ignore_ascii_case(name.trim()))
    }
}

fn ingest_source(
    label: &str,
    contents: &str,
    foods: &mut Vec<FoodTemplate>,
    warnings: &mut Vec<IngestionWarning>,
) {
    let mut lines = contents.lines();
    let layout = match lines.next() {
        Some(header) => ColumnLayout::from_header(header),
        None => return,
    };

    // Header is line 1
    for (index, row) in lines.enumerate() {
        let line = index + 2;
        if row.trim().is_empty() {
            continue;
        }

        match parse_row(row, &layout) {
            Ok(food) => foods.push(food),
            Err(reason) => {
                let warning = IngestionWarning {
                    origin: label.to_string(),
                    line,
                    reason,
                };
                tracing::debug!("Skipping dataset row {}", warning);
                warnings.push(warning);
            }
        }
    }
}

fn parse_row(row: &str, layout: &ColumnLayout) -> Result<FoodTemplate, String> {
    let fields = split_row(row);
    if fields.len() < layout.min_fields() {
        return Err(format!(
            "expected at least {} fields, found {}",
            layout.min_fields(),
            fields.len()
        ));
    }

    let number = |index: usize, what: &str| {
        let raw = fields[index].trim();
        match raw.parse::<f64>() {
            Ok(value) if !value.is_finite() => Err(format!("{} '{}' is not finite", what, raw)),
            Ok(value) if value < 0.0 => Err(format!("{} '{}' is negative", what, raw)),
            Ok(value) => Ok(value),
            Err(_) => Err(format!("{} '{}' is not a number", what, raw)),
        }
    };
    let calories = number(layout.calories, "calories")?;
    let carbohydrates = number(layout.carbohydrates, "carbohydrates")?;
    let protein = number(layout.protein, "protein")?;

    let name = fields[layout.name].trim();
    if name.is_empty() {
        return Err("empty food name".to_string());
    }

    Ok(FoodTemplate::new(
        title_case(name),
        NutritionInfo::new(carbohydrates, protein, calories),
        categorize(name, carbohydrates, protein),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use tempfile::TempDir;

    const HEADER: &str = ",Unnamed: 0,food,Caloric Value,Fat,Saturated Fats,Monounsaturated Fats,Polyunsaturated Fats,Carbohydrates,Sugars,Protein,Dietary Fiber";

    fn dataset(rows: &[&str]) -> String {
        let mut contents = HEADER.to_string();
        for row in rows {
            contents.push('\n');
            contents.push_str(row);
        }
        contents
    }

    #[test]
    fn test_ingests_dataset_rows() {
        let csv = dataset(&[
            "0,0,cream cheese,51,5,2.9,1.3,0.2,0.8,0.5,0.9,0",
            "1,1,\"chicken, roasted\",239,13.6,3.8,5.3,3,0,0,27.3,0",
            "",
            "2,2,white rice,130,0.3,0.1,0.1,0.1,28.2,0.1,2.7,0.4",
        ]);
        let store = NutritionTemplateStore::from_sources([("FOOD-DATA-GROUP1.csv", csv)]);

        let report = store.ingest_report();
        assert_eq!(report.sources_read, 1);
        assert_eq!(report.rows_loaded, 3);
        assert!(report.warnings.is_empty());
        assert!(!report.used_fallback);

        let names: Vec<&str> = store.foods().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Cream Cheese", "Chicken, Roasted", "White Rice"]);

        let chicken = &store.foods()[1];
        assert_eq!(chicken.nutrition_per_100g, NutritionInfo::new(0.0, 27.3, 239.0));
        assert_eq!(chicken.category, Category::Protein);
        assert_eq!(store.foods()[0].category, Category::Dairy);
    }

    #[test]
    fn test_bad_rows_become_warnings() {
        let csv = dataset(&[
            "0,0,mystery,n/a,5,2.9,1.3,0.2,0.8,0.5,0.9,0",
            "1,1,too short,12",
            "2,2,banana,89,0.3,0.1,0,0.1,22.8,12.2,1.1,2.6",
        ]);
        let store = NutritionTemplateStore::from_sources([("group.csv", csv)]);

        let report = store.ingest_report();
        assert_eq!(report.rows_loaded, 1);
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(report.warnings[0].origin, "group.csv");
        assert_eq!(report.warnings[0].line, 2);
        assert_eq!(report.warnings[1].line, 3);
        assert_eq!(store.foods()[0].name, "Banana");
    }

    #[test]
    fn test_non_finite_and_negative_values_become_warnings() {
        let csv = dataset(&[
            "0,0,weird,NaN,0,0,0,0,-5,0,inf,0",
            "1,1,endless,inf,0,0,0,0,1,0,1,0",
            "2,2,sunken,10,0,0,0,0,-5,0,1,0",
            "3,3,apple,52,0.2,0,0,0.1,13.8,10.4,0.3,2.4",
        ]);
        let store = NutritionTemplateStore::from_sources([("group.csv", csv)]);

        let report = store.ingest_report();
        assert_eq!(report.rows_loaded, 1);
        assert_eq!(report.warnings.len(), 3);
        assert!(report.warnings[0].reason.contains("not finite"));
        assert!(report.warnings[2].reason.contains("negative"));
        assert!(!report.used_fallback);

        let apple = &store.foods()[0];
        assert_eq!(apple.name, "Apple");
        let n = apple.nutrition_per_100g;
        assert!([n.carbohydrates, n.protein, n.calories]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn test_empty_ingestion_uses_fallback() {
        let header_only = NutritionTemplateStore::from_sources([("empty.csv", HEADER)]);
        let nothing = NutritionTemplateStore::builtin();
        let fallback = builtin::fallback_foods();

        for store in [&header_only, &nothing] {
            assert!(store.ingest_report().used_fallback);
            assert_eq!(store.foods().len(), fallback.len());
            for (loaded, expected) in store.foods().iter().zip(&fallback) {
                assert_eq!(loaded.name, expected.name);
                assert_eq!(loaded.nutrition_per_100g, expected.nutrition_per_100g);
                assert_eq!(loaded.category, expected.category);
            }
        }
    }

    #[test]
    fn test_load_skips_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("FOOD-DATA-GROUP2.csv"),
            dataset(&["0,0,almonds,579,49.9,3.8,31.6,12.3,21.6,4.4,21.2,12.5"]),
        )
        .unwrap();

        let store = NutritionTemplateStore::load(temp_dir.path(), &DEFAULT_DATASET_FILES);

        assert_eq!(store.ingest_report().sources_read, 1);
        assert_eq!(store.foods().len(), 1);
        assert_eq!(store.foods()[0].category, Category::Nuts);
    }

    #[test]
    fn test_search_is_case_insensitive_subset() {
        let store = NutritionTemplateStore::builtin();

        let results = store.search_foods("RICE");
        let names: Vec<&str> = results.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["White Rice", "Brown Rice"]);

        for query in ["bread", "Pea", "zzz", "a"] {
            let results = store.search_foods(query);
            assert!(results.len() <= store.foods().len());
            assert!(results
                .iter()
                .all(|f| f.name.to_lowercase().contains(&query.to_lowercase())));
        }
        let upper: Vec<&str> = store.search_foods("APPLE").iter().map(|f| f.name.as_str()).collect();
        let lower: Vec<&str> = store.search_foods("apple").iter().map(|f| f.name.as_str()).collect();
        assert!(!lower.is_empty());
        assert_eq!(upper, lower);

        assert!(store.search_foods("zzz").is_empty());
        assert_eq!(store.search_foods("").len(), store.foods().len());
    }

    #[test]
    fn test_search_drinks() {
        let store = NutritionTemplateStore::builtin();
        let wines: Vec<&str> = store
            .search_drinks("wine")
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(wines, vec!["Wine (Red)", "Wine (White)"]);
        assert_eq!(store.search_drinks("").len(), store.drinks().len());
    }

    #[test]
    fn test_find_by_exact_name() {
        let store = NutritionTemplateStore::builtin();
        assert_eq!(store.find_food("white rice").unwrap().name, "White Rice");
        assert!(store.find_food("rice").is_none());
        assert!(store.find_drink(" GIN ").unwrap().is_alcoholic);
    }
}
