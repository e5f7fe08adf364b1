use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::nutrition::NutritionInfo;

/// Coarse food grouping assigned at ingestion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Protein,
    Carbs,
    Fruits,
    Dairy,
    Nuts,
    Vegetables,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Protein => write!(f, "Protein"),
            Category::Carbs => write!(f, "Carbs"),
            Category::Fruits => write!(f, "Fruits"),
            Category::Dairy => write!(f, "Dairy"),
            Category::Nuts => write!(f, "Nuts"),
            Category::Vegetables => write!(f, "Vegetables"),
            Category::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "protein" => Ok(Category::Protein),
            "carbs" => Ok(Category::Carbs),
            "fruits" => Ok(Category::Fruits),
            "dairy" => Ok(Category::Dairy),
            "nuts" => Ok(Category::Nuts),
            "vegetables" => Ok(Category::Vegetables),
            "other" => Ok(Category::Other),
            _ => Err(format!("Invalid category '{}'", s)),
        }
    }
}

/// Reference nutrition for a food, per 100 g.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodTemplate {
    pub id: Uuid,
    pub name: String,
    pub nutrition_per_100g: NutritionInfo,
    pub category: Category,
}

impl FoodTemplate {
    pub fn new(name: impl Into<String>, nutrition_per_100g: NutritionInfo, category: Category) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            nutrition_per_100g,
            category,
        }
    }

    /// Nutrition for `weight` grams, scaled linearly by `weight / 100`.
    pub fn nutrition_for(&self, weight: f64) -> NutritionInfo {
        self.nutrition_per_100g.scaled(weight / 100.0)
    }
}

/// Reference nutrition for a drink, per 100 ml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrinkTemplate {
    pub id: Uuid,
    pub name: String,
    pub nutrition_per_100ml: NutritionInfo,
    pub category: String,
    pub is_alcoholic: bool,
}

impl DrinkTemplate {
    pub fn new(
        name: impl Into<String>,
        nutrition_per_100ml: NutritionInfo,
        category: impl Into<String>,
        is_alcoholic: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            nutrition_per_100ml,
            category: category.into(),
            is_alcoholic,
        }
    }

    /// Nutrition for `volume` millilitres, scaled linearly by `volume / 100`.
    pub fn nutrition_for(&self, volume: f64) -> NutritionInfo {
        self.nutrition_per_100ml.scaled(volume / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display_and_parse() {
        for category in [
            Category::Protein,
            Category::Carbs,
            Category::Fruits,
            Category::Dairy,
            Category::Nuts,
            Category::Vegetables,
            Category::Other,
        ] {
            let parsed: Category = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("meat".parse::<Category>().is_err());
    }

    #[test]
    fn test_food_template_scaling() {
        let rice = FoodTemplate::new(
            "White Rice",
            NutritionInfo::new(28.0, 2.7, 130.0),
            Category::Carbs,
        );
        assert_eq!(rice.nutrition_for(100.0), rice.nutrition_per_100g);
        assert_eq!(rice.nutrition_for(200.0), NutritionInfo::new(56.0, 5.4, 260.0));
        assert!(rice.nutrition_for(0.0).is_zero());
    }

    #[test]
    fn test_drink_template_scaling() {
        let beer = DrinkTemplate::new(
            "Beer (Regular)",
            NutritionInfo::new(3.6, 0.5, 43.0),
            "Beer",
            true,
        );
        let pint = beer.nutrition_for(500.0);
        assert!((pint.calories - 215.0).abs() < 1e-9);
        assert!((pint.carbohydrates - 18.0).abs() < 1e-9);
    }
}
