//! Values submitted by meal editors.
//!
//! Editors collect text input, turn it into drafts here and hand the
//! resulting [`Meal`] to the store. Numeric checks happen at this boundary;
//! the store itself accepts any well-typed meal.

use chrono::{DateTime, Utc};

use super::drink::Drink;
use super::food_item::FoodItem;
use super::meal::Meal;
use super::nutrition::NutritionInfo;
use super::template::{DrinkTemplate, FoodTemplate};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq)]
pub struct FoodDraft {
    pub name: String,
    pub weight: f64,
    pub nutrition: NutritionInfo,
}

impl FoodDraft {
    /// Parses editor text fields.
    pub fn parse(
        name: &str,
        weight: &str,
        carbohydrates: &str,
        protein: &str,
        calories: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: parse_name(name)?,
            weight: parse_positive("weight", weight)?,
            nutrition: parse_nutrition(carbohydrates, protein, calories)?,
        })
    }

    /// Default values for `weight` grams of a template.
    pub fn from_template(template: &FoodTemplate, weight: f64) -> Result<Self, ValidationError> {
        check_positive("weight", weight)?;
        Ok(Self {
            name: template.name.clone(),
            weight,
            nutrition: template.nutrition_for(weight),
        })
    }

    pub fn into_item(self) -> FoodItem {
        FoodItem::new(self.name, self.weight, self.nutrition)
    }
}

impl From<&FoodItem> for FoodDraft {
    fn from(item: &FoodItem) -> Self {
        Self {
            name: item.name.clone(),
            weight: item.weight,
            nutrition: item.nutrition,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrinkDraft {
    pub name: String,
    pub volume: f64,
    pub nutrition: NutritionInfo,
    pub is_alcoholic: bool,
}

impl DrinkDraft {
    pub fn parse(
        name: &str,
        volume: &str,
        carbohydrates: &str,
        protein: &str,
        calories: &str,
        is_alcoholic: bool,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: parse_name(name)?,
            volume: parse_positive("volume", volume)?,
            nutrition: parse_nutrition(carbohydrates, protein, calories)?,
            is_alcoholic,
        })
    }

    pub fn from_template(template: &DrinkTemplate, volume: f64) -> Result<Self, ValidationError> {
        check_positive("volume", volume)?;
        Ok(Self {
            name: template.name.clone(),
            volume,
            nutrition: template.nutrition_for(volume),
            is_alcoholic: template.is_alcoholic,
        })
    }

    pub fn into_item(self) -> Drink {
        Drink::new(self.name, self.volume, self.nutrition).alcoholic(self.is_alcoholic)
    }
}

impl From<&Drink> for DrinkDraft {
    fn from(drink: &Drink) -> Self {
        Self {
            name: drink.name.clone(),
            volume: drink.volume,
            nutrition: drink.nutrition,
            is_alcoholic: drink.is_alcoholic,
        }
    }
}

/// Everything an editor submits on save.
#[derive(Debug, Clone)]
pub struct MealDraft {
    pub name: String,
    pub foods: Vec<FoodDraft>,
    pub drinks: Vec<DrinkDraft>,
    pub timestamp: DateTime<Utc>,
    pub photo: Option<Vec<u8>>,
}

impl MealDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            foods: Vec::new(),
            drinks: Vec::new(),
            timestamp: Utc::now(),
            photo: None,
        }
    }

    /// Pre-filled editor state for an existing meal.
    pub fn from_meal(meal: &Meal) -> Self {
        Self {
            name: meal.name.clone(),
            foods: meal.foods.iter().map(FoodDraft::from).collect(),
            drinks: meal.drinks.iter().map(DrinkDraft::from).collect(),
            timestamp: meal.timestamp,
            photo: meal.photo.clone(),
        }
    }

    /// Builds a new meal with a fresh identity.
    pub fn into_meal(self) -> Meal {
        let meal = Meal::new(self.name.clone());
        self.fill(meal)
    }

    /// Builds the edited version of `existing`, keeping its identity.
    /// Children are always rebuilt, matching the store's replace-all update.
    pub fn apply_to(self, existing: &Meal) -> Meal {
        let mut meal = Meal::new(self.name.clone());
        meal.id = existing.id;
        self.fill(meal)
    }

    fn fill(self, meal: Meal) -> Meal {
        let mut meal = meal
            .with_timestamp(self.timestamp)
            .with_foods(self.foods.into_iter().map(FoodDraft::into_item).collect())
            .with_drinks(self.drinks.into_iter().map(DrinkDraft::into_item).collect());
        meal.photo = self.photo;
        meal
    }
}

/// A compact item description, `NAME:AMOUNT` (looked up in the templates)
/// or `NAME:AMOUNT:CARBS:PROTEIN:CALORIES` (explicit values).
#[derive(Debug, Clone, PartialEq)]
pub enum ItemSpec {
    Template { name: String, amount: f64 },
    Explicit { name: String, amount: String, carbs: String, protein: String, calories: String },
}

impl ItemSpec {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let parts: Vec<&str> = input.split(':').map(str::trim).collect();
        match parts.as_slice() {
            [name, amount] => Ok(ItemSpec::Template {
                name: parse_name(name)?,
                amount: parse_positive("amount", amount)?,
            }),
            [name, amount, carbs, protein, calories] => Ok(ItemSpec::Explicit {
                name: parse_name(name)?,
                amount: amount.to_string(),
                carbs: carbs.to_string(),
                protein: protein.to_string(),
                calories: calories.to_string(),
            }),
            _ => Err(ValidationError::MalformedItem(input.to_string())),
        }
    }
}

fn parse_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::NotANumber {
            field,
            value: value.to_string(),
        })
}

fn parse_positive(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    let parsed = parse_number(field, value)?;
    check_positive(field, parsed)?;
    Ok(parsed)
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NotPositive { field })
    }
}

fn parse_non_negative(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    let parsed = parse_number(field, value)?;
    if parsed < 0.0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(parsed)
}

fn parse_nutrition(
    carbohydrates: &str,
    protein: &str,
    calories: &str,
) -> Result<NutritionInfo, ValidationError> {
    Ok(NutritionInfo::new(
        parse_non_negative("carbohydrates", carbohydrates)?,
        parse_non_negative("protein", protein)?,
        parse_non_negative("calories", calories)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    #[test]
    fn test_food_draft_parse() {
        let draft = FoodDraft::parse("Banana", "120", "27.6", "1.3", "107").unwrap();
        assert_eq!(draft.name, "Banana");
        assert_eq!(draft.weight, 120.0);
        assert_eq!(draft.nutrition, NutritionInfo::new(27.6, 1.3, 107.0));
    }

    #[test]
    fn test_food_draft_rejects_bad_numbers() {
        assert_eq!(
            FoodDraft::parse("Banana", "abc", "1", "1", "1"),
            Err(ValidationError::NotANumber {
                field: "weight",
                value: "abc".to_string()
            })
        );
        assert_eq!(
            FoodDraft::parse("Banana", "0", "1", "1", "1"),
            Err(ValidationError::NotPositive { field: "weight" })
        );
        assert_eq!(
            FoodDraft::parse("Banana", "100", "-1", "1", "1"),
            Err(ValidationError::Negative {
                field: "carbohydrates"
            })
        );
        assert!(FoodDraft::parse("Banana", "NaN", "1", "1", "1").is_err());
        assert_eq!(
            FoodDraft::parse("  ", "100", "1", "1", "1"),
            Err(ValidationError::EmptyName)
        );
    }

    #[test]
    fn test_drink_draft_from_template() {
        let wine = DrinkTemplate::new("Wine (Red)", NutritionInfo::new(2.6, 0.1, 85.0), "Wine", true);
        let draft = DrinkDraft::from_template(&wine, 200.0).unwrap();
        assert!(draft.is_alcoholic);
        assert!((draft.nutrition.calories - 170.0).abs() < 1e-9);
        assert!(DrinkDraft::from_template(&wine, -5.0).is_err());
    }

    #[test]
    fn test_food_draft_from_template() {
        let eggs = FoodTemplate::new("Eggs", NutritionInfo::new(1.1, 13.0, 155.0), Category::Protein);
        let draft = FoodDraft::from_template(&eggs, 50.0).unwrap();
        assert_eq!(draft.name, "Eggs");
        assert!((draft.nutrition.calories - 77.5).abs() < 1e-9);
    }

    #[test]
    fn test_meal_draft_into_meal() {
        let mut draft = MealDraft::new("Breakfast");
        draft.foods.push(FoodDraft::parse("Oatmeal", "250", "30", "6.25", "177.5").unwrap());
        draft
            .drinks
            .push(DrinkDraft::parse("Coffee", "200", "0", "0.2", "2", false).unwrap());

        let meal = draft.into_meal();
        assert_eq!(meal.name, "Breakfast");
        assert_eq!(meal.foods.len(), 1);
        assert_eq!(meal.drinks.len(), 1);
        assert!((meal.total_nutrition().calories - 179.5).abs() < 1e-9);
    }

    #[test]
    fn test_photo_only_draft_is_incomplete() {
        let mut draft = MealDraft::new("Dinner");
        draft.photo = Some(vec![0xFF, 0xD8, 0xFF]);
        assert!(draft.into_meal().is_incomplete());
    }

    #[test]
    fn test_apply_to_keeps_identity() {
        let existing = MealDraft::new("Old").into_meal();
        let edited = MealDraft::new("New").apply_to(&existing);
        assert_eq!(edited.id, existing.id);
        assert_eq!(edited.name, "New");
    }

    #[test]
    fn test_draft_from_meal_round_trip() {
        let mut draft = MealDraft::new("Dinner");
        draft.foods.push(FoodDraft::parse("Salmon", "180", "0", "36", "374.4").unwrap());
        draft
            .drinks
            .push(DrinkDraft::parse("Wine (White)", "150", "3.9", "0.15", "123", true).unwrap());
        let meal = draft.into_meal();

        let edited = MealDraft::from_meal(&meal).apply_to(&meal);
        assert_eq!(edited.id, meal.id);
        assert_eq!(edited.timestamp, meal.timestamp);
        assert_eq!(edited.total_nutrition(), meal.total_nutrition());
        assert!(edited.drinks[0].is_alcoholic);
        assert_ne!(edited.foods[0].id, meal.foods[0].id);
    }

    #[test]
    fn test_item_spec_parse() {
        assert_eq!(
            ItemSpec::parse("White Rice:150").unwrap(),
            ItemSpec::Template {
                name: "White Rice".to_string(),
                amount: 150.0
            }
        );
        assert!(matches!(
            ItemSpec::parse("Toast:40:20:4:110").unwrap(),
            ItemSpec::Explicit { .. }
        ));
        assert!(matches!(
            ItemSpec::parse("Toast"),
            Err(ValidationError::MalformedItem(_))
        ));
        assert!(ItemSpec::parse("Toast:0").is_err());
    }
}
