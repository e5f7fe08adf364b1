use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::drink::Drink;
use super::food_item::FoodItem;
use super::nutrition::NutritionInfo;

/// A logged meal. The meal owns its foods and drinks; deleting it deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub foods: Vec<FoodItem>,
    pub drinks: Vec<Drink>,
    pub timestamp: DateTime<Utc>,
    /// Encoded image bytes. Not part of JSON output.
    #[serde(skip)]
    pub photo: Option<Vec<u8>>,
}

impl Meal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            foods: Vec::new(),
            drinks: Vec::new(),
            timestamp: Utc::now(),
            photo: None,
        }
    }

    pub fn with_foods(mut self, foods: Vec<FoodItem>) -> Self {
        self.foods = foods;
        self
    }

    pub fn with_drinks(mut self, drinks: Vec<Drink>) -> Self {
        self.drinks = drinks;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_photo(mut self, photo: Vec<u8>) -> Self {
        self.photo = Some(photo);
        self
    }

    /// Sum of every owned food and drink. Never cached.
    pub fn total_nutrition(&self) -> NutritionInfo {
        let foods: NutritionInfo = self.foods.iter().map(|f| f.nutrition).sum();
        let drinks: NutritionInfo = self.drinks.iter().map(|d| d.nutrition).sum();
        foods + drinks
    }

    /// A photo placeholder still waiting for its foods and drinks.
    pub fn is_incomplete(&self) -> bool {
        self.photo.is_some() && self.foods.is_empty() && self.drinks.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.foods.len() + self.drinks.len()
    }

    /// Builds the copy used by clone: new identity, timestamp of now,
    /// value-copied children with their own identities, same photo.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            foods: self.foods.iter().map(FoodItem::duplicate).collect(),
            drinks: self.drinks.iter().map(Drink::duplicate).collect(),
            timestamp: Utc::now(),
            photo: self.photo.clone(),
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count().max(1)))?;
        writeln!(
            f,
            "Time: {}",
            self.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        )?;
        if self.is_incomplete() {
            writeln!(f, "Status: incomplete (photo only)")?;
        } else if self.photo.is_some() {
            writeln!(f, "Photo: attached")?;
        }

        if !self.foods.is_empty() {
            writeln!(f, "\nFoods:")?;
            for food in &self.foods {
                writeln!(f, "  - {}", food)?;
            }
        }

        if !self.drinks.is_empty() {
            writeln!(f, "\nDrinks:")?;
            for drink in &self.drinks {
                writeln!(f, "  - {}", drink)?;
            }
        }

        writeln!(f, "\nTotal: {}", self.total_nutrition())
    }
}
