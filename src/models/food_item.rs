use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::nutrition::NutritionInfo;

/// A food eaten as part of a meal. Owned by exactly one [`Meal`](super::Meal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    /// Grams
    pub weight: f64,
    pub nutrition: NutritionInfo,
    pub timestamp: DateTime<Utc>,
}

impl FoodItem {
    pub fn new(name: impl Into<String>, weight: f64, nutrition: NutritionInfo) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            weight,
            nutrition,
            timestamp: Utc::now(),
        }
    }

    /// Value copy with a fresh identity and timestamp.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            ..self.clone()
        }
    }
}

impl fmt::Display for FoodItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0} g): {}", self.name, self.weight, self.nutrition)
    }
}
