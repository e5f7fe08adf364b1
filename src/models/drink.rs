use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::nutrition::NutritionInfo;

/// A drink consumed as part of a meal. Owned by exactly one [`Meal`](super::Meal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drink {
    pub id: Uuid,
    pub name: String,
    /// Millilitres
    pub volume: f64,
    pub nutrition: NutritionInfo,
    pub is_alcoholic: bool,
    pub timestamp: DateTime<Utc>,
}

impl Drink {
    pub fn new(name: impl Into<String>, volume: f64, nutrition: NutritionInfo) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            volume,
            nutrition,
            is_alcoholic: false,
            timestamp: Utc::now(),
        }
    }

    pub fn alcoholic(mut self, is_alcoholic: bool) -> Self {
        self.is_alcoholic = is_alcoholic;
        self
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

impl fmt::Display for Drink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0} ml", self.name, self.volume)?;
        if self.is_alcoholic {
            write!(f, ", alcoholic")?;
        }
        write!(f, "): {}", self.nutrition)
    }
}
