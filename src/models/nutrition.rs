use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Macronutrient values for a food, drink, meal or summary.
///
/// Carbohydrates and protein are in grams, calories in kcal. Values form a
/// commutative monoid under component-wise addition with [`NutritionInfo::ZERO`]
/// as identity, so totals are always computed with `+` or `Iterator::sum`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionInfo {
    pub carbohydrates: f64,
    pub protein: f64,
    pub calories: f64,
}

impl NutritionInfo {
    pub const ZERO: NutritionInfo = NutritionInfo {
        carbohydrates: 0.0,
        protein: 0.0,
        calories: 0.0,
    };

    pub fn new(carbohydrates: f64, protein: f64, calories: f64) -> Self {
        Self {
            carbohydrates,
            protein,
            calories,
        }
    }

    /// Multiplies every component by `ratio`.
    pub fn scaled(&self, ratio: f64) -> Self {
        Self {
            carbohydrates: self.carbohydrates * ratio,
            protein: self.protein * ratio,
            calories: self.calories * ratio,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl Add for NutritionInfo {
    type Output = NutritionInfo;

    fn add(self, rhs: NutritionInfo) -> NutritionInfo {
        NutritionInfo {
            carbohydrates: self.carbohydrates + rhs.carbohydrates,
            protein: self.protein + rhs.protein,
            calories: self.calories + rhs.calories,
        }
    }
}

impl AddAssign for NutritionInfo {
    fn add_assign(&mut self, rhs: NutritionInfo) {
        *self = *self + rhs;
    }
}

impl Sum for NutritionInfo {
    fn sum<I: Iterator<Item = NutritionInfo>>(iter: I) -> Self {
        iter.fold(NutritionInfo::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a NutritionInfo> for NutritionInfo {
    fn sum<I: Iterator<Item = &'a NutritionInfo>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for NutritionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} g carbs, {:.1} g protein, {:.0} kcal",
            self.carbohydrates, self.protein, self.calories
        )
    }
}
