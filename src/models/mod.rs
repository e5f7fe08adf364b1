mod draft;
mod drink;
mod food_item;
mod meal;
mod nutrition;
mod template;

pub use draft::{DrinkDraft, FoodDraft, ItemSpec, MealDraft};
pub use drink::Drink;
pub use food_item::FoodItem;
pub use meal::Meal;
pub use nutrition::NutritionInfo;
pub use template::{Category, DrinkTemplate, FoodTemplate};
