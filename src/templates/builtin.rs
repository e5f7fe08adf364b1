//! Reference data used when no dataset rows could be loaded.

use crate::models::{Category, DrinkTemplate, FoodTemplate, NutritionInfo};

// name, carbohydrates, protein, calories (per 100 g), category
const FOODS: &[(&str, f64, f64, f64, Category)] = &[
    ("Eggs", 1.1, 13.0, 155.0, Category::Protein),
    ("Chicken Breast", 0.0, 31.0, 165.0, Category::Protein),
    ("Salmon", 0.0, 20.0, 208.0, Category::Protein),
    ("Tuna", 0.0, 30.0, 132.0, Category::Protein),
    ("Beef Steak", 0.0, 26.0, 271.0, Category::Protein),
    ("Pork Chop", 0.0, 27.0, 242.0, Category::Protein),
    ("Turkey Breast", 0.0, 30.0, 135.0, Category::Protein),
    ("Ham", 1.5, 22.0, 145.0, Category::Protein),
    ("Bacon", 1.4, 37.0, 541.0, Category::Protein),
    ("Tofu", 1.9, 8.0, 76.0, Category::Protein),
    ("Broccoli", 7.0, 2.8, 34.0, Category::Vegetables),
    ("Brussel Sprouts", 9.0, 3.4, 43.0, Category::Vegetables),
    ("Spinach", 3.6, 2.9, 23.0, Category::Vegetables),
    ("Carrots", 10.0, 0.9, 41.0, Category::Vegetables),
    ("Cauliflower", 5.0, 1.9, 25.0, Category::Vegetables),
    ("Green Beans", 7.0, 1.8, 31.0, Category::Vegetables),
    ("Asparagus", 3.9, 2.2, 20.0, Category::Vegetables),
    ("Bell Pepper", 6.0, 1.0, 31.0, Category::Vegetables),
    ("Tomato", 3.9, 0.9, 18.0, Category::Vegetables),
    ("Cucumber", 3.6, 0.7, 16.0, Category::Vegetables),
    ("Lettuce", 2.9, 1.4, 15.0, Category::Vegetables),
    ("White Rice", 28.0, 2.7, 130.0, Category::Carbs),
    ("Brown Rice", 23.0, 2.6, 111.0, Category::Carbs),
    ("Pasta", 25.0, 5.0, 131.0, Category::Carbs),
    ("Bread (White)", 49.0, 9.0, 265.0, Category::Carbs),
    ("Bread (Whole Wheat)", 41.0, 13.0, 247.0, Category::Carbs),
    ("Oatmeal", 12.0, 2.5, 71.0, Category::Carbs),
    ("Quinoa", 21.0, 4.4, 120.0, Category::Carbs),
    ("Potato", 17.0, 2.0, 77.0, Category::Carbs),
    ("Sweet Potato", 20.0, 1.6, 86.0, Category::Carbs),
    ("Apple", 14.0, 0.3, 52.0, Category::Fruits),
    ("Banana", 23.0, 1.1, 89.0, Category::Fruits),
    ("Orange", 12.0, 0.9, 47.0, Category::Fruits),
    ("Strawberries", 8.0, 0.7, 32.0, Category::Fruits),
    ("Blueberries", 14.0, 0.7, 57.0, Category::Fruits),
    ("Grapes", 18.0, 0.7, 69.0, Category::Fruits),
    ("Avocado", 9.0, 2.0, 160.0, Category::Fruits),
    ("Milk (Whole)", 5.0, 3.3, 61.0, Category::Dairy),
    ("Cheese (Cheddar)", 1.3, 25.0, 403.0, Category::Dairy),
    ("Greek Yogurt", 3.6, 10.0, 59.0, Category::Dairy),
    ("Butter", 0.1, 0.9, 717.0, Category::Dairy),
    ("Almonds", 22.0, 21.0, 579.0, Category::Nuts),
    ("Peanuts", 16.0, 26.0, 567.0, Category::Nuts),
    ("Walnuts", 14.0, 15.0, 654.0, Category::Nuts),
    ("Peanut Butter", 20.0, 25.0, 588.0, Category::Nuts),
];

// name, carbohydrates, protein, calories (per 100 ml), category, alcoholic
const DRINKS: &[(&str, f64, f64, f64, &str, bool)] = &[
    ("Water", 0.0, 0.0, 0.0, "Water", false),
    ("Coffee (Black)", 0.0, 0.1, 1.0, "Coffee", false),
    ("Tea (Unsweetened)", 0.0, 0.0, 1.0, "Tea", false),
    ("Orange Juice", 10.4, 0.7, 45.0, "Juice", false),
    ("Apple Juice", 11.3, 0.1, 46.0, "Juice", false),
    ("Milk (Whole)", 5.0, 3.3, 61.0, "Dairy", false),
    ("Milk (Skim)", 5.0, 3.4, 34.0, "Dairy", false),
    ("Almond Milk (Unsweetened)", 0.3, 0.4, 13.0, "Dairy", false),
    ("Coca-Cola", 10.6, 0.0, 42.0, "Soda", false),
    ("Sprite", 10.0, 0.0, 40.0, "Soda", false),
    ("Protein Shake", 5.0, 8.0, 70.0, "Protein", false),
    ("Beer (Regular)", 3.6, 0.5, 43.0, "Beer", true),
    ("Beer (Light)", 2.0, 0.3, 29.0, "Beer", true),
    ("Wine (Red)", 2.6, 0.1, 85.0, "Wine", true),
    ("Wine (White)", 2.6, 0.1, 82.0, "Wine", true),
    ("Vodka", 0.0, 0.0, 231.0, "Spirits", true),
    ("Whiskey", 0.0, 0.0, 250.0, "Spirits", true),
    ("Rum", 0.0, 0.0, 231.0, "Spirits", true),
    ("Gin", 0.0, 0.0, 263.0, "Spirits", true),
    ("Tequila", 0.0, 0.0, 231.0, "Spirits", true),
    ("Margarita", 7.0, 0.0, 153.0, "Cocktail", true),
    ("Mojito", 10.0, 0.0, 143.0, "Cocktail", true),
];

pub fn fallback_foods() -> Vec<FoodTemplate> {
    FOODS
        .iter()
        .map(|&(name, carbs, protein, calories, category)| {
            FoodTemplate::new(name, NutritionInfo::new(carbs, protein, calories), category)
        })
        .collect()
}

pub fn drinks() -> Vec<DrinkTemplate> {
    DRINKS
        .iter()
        .map(|&(name, carbs, protein, calories, category, is_alcoholic)| {
            DrinkTemplate::new(
                name,
                NutritionInfo::new(carbs, protein, calories),
                category,
                is_alcoholic,
            )
        })
        .collect()
}
