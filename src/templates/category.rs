use crate::models::Category;

// Checked in this order; the first group with a matching keyword wins.
const KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Protein,
        &[
            "chicken", "beef", "pork", "turkey", "fish", "salmon", "tuna", "egg", "tofu", "meat",
        ],
    ),
    (
        Category::Carbs,
        &[
            "rice", "pasta", "bread", "potato", "oat", "cereal", "quinoa", "noodle",
        ],
    ),
    (
        Category::Fruits,
        &[
            "apple", "banana", "orange", "berry", "grape", "melon", "peach", "pear", "fruit",
        ],
    ),
    (
        Category::Dairy,
        &["cheese", "milk", "yogurt", "butter", "cream"],
    ),
    (
        Category::Nuts,
        &["almond", "peanut", "walnut", "nut", "seed"],
    ),
];

/// Assigns a category from the food name, then from its macro ratios
/// (grams per 100 g) when no keyword matches.
pub fn categorize(name: &str, carbohydrates: f64, protein: f64) -> Category {
    let name = name.to_lowercase();

    let by_keyword = KEYWORDS.iter().find_map(|(category, words)| {
        words
            .iter()
            .any(|word| name.contains(word))
            .then_some(*category)
    });
    if let Some(category) = by_keyword {
        return category;
    }

    if protein >= 10.0 && carbohydrates < 15.0 {
        Category::Protein
    } else if carbohydrates >= 20.0 {
        Category::Carbs
    } else if carbohydrates < 10.0 && protein < 5.0 {
        Category::Vegetables
    } else {
        Category::Other
    }
}
