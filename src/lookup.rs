//! Client for the USDA FoodData Central API.
//!
//! Used to find nutrition values for foods that are not in the local
//! catalogue. Results are normalized to the three tracked nutrients.

use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::models::NutritionInfo;

pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
pub const DEMO_API_KEY: &str = "DEMO_KEY";
const PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteNutrient {
    #[serde(rename = "nutrientName")]
    pub name: String,
    pub value: Option<f64>,
    #[serde(rename = "unitName")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteFood {
    #[serde(rename = "fdcId")]
    pub fdc_id: i64,
    pub description: String,
    #[serde(rename = "foodNutrients", default)]
    pub nutrients: Vec<RemoteNutrient>,
}

impl RemoteFood {
    /// Carbohydrates, protein and kcal from the first nutrient entry of
    /// each kind. Missing nutrients count as zero.
    pub fn nutrition(&self) -> NutritionInfo {
        let mut carbohydrates = None;
        let mut protein = None;
        let mut calories = None;

        for nutrient in &self.nutrients {
            let name = nutrient.name.to_lowercase();
            let unit = nutrient.unit.as_deref().unwrap_or("").to_lowercase();
            let value = nutrient.value.unwrap_or(0.0);

            if carbohydrates.is_none() && name.contains("carbohydrate") {
                carbohydrates = Some(value);
            }
            if protein.is_none() && name.contains("protein") {
                protein = Some(value);
            }
            if calories.is_none()
                && (name.contains("energy") || name.contains("calorie"))
                && unit == "kcal"
            {
                calories = Some(value);
            }
        }

        NutritionInfo::new(
            carbohydrates.unwrap_or(0.0),
            protein.unwrap_or(0.0),
            calories.unwrap_or(0.0),
        )
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<RemoteFood>,
}

pub struct UsdaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl UsdaClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Searches all data types. An empty query returns nothing and makes
    /// no request.
    pub async fn search(&self, query: &str) -> Result<Vec<RemoteFood>, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/foods/search", self.base_url);
        let page_size = PAGE_SIZE.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }

        let body: SearchResponse = response.json().await?;
        tracing::debug!("USDA search '{}' returned {} foods", query, body.foods.len());
        Ok(body.foods)
    }

    pub async fn food_details(&self, fdc_id: i64) -> Result<RemoteFood, LookupError> {
        let url = format!("{}/food/{}", self.base_url, fdc_id);
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}

impl Default for UsdaClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEMO_API_KEY)
    }
}
