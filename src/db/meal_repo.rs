use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Drink, FoodItem, Meal, NutritionInfo};
use crate::sync::RemoteChangeFeed;

const EVENT_CAPACITY: usize = 64;

/// Local change to the entity set, published after the write commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Created(Uuid),
    Updated(Uuid),
    Deleted(Uuid),
}

/// Durable store for meals and the foods and drinks they own.
///
/// Every multi-row write runs in one transaction, so a meal graph is either
/// fully persisted or not at all. Child rows are always written after their
/// meal and removed before it.
#[derive(Clone)]
pub struct MealRepository {
    pool: SqlitePool,
    events: broadcast::Sender<StoreEvent>,
    remote: RemoteChangeFeed,
}

// Row types for database queries
#[derive(sqlx::FromRow)]
struct MealRow {
    id: String,
    name: String,
    timestamp: String,
    photo: Option<Vec<u8>>,
}

#[derive(sqlx::FromRow)]
struct FoodRow {
    id: String,
    name: String,
    weight: f64,
    carbohydrates: f64,
    protein: f64,
    calories: f64,
    timestamp: String,
}

#[derive(sqlx::FromRow)]
struct DrinkRow {
    id: String,
    name: String,
    volume: f64,
    carbohydrates: f64,
    protein: f64,
    calories: f64,
    is_alcoholic: bool,
    timestamp: String,
}

impl MealRepository {
    pub fn new(pool: SqlitePool) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            pool,
            events,
            remote: RemoteChangeFeed::new(),
        }
    }

    /// Registers an observer for local create/update/delete events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// The channel an external sync backend notifies after it has applied
    /// remote rows to this store.
    pub fn remote_changes(&self) -> &RemoteChangeFeed {
        &self.remote
    }

    pub async fn create(&self, meal: &Meal) -> Result<Meal, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO meals (id, name, timestamp, photo) VALUES (?, ?, ?, ?)")
            .bind(meal.id.to_string())
            .bind(&meal.name)
            .bind(encode_timestamp(&meal.timestamp))
            .bind(&meal.photo)
            .execute(&mut *tx)
            .await?;

        insert_children(&mut tx, meal).await?;

        tx.commit().await?;
        self.publish(StoreEvent::Created(meal.id));

        // The graph is committed; a failed re-read must not look like a failed create
        match self.get_by_id(meal.id).await {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => {
                tracing::warn!("Meal {} vanished right after it was created", meal.id);
                Ok(meal.clone())
            }
            Err(e) => {
                tracing::warn!("Could not re-read created meal {}: {}", meal.id, e);
                Ok(meal.clone())
            }
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Meal>, StoreError> {
        let row: Option<MealRow> =
            sqlx::query_as("SELECT id, name, timestamp, photo FROM meals WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => self.hydrate_meal(row).await.map(Some),
            None => Ok(None),
        }
    }

    /// All meals, newest first.
    pub async fn list(&self) -> Result<Vec<Meal>, StoreError> {
        let rows: Vec<MealRow> = sqlx::query_as(
            "SELECT id, name, timestamp, photo FROM meals ORDER BY timestamp DESC, id",
        )
        .fetch_all(&self.pool)
        .await?;

        self.hydrate_all(rows).await
    }

    /// Meals with `start <= timestamp < end`, newest first.
    pub async fn query(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Meal>, StoreError> {
        let rows: Vec<MealRow> = sqlx::query_as(
            r#"
            SELECT id, name, timestamp, photo FROM meals
            WHERE timestamp >= ? AND timestamp < ?
            ORDER BY timestamp DESC, id
            "#,
        )
        .bind(encode_timestamp(&start))
        .bind(encode_timestamp(&end))
        .fetch_all(&self.pool)
        .await?;

        self.hydrate_all(rows).await
    }

    /// Updates the meal in place and replaces all of its foods and drinks
    /// with the supplied ones. Previous child identities are not kept.
    pub async fn update(&self, meal: &Meal) -> Result<Meal, StoreError> {
        let mut tx = self.pool.begin().await?;
        let id = meal.id.to_string();

        let result = sqlx::query("UPDATE meals SET name = ?, timestamp = ?, photo = ? WHERE id = ?")
            .bind(&meal.name)
            .bind(encode_timestamp(&meal.timestamp))
            .bind(&meal.photo)
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(meal.id));
        }

        delete_children(&mut tx, &id).await?;
        insert_children(&mut tx, meal).await?;

        tx.commit().await?;
        self.publish(StoreEvent::Updated(meal.id));

        self.get_by_id(meal.id)
            .await?
            .ok_or(StoreError::NotFound(meal.id))
    }

    /// Deletes the meal and everything it owns. Returns `false` when the
    /// meal was already gone.
    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;
        let id_str = id.to_string();

        delete_children(&mut tx, &id_str).await?;
        let result = sqlx::query("DELETE FROM meals WHERE id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            self.publish(StoreEvent::Deleted(id));
        }
        Ok(deleted)
    }

    /// Creates a copy of a stored meal from its current persisted children.
    pub async fn clone_meal(&self, id: Uuid) -> Result<Meal, StoreError> {
        let source = self.get_by_id(id).await?.ok_or(StoreError::NotFound(id))?;
        self.create(&source.duplicate()).await
    }

    fn publish(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    async fn hydrate_all(&self, rows: Vec<MealRow>) -> Result<Vec<Meal>, StoreError> {
        let mut meals = Vec::with_capacity(rows.len());
        for row in rows {
            meals.push(self.hydrate_meal(row).await?);
        }
        Ok(meals)
    }

    async fn hydrate_meal(&self, row: MealRow) -> Result<Meal, StoreError> {
        let foods: Vec<FoodRow> = sqlx::query_as(
            r#"
            SELECT id, name, weight, carbohydrates, protein, calories, timestamp
            FROM food_items WHERE meal_id = ? ORDER BY position
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let drinks: Vec<DrinkRow> = sqlx::query_as(
            r#"
            SELECT id, name, volume, carbohydrates, protein, calories, is_alcoholic, timestamp
            FROM drinks WHERE meal_id = ? ORDER BY position
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Meal {
            id: parse_id("meals", &row.id)?,
            name: row.name,
            foods: foods
                .into_iter()
                .map(|f| {
                    Ok(FoodItem {
                        id: parse_id("food_items", &f.id)?,
                        name: f.name,
                        weight: f.weight,
                        nutrition: NutritionInfo::new(f.carbohydrates, f.protein, f.calories),
                        timestamp: decode_timestamp("food_items", &f.timestamp)?,
                    })
                })
                .collect::<Result<_, StoreError>>()?,
            drinks: drinks
                .into_iter()
                .map(|d| {
                    Ok(Drink {
                        id: parse_id("drinks", &d.id)?,
                        name: d.name,
                        volume: d.volume,
                        nutrition: NutritionInfo::new(d.carbohydrates, d.protein, d.calories),
                        is_alcoholic: d.is_alcoholic,
                        timestamp: decode_timestamp("drinks", &d.timestamp)?,
                    })
                })
                .collect::<Result<_, StoreError>>()?,
            timestamp: decode_timestamp("meals", &row.timestamp)?,
            photo: row.photo,
        })
    }
}

async fn insert_children(conn: &mut SqliteConnection, meal: &Meal) -> Result<(), sqlx::Error> {
    let meal_id = meal.id.to_string();

    for (position, food) in meal.foods.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO food_items (id, meal_id, position, name, weight, carbohydrates, protein, calories, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(food.id.to_string())
        .bind(&meal_id)
        .bind(position as i64)
        .bind(&food.name)
        .bind(food.weight)
        .bind(food.nutrition.carbohydrates)
        .bind(food.nutrition.protein)
        .bind(food.nutrition.calories)
        .bind(encode_timestamp(&food.timestamp))
        .execute(&mut *conn)
        .await?;
    }

    for (position, drink) in meal.drinks.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO drinks (id, meal_id, position, name, volume, carbohydrates, protein, calories, is_alcoholic, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(drink.id.to_string())
        .bind(&meal_id)
        .bind(position as i64)
        .bind(&drink.name)
        .bind(drink.volume)
        .bind(drink.nutrition.carbohydrates)
        .bind(drink.nutrition.protein)
        .bind(drink.nutrition.calories)
        .bind(drink.is_alcoholic)
        .bind(encode_timestamp(&drink.timestamp))
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

async fn delete_children(conn: &mut SqliteConnection, meal_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM food_items WHERE meal_id = ?")
        .bind(meal_id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM drinks WHERE meal_id = ?")
        .bind(meal_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

// Fixed width with a `Z` suffix, so text order is time order.
fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(table: &'static str, value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::CorruptRow {
            table,
            reason: format!("bad timestamp '{}': {}", value, e),
        })
}

fn parse_id(table: &'static str, value: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(value).map_err(|e| StoreError::CorruptRow {
        table,
        reason: format!("bad id '{}': {}", value, e),
    })
}
