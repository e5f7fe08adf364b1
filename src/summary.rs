//! Daily and weekly nutrition rollups.
//!
//! Pure functions over a snapshot of meals; nothing here is persisted.
//! Days and weeks are local calendar days, weeks start on Monday.

use chrono::{Datelike, Duration, Local, NaiveDate, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Meal, NutritionInfo};

#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    /// Oldest first.
    pub meals: Vec<Meal>,
}

impl DailySummary {
    pub fn total_nutrition(&self) -> NutritionInfo {
        self.meals.iter().map(Meal::total_nutrition).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    /// Monday of the week.
    pub week_start: NaiveDate,
    pub meal_count: usize,
    pub total_nutrition: NutritionInfo,
}

/// Groups meals by local calendar day, most recent day first.
pub fn daily_summaries(meals: &[Meal]) -> Vec<DailySummary> {
    daily_summaries_in(meals, &Local)
}

/// [`daily_summaries`] with days taken in `tz`.
pub fn daily_summaries_in<Tz: TimeZone>(meals: &[Meal], tz: &Tz) -> Vec<DailySummary> {
    let mut by_day: BTreeMap<NaiveDate, Vec<Meal>> = BTreeMap::new();
    for meal in meals {
        let day = meal.timestamp.with_timezone(tz).date_naive();
        by_day.entry(day).or_default().push(meal.clone());
    }

    by_day
        .into_iter()
        .rev()
        .map(|(date, mut meals)| {
            meals.sort_by_key(|m| m.timestamp);
            DailySummary { date, meals }
        })
        .collect()
}

/// The last `weeks` weeks up to and including the current one.
pub fn weekly_summaries(meals: &[Meal], weeks: usize) -> Vec<WeeklySummary> {
    weekly_summaries_at(meals, weeks, Local::now().date_naive())
}

/// The last `weeks` weeks ending with the week containing `today`, oldest
/// first. Weeks without meals are included with zero totals.
pub fn weekly_summaries_at(meals: &[Meal], weeks: usize, today: NaiveDate) -> Vec<WeeklySummary> {
    let current = week_start(today);

    (0..weeks)
        .rev()
        .map(|offset| {
            let start = current - Duration::weeks(offset as i64);
            let end = start + Duration::days(7);
            let in_week: Vec<&Meal> = meals
                .iter()
                .filter(|m| {
                    let day = m.timestamp.with_timezone(&Local).date_naive();
                    day >= start && day < end
                })
                .collect();

            WeeklySummary {
                week_start: start,
                meal_count: in_week.len(),
                total_nutrition: in_week.iter().map(|m| m.total_nutrition()).sum(),
            }
        })
        .collect()
}

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodItem;
    use chrono::{DateTime, Utc};

    fn at_local(date: NaiveDate, hour: u32) -> DateTime<Utc> {
        Local
            .from_local_datetime(&date.and_hms_opt(hour, 0, 0).unwrap())
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn meal(name: &str, timestamp: DateTime<Utc>, nutrition: NutritionInfo) -> Meal {
        Meal::new(name)
            .with_timestamp(timestamp)
            .with_foods(vec![FoodItem::new("Food", 100.0, nutrition)])
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2025-03-12 is a Wednesday
        assert_eq!(week_start(date(2025, 3, 12)), date(2025, 3, 10));
        assert_eq!(week_start(date(2025, 3, 10)), date(2025, 3, 10));
        assert_eq!(week_start(date(2025, 3, 16)), date(2025, 3, 10));
    }

    #[test]
    fn test_daily_summaries_grouping_and_order() {
        let day1 = date(2025, 3, 10);
        let day2 = date(2025, 3, 11);
        let meals = vec![
            meal("Dinner", at_local(day1, 19), NutritionInfo::new(60.0, 30.0, 700.0)),
            meal("Breakfast", at_local(day2, 8), NutritionInfo::new(40.0, 10.0, 300.0)),
            meal("Lunch", at_local(day1, 12), NutritionInfo::new(50.0, 25.0, 550.0)),
        ];

        let summaries = daily_summaries(&meals);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].date, day2);
        assert_eq!(summaries[1].date, day1);
        let names: Vec<&str> = summaries[1].meals.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Lunch", "Dinner"]);
        assert_eq!(
            summaries[1].total_nutrition(),
            NutritionInfo::new(110.0, 55.0, 1250.0)
        );
    }

    #[test]
    fn test_daily_summaries_in_utc() {
        let late = DateTime::parse_from_rfc3339("2025-03-10T23:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let early = late + Duration::hours(1);
        let meals = vec![
            meal("Late", late, NutritionInfo::ZERO),
            meal("Early", early, NutritionInfo::ZERO),
        ];

        let summaries = daily_summaries_in(&meals, &Utc);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].date, date(2025, 3, 11));
        assert_eq!(summaries[1].date, date(2025, 3, 10));
    }

    #[test]
    fn test_daily_summaries_empty() {
        assert!(daily_summaries(&[]).is_empty());
    }

    #[test]
    fn test_weekly_summaries_current_week_only() {
        let today = date(2025, 3, 12);
        let meals = vec![
            meal("Monday lunch", at_local(date(2025, 3, 10), 12), NutritionInfo::new(20.0, 5.0, 200.0)),
            meal("Today", at_local(today, 9), NutritionInfo::new(30.0, 15.0, 300.0)),
        ];

        let summaries = weekly_summaries_at(&meals, 4, today);

        assert_eq!(summaries.len(), 4);
        let starts: Vec<NaiveDate> = summaries.iter().map(|s| s.week_start).collect();
        assert_eq!(
            starts,
            vec![date(2025, 2, 17), date(2025, 2, 24), date(2025, 3, 3), date(2025, 3, 10)]
        );
        for empty in &summaries[..3] {
            assert_eq!(empty.meal_count, 0);
            assert!(empty.total_nutrition.is_zero());
        }
        assert_eq!(summaries[3].meal_count, 2);
        assert_eq!(
            summaries[3].total_nutrition,
            NutritionInfo::new(50.0, 20.0, 500.0)
        );
    }

    #[test]
    fn test_weekly_summaries_window_bounds() {
        let today = date(2025, 3, 12);
        let meals = vec![
            // Sunday before the window
            meal("Too old", at_local(date(2025, 2, 16), 12), NutritionInfo::new(1.0, 1.0, 10.0)),
            meal("First week", at_local(date(2025, 2, 17), 0), NutritionInfo::new(2.0, 2.0, 20.0)),
            meal("Sunday", at_local(date(2025, 3, 9), 23), NutritionInfo::new(3.0, 3.0, 30.0)),
        ];

        let summaries = weekly_summaries_at(&meals, 4, today);

        assert_eq!(summaries[0].meal_count, 1);
        assert_eq!(summaries[0].total_nutrition.calories, 20.0);
        assert_eq!(summaries[2].meal_count, 1);
        assert_eq!(summaries[3].meal_count, 0);
        let total: usize = summaries.iter().map(|s| s.meal_count).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_zero_weeks() {
        assert!(weekly_summaries(&[], 0).is_empty());
    }
}
