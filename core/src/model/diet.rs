use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::meal::{default_catalog, MealCatalog, MealOption, MealTime};

pub type DaySelection = BTreeMap<MealTime, MealOption>;

/// Where a freshly authored meal goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomMealTarget {
    /// Appended to the catalog for later selection.
    Catalog,
    /// Selected for one day only; the catalog is left untouched.
    Day(NaiveDate),
}

/// The whole persisted state tree.
///
/// Invariant: a date key in `selected_meals` always maps to a non-empty
/// selection. Mutations below keep it that way.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DietState {
    pub meal_options: MealCatalog,
    #[serde(default)]
    pub selected_meals: BTreeMap<NaiveDate, DaySelection>,
    /// Kilograms.
    #[serde(default)]
    pub weight_data: BTreeMap<NaiveDate, f64>,
}

impl Default for DietState {
    fn default() -> Self {
        Self {
            meal_options: default_catalog(),
            selected_meals: BTreeMap::new(),
            weight_data: BTreeMap::new(),
        }
    }
}

impl DietState {
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self {
            meal_options: BTreeMap::new(),
            selected_meals: BTreeMap::new(),
            weight_data: BTreeMap::new(),
        }
    }

    pub fn options(&self, meal_time: MealTime) -> &[MealOption] {
        self.meal_options
            .get(&meal_time)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DaySelection> {
        self.selected_meals.get(&date)
    }

    pub fn selection(&self, date: NaiveDate, meal_time: MealTime) -> Option<&MealOption> {
        self.day(date).and_then(|d| d.get(&meal_time))
    }

    pub fn weight(&self, date: NaiveDate) -> Option<f64> {
        self.weight_data.get(&date).copied()
    }

    pub fn add_custom_meal(&mut self, meal_time: MealTime, meal: MealOption, target: CustomMealTarget) {
        match target {
            CustomMealTarget::Catalog => self.meal_options.entry(meal_time).or_default().push(meal),
            CustomMealTarget::Day(date) => self.select_meal(date, meal_time, meal),
        }
    }

    pub fn add_custom_meal_to_catalog(&mut self, meal_time: MealTime, meal: MealOption) {
        self.add_custom_meal(meal_time, meal, CustomMealTarget::Catalog);
    }

    pub fn add_custom_selected_meal(&mut self, date: NaiveDate, meal_time: MealTime, meal: MealOption) {
        self.add_custom_meal(meal_time, meal, CustomMealTarget::Day(date));
    }

    pub fn select_meal(&mut self, date: NaiveDate, meal_time: MealTime, meal: MealOption) {
        self.selected_meals
            .entry(date)
            .or_default()
            .insert(meal_time, meal);
    }

    /// Returns whether anything was removed.
    pub fn delete_meal(&mut self, date: NaiveDate, meal_time: MealTime) -> bool {
        let Some(day) = self.selected_meals.get_mut(&date) else {
            return false;
        };
        let removed = day.remove(&meal_time).is_some();
        if day.is_empty() {
            self.selected_meals.remove(&date);
        }
        removed
    }

    /// Callers validate `weight > 0` before getting here.
    pub fn add_weight(&mut self, date: NaiveDate, weight: f64) {
        self.weight_data.insert(date, weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_add_custom_meal_to_catalog_appends_in_order() {
        let mut state = DietState::default();
        let before = state.options(MealTime::Lunch).to_vec();

        let meal = MealOption::new("Dal Rice", 420.0, 14.0);
        state.add_custom_meal_to_catalog(MealTime::Lunch, meal.clone());

        let after = state.options(MealTime::Lunch);
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], before.as_slice());
        assert_eq!(after.last(), Some(&meal));
    }

    #[test]
    fn test_catalog_keeps_duplicate_names() {
        let mut state = DietState::empty();
        state.add_custom_meal_to_catalog(MealTime::Snacks, MealOption::new("Nuts", 100.0, 3.0));
        state.add_custom_meal_to_catalog(MealTime::Snacks, MealOption::new("Nuts", 100.0, 3.0));
        assert_eq!(state.options(MealTime::Snacks).len(), 2);
    }

    #[test]
    fn test_select_meal_overwrites_slot() {
        let mut state = DietState::default();
        let d = date("2024-01-01");
        let x = MealOption::new("X", 500.0, 30.0);
        let y = MealOption::new("Y", 300.0, 20.0);

        state.select_meal(d, MealTime::Lunch, x.clone());
        assert_eq!(state.selection(d, MealTime::Lunch), Some(&x));

        state.select_meal(d, MealTime::Lunch, y.clone());
        assert_eq!(state.selection(d, MealTime::Lunch), Some(&y));
        assert_eq!(state.day(d).map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_select_meal_is_idempotent() {
        let mut once = DietState::default();
        let d = date("2024-01-01");
        let meal = MealOption::new("X", 500.0, 30.0);
        once.select_meal(d, MealTime::Dinner, meal.clone());

        let mut twice = once.clone();
        twice.select_meal(d, MealTime::Dinner, meal);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_selected_meal_leaves_catalog_alone() {
        let mut state = DietState::default();
        let catalog = state.meal_options.clone();
        let d = date("2024-02-10");
        let meal = MealOption::new("Street Food", 700.0, 12.0);

        state.add_custom_selected_meal(d, MealTime::MidEvening, meal.clone());

        assert_eq!(state.meal_options, catalog);
        assert_eq!(state.selection(d, MealTime::MidEvening), Some(&meal));
    }

    #[test]
    fn test_delete_last_slot_removes_date() {
        let mut state = DietState::default();
        let d = date("2024-01-01");
        state.select_meal(d, MealTime::Lunch, MealOption::new("X", 500.0, 30.0));

        assert!(state.delete_meal(d, MealTime::Lunch));
        assert!(state.day(d).is_none());
        assert!(!state.selected_meals.contains_key(&d));
    }

    #[test]
    fn test_delete_one_of_many_slots_keeps_date() {
        let mut state = DietState::default();
        let d = date("2024-01-01");
        state.select_meal(d, MealTime::Lunch, MealOption::new("X", 500.0, 30.0));
        state.select_meal(d, MealTime::Dinner, MealOption::new("Y", 300.0, 20.0));

        assert!(state.delete_meal(d, MealTime::Lunch));
        let day = state.day(d).unwrap();
        assert_eq!(day.len(), 1);
        assert!(day.contains_key(&MealTime::Dinner));
    }

    #[test]
    fn test_delete_missing_entry_is_noop() {
        let mut state = DietState::default();
        let d = date("2024-01-01");
        state.select_meal(d, MealTime::Dinner, MealOption::new("Y", 300.0, 20.0));
        let before = state.clone();

        assert!(!state.delete_meal(d, MealTime::Lunch));
        assert!(!state.delete_meal(date("2030-05-05"), MealTime::Lunch));
        assert_eq!(state, before);
    }

    #[test]
    fn test_add_weight_overwrites() {
        let mut state = DietState::default();
        let d = date("2024-01-01");
        state.add_weight(d, 70.0);
        state.add_weight(d, 71.0);
        assert_eq!(state.weight(d), Some(71.0));
        assert_eq!(state.weight_data.len(), 1);
    }

    #[test]
    fn test_json_shape() {
        let mut state = DietState::empty();
        let d = date("2024-01-01");
        state.select_meal(d, MealTime::Lunch, MealOption::new("X", 500.0, 30.0));
        state.add_weight(d, 70.5);

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["selectedMeals"]["2024-01-01"]["Lunch"]["name"], "X");
        assert_eq!(value["weightData"]["2024-01-01"], 70.5);
        assert!(value["mealOptions"].is_object());

        let parsed: DietState = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, state);
    }
}
