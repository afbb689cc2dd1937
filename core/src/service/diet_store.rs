use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::model::diet::{CustomMealTarget, DietState};
use crate::model::meal::{MealOption, MealTime};
use crate::repository::{log_error_hook, DietRepository, ErrorHook, PersistWorker};

/// Single owner of the diet state.
///
/// Every mutation applies to the in-memory tree first, then hands a snapshot
/// to the persistence worker without waiting for it. Callers validate input
/// before calling in; see [`crate::input`].
pub struct DietStore {
    state: DietState,
    persist: PersistWorker,
}

impl DietStore {
    /// Rehydrates from `repo`, or seeds the default catalog when it is empty.
    pub fn open<R>(repo: R) -> Result<Self>
    where
        R: DietRepository + Send + 'static,
    {
        Self::open_with_hook(repo, log_error_hook())
    }

    pub fn open_with_hook<R>(repo: R, on_error: ErrorHook) -> Result<Self>
    where
        R: DietRepository + Send + 'static,
    {
        let state = match repo.load()? {
            Some(state) => {
                info!(days = state.selected_meals.len(), "diet state loaded");
                state
            }
            None => {
                info!("no stored diet state, starting from defaults");
                DietState::default()
            }
        };
        let persist = PersistWorker::spawn(repo, on_error)?;
        Ok(Self { state, persist })
    }

    pub fn snapshot(&self) -> &DietState {
        &self.state
    }

    pub fn add_custom_meal(&mut self, meal_time: MealTime, meal: MealOption, target: CustomMealTarget) {
        debug!(%meal_time, name = %meal.name, ?target, "add custom meal");
        self.state.add_custom_meal(meal_time, meal, target);
        self.commit();
    }

    pub fn add_custom_meal_to_catalog(&mut self, meal_time: MealTime, meal: MealOption) {
        self.add_custom_meal(meal_time, meal, CustomMealTarget::Catalog);
    }

    pub fn add_custom_selected_meal(&mut self, date: NaiveDate, meal_time: MealTime, meal: MealOption) {
        self.add_custom_meal(meal_time, meal, CustomMealTarget::Day(date));
    }

    pub fn select_meal(&mut self, date: NaiveDate, meal_time: MealTime, meal: MealOption) {
        debug!(%date, %meal_time, name = %meal.name, "select meal");
        self.state.select_meal(date, meal_time, meal);
        self.commit();
    }

    pub fn delete_meal(&mut self, date: NaiveDate, meal_time: MealTime) {
        if self.state.delete_meal(date, meal_time) {
            debug!(%date, %meal_time, "delete meal");
            self.commit();
        }
    }

    pub fn add_weight(&mut self, date: NaiveDate, weight: f64) {
        debug!(%date, weight, "add weight");
        self.state.add_weight(date, weight);
        self.commit();
    }

    /// Waits for queued snapshots to reach the repository.
    pub fn flush(&self) {
        self.persist.flush();
    }

    fn commit(&self) {
        self.persist.submit(self.state.clone());
    }
}
