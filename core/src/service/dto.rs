use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::Add;

use crate::model::meal::{MealOption, MealTime};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub calories: f64,
    pub protein: f64,
}

impl Add<&MealOption> for Totals {
    type Output = Totals;

    fn add(self, meal: &MealOption) -> Totals {
        Totals {
            calories: self.calories + meal.calories,
            protein: self.protein + meal.protein,
        }
    }
}

/// One charted day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub calories: f64,
    pub protein: f64,
    pub weight: Option<f64>, // kg, None when not logged
}

/// One meal slot of a single charted day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealBreakdown {
    pub meal_time: MealTime,
    pub calories: f64,
    pub protein: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", content = "records", rename_all = "lowercase")]
pub enum ChartData {
    Breakdown(Vec<MealBreakdown>),
    Series(Vec<SeriesPoint>),
}

impl ChartData {
    pub fn len(&self) -> usize {
        match self {
            ChartData::Breakdown(rows) => rows.len(),
            ChartData::Series(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
