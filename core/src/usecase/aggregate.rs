//! Read-only views derived from a [`DietState`] snapshot.
//!
//! Nothing is cached; every call recomputes from the state it is given.

use chrono::{Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::input::InputError;
use crate::model::diet::DietState;
use crate::service::dto::{ChartData, MealBreakdown, SeriesPoint, Totals};
use crate::time::MAX_RANGE_DAYS;

const WEEK_LOOKBACK_DAYS: i64 = 7;
const MONTH_LOOKBACK_DAYS: i64 = 30;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AggregateError {
    #[error("range end {end} is before start {start}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
    #[error("range spans {days} days, at most {max} allowed")]
    RangeTooLong { days: i64, max: i64 },
    #[error("date out of range near {0}")]
    DateOverflow(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Day,
    Week,
    Month,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Day, Period::Week, Period::Month];
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day => write!(f, "day"),
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
        }
    }
}

impl FromStr for Period {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "d" => Ok(Period::Day),
            "week" | "w" => Ok(Period::Week),
            "month" | "m" => Ok(Period::Month),
            _ => Err(InputError::InvalidPeriod(s.to_string())),
        }
    }
}

/// What the chart panel is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRange {
    Period(Period, NaiveDate),
    Custom { start: NaiveDate, end: NaiveDate },
}

pub fn daily_totals(state: &DietState, date: NaiveDate) -> Totals {
    state
        .day(date)
        .map(|meals| meals.values().fold(Totals::default(), |acc, meal| acc + meal))
        .unwrap_or_default()
}

/// One record per calendar day in `start..=end`, at most [`MAX_RANGE_DAYS`].
pub fn range_series(
    state: &DietState,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<SeriesPoint>, AggregateError> {
    if end < start {
        return Err(AggregateError::InvertedRange { start, end });
    }

    let days = (end - start).num_days() + 1;
    if days > MAX_RANGE_DAYS {
        return Err(AggregateError::RangeTooLong { days, max: MAX_RANGE_DAYS });
    }

    let mut series = Vec::with_capacity(days as usize);
    let mut date = start;
    loop {
        let totals = daily_totals(state, date);
        series.push(SeriesPoint {
            date,
            calories: totals.calories,
            protein: totals.protein,
            weight: state.weight(date),
        });
        if date == end {
            break;
        }
        date = date.succ_opt().ok_or(AggregateError::DateOverflow(date))?;
    }
    Ok(series)
}

/// Fixed lookbacks: a week is the 7 days before `anchor`, a month the 30
/// days before it, both ending on `anchor` itself.
pub fn period_range(
    period: Period,
    anchor: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), AggregateError> {
    let lookback = match period {
        Period::Day => 0,
        Period::Week => WEEK_LOOKBACK_DAYS,
        Period::Month => MONTH_LOOKBACK_DAYS,
    };
    let start = anchor
        .checked_sub_signed(Duration::days(lookback))
        .ok_or(AggregateError::DateOverflow(anchor))?;
    Ok((start, anchor))
}

/// Per-slot figures for `date`, in meal-time order.
pub fn day_breakdown(state: &DietState, date: NaiveDate) -> Vec<MealBreakdown> {
    state
        .day(date)
        .map(|meals| {
            meals
                .iter()
                .map(|(meal_time, meal)| MealBreakdown {
                    meal_time: *meal_time,
                    calories: meal.calories,
                    protein: meal.protein,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// A single day charts its meal slots; anything longer charts one point per day.
pub fn chart_data(state: &DietState, range: ChartRange) -> Result<ChartData, AggregateError> {
    match range {
        ChartRange::Period(Period::Day, anchor) => Ok(ChartData::Breakdown(day_breakdown(state, anchor))),
        ChartRange::Period(period, anchor) => {
            let (start, end) = period_range(period, anchor)?;
            Ok(ChartData::Series(range_series(state, start, end)?))
        }
        ChartRange::Custom { start, end } => Ok(ChartData::Series(range_series(state, start, end)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::meal::{MealOption, MealTime};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_state() -> DietState {
        let mut state = DietState::default();
        let d = date("2024-01-01");
        state.select_meal(d, MealTime::Lunch, MealOption::new("X", 500.0, 30.0));
        state.select_meal(d, MealTime::Dinner, MealOption::new("Y", 300.0, 20.0));
        state
    }

    #[test]
    fn test_daily_totals_sums_selected_slots() {
        let state = sample_state();
        assert_eq!(
            daily_totals(&state, date("2024-01-01")),
            Totals { calories: 800.0, protein: 50.0 }
        );
    }

    #[test]
    fn test_daily_totals_empty_day_is_zero() {
        let state = sample_state();
        assert_eq!(daily_totals(&state, date("2024-01-02")), Totals::default());
    }

    #[test]
    fn test_daily_totals_is_deterministic() {
        let state = sample_state();
        let copy = state.clone();
        assert_eq!(
            daily_totals(&state, date("2024-01-01")),
            daily_totals(&copy, date("2024-01-01"))
        );
    }

    #[test]
    fn test_single_day_series_matches_totals() {
        let mut state = sample_state();
        let d = date("2024-01-01");
        state.add_weight(d, 70.0);

        let series = range_series(&state, d, d).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, d);
        assert_eq!(series[0].calories, daily_totals(&state, d).calories);
        assert_eq!(series[0].protein, daily_totals(&state, d).protein);
        assert_eq!(series[0].weight, Some(70.0));
    }

    #[test]
    fn test_series_covers_every_day_inclusive() {
        let mut state = sample_state();
        state.add_weight(date("2024-03-01"), 68.2);

        // Spans the leap day and the usual March DST switch.
        let series = range_series(&state, date("2024-02-27"), date("2024-03-31")).unwrap();
        assert_eq!(series.len(), 34);
        assert_eq!(series.first().unwrap().date, date("2024-02-27"));
        assert_eq!(series[2].date, date("2024-02-29"));
        assert_eq!(series.last().unwrap().date, date("2024-03-31"));
        assert!(series.windows(2).all(|w| w[0].date.succ_opt() == Some(w[1].date)));

        let march_first = series.iter().find(|p| p.date == date("2024-03-01")).unwrap();
        assert_eq!(march_first.weight, Some(68.2));
        assert!(series.iter().filter(|p| p.weight.is_some()).count() == 1);
    }

    #[test]
    fn test_series_rejects_inverted_range() {
        let state = sample_state();
        let err = range_series(&state, date("2024-01-05"), date("2024-01-01")).unwrap_err();
        assert_eq!(
            err,
            AggregateError::InvertedRange { start: date("2024-01-05"), end: date("2024-01-01") }
        );
    }

    #[test]
    fn test_series_rejects_oversized_range() {
        let state = sample_state();
        let start = date("2000-01-01");

        let longest = range_series(&state, start, start + Duration::days(MAX_RANGE_DAYS - 1)).unwrap();
        assert_eq!(longest.len() as i64, MAX_RANGE_DAYS);

        let err = range_series(&state, NaiveDate::MIN, NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, AggregateError::RangeTooLong { max: MAX_RANGE_DAYS, .. }));
    }

    #[test]
    fn test_period_range() {
        let anchor = date("2024-01-31");
        assert_eq!(period_range(Period::Day, anchor).unwrap(), (anchor, anchor));
        assert_eq!(period_range(Period::Week, anchor).unwrap(), (date("2024-01-24"), anchor));
        assert_eq!(period_range(Period::Month, anchor).unwrap(), (date("2024-01-01"), anchor));
        assert_eq!(
            period_range(Period::Month, date("2024-03-01")).unwrap().0,
            date("2024-01-31")
        );
    }

    #[test]
    fn test_day_breakdown_uses_meal_time_order() {
        let mut state = DietState::default();
        let d = date("2024-01-01");
        state.select_meal(d, MealTime::Snacks, MealOption::new("Makhana", 450.0, 9.5));
        state.select_meal(d, MealTime::Morning, MealOption::new("Water", 0.0, 0.0));
        state.select_meal(d, MealTime::Lunch, MealOption::new("X", 500.0, 30.0));

        let slots: Vec<MealTime> = day_breakdown(&state, d).iter().map(|b| b.meal_time).collect();
        assert_eq!(slots, vec![MealTime::Morning, MealTime::Lunch, MealTime::Snacks]);
        assert!(day_breakdown(&state, date("2024-01-02")).is_empty());
    }

    #[test]
    fn test_chart_data_switches_on_range() {
        let state = sample_state();
        let anchor = date("2024-01-01");

        match chart_data(&state, ChartRange::Period(Period::Day, anchor)).unwrap() {
            ChartData::Breakdown(rows) => assert_eq!(rows.len(), 2),
            other => panic!("expected breakdown, got {:?}", other),
        }

        let week = chart_data(&state, ChartRange::Period(Period::Week, anchor)).unwrap();
        assert!(matches!(week, ChartData::Series(_)));
        assert_eq!(week.len(), 8);

        let custom = ChartRange::Custom { start: anchor, end: anchor };
        assert!(matches!(chart_data(&state, custom).unwrap(), ChartData::Series(ref s) if s.len() == 1));
    }

    #[test]
    fn test_period_from_str() {
        assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!("M".parse::<Period>().unwrap(), Period::Month);
        assert!("year".parse::<Period>().is_err());
        assert_eq!(Period::Month.to_string(), "month");
    }
}
