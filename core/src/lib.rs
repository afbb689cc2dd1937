pub mod config;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::{Config, ConfigError};
pub use input::{parse_args, expand_key, parse_meal_args, parse_weight, InputError, MealDraft, ParsedInput};
pub use model::diet::{CustomMealTarget, DaySelection, DietState};
pub use model::meal::{default_catalog, MealCatalog, MealOption, MealTime};
pub use repository::{DietRepository, FileDietRepository, PersistWorker};
pub use service::diet_store::DietStore;
pub use service::dto::{ChartData, MealBreakdown, SeriesPoint, Totals};
pub use time::{format_date, parse_date, parse_range, shift_day, today, MAX_RANGE_DAYS};
pub use usecase::aggregate::{
    chart_data, daily_totals, day_breakdown, period_range, range_series, AggregateError, ChartRange,
    Period,
};
