use std::collections::HashMap;
use thiserror::Error;

use crate::model::meal::MealOption;

/// Rejections raised at the boundary, before the store is touched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("meal name must not be empty")]
    EmptyName,
    #[error("calories must be zero or more")]
    NegativeCalories,
    #[error("protein must be zero or more")]
    NegativeProtein,
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
    #[error("weight must be greater than zero")]
    NonPositiveWeight,
    #[error("unknown meal time '{0}'")]
    InvalidMealTime(String),
    #[error("could not parse date '{0}'")]
    InvalidDate(String),
    #[error("range end {end} is before start {start}")]
    InvertedRange { start: String, end: String },
    #[error("range spans {days} days, at most {max} allowed")]
    RangeTooLong { days: i64, max: i64 },
    #[error("unknown period '{0}' (expected day, week or month)")]
    InvalidPeriod(String),
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("ambiguous key '{key}' matches {candidates:?}")]
    AmbiguousKey { key: String, candidates: Vec<String> },
}

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

/// Splits words into a free-text name and `key:value` pairs.
///
/// A word only counts as a pair when its key expands to one of `known_keys`;
/// anything else (`1:2`, `Chicken:`) stays part of the name. Keys in the
/// returned metadata are the expanded ones.
pub fn parse_args(args: &[String], known_keys: &[&str]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                if let Ok(full_key) = expand_key(&key.to_lowercase(), known_keys) {
                    metadata.insert(full_key, value.to_string());
                    continue;
                }
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String, InputError> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(InputError::UnknownKey(key.to_string())),
        _ => Err(InputError::AmbiguousKey {
            key: key.to_string(),
            candidates: matches.iter().map(|s| s.to_string()).collect(),
        }),
    }
}

/// An unvalidated meal as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealDraft {
    pub name: String,
    pub calories: String,
    pub protein: String,
}

impl MealDraft {
    pub fn validate(&self) -> Result<MealOption, InputError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(InputError::EmptyName);
        }
        let calories = parse_number(&self.calories)?;
        if calories < 0.0 {
            return Err(InputError::NegativeCalories);
        }
        let protein = parse_number(&self.protein)?;
        if protein < 0.0 {
            return Err(InputError::NegativeProtein);
        }
        Ok(MealOption::new(name, calories, protein))
    }
}

const MEAL_KEYS: [&str; 2] = ["calories", "protein"];

/// Builds a draft from words like `Dal Rice cal:420 pro:14`.
/// Missing macros default to zero.
pub fn parse_meal_args(args: &[String]) -> MealDraft {
    let mut parsed = parse_args(args, &MEAL_KEYS);
    MealDraft {
        name: parsed.name,
        calories: parsed.metadata.remove("calories").unwrap_or_else(|| "0".to_string()),
        protein: parsed.metadata.remove("protein").unwrap_or_else(|| "0".to_string()),
    }
}

/// Kilograms; must be a finite number above zero.
pub fn parse_weight(input: &str) -> Result<f64, InputError> {
    let weight = parse_number(input)?;
    if weight <= 0.0 {
        return Err(InputError::NonPositiveWeight);
    }
    Ok(weight)
}

fn parse_number(input: &str) -> Result<f64, InputError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(InputError::InvalidNumber(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_parse_simple() {
        let parsed = parse_args(&words("Paneer Wrap cal:350 pro:18"), &MEAL_KEYS);
        assert_eq!(parsed.name, "Paneer Wrap");
        assert_eq!(parsed.metadata.get("calories"), Some(&"350".to_string()));
        assert_eq!(parsed.metadata.get("protein"), Some(&"18".to_string()));
    }

    #[test]
    fn test_parse_keeps_unknown_pairs_in_name() {
        let parsed = parse_args(&words("Tea 1:1 Chicken: grilled CAL:80"), &MEAL_KEYS);
        assert_eq!(parsed.name, "Tea 1:1 Chicken: grilled");
        assert_eq!(parsed.metadata.len(), 1);
        assert_eq!(parsed.metadata.get("calories"), Some(&"80".to_string()));
    }

    #[test]
    fn test_expand_key() {
        let candidates = vec!["calories", "protein", "period"];

        assert_eq!(expand_key("c", &candidates).unwrap(), "calories");
        assert_eq!(expand_key("calories", &candidates).unwrap(), "calories");
        assert_eq!(expand_key("pro", &candidates).unwrap(), "protein");
        assert_eq!(expand_key("pe", &candidates).unwrap(), "period");

        assert!(matches!(
            expand_key("p", &candidates),
            Err(InputError::AmbiguousKey { .. })
        ));
        assert_eq!(
            expand_key("x", &candidates),
            Err(InputError::UnknownKey("x".to_string()))
        );
    }

    #[test]
    fn test_validate_meal_draft() {
        let draft = MealDraft {
            name: "  Dal Rice ".to_string(),
            calories: "420".to_string(),
            protein: "14.5".to_string(),
        };
        assert_eq!(draft.validate().unwrap(), MealOption::new("Dal Rice", 420.0, 14.5));
    }

    #[test]
    fn test_validate_rejects_bad_drafts() {
        let base = MealDraft {
            name: "Toast".to_string(),
            calories: "100".to_string(),
            protein: "4".to_string(),
        };

        let empty = MealDraft { name: "   ".to_string(), ..base.clone() };
        assert_eq!(empty.validate(), Err(InputError::EmptyName));

        let negative_cal = MealDraft { calories: "-1".to_string(), ..base.clone() };
        assert_eq!(negative_cal.validate(), Err(InputError::NegativeCalories));

        let negative_pro = MealDraft { protein: "-0.5".to_string(), ..base.clone() };
        assert_eq!(negative_pro.validate(), Err(InputError::NegativeProtein));

        let garbage = MealDraft { calories: "lots".to_string(), ..base.clone() };
        assert_eq!(garbage.validate(), Err(InputError::InvalidNumber("lots".to_string())));

        let infinite = MealDraft { protein: "inf".to_string(), ..base };
        assert!(infinite.validate().is_err());
    }

    #[test]
    fn test_parse_meal_args() {
        let draft = parse_meal_args(&words("Dal Rice cal:420 pro:14"));
        assert_eq!(draft.name, "Dal Rice");
        assert_eq!(draft.calories, "420");
        assert_eq!(draft.protein, "14");

        let defaults = parse_meal_args(&words("Black Coffee"));
        assert_eq!(defaults.validate().unwrap(), MealOption::new("Black Coffee", 0.0, 0.0));
    }

    #[test]
    fn test_meal_name_with_colon() {
        let meal = parse_meal_args(&words("Chicken Tikka 1:2 cal:300")).validate().unwrap();
        assert_eq!(meal, MealOption::new("Chicken Tikka 1:2", 300.0, 0.0));

        let meal = parse_meal_args(&words("Chicken: grilled pro:31")).validate().unwrap();
        assert_eq!(meal.name, "Chicken: grilled");
        assert_eq!(meal.protein, 31.0);

        let soup = parse_meal_args(&words("Soup fat:3"));
        assert_eq!(soup.name, "Soup fat:3");
        assert_eq!(soup.calories, "0");
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("70.4").unwrap(), 70.4);
        assert_eq!(parse_weight(" 71 ").unwrap(), 71.0);
        assert_eq!(parse_weight("0"), Err(InputError::NonPositiveWeight));
        assert_eq!(parse_weight("-3"), Err(InputError::NonPositiveWeight));
        assert_eq!(parse_weight("heavy"), Err(InputError::InvalidNumber("heavy".to_string())));
        assert!(parse_weight("NaN").is_err());
        assert!(parse_weight("").is_err());
    }
}
