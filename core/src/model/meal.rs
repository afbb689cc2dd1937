use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::input::InputError;

/// Fixed slots of the day. Declaration order is display order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MealTime {
    Morning,
    BeforeWorkout,
    AfterWorkout,
    Lunch,
    MidEvening,
    Dinner,
    LateNight,
    Snacks,
}

impl MealTime {
    pub const ALL: [MealTime; 8] = [
        MealTime::Morning,
        MealTime::BeforeWorkout,
        MealTime::AfterWorkout,
        MealTime::Lunch,
        MealTime::MidEvening,
        MealTime::Dinner,
        MealTime::LateNight,
        MealTime::Snacks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealTime::Morning => "Morning",
            MealTime::BeforeWorkout => "BeforeWorkout",
            MealTime::AfterWorkout => "AfterWorkout",
            MealTime::Lunch => "Lunch",
            MealTime::MidEvening => "MidEvening",
            MealTime::Dinner => "Dinner",
            MealTime::LateNight => "LateNight",
            MealTime::Snacks => "Snacks",
        }
    }

    /// Human label: a space before every inner capital ("Before Workout").
    pub fn label(&self) -> String {
        let mut label = String::new();
        for (i, c) in self.as_str().chars().enumerate() {
            if i > 0 && c.is_ascii_uppercase() {
                label.push(' ');
            }
            label.push(c);
        }
        label
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealTime {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        MealTime::ALL
            .iter()
            .find(|t| t.as_str().to_lowercase() == key)
            .copied()
            .ok_or_else(|| InputError::InvalidMealTime(s.to_string()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MealOption {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
}

impl MealOption {
    pub fn new(name: impl Into<String>, calories: f64, protein: f64) -> Self {
        Self {
            name: name.into(),
            calories,
            protein,
        }
    }
}

impl fmt::Display for MealOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Calories: {}, Protein: {}g)",
            self.name, self.calories, self.protein
        )
    }
}

pub type MealCatalog = BTreeMap<MealTime, Vec<MealOption>>;

/// Catalog every fresh install starts with.
pub fn default_catalog() -> MealCatalog {
    let seed: [(MealTime, &[(&str, f64, f64)]); 8] = [
        (MealTime::Morning, &[("1 Glass Warm Water", 0.0, 0.0)]),
        (
            MealTime::BeforeWorkout,
            &[
                ("1/2 Scoop Whey Protein + 200 Ml Water + 1 Banana", 120.0, 7.1),
                ("2 Banana + 4 Dates", 260.0, 3.0),
            ],
        ),
        (
            MealTime::AfterWorkout,
            &[
                ("60G Oats With Milk + 2 Boiled Egg Whites", 214.0, 16.0),
                ("100G Boiled Potato + 1 Pinch Of Cinnamon Powder + 2 Boiled Egg Whites", 111.0, 10.0),
                ("1 Scoop Whey Protein + 300 Ml Water", 120.0, 24.0),
                ("1 Plate Poha + 2 Boiled Eggs", 355.0, 17.0),
                ("2 Chapati + 2 Eggs Omelet", 315.0, 17.0),
                ("2 Slice Brown Bread + 2 Tsp Peanut Butter Spread + 1 Sliced Banana + 1 Apple", 415.0, 10.6),
                ("2 Boiled Eggs + 1 Apple + 1 Handful Dry Fruit + 1 Cup Milk", 460.0, 18.5),
            ],
        ),
        (
            MealTime::Lunch,
            &[
                ("2 Chapati + 100G Chicken With Gravy + 1 Cup Rice + 1 Cucumber", 575.0, 38.5),
                ("100G Paneer Bhurji / 2 Eggs Bhurji + 2 Chapati + 1 Bowl Salad", 595.0, 36.0),
                ("100G Rajma/Chole Bhaji + 1 Bhakri + 1 Bowl Salad (Cucumber, Tomato, Beetroot, Carrot)", 300.0, 11.0),
            ],
        ),
        (
            MealTime::MidEvening,
            &[
                ("2 Boiled Egg Whites + 1 Banana + 1 Handful Dry Fruit", 274.0, 11.1),
                ("2 Slice Brown Bread + 50G Paneer Sandwich", 290.0, 16.0),
            ],
        ),
        (
            MealTime::Dinner,
            &[
                ("100G Chicken + 1 Bowl Salad + 50G Boiled Rice", 300.0, 32.0),
                ("100G Soya Chunk Bhaji + 1 Chapati + 1 Bowl Salad", 260.0, 15.0),
                ("2 Moong Dal / 2 Besan Chila / 2 Paneer Paratha + 50G Curd + 1 Cup Mint Chutney", 370.0, 19.0),
            ],
        ),
        (MealTime::LateNight, &[("2 Tablets Of Nav Nirman With Water", 0.0, 0.0)]),
        (MealTime::Snacks, &[("Makhana", 450.0, 9.5)]),
    ];

    seed.iter()
        .map(|(time, options)| {
            let options = options
                .iter()
                .map(|(name, calories, protein)| MealOption::new(*name, *calories, *protein))
                .collect();
            (*time, options)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_time_from_str() {
        assert_eq!("Lunch".parse::<MealTime>().unwrap(), MealTime::Lunch);
        assert_eq!("lunch".parse::<MealTime>().unwrap(), MealTime::Lunch);
        assert_eq!("before-workout".parse::<MealTime>().unwrap(), MealTime::BeforeWorkout);
        assert_eq!("Late Night".parse::<MealTime>().unwrap(), MealTime::LateNight);
        assert_eq!("mid_evening".parse::<MealTime>().unwrap(), MealTime::MidEvening);
    }

    #[test]
    fn test_meal_time_from_str_invalid() {
        let err = "brunch".parse::<MealTime>().unwrap_err();
        assert_eq!(err, InputError::InvalidMealTime("brunch".to_string()));
        assert!("".parse::<MealTime>().is_err());
    }

    #[test]
    fn test_meal_time_label() {
        assert_eq!(MealTime::Morning.label(), "Morning");
        assert_eq!(MealTime::BeforeWorkout.label(), "Before Workout");
        assert_eq!(MealTime::LateNight.label(), "Late Night");
    }

    #[test]
    fn test_meal_time_order_follows_declaration() {
        let mut shuffled = vec![MealTime::Snacks, MealTime::Morning, MealTime::Dinner, MealTime::Lunch];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![MealTime::Morning, MealTime::Lunch, MealTime::Dinner, MealTime::Snacks]
        );
    }

    #[test]
    fn test_default_catalog_covers_every_slot() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), MealTime::ALL.len());
        assert_eq!(catalog[&MealTime::AfterWorkout].len(), 7);
        assert_eq!(catalog[&MealTime::Snacks][0], MealOption::new("Makhana", 450.0, 9.5));
        assert!(catalog
            .values()
            .flatten()
            .all(|m| m.calories >= 0.0 && m.protein >= 0.0));
    }

    #[test]
    fn test_meal_option_display() {
        let meal = MealOption::new("Makhana", 450.0, 9.5);
        assert_eq!(meal.to_string(), "Makhana (Calories: 450, Protein: 9.5g)");
    }
}
