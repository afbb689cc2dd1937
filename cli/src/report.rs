use chrono::NaiveDate;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use dietlog_core::{daily_totals, format_date, ChartData, DietState, MealTime};

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Meal Time")]
    meal_time: String,
    #[tabled(rename = "Meal")]
    name: String,
    #[tabled(rename = "Calories")]
    calories: String,
    #[tabled(rename = "Protein (g)")]
    protein: String,
}

#[derive(Tabled)]
struct OptionRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Meal")]
    name: String,
    #[tabled(rename = "Calories")]
    calories: String,
    #[tabled(rename = "Protein (g)")]
    protein: String,
}

#[derive(Tabled)]
struct SeriesRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Calories")]
    calories: String,
    #[tabled(rename = "Protein (g)")]
    protein: String,
    #[tabled(rename = "Weight (kg)")]
    weight: String,
}

pub fn show_day(state: &DietState, date: NaiveDate) {
    println!("\x1b[1;36mMeals for {} ({})\x1b[0m", format_date(date), date.format("%a"));

    match state.day(date) {
        Some(meals) => {
            let rows: Vec<SlotRow> = meals
                .iter()
                .map(|(meal_time, meal)| SlotRow {
                    meal_time: meal_time.label(),
                    name: meal.name.clone(),
                    calories: amount(meal.calories),
                    protein: amount(meal.protein),
                })
                .collect();
            println!("{}", render(rows));
        }
        None => println!("No meals selected."),
    }

    let totals = daily_totals(state, date);
    println!("Total Calories: {}", amount(totals.calories));
    println!("Total Protein:  {}g", amount(totals.protein));
    if let Some(weight) = state.weight(date) {
        println!("Weight:         {} kg", amount(weight));
    }
}

pub fn show_options(state: &DietState, meal_times: &[MealTime]) {
    for meal_time in meal_times {
        println!("\n\x1b[1;36m{}\x1b[0m", meal_time.label());
        let rows: Vec<OptionRow> = state
            .options(*meal_time)
            .iter()
            .enumerate()
            .map(|(i, meal)| OptionRow {
                index: i + 1,
                name: meal.name.clone(),
                calories: amount(meal.calories),
                protein: amount(meal.protein),
            })
            .collect();
        if rows.is_empty() {
            println!("(no options)");
        } else {
            println!("{}", render(rows));
        }
    }
}

pub fn show_chart(data: &ChartData) {
    match data {
        ChartData::Breakdown(rows) if rows.is_empty() => println!("No meals selected."),
        ChartData::Breakdown(rows) => {
            let rows: Vec<SlotRow> = rows
                .iter()
                .map(|r| SlotRow {
                    meal_time: r.meal_time.label(),
                    name: String::new(),
                    calories: amount(r.calories),
                    protein: amount(r.protein),
                })
                .collect();
            println!("{}", render(rows));
        }
        ChartData::Series(points) => {
            let rows: Vec<SeriesRow> = points
                .iter()
                .map(|p| SeriesRow {
                    date: format_date(p.date),
                    calories: amount(p.calories),
                    protein: amount(p.protein),
                    weight: p.weight.map(amount).unwrap_or_else(|| "-".to_string()),
                })
                .collect();
            println!("{}", render(rows));
        }
    }
}

fn render<T: Tabled>(rows: Vec<T>) -> Table {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table
}

/// Up to one decimal, without a trailing `.0`.
fn amount(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}
