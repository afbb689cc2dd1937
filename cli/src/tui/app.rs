use chrono::NaiveDate;
use ratatui::widgets::TableState;
use dietlog_core::{
    chart_data, daily_totals, parse_meal_args, parse_range, parse_weight, shift_day, AggregateError,
    ChartData, ChartRange, CustomMealTarget, DietStore, InputError, MealOption, MealTime, Period,
    Totals,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    CatalogMeal,
    DayMeal,
    Weight,
    Range,
}

impl InputMode {
    pub fn prompt(&self) -> &'static str {
        match self {
            InputMode::Normal => "",
            InputMode::CatalogMeal => " New meal for catalog (name cal:N pro:N) ",
            InputMode::DayMeal => " Meal for this day only (name cal:N pro:N) ",
            InputMode::Weight => " Weight (kg) ",
            InputMode::Range => " Chart range (start end) ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    MealTimes,
    Options,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

pub struct App {
    pub store: DietStore,
    pub today: NaiveDate,
    pub current_day: NaiveDate,
    pub meal_time_index: usize,
    pub option_state: TableState,
    pub day_state: TableState,
    pub focus: Focus,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    /// `None` while a custom range is shown.
    pub period: Option<Period>,
    pub custom_range: Option<(NaiveDate, NaiveDate)>,
    pub chart_style: ChartStyle,
    pub notice: Option<Notice>,
}

impl App {
    pub fn new(store: DietStore, today: NaiveDate) -> App {
        let mut app = App {
            store,
            today,
            current_day: today,
            meal_time_index: 0,
            option_state: TableState::default(),
            day_state: TableState::default(),
            focus: Focus::MealTimes,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            period: Some(Period::Day),
            custom_range: None,
            chart_style: ChartStyle::Line,
            notice: None,
        };
        app.sync_option_selection();
        app.clamp_day_selection();
        app
    }

    pub fn current_meal_time(&self) -> MealTime {
        MealTime::ALL[self.meal_time_index]
    }

    pub fn options(&self) -> &[MealOption] {
        self.store.snapshot().options(self.current_meal_time())
    }

    pub fn day_slots(&self) -> Vec<(MealTime, &MealOption)> {
        self.store
            .snapshot()
            .day(self.current_day)
            .map(|day| day.iter().map(|(t, m)| (*t, m)).collect())
            .unwrap_or_default()
    }

    pub fn totals(&self) -> Totals {
        daily_totals(self.store.snapshot(), self.current_day)
    }

    pub fn weight(&self) -> Option<f64> {
        self.store.snapshot().weight(self.current_day)
    }

    pub fn chart_range(&self) -> ChartRange {
        match (self.custom_range, self.period) {
            (Some((start, end)), _) => ChartRange::Custom { start, end },
            (None, period) => ChartRange::Period(period.unwrap_or_default(), self.current_day),
        }
    }

    pub fn chart(&self) -> Result<ChartData, AggregateError> {
        chart_data(self.store.snapshot(), self.chart_range())
    }

    // Navigation

    pub fn next(&mut self) {
        match self.focus {
            Focus::MealTimes => {
                self.meal_time_index = (self.meal_time_index + 1) % MealTime::ALL.len();
                self.sync_option_selection();
            }
            Focus::Options => {
                let len = self.options().len();
                step(&mut self.option_state, len, true);
            }
            Focus::Day => {
                let len = self.day_slots().len();
                step(&mut self.day_state, len, true);
            }
        }
    }

    pub fn previous(&mut self) {
        match self.focus {
            Focus::MealTimes => {
                self.meal_time_index =
                    (self.meal_time_index + MealTime::ALL.len() - 1) % MealTime::ALL.len();
                self.sync_option_selection();
            }
            Focus::Options => {
                let len = self.options().len();
                step(&mut self.option_state, len, false);
            }
            Focus::Day => {
                let len = self.day_slots().len();
                step(&mut self.day_state, len, false);
            }
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::MealTimes => Focus::Options,
            Focus::Options => Focus::Day,
            Focus::Day => Focus::MealTimes,
        };
    }

    pub fn change_day(&mut self, offset: i64) {
        self.current_day = shift_day(self.current_day, offset);
        self.sync_option_selection();
        self.clamp_day_selection();
    }

    pub fn go_today(&mut self) {
        self.current_day = self.today;
        self.sync_option_selection();
        self.clamp_day_selection();
    }

    // Store mutations

    pub fn select_highlighted_option(&mut self) {
        let Some(meal) = self
            .option_state
            .selected()
            .and_then(|i| self.options().get(i).cloned())
        else {
            return;
        };
        let meal_time = self.current_meal_time();
        self.store.select_meal(self.current_day, meal_time, meal.clone());
        self.clamp_day_selection();
        self.info(format!("{}: {}", meal_time.label(), meal.name));
    }

    /// Day focus removes the highlighted slot, otherwise the current meal time's slot.
    pub fn delete_selection(&mut self) {
        let meal_time = match self.focus {
            Focus::Day => match self.day_state.selected().and_then(|i| self.day_slots().get(i).map(|(t, _)| *t)) {
                Some(t) => t,
                None => return,
            },
            _ => self.current_meal_time(),
        };
        if self.store.snapshot().selection(self.current_day, meal_time).is_none() {
            return;
        }
        self.store.delete_meal(self.current_day, meal_time);
        self.clamp_day_selection();
        self.sync_option_selection();
        self.info(format!("Removed {}", meal_time.label()));
    }

    // Chart controls

    pub fn cycle_period(&mut self) {
        let next = match self.period {
            Some(Period::Day) => Period::Week,
            Some(Period::Week) => Period::Month,
            Some(Period::Month) | None => Period::Day,
        };
        self.period = Some(next);
        self.custom_range = None;
    }

    pub fn toggle_chart_style(&mut self) {
        self.chart_style = match self.chart_style {
            ChartStyle::Line => ChartStyle::Bar,
            ChartStyle::Bar => ChartStyle::Line,
        };
    }

    // Input line

    pub fn enter_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.input.chars().take(self.cursor_position).map(|c| c.len_utf8()).sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self.input.chars().take(self.cursor_position - 1).map(|c| c.len_utf8()).sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_input(&mut self) {
        let result = match self.input_mode {
            InputMode::Normal => Ok(()),
            InputMode::CatalogMeal => self.submit_meal(CustomMealTarget::Catalog),
            InputMode::DayMeal => self.submit_meal(CustomMealTarget::Day(self.current_day)),
            InputMode::Weight => self.submit_weight(),
            InputMode::Range => self.submit_range(),
        };

        match result {
            Ok(()) => {
                self.input.clear();
                self.cursor_position = 0;
                self.exit_input_mode();
            }
            // Keep the typed text so it can be corrected.
            Err(e) => self.error(e.to_string()),
        }
    }

    fn submit_meal(&mut self, target: CustomMealTarget) -> Result<(), InputError> {
        let args: Vec<String> = self.input.split_whitespace().map(|s| s.to_string()).collect();
        let meal = parse_meal_args(&args).validate()?;
        let meal_time = self.current_meal_time();
        let name = meal.name.clone();

        self.store.add_custom_meal(meal_time, meal, target);
        self.sync_option_selection();
        self.clamp_day_selection();
        match target {
            CustomMealTarget::Catalog => self.info(format!("Added {} to {}", name, meal_time.label())),
            CustomMealTarget::Day(_) => self.info(format!("{}: {}", meal_time.label(), name)),
        }
        Ok(())
    }

    fn submit_weight(&mut self) -> Result<(), InputError> {
        let weight = parse_weight(&self.input)?;
        self.store.add_weight(self.current_day, weight);
        self.info(format!("Weight {} kg", weight));
        Ok(())
    }

    fn submit_range(&mut self) -> Result<(), InputError> {
        let parts: Vec<&str> = self.input.split_whitespace().collect();
        let (start, end) = match parts.as_slice() {
            [start, end] => parse_range(start, end, self.today)?,
            _ => return Err(InputError::InvalidDate(self.input.trim().to_string())),
        };
        self.custom_range = Some((start, end));
        self.period = None;
        Ok(())
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    fn info(&mut self, text: String) {
        self.notice = Some(Notice { text, is_error: false });
    }

    fn error(&mut self, text: String) {
        self.notice = Some(Notice { text, is_error: true });
    }

    /// Highlights the option already chosen for this slot, if any.
    fn sync_option_selection(&mut self) {
        let chosen = self.store.snapshot().selection(self.current_day, self.current_meal_time());
        let options = self.options();
        let index = chosen
            .and_then(|meal| options.iter().position(|o| o == meal))
            .or(if options.is_empty() { None } else { Some(0) });
        self.option_state.select(index);
    }

    fn clamp_day_selection(&mut self) {
        let len = self.day_slots().len();
        let index = match self.day_state.selected() {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
        self.day_state.select(index);
    }
}

fn step(state: &mut TableState, len: usize, forward: bool) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    state.select(Some(i));
}
