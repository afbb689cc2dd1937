use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset, GraphType,
        List, ListItem, ListState, Paragraph, Row, Table,
    },
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use dietlog_core::{format_date, ChartData, ChartRange, MealTime, SeriesPoint};

use crate::tui::app::{App, ChartStyle, Focus, InputMode};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    calories: Color,
    protein: Color,
    weight: Color,
    error: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    calories: Color::Blue,
    protein: Color::Green,
    weight: Color::Yellow,
    error: Color::Red,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Min(8),     // Pickers + day
            Constraint::Length(14), // Chart
            Constraint::Length(3),  // Input / notice
            Constraint::Length(1),  // Help
        ])
        .split(size);

    draw_header(f, app, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(18),
            Constraint::Percentage(50),
            Constraint::Min(30),
        ])
        .split(main_chunks[1]);

    draw_meal_times(f, app, content_chunks[0]);
    draw_options(f, app, content_chunks[1]);
    draw_day(f, app, content_chunks[2]);
    draw_chart(f, app, main_chunks[2]);
    draw_input(f, app, main_chunks[3]);

    let help = if app.input_mode == InputMode::Normal {
        "←/→ day  t today  tab focus  j/k move  ⏎ select  d delete  a/A custom meal  w weight  p period  r range  g graph  q quit"
    } else {
        "⏎ submit  esc cancel"
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(THEME.muted))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[4]);
}

fn focused_block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused { THEME.primary } else { THEME.muted }))
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let title = format!(" {} ({}) ", format_date(app.current_day), app.current_day.format("%a"));
    let nav = Line::from(vec![
        Span::styled("DIET TRACKER   ", Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD)),
        Span::styled(" < ", Style::default().fg(THEME.text)),
        Span::styled(title, Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", Style::default().fg(THEME.text)),
    ]);
    let header = Paragraph::new(nav)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, area);
}

fn draw_meal_times(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = MealTime::ALL
        .iter()
        .map(|t| {
            let chosen = app.store.snapshot().selection(app.current_day, *t).is_some();
            let marker = if chosen { "● " } else { "  " };
            ListItem::new(format!("{}{}", marker, t.label()))
        })
        .collect();

    let list = List::new(items)
        .block(focused_block(" Meal Time ", app.focus == Focus::MealTimes))
        .highlight_style(Style::default().bg(THEME.muted).add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    state.select(Some(app.meal_time_index));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_options(f: &mut Frame, app: &mut App, area: Rect) {
    let name_width = area.width.saturating_sub(20) as usize;
    let chosen = app.store.snapshot().selection(app.current_day, app.current_meal_time()).cloned();

    let rows: Vec<Row> = app
        .options()
        .iter()
        .map(|option| {
            let mark = if chosen.as_ref() == Some(option) { "✔" } else { " " };
            Row::new(vec![
                Span::raw(mark),
                Span::raw(truncate(&option.name, name_width)),
                Span::styled(format!("{}", option.calories), Style::default().fg(THEME.calories)),
                Span::styled(format!("{}", option.protein), Style::default().fg(THEME.protein)),
            ])
        })
        .collect();

    let title = format!(" {} ", app.current_meal_time().label());
    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(Row::new(vec!["", "Meal", "kcal", "prot"]).style(Style::default().fg(Color::Yellow)))
    .block(focused_block(&title, app.focus == Focus::Options))
    .row_highlight_style(Style::default().bg(THEME.muted).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.option_state);
}

fn draw_day(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(5)])
        .split(area);

    let name_width = chunks[0].width.saturating_sub(22) as usize;
    let rows: Vec<Row> = app
        .day_slots()
        .iter()
        .map(|(meal_time, meal)| {
            Row::new(vec![
                Span::styled(meal_time.label(), Style::default().fg(THEME.primary)),
                Span::raw(truncate(&meal.name, name_width)),
                Span::raw(format!("{}/{}g", meal.calories, meal.protein)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(14), Constraint::Min(8), Constraint::Length(11)],
    )
    .block(focused_block(" Meals ", app.focus == Focus::Day))
    .row_highlight_style(Style::default().bg(THEME.muted).add_modifier(Modifier::BOLD));
    f.render_stateful_widget(table, chunks[0], &mut app.day_state);

    let totals = app.totals();
    let weight = app
        .weight()
        .map(|w| format!("{} kg", w))
        .unwrap_or_else(|| "-".to_string());
    let info_text = vec![
        Line::from(vec![
            Span::styled("Calories: ", Style::default().fg(THEME.muted)),
            Span::styled(format!("{:.1}", totals.calories), Style::default().fg(THEME.calories).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Protein:  ", Style::default().fg(THEME.muted)),
            Span::styled(format!("{:.1}g", totals.protein), Style::default().fg(THEME.protein).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Weight:   ", Style::default().fg(THEME.muted)),
            Span::styled(weight, Style::default().fg(THEME.weight).add_modifier(Modifier::BOLD)),
        ]),
    ];
    let info = Paragraph::new(info_text).block(focused_block(" Daily Totals ", false));
    f.render_widget(info, chunks[1]);
}

fn draw_chart(f: &mut Frame, app: &App, area: Rect) {
    let range_title = match app.chart_range() {
        ChartRange::Period(period, _) => format!(" {} ", period),
        ChartRange::Custom { start, end } => format!(" {} .. {} ", format_date(start), format_date(end)),
    };

    let data = match app.chart() {
        Ok(data) => data,
        Err(e) => {
            let msg = Paragraph::new(e.to_string())
                .style(Style::default().fg(THEME.error))
                .block(focused_block(&range_title, false));
            f.render_widget(msg, area);
            return;
        }
    };

    if data.is_empty() {
        let msg = Paragraph::new("No meals for this day")
            .alignment(Alignment::Center)
            .block(focused_block(&range_title, false));
        f.render_widget(msg, area);
        return;
    }

    // Energy on the left; grams and kilograms share the right panel.
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    match (&data, app.chart_style) {
        (ChartData::Breakdown(rows), _) => {
            let labels: Vec<String> = rows.iter().map(|r| short_label(r.meal_time)).collect();
            let calories: Vec<f64> = rows.iter().map(|r| r.calories).collect();
            let protein: Vec<f64> = rows.iter().map(|r| r.protein).collect();
            draw_bars(f, halves[0], &format!("{}Calories ", range_title), &labels, &calories, THEME.calories);
            draw_bars(f, halves[1], &format!("{}Protein (g) ", range_title), &labels, &protein, THEME.protein);
        }
        (ChartData::Series(points), ChartStyle::Bar) => {
            let labels: Vec<String> = points.iter().map(|p| p.date.format("%d").to_string()).collect();
            let right = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(halves[1]);
            let panels = [
                (halves[0], "Calories ", Metric::Calories),
                (right[0], "Protein (g) ", Metric::Protein),
                (right[1], "Weight (kg) ", Metric::Weight),
            ];
            for (area, title, metric) in panels {
                let values = bar_values(points, metric);
                draw_bars(f, area, &format!("{}{}", range_title, title), &labels, &values, metric.color());
            }
        }
        (ChartData::Series(points), ChartStyle::Line) => {
            draw_lines(f, halves[0], &format!("{}Calories ", range_title), points, &[Metric::Calories]);
            draw_lines(
                f,
                halves[1],
                &format!("{}Protein (g) / Weight (kg) ", range_title),
                points,
                &[Metric::Protein, Metric::Weight],
            );
        }
    }
}

fn draw_bars(f: &mut Frame, area: Rect, title: &str, labels: &[String], values: &[f64], color: Color) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let count = values.len().max(1);
    let bar_width = ((inner_width / count).saturating_sub(1)).clamp(1, 9) as u16;

    let bar_items: Vec<Bar> = labels
        .iter()
        .zip(values)
        .map(|(label, value)| {
            Bar::default()
                .label(label.as_str())
                .value(value.round().max(0.0) as u64)
                .style(Style::default().fg(color))
                .text_value(if *value > 0.0 && bar_width >= 4 { format!("{:.0}", value) } else { String::new() })
        })
        .collect();

    let chart = BarChart::default()
        .block(focused_block(title, false))
        .bar_width(bar_width)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bar_items));
    f.render_widget(chart, area);
}

#[derive(Clone, Copy)]
enum Metric {
    Calories,
    Protein,
    Weight,
}

impl Metric {
    fn value(&self, point: &SeriesPoint) -> Option<f64> {
        match self {
            Metric::Calories => Some(point.calories),
            Metric::Protein => Some(point.protein),
            Metric::Weight => point.weight,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Metric::Calories => "Calories",
            Metric::Protein => "Protein",
            Metric::Weight => "Weight",
        }
    }

    fn color(&self) -> Color {
        match self {
            Metric::Calories => THEME.calories,
            Metric::Protein => THEME.protein,
            Metric::Weight => THEME.weight,
        }
    }
}

/// Days without a value (no weight logged) chart as zero.
fn bar_values(points: &[SeriesPoint], metric: Metric) -> Vec<f64> {
    points.iter().map(|p| metric.value(p).unwrap_or(0.0)).collect()
}

fn draw_lines(f: &mut Frame, area: Rect, title: &str, points: &[SeriesPoint], metrics: &[Metric]) {
    let series: Vec<Vec<(f64, f64)>> = metrics
        .iter()
        .map(|metric| {
            points
                .iter()
                .enumerate()
                .filter_map(|(i, p)| metric.value(p).map(|v| (i as f64, v)))
                .collect()
        })
        .collect();

    let y_max = series
        .iter()
        .flatten()
        .map(|(_, y)| *y)
        .fold(0.0_f64, f64::max)
        .max(1.0)
        * 1.1;
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;

    let datasets: Vec<Dataset> = metrics
        .iter()
        .zip(&series)
        .map(|(metric, data)| {
            Dataset::default()
                .name(metric.name())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(metric.color()))
                .data(data)
        })
        .collect();

    let first = points.first().map(|p| p.date.format("%m-%d").to_string()).unwrap_or_default();
    let last = points.last().map(|p| p.date.format("%m-%d").to_string()).unwrap_or_default();

    let chart = Chart::new(datasets)
        .block(focused_block(title, false))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(THEME.muted))
                .bounds([0.0, x_max])
                .labels(vec![first, last]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(THEME.muted))
                .bounds([0.0, y_max])
                .labels(vec!["0".to_string(), format!("{:.0}", y_max)]),
        );
    f.render_widget(chart, area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    if app.input_mode != InputMode::Normal {
        let input = Paragraph::new(app.input.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(focused_block(app.input_mode.prompt(), true));
        f.render_widget(input, area);
        let cursor_x = area.x + 1 + app.input.chars().take(app.cursor_position).map(|c| c.width().unwrap_or(0) as u16).sum::<u16>();
        f.set_cursor_position((cursor_x, area.y + 1));
    }

    if let Some(notice) = &app.notice {
        let style = if notice.is_error { Style::default().fg(THEME.error) } else { Style::default().fg(THEME.protein) };
        let notice_area = if app.input_mode == InputMode::Normal {
            area
        } else {
            // Sits on the input border so the typed text stays visible.
            Rect { y: area.y + area.height.saturating_sub(1), height: 1, x: area.x + 2, width: area.width.saturating_sub(4) }
        };
        f.render_widget(Paragraph::new(notice.text.as_str()).style(style).alignment(Alignment::Center), notice_area);
    }
}

fn short_label(meal_time: MealTime) -> String {
    meal_time.label().split_whitespace().map(|w| &w[..w.len().min(3)]).collect::<Vec<_>>().join("")
}

/// Cuts `text` to at most `max` display columns, ending with `…` when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Makhana", 10), "Makhana");
        assert_eq!(truncate("2 Banana + 4 Dates", 8), "2 Banan…");
        assert_eq!(truncate("abc", 0), "…");
    }

    #[test]
    fn test_bar_values_fill_missing_weight() {
        let day = |d: u32, weight: Option<f64>| SeriesPoint {
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            calories: 100.0 * d as f64,
            protein: 5.0,
            weight,
        };
        let points = vec![day(1, Some(70.5)), day(2, None), day(3, Some(70.1))];

        assert_eq!(bar_values(&points, Metric::Weight), vec![70.5, 0.0, 70.1]);
        assert_eq!(bar_values(&points, Metric::Calories), vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_bar_mode_draws_weight_panel() {
        use anyhow::Result;
        use dietlog_core::{DietRepository, DietState, DietStore};
        use ratatui::{backend::TestBackend, Terminal};

        struct MemoryRepo;

        impl DietRepository for MemoryRepo {
            fn load(&self) -> Result<Option<DietState>> { Ok(None) }
            fn save(&self, _state: &DietState) -> Result<()> { Ok(()) }
        }

        let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let mut app = App::new(DietStore::open(MemoryRepo).unwrap(), today);
        app.store.add_weight(today, 70.2);
        app.cycle_period();
        app.chart_style = ChartStyle::Bar;

        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Weight (kg)"));
        assert!(screen.contains("Protein (g)"));
    }

    #[test]
    fn test_short_label() {
        assert_eq!(short_label(MealTime::BeforeWorkout), "BefWor");
        assert_eq!(short_label(MealTime::Lunch), "Lun");
    }
}
