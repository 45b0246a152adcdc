use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;
use weekplot_core::ChartView;

use crate::tui::app::{App, FormField, InputMode};

struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    line: Color,
    editing: Color,
    warning: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    line: Color::Blue,
    editing: Color::Yellow,
    warning: Color::Red,
};

const FORM_WIDTH: u16 = 38;

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let header = Paragraph::new("WEEKPLOT")
        .style(Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FORM_WIDTH), Constraint::Min(10)])
        .split(main_chunks[1]);

    draw_form(f, app, content_chunks[0]);
    draw_chart_grid(f, app, content_chunks[1]);
    draw_footer(f, app, main_chunks[2]);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let footer = if let Some(status) = &app.status {
        Paragraph::new(status.as_str()).style(Style::default().fg(THEME.warning))
    } else {
        let help = match (&app.input_mode, app.field) {
            (InputMode::Normal, _) => {
                "j/k: Field | h/l: Graph | Enter: Edit | a: Add | d: Delete | q: Quit"
            }
            (InputMode::Editing, FormField::Week) => "←/→: Choose week | Enter/Esc: Done",
            (InputMode::Editing, _) => "Type to edit | Backspace: Delete | Enter/Esc: Done",
        };
        Paragraph::new(help).style(Style::default().fg(THEME.muted))
    };
    f.render_widget(footer.alignment(Alignment::Center), area);
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let Some(graph) = app.selected_graph() else {
        let block = Block::default().title(" Graph ").borders(Borders::ALL).border_type(BorderType::Rounded);
        f.render_widget(block, area);
        return;
    };

    let title = if app.dashboard.can_delete(graph.id) {
        format!(" Graph {} [d: delete] ", graph.id)
    } else {
        format!(" Graph {} ", graph.id)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let options = app.week_options();
    let editing = matches!(app.input_mode, InputMode::Editing);

    let mut lines = Vec::new();
    for field in FormField::ALL {
        let focused = field == app.field;
        let label_style = if focused {
            Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(THEME.muted)
        };
        let value_style = match (focused, editing) {
            (true, true) => Style::default().fg(THEME.editing),
            (true, false) => Style::default().fg(THEME.text).bg(THEME.muted),
            _ => Style::default().fg(THEME.text),
        };

        let value = match field {
            FormField::Week => options
                .iter()
                .find(|o| o.key == graph.selected_week)
                .map(|o| o.label.clone())
                .unwrap_or_else(|| "Select a week".to_string()),
            _ => app.field_value(field),
        };

        lines.push(Line::from(Span::styled(format!("{}:", field.label()), label_style)));
        lines.push(Line::from(vec![Span::raw("  "), Span::styled(value, value_style)]));
    }

    // The week list stays visible so entered counts can be checked at a glance
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Weeks:", Style::default().fg(THEME.muted))));
    if options.is_empty() {
        lines.push(Line::from(Span::styled("  (invalid start date)", Style::default().fg(THEME.warning))));
    }
    for option in &options {
        let marker = if option.key == graph.selected_week { "> " } else { "  " };
        let stored = graph
            .weekly_values
            .get(&option.key)
            .map(|v| format!(" = {}", v))
            .unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(THEME.primary)),
            Span::raw(option.label.clone()),
            Span::styled(stored, Style::default().fg(THEME.line)),
        ]));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

    if editing && app.field != FormField::Week {
        let row = app.field.index() as u16 * 2 + 1;
        let col = 2 + app.field_value(app.field).width() as u16;
        if row < inner.height && col < inner.width {
            f.set_cursor_position((inner.x + col, inner.y + row));
        }
    }
}

fn draw_chart_grid(f: &mut Frame, app: &App, area: Rect) {
    let views = app.dashboard.views();
    if views.is_empty() {
        return;
    }

    let rows = views.len().div_ceil(2) as u32;
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints((0..rows).map(|_| Constraint::Ratio(1, rows)))
        .split(area);

    for (row_index, pair) in views.chunks(2).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row_areas[row_index]);
        for (col, view) in pair.iter().enumerate() {
            let selected = row_index * 2 + col == app.selected;
            draw_chart(f, view, selected, cells[col]);
        }
    }
}

fn draw_chart(f: &mut Frame, view: &ChartView, selected: bool, area: Rect) {
    let border_style = if selected {
        Style::default().fg(THEME.primary)
    } else {
        Style::default().fg(THEME.muted)
    };
    let block = Block::default()
        .title(format!(" {} ", view.title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);

    if view.series.is_empty() {
        let empty = Paragraph::new("No weeks to plot")
            .style(Style::default().fg(THEME.muted))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let points: Vec<(f64, f64)> = view
        .series
        .iter()
        .enumerate()
        .map(|(i, p)| ((i + 1) as f64, p.value))
        .collect();
    let (y_min, y_max) = y_bounds(view);
    let x_max = points.len().max(2) as f64;

    let dataset = Dataset::default()
        .name("Production")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(THEME.line))
        .data(&points);

    let first = view.series.first().map(|p| p.label.clone()).unwrap_or_default();
    let last = view.series.last().map(|p| p.label.clone()).unwrap_or_default();

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(THEME.muted))
                .bounds([1.0, x_max])
                .labels(vec![first, last]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(THEME.muted))
                .bounds([y_min, y_max])
                .labels(vec![
                    format_bound(y_min),
                    format_bound((y_min + y_max) / 2.0),
                    format_bound(y_max),
                ]),
        );

    f.render_widget(chart, area);
}

/// Bounds the chart is drawn with.
///
/// Typed bounds win when they are usable. Otherwise the range is derived from
/// the data, always including zero.
fn y_bounds(view: &ChartView) -> (f64, f64) {
    if view.has_usable_bounds() {
        return (view.y_min, view.y_max);
    }
    let (lo, hi) = view.value_range().unwrap_or((0.0, 0.0));
    let lo = lo.min(0.0);
    let hi = hi.max(0.0);
    if hi > lo { (lo, hi) } else { (lo, lo + 1.0) }
}

fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value)
    } else {
        format!("{:.1}", value)
    }
}
