use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use weekplot_core::{ChartView, WeekOption};

#[derive(Tabled)]
struct WeekRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Week")]
    label: String,
}

#[derive(Tabled)]
struct PointRow {
    #[tabled(rename = "Week")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

pub fn render_weeks(start_date: &str, options: &[WeekOption]) -> String {
    if options.is_empty() {
        return format!("No weeks for start date '{}'.", start_date);
    }
    let rows = options.iter().map(|o| WeekRow {
        key: o.key.clone(),
        label: o.label.clone(),
    });
    styled(Table::new(rows))
}

pub fn render_series(view: &ChartView) -> String {
    let header = format!(
        "\x1b[1;36m{}\x1b[0m (y: {} .. {})",
        view.title,
        format_value(view.y_min),
        format_value(view.y_max)
    );
    if view.series.is_empty() {
        return format!("{}\nNo weeks to plot.", header);
    }
    let rows = view.series.iter().map(|p| PointRow {
        label: p.label.clone(),
        value: format_value(p.value),
    });
    format!("{}\n{}", header, styled(Table::new(rows)))
}

// Spelled the way the inputs accept them
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekplot_core::{week_options, ChartPoint};

    #[test]
    fn test_render_weeks() {
        let out = render_weeks("2023-12-01", &week_options("2023-12-01"));
        assert!(out.contains("2023-W01"));
        assert!(out.contains("Week 9 (1/26/2024)"));
    }

    #[test]
    fn test_render_weeks_empty() {
        assert_eq!(render_weeks("x", &[]), "No weeks for start date 'x'.");
    }

    #[test]
    fn test_render_series() {
        let view = ChartView {
            id: 1,
            title: "Line A".to_string(),
            series: vec![
                ChartPoint { label: "Week 1".to_string(), value: 15.0 },
                ChartPoint { label: "Week 2".to_string(), value: 2.5 },
            ],
            y_min: f64::NAN,
            y_max: 100.0,
        };
        let out = render_series(&view);
        assert!(out.contains("Line A"));
        assert!(out.contains("(y: NaN .. 100)"));
        assert!(out.contains("15"));
        assert!(out.contains("2.5"));
    }

    #[test]
    fn test_format_value_spells_infinity() {
        assert_eq!(format_value(f64::INFINITY), "Infinity");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(-4.5), "-4.5");
    }
}
