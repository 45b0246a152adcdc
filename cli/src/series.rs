use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use weekplot_core::model::PRIMARY_GRAPH_ID;
use weekplot_core::time::format_iso;
use weekplot_core::{
    expand_key, parse_args, parse_human_date, parse_week_key, ChartView, Dashboard, GraphDefaults,
    GraphEvent, GraphField, GraphUpdate,
};

/// Short names for the fields people set most.
const ALIASES: [(&str, GraphField); 3] = [
    ("title", GraphField::GraphTitle),
    ("min", GraphField::YAxisMinInput),
    ("max", GraphField::YAxisMaxInput),
];

/// Resolves a START argument (ISO date or shortcut) to an ISO date string.
pub fn resolve_start(input: &str, today: NaiveDate) -> Result<String> {
    parse_human_date(input, today)
        .map(format_iso)
        .map_err(|e| anyhow!("Invalid start date '{}': {}", input, e))
}

/// A single graph built from command line arguments, plus the arguments
/// that were skipped.
pub struct BuiltSeries {
    pub view: ChartView,
    pub warnings: Vec<String>,
}

/// Replays `key:value` arguments against a fresh dashboard.
///
/// Week keys (`2023-W01:15`) select the week and record the count, the way a
/// user would in the form. `title`, `min` and `max` (or unambiguous prefixes)
/// set the title and the axis bound inputs; any other graph field can be set
/// by its full name (`start_date`, `y_axis_max`, ...) or a unique prefix of it.
pub fn build_series(start_date: &str, args: &[String], defaults: GraphDefaults) -> Result<BuiltSeries> {
    let mut dashboard = Dashboard::new(defaults);
    let mut warnings = Vec::new();
    let id = PRIMARY_GRAPH_ID;

    dashboard.dispatch(GraphEvent::Update(id, GraphUpdate::StartDate(start_date.to_string())));

    let parsed = parse_args(args);
    for arg in parsed.positional {
        warnings.push(format!("Ignoring argument '{}'", arg));
    }

    // HashMap order is arbitrary; apply in key order so output is stable
    let mut metadata: Vec<(String, String)> = parsed.metadata.into_iter().collect();
    metadata.sort();

    for (key, value) in metadata {
        if parse_week_key(&key).is_some() {
            dashboard.dispatch(GraphEvent::Update(id, GraphUpdate::SelectedWeek(key)));
            dashboard.dispatch(GraphEvent::RecordCount(id, value));
            continue;
        }

        match resolve_field(&key) {
            Ok(field) => {
                let update = field.update_from_str(&value);
                dashboard.dispatch(GraphEvent::Update(id, update));
            }
            Err(e) => warnings.push(e.to_string()),
        }
    }

    let view = dashboard
        .views()
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No graph to project"))?;
    Ok(BuiltSeries { view, warnings })
}

fn resolve_field(key: &str) -> Result<GraphField> {
    let aliases: Vec<&str> = ALIASES.iter().map(|(alias, _)| *alias).collect();
    if let Ok(alias) = expand_key(key, &aliases) {
        if let Some((_, field)) = ALIASES.iter().find(|(a, _)| *a == alias) {
            return Ok(*field);
        }
    }
    key.parse::<GraphField>()
}
