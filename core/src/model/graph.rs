use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::input::coerce_number;

pub type GraphId = u32;

/// The graph that exists when a session starts.
pub const PRIMARY_GRAPH_ID: GraphId = 1;

pub const DEFAULT_START_DATE: &str = "2023-12-01";
pub const DEFAULT_TITLE: &str = "Production per Week";
pub const DEFAULT_Y_AXIS_MIN: f64 = 0.0;
pub const DEFAULT_Y_AXIS_MAX: f64 = 100.0;

/// Values every new graph starts with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GraphDefaults {
    pub start_date: String,
    pub title: String,
    pub y_axis_min: f64,
    pub y_axis_max: f64,
}

impl Default for GraphDefaults {
    fn default() -> Self {
        Self {
            start_date: DEFAULT_START_DATE.to_string(),
            title: DEFAULT_TITLE.to_string(),
            y_axis_min: DEFAULT_Y_AXIS_MIN,
            y_axis_max: DEFAULT_Y_AXIS_MAX,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Graph {
    pub id: GraphId,
    /// ISO date as typed. Kept as text so a half-typed date is representable.
    pub start_date: String,
    /// Week key to value. Sparse, and not purged when `start_date` changes.
    pub weekly_values: Arc<BTreeMap<String, f64>>,
    pub graph_title: String,
    // Set at creation, never read for rendering.
    pub y_axis_min: f64,
    pub y_axis_max: f64,
    pub y_axis_min_input: String,
    pub y_axis_max_input: String,
    /// Empty when no week is selected.
    pub selected_week: String,
    pub count: String,
}

impl Graph {
    pub fn new(id: GraphId, title: String, defaults: &GraphDefaults) -> Self {
        Self {
            id,
            start_date: defaults.start_date.clone(),
            weekly_values: Arc::new(BTreeMap::new()),
            graph_title: title,
            y_axis_min: defaults.y_axis_min,
            y_axis_max: defaults.y_axis_max,
            y_axis_min_input: format_bound(defaults.y_axis_min),
            y_axis_max_input: format_bound(defaults.y_axis_max),
            selected_week: String::new(),
            count: String::new(),
        }
    }

    /// The graph a session is seeded with, titled without an id suffix.
    pub fn primary(defaults: &GraphDefaults) -> Self {
        Self::new(PRIMARY_GRAPH_ID, defaults.title.clone(), defaults)
    }

    /// A graph created by the add operation, titled `"<title> <id>"`.
    pub fn numbered(id: GraphId, defaults: &GraphDefaults) -> Self {
        Self::new(id, format!("{} {}", defaults.title, id), defaults)
    }

    /// Lower Y bound as rendered. `NaN` when the input is not numeric.
    pub fn y_min(&self) -> f64 {
        coerce_number(&self.y_axis_min_input)
    }

    /// Upper Y bound as rendered. `NaN` when the input is not numeric.
    pub fn y_max(&self) -> f64 {
        coerce_number(&self.y_axis_max_input)
    }

    pub fn has_selected_week(&self) -> bool {
        !self.selected_week.is_empty()
    }
}

/// Formats a bound the way a number input displays it: `0`, not `0.0`.
fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_graph_defaults() {
        let graph = Graph::primary(&GraphDefaults::default());
        assert_eq!(graph.id, 1);
        assert_eq!(graph.start_date, "2023-12-01");
        assert_eq!(graph.graph_title, "Production per Week");
        assert!(graph.weekly_values.is_empty());
        assert_eq!(graph.y_axis_min_input, "0");
        assert_eq!(graph.y_axis_max_input, "100");
        assert_eq!(graph.selected_week, "");
        assert_eq!(graph.count, "");
    }

    #[test]
    fn test_numbered_graph_title() {
        let graph = Graph::numbered(2, &GraphDefaults::default());
        assert_eq!(graph.graph_title, "Production per Week 2");
    }

    #[test]
    fn test_bounds_are_parsed_from_inputs() {
        let mut graph = Graph::primary(&GraphDefaults::default());
        assert_eq!(graph.y_min(), 0.0);
        assert_eq!(graph.y_max(), 100.0);

        graph.y_axis_min_input = "abc".to_string();
        graph.y_axis_max_input = "250".to_string();
        assert!(graph.y_min().is_nan());
        assert_eq!(graph.y_max(), 250.0);
        // the legacy numeric fields are not kept in sync
        assert_eq!(graph.y_axis_min, 0.0);
    }

    #[test]
    fn test_fractional_default_bound() {
        let defaults = GraphDefaults {
            y_axis_max: 12.5,
            ..GraphDefaults::default()
        };
        let graph = Graph::primary(&defaults);
        assert_eq!(graph.y_axis_max_input, "12.5");
    }
}
