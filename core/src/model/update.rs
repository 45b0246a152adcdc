use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

use crate::input::{coerce_number, expand_key};
use crate::model::graph::Graph;

/// A single-field edit of a graph, carrying the field's own type.
///
/// Weekly values and `count` are not here: they only change together, through
/// the record-count operation.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphUpdate {
    StartDate(String),
    SelectedWeek(String),
    GraphTitle(String),
    YAxisMin(f64),
    YAxisMax(f64),
    YAxisMinInput(String),
    YAxisMaxInput(String),
}

impl GraphUpdate {
    pub fn field(&self) -> GraphField {
        match self {
            GraphUpdate::StartDate(_) => GraphField::StartDate,
            GraphUpdate::SelectedWeek(_) => GraphField::SelectedWeek,
            GraphUpdate::GraphTitle(_) => GraphField::GraphTitle,
            GraphUpdate::YAxisMin(_) => GraphField::YAxisMin,
            GraphUpdate::YAxisMax(_) => GraphField::YAxisMax,
            GraphUpdate::YAxisMinInput(_) => GraphField::YAxisMinInput,
            GraphUpdate::YAxisMaxInput(_) => GraphField::YAxisMaxInput,
        }
    }

    /// Returns a copy of `graph` with this field replaced.
    pub fn apply(self, graph: &Graph) -> Graph {
        let mut next = graph.clone();
        match self {
            GraphUpdate::StartDate(v) => next.start_date = v,
            GraphUpdate::SelectedWeek(v) => next.selected_week = v,
            GraphUpdate::GraphTitle(v) => next.graph_title = v,
            GraphUpdate::YAxisMin(v) => next.y_axis_min = v,
            GraphUpdate::YAxisMax(v) => next.y_axis_max = v,
            GraphUpdate::YAxisMinInput(v) => next.y_axis_min_input = v,
            GraphUpdate::YAxisMaxInput(v) => next.y_axis_max_input = v,
        }
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphField {
    StartDate,
    SelectedWeek,
    GraphTitle,
    YAxisMin,
    YAxisMax,
    YAxisMinInput,
    YAxisMaxInput,
}

impl GraphField {
    pub const ALL: [GraphField; 7] = [
        GraphField::StartDate,
        GraphField::SelectedWeek,
        GraphField::GraphTitle,
        GraphField::YAxisMin,
        GraphField::YAxisMax,
        GraphField::YAxisMinInput,
        GraphField::YAxisMaxInput,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GraphField::StartDate => "start_date",
            GraphField::SelectedWeek => "selected_week",
            GraphField::GraphTitle => "graph_title",
            GraphField::YAxisMin => "y_axis_min",
            GraphField::YAxisMax => "y_axis_max",
            GraphField::YAxisMinInput => "y_axis_min_input",
            GraphField::YAxisMaxInput => "y_axis_max_input",
        }
    }

    /// Builds an update from text. Numeric legacy fields go through
    /// `Number()` coercion, so this never rejects a value.
    pub fn update_from_str(self, raw: &str) -> GraphUpdate {
        let text = raw.to_string();
        match self {
            GraphField::StartDate => GraphUpdate::StartDate(text),
            GraphField::SelectedWeek => GraphUpdate::SelectedWeek(text),
            GraphField::GraphTitle => GraphUpdate::GraphTitle(text),
            GraphField::YAxisMin => GraphUpdate::YAxisMin(coerce_number(raw)),
            GraphField::YAxisMax => GraphUpdate::YAxisMax(coerce_number(raw)),
            GraphField::YAxisMinInput => GraphUpdate::YAxisMinInput(text),
            GraphField::YAxisMaxInput => GraphUpdate::YAxisMaxInput(text),
        }
    }
}

impl fmt::Display for GraphField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GraphField {
    type Err = anyhow::Error;

    /// Accepts full field names and unambiguous prefixes (`grap` → `graph_title`).
    fn from_str(s: &str) -> Result<Self> {
        let names: Vec<&str> = GraphField::ALL.iter().map(|f| f.name()).collect();
        let name = expand_key(s, &names)?;
        GraphField::ALL
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| anyhow!("Unknown field: '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph::GraphDefaults;

    #[test]
    fn test_apply_replaces_one_field() {
        let graph = Graph::primary(&GraphDefaults::default());
        let next = GraphUpdate::GraphTitle("Line A".to_string()).apply(&graph);

        assert_eq!(next.graph_title, "Line A");
        assert_eq!(next.start_date, graph.start_date);
        assert_eq!(next.y_axis_min_input, graph.y_axis_min_input);
        // untouched values stay shared
        assert!(std::sync::Arc::ptr_eq(&next.weekly_values, &graph.weekly_values));
        // the input graph is untouched
        assert_eq!(graph.graph_title, "Production per Week");
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("start_date".parse::<GraphField>().unwrap(), GraphField::StartDate);
        assert_eq!("grap".parse::<GraphField>().unwrap(), GraphField::GraphTitle);
        assert_eq!("y_axis_min_i".parse::<GraphField>().unwrap(), GraphField::YAxisMinInput);
        // y_axis_min is a prefix of y_axis_min_input but matches exactly
        assert_eq!("y_axis_min".parse::<GraphField>().unwrap(), GraphField::YAxisMin);
        assert!("y_axis".parse::<GraphField>().is_err());
        assert!("count".parse::<GraphField>().is_err());
    }

    #[test]
    fn test_update_from_str_keeps_text_and_coerces_numbers() {
        assert_eq!(
            GraphField::YAxisMinInput.update_from_str("abc"),
            GraphUpdate::YAxisMinInput("abc".to_string())
        );
        assert_eq!(GraphField::YAxisMax.update_from_str("250"), GraphUpdate::YAxisMax(250.0));
        match GraphField::YAxisMin.update_from_str("abc") {
            GraphUpdate::YAxisMin(v) => assert!(v.is_nan()),
            other => panic!("unexpected update {:?}", other),
        }
    }

    #[test]
    fn test_update_field_round_trip() {
        for field in GraphField::ALL {
            assert_eq!(field.update_from_str("1").field(), field);
            assert_eq!(field.to_string().parse::<GraphField>().unwrap(), field);
        }
    }
}
