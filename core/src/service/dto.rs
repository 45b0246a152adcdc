use serde::{Deserialize, Serialize};

use crate::model::graph::{Graph, GraphId};
use crate::model::week::ChartPoint;
use crate::service::projector::weekly_data;

/// What a chart renderer needs to draw one graph.
///
/// Bounds are passed through as parsed from the form and may be `NaN` or
/// inverted; deciding what to draw then is up to the renderer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChartView {
    pub id: GraphId,
    pub title: String,
    pub series: Vec<ChartPoint>,
    #[serde(with = "nan_as_null")]
    pub y_min: f64,
    #[serde(with = "nan_as_null")]
    pub y_max: f64,
}

impl ChartView {
    pub fn from_graph(graph: &Graph) -> Self {
        Self {
            id: graph.id,
            title: graph.graph_title.clone(),
            series: weekly_data(&graph.start_date, &graph.weekly_values),
            y_min: graph.y_min(),
            y_max: graph.y_max(),
        }
    }

    /// Both bounds are finite and the range is not empty.
    pub fn has_usable_bounds(&self) -> bool {
        self.y_min.is_finite() && self.y_max.is_finite() && self.y_min < self.y_max
    }

    /// Smallest and largest plotted value, or `None` for an empty series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.series.iter().map(|p| p.value).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

// JSON has no NaN or infinities; write them as null, read null back as NaN.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph::GraphDefaults;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    #[test]
    fn test_from_graph() {
        let mut graph = Graph::primary(&GraphDefaults::default());
        let mut values = BTreeMap::new();
        values.insert("2023-W01".to_string(), 15.0);
        graph.weekly_values = Arc::new(values);

        let view = ChartView::from_graph(&graph);
        assert_eq!(view.id, 1);
        assert_eq!(view.title, "Production per Week");
        assert_eq!(view.series.len(), 9);
        assert_eq!(view.series[0].value, 15.0);
        assert_eq!((view.y_min, view.y_max), (0.0, 100.0));
        assert!(view.has_usable_bounds());
        assert_eq!(view.value_range(), Some((0.0, 15.0)));
    }

    #[test]
    fn test_unusable_bounds() {
        let mut graph = Graph::primary(&GraphDefaults::default());
        graph.y_axis_min_input = "abc".to_string();
        let view = ChartView::from_graph(&graph);
        assert!(view.y_min.is_nan());
        assert!(!view.has_usable_bounds());

        graph.y_axis_min_input = "100".to_string();
        assert!(!ChartView::from_graph(&graph).has_usable_bounds());
    }

    #[test]
    fn test_nan_bound_serializes_as_null() {
        let mut graph = Graph::primary(&GraphDefaults::default());
        graph.y_axis_max_input = "x".to_string();
        let view = ChartView::from_graph(&graph);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["y_max"].is_null());
        assert_eq!(json["y_min"], 0.0);

        let back: ChartView = serde_json::from_value(json).unwrap();
        assert!(back.y_max.is_nan());
    }

    #[test]
    fn test_empty_series_has_no_range() {
        let mut graph = Graph::primary(&GraphDefaults::default());
        graph.start_date = "not a date".to_string();
        let view = ChartView::from_graph(&graph);
        assert!(view.series.is_empty());
        assert_eq!(view.value_range(), None);
    }
}
