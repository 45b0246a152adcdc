use std::sync::Arc;

use crate::model::graph::{Graph, GraphDefaults, GraphId, PRIMARY_GRAPH_ID};
use crate::model::update::GraphUpdate;
use crate::model::week::WeekOption;
use crate::service::dto::ChartView;
use crate::service::graph_service::GraphCollection;
use crate::service::projector::week_options_with_format;

/// A user action on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    Add,
    Delete(GraphId),
    Update(GraphId, GraphUpdate),
    /// A value typed into the count field; applies to the graph's selected week.
    RecordCount(GraphId, String),
}

/// Owns the session's graphs and is the only place they change.
pub struct Dashboard {
    graphs: GraphCollection,
    defaults: GraphDefaults,
}

impl Dashboard {
    /// A dashboard holding the primary graph only.
    pub fn new(defaults: GraphDefaults) -> Self {
        let graphs = GraphCollection::from_graphs(vec![Graph::primary(&defaults)]);
        Self { graphs, defaults }
    }

    pub fn graphs(&self) -> &GraphCollection {
        &self.graphs
    }

    pub fn graph(&self, id: GraphId) -> Option<&Arc<Graph>> {
        self.graphs.get(id)
    }

    /// Whether the UI offers deletion for this graph.
    pub fn can_delete(&self, id: GraphId) -> bool {
        id != PRIMARY_GRAPH_ID && self.graphs.get(id).is_some()
    }

    /// Applies `event` and reports whether any graph changed.
    pub fn dispatch(&mut self, event: GraphEvent) -> bool {
        log::debug!("dispatch {:?}", event);

        let next = match event {
            GraphEvent::Add => {
                let (next, id) = self.graphs.add(&self.defaults);
                log::info!("added graph {}", id);
                next
            }
            GraphEvent::Delete(id) => {
                if id == PRIMARY_GRAPH_ID {
                    log::warn!("graph {} cannot be deleted", id);
                    return false;
                }
                self.graphs.delete(id)
            }
            GraphEvent::Update(id, update) => {
                if self.graphs.get(id).is_none() {
                    log::debug!("no graph {}, {} update ignored", id, update.field());
                }
                self.graphs.update(id, update)
            }
            GraphEvent::RecordCount(id, value) => {
                let Some(graph) = self.graphs.get(id) else {
                    log::debug!("no graph {}, count ignored", id);
                    return false;
                };
                if !graph.has_selected_week() {
                    log::debug!("graph {} has no selected week, count '{}' dropped", id, value);
                }
                let week = graph.selected_week.clone();
                self.graphs.record_count(id, &value, &week)
            }
        };

        let changed = !same_graphs(&next, &self.graphs) && next != self.graphs;
        self.graphs = next;
        changed
    }

    /// Render requests for every graph, in collection order.
    pub fn views(&self) -> Vec<ChartView> {
        self.graphs.iter().map(|g| ChartView::from_graph(g)).collect()
    }

    /// The week picker entries for a graph. Empty for unknown ids.
    pub fn week_options(&self, id: GraphId, date_format: &str) -> Vec<WeekOption> {
        self.graphs
            .get(id)
            .map(|g| week_options_with_format(&g.start_date, date_format))
            .unwrap_or_default()
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(GraphDefaults::default())
    }
}

// Stored NaN values compare unequal to themselves, so shared graphs are
// checked by pointer before falling back to value equality.
fn same_graphs(a: &GraphCollection, b: &GraphCollection) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| Arc::ptr_eq(x, y))
}
