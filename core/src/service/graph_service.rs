use std::sync::Arc;

use crate::input::coerce_number;
use crate::model::graph::{Graph, GraphDefaults, GraphId};
use crate::model::update::GraphUpdate;

/// Ordered, persistent list of graphs.
///
/// Every operation leaves `self` untouched and returns the next collection.
/// Graphs an operation does not touch are shared with the previous value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphCollection {
    graphs: Vec<Arc<Graph>>,
}

impl GraphCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_graphs(graphs: Vec<Graph>) -> Self {
        Self {
            graphs: graphs.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Graph>> {
        self.graphs.iter()
    }

    pub fn get(&self, id: GraphId) -> Option<&Arc<Graph>> {
        self.graphs.iter().find(|g| g.id == id)
    }

    pub fn position(&self, id: GraphId) -> Option<usize> {
        self.graphs.iter().position(|g| g.id == id)
    }

    pub fn ids(&self) -> Vec<GraphId> {
        self.graphs.iter().map(|g| g.id).collect()
    }

    /// Id the next added graph receives: one above the current maximum.
    pub fn next_id(&self) -> GraphId {
        self.graphs
            .iter()
            .map(|g| g.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    pub fn add(&self, defaults: &GraphDefaults) -> (Self, GraphId) {
        let id = self.next_id();
        let mut graphs = self.graphs.clone();
        graphs.push(Arc::new(Graph::numbered(id, defaults)));
        (Self { graphs }, id)
    }

    /// Removes the graph with `id`. Unknown ids leave the collection as is.
    pub fn delete(&self, id: GraphId) -> Self {
        Self {
            graphs: self
                .graphs
                .iter()
                .filter(|g| g.id != id)
                .cloned()
                .collect(),
        }
    }

    /// Replaces one field on the graph with `id`. Unknown ids are a no-op.
    pub fn update(&self, id: GraphId, update: GraphUpdate) -> Self {
        self.replace_with(id, |graph| update.apply(graph))
    }

    /// Stores `value` for `selected_week` and remembers it as the typed count.
    ///
    /// With no week selected nothing changes, not even `count`: the typed
    /// value is dropped.
    pub fn record_count(&self, id: GraphId, value: &str, selected_week: &str) -> Self {
        if selected_week.is_empty() {
            return self.clone();
        }
        self.replace_with(id, |graph| {
            let mut next = graph.clone();
            let mut values = (*graph.weekly_values).clone();
            values.insert(selected_week.to_string(), coerce_number(value));
            next.weekly_values = Arc::new(values);
            next.count = value.to_string();
            next
        })
    }

    fn replace_with<F>(&self, id: GraphId, f: F) -> Self
    where
        F: FnOnce(&Graph) -> Graph,
    {
        let Some(index) = self.position(id) else {
            return self.clone();
        };
        let mut graphs = self.graphs.clone();
        graphs[index] = Arc::new(f(&self.graphs[index]));
        Self { graphs }
    }
}

impl<'a> IntoIterator for &'a GraphCollection {
    type Item = &'a Arc<Graph>;
    type IntoIter = std::slice::Iter<'a, Arc<Graph>>;

    fn into_iter(self) -> Self::IntoIter {
        self.graphs.iter()
    }
}
