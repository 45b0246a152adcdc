pub mod graph;
pub mod update;
pub mod week;

pub use graph::{Graph, GraphDefaults, GraphId, PRIMARY_GRAPH_ID};
pub use update::{GraphField, GraphUpdate};
pub use week::{parse_week_key, week_key, ChartPoint, WeekOption, WeekSlot};
