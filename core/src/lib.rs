pub mod config;
pub mod input;
pub mod model;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::{config_dir, Config};
pub use input::{coerce_number, expand_key, parse_args, ParsedInput};
pub use model::{parse_week_key, ChartPoint, Graph, GraphDefaults, GraphField, GraphId, GraphUpdate, WeekOption};
pub use service::dto::ChartView;
pub use service::graph_service::GraphCollection;
pub use service::projector::{week_options, week_options_with_format, weekly_data, WeekGrid};
pub use time::{parse_human_date, parse_start_date};
pub use usecase::dashboard::{Dashboard, GraphEvent};
