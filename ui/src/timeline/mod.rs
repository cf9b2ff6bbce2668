//! Report history: the dated store, its server sync, the list and the chart.

mod store;
pub use store::{Timeline, TimelineEntry};

mod sync;
pub use sync::{LoadOutcome, PersistJob, TimelineLoad};

mod list;
pub use list::{timeline_rows, TimelineList, TimelineRow};

pub mod chart;
pub use chart::TrendChart;
