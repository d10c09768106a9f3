//! Browser views over the explorer: the graph canvas, the report list and
//! the timeline, sharing one [`ExplorerContext`].

/// Shared explorer context and command dispatch.
pub mod context;
/// Correlation graph canvas.
pub mod force_graph;
mod report_list;
mod timeline;

pub use context::ExplorerContext;
pub use force_graph::ForceGraphCanvas;
pub use report_list::ReportList;
pub use timeline::Timeline;
