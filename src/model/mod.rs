//! Result data and its projections: the correlation graph, report colors and
//! the timeline.

/// Title-derived report colors.
pub mod color;
/// Correlation graph.
pub mod graph;
/// Reports and payload decoding.
pub mod report;
/// Chronological projection.
pub mod timeline;

pub use color::color_of;
pub use graph::{Graph, GraphEdge, GraphNode};
pub use report::{Report, ReportId, SearchResult, decode_result};
pub use timeline::TimelineEntry;
