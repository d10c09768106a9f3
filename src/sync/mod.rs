//! Keeping the list, graph and timeline in step.
//!
//! Everything here is plain state with no DOM access: views feed events in
//! and apply the [`ViewCommand`]s that come out.

mod explorer;
/// Page window over the report list.
pub mod pagination;
/// Selection state machine.
pub mod selection;

pub use explorer::Explorer;
pub use pagination::{DEFAULT_PAGE_SIZE, Pagination};
pub use selection::{Origin, ScrollAttempt, ScrollTicket, Selection, SelectionCoordinator, ViewCommand};
