//! Force-directed correlation graph.
//!
//! Renders the graph of one search result on an HTML canvas with:
//! - A cooling force simulation (links, charge, centering) stepped per frame
//! - Node dragging that pins while held, plus host pins (`pinReport` /
//!   `unpinReport` from JavaScript)
//! - Click-to-select feeding back into the explorer
//! - Pan, zoom, and smooth hover/focus highlights
//!
//! # Example
//!
//! ```ignore
//! use atel_graph::components::{ExplorerContext, ForceGraphCanvas};
//!
//! provide_context(ExplorerContext::new(Default::default()));
//! view! { <ForceGraphCanvas fullscreen=true /> }
//! ```

mod component;
mod forces;
mod render;
/// Layout simulation.
pub mod simulation;
mod state;
/// Visual presets.
pub mod theme;

pub use component::ForceGraphCanvas;
pub use state::PinRequest;
pub use simulation::{PinMode, Simulation, SimulationConfig, Viewport};
pub use theme::Theme;
