#![forbid(unsafe_code)]

//! Layout + SVG connector rendering for prompt-execution history trees.
//!
//! Two passes, both pure with respect to any live display:
//! - the layout pass ([`layout::layout_history`]) maps history structure to
//!   card positions;
//! - the draw pass ([`renderer::ConnectorRenderer::draw_pass`]) maps positions
//!   to visual primitives on a [`svg::Surface`].

pub mod layout;
pub mod model;
pub mod renderer;
pub mod svg;

pub use layout::layout_history;
pub use model::{Bounds, CardLayout, ConnectorLayout, HistoryLayout, PositionedEntry, SurfaceBox};
pub use renderer::{AttachedRenderer, ConnectorRenderer, ResizeSignal};
pub use svg::{ARROW_MARKER_ID, Surface, SvgRenderOptions, render_history_layout_svg};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid viewport: {message}")]
    InvalidViewport { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
