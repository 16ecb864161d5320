#![forbid(unsafe_code)]

//! `promptrail` tracks a linear-with-branches history of prompt executions and
//! renders it, headlessly, as a vertical stack of cards joined by curved
//! child→parent connectors.
//!
//! # Features
//!
//! - `render`: enable layout + SVG connector rendering (`promptrail::render`)

pub use promptrail_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use promptrail_render::model::{
        Bounds, CardLayout, ConnectorLayout, HistoryLayout, PositionedEntry, SurfaceBox,
    };
    pub use promptrail_render::renderer::{AttachedRenderer, ConnectorRenderer, ResizeSignal};
    pub use promptrail_render::svg::{ARROW_MARKER_ID, Surface, SvgRenderOptions};
    pub use promptrail_render::{layout_history, render_history_layout_svg};

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Core(#[from] promptrail_core::Error),
        #[error(transparent)]
        Render(#[from] promptrail_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token, so
    /// multiple history surfaces can be inlined in the same UI tree without
    /// their internal marker ids colliding.
    ///
    /// - trims whitespace
    /// - replaces unsupported characters with `-`
    /// - ensures the id starts with an ASCII letter by prefixing `h-` when needed
    pub fn sanitize_surface_id(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return "h-untitled".to_string();
        }

        let mut out = String::with_capacity(raw.len() + 4);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == ':' || ch == '.';
            out.push(if ok { ch } else { '-' });
        }

        let starts_ok = out.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
        if !starts_ok {
            out.insert_str(0, "h-");
        }

        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() || out == "h" {
            return "h-untitled".to_string();
        }
        out.to_string()
    }

    /// Layout pass over a session's entries (executor-free).
    pub fn layout_history_sync(
        session: &promptrail_core::HistorySession,
        viewport: SurfaceBox,
        config: &promptrail_core::HistoryConfig,
    ) -> Result<HistoryLayout> {
        Ok(layout_history(
            session.entries(),
            session.active_id(),
            viewport,
            config,
        )?)
    }

    /// Full pipeline: layout a session and render its connector SVG.
    pub fn render_history_svg(
        session: &promptrail_core::HistorySession,
        viewport: SurfaceBox,
        config: &promptrail_core::HistoryConfig,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let layout = layout_history_sync(session, viewport, config)?;
        Ok(render_history_layout_svg(&layout, svg_options)?)
    }

}
