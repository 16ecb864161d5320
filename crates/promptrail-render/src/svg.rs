use crate::Result;
use crate::model::{ConnectorLayout, HistoryLayout, SurfaceBox};
use std::fmt::Write as _;

/// Fixed id of the reusable arrowhead marker. Every curve references it via
/// `marker-end`; the defs node holds at most one definition.
pub const ARROW_MARKER_ID: &str = "history-arrow-head";

const CONNECTOR_STROKE: &str = "#555";
const CONNECTOR_STROKE_WIDTH: &str = "1.2";
const MARKER_SHAPE: &str = "M0,0 L6,3 L0,6 Z";

#[derive(Debug, Clone, Default)]
pub struct SvgRenderOptions {
    /// Root `<svg id="...">` value; also prefixes internal marker ids so
    /// multiple surfaces can live in one document.
    pub surface_id: Option<String>,
}

/// Arrowhead definition held in the surface's defs node.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowMarker {
    pub id: String,
}

/// One drawn connector.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorPath {
    pub d: String,
    pub marker_id: String,
}

/// The drawing surface: an overlay sized to exactly cover the history
/// container. A draw pass clears it, re-sizes it, re-ensures the marker and
/// appends one path per connector; nothing else ever writes to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    width: f64,
    height: f64,
    defs: Vec<ArrowMarker>,
    paths: Vec<ConnectorPath>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all drawn children, including the defs node. The marker must be
    /// re-ensured before the next curve is appended.
    pub fn clear(&mut self) {
        self.defs.clear();
        self.paths.clear();
    }

    /// Sizes the surface to the container's current bounding box. Must run
    /// once per draw pass before any curve, since curve coordinates are
    /// relative to this box's top edge.
    pub fn set_dimensions(&mut self, container: SurfaceBox) {
        self.width = container.width.max(0.0);
        self.height = container.height.max(0.0);
    }

    /// Inserts the arrowhead marker unless one with the fixed id is already
    /// present. Idempotent.
    pub fn ensure_arrow_marker(&mut self) {
        if self.defs.iter().any(|m| m.id == ARROW_MARKER_ID) {
            return;
        }
        self.defs.push(ArrowMarker {
            id: ARROW_MARKER_ID.to_string(),
        });
    }

    pub fn append_connector(&mut self, connector: &ConnectorLayout) {
        self.paths.push(ConnectorPath {
            d: connector.d.clone(),
            marker_id: ARROW_MARKER_ID.to_string(),
        });
    }

    pub fn marker_count(&self) -> usize {
        self.defs.len()
    }

    pub fn connector_count(&self) -> usize {
        self.paths.len()
    }

    pub fn paths(&self) -> &[ConnectorPath] {
        &self.paths
    }

    pub fn to_svg_string(&self, options: &SvgRenderOptions) -> String {
        let surface_id = options.surface_id.as_deref().unwrap_or("promptrail");
        let surface_id_esc = escape_attr(surface_id);

        let mut out = String::new();
        let _ = write!(
            &mut out,
            r#"<svg id="{surface_id_esc}" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" role="graphics-document document" aria-roledescription="promptHistory">"#,
            w = fmt(self.width),
            h = fmt(self.height),
        );

        if !self.defs.is_empty() {
            out.push_str("<defs>");
            for marker in &self.defs {
                let _ = write!(
                    &mut out,
                    r##"<marker id="{id}" markerWidth="6" markerHeight="6" refX="5" refY="3" orient="auto"><path d="{shape}" fill="{fill}"/></marker>"##,
                    id = escape_attr(&scoped_marker_id(surface_id, &marker.id)),
                    shape = MARKER_SHAPE,
                    fill = CONNECTOR_STROKE,
                );
            }
            out.push_str("</defs>");
        }

        out.push_str(r#"<g class="history-connectors">"#);
        for path in &self.paths {
            let _ = write!(
                &mut out,
                r##"<path d="{d}" fill="none" stroke="{stroke}" stroke-width="{width}" marker-end="url(#{marker})"/>"##,
                d = escape_attr(&path.d),
                stroke = CONNECTOR_STROKE,
                width = CONNECTOR_STROKE_WIDTH,
                marker = escape_attr(&scoped_marker_id(surface_id, &path.marker_id)),
            );
        }
        out.push_str("</g>");
        out.push_str("</svg>");
        out
    }
}

/// Renders a layout in one shot: fresh surface, full draw pass, SVG string.
pub fn render_history_layout_svg(
    layout: &HistoryLayout,
    options: &SvgRenderOptions,
) -> Result<String> {
    let mut surface = Surface::new();
    surface.clear();
    surface.set_dimensions(layout.surface);
    surface.ensure_arrow_marker();
    for connector in &layout.connectors {
        surface.append_connector(connector);
    }
    Ok(surface.to_svg_string(options))
}

fn scoped_marker_id(surface_id: &str, marker_id: &str) -> String {
    format!("{surface_id}-{marker_id}")
}

/// JS `Number#toString()` stringification, as the original canvas writes path
/// numbers through template literals.
pub(crate) fn fmt_js(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let v = if v == 0.0 { 0.0 } else { v };
    let mut buf = ryu_js::Buffer::new();
    buf.format_finite(v).to_string()
}

fn fmt(v: f64) -> String {
    // Round-trippable decimal form, avoiding `-0` and tiny float noise from
    // our own calculations.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}
