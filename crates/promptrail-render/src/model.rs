use promptrail_core::HistoryEntry;
use promptrail_core::geom::{Rect, rect};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Bounding box of the history container, which the drawing surface must
/// exactly cover. `top` is the container's offset from the viewport top; all
/// connector y-coordinates are expressed relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfaceBox {
    pub width: f64,
    pub height: f64,
    pub top: f64,
}

impl SurfaceBox {
    pub fn new(width: f64, height: f64, top: f64) -> Self {
        Self { width, height, top }
    }
}

/// One history entry together with its live bounding rect, as supplied by the
/// host (measured geometry) or by the layout pass (stacked geometry).
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedEntry {
    pub entry: HistoryEntry,
    pub rect: Rect,
}

impl PositionedEntry {
    pub fn new(entry: HistoryEntry, rect: Rect) -> Self {
        Self { entry, rect }
    }
}

/// One laid-out history card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardLayout {
    pub id: String,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub active: bool,
}

impl CardLayout {
    pub fn rect(&self) -> Rect {
        rect(self.x, self.y, self.width, self.height)
    }
}

/// One child→parent connector, computed fresh per draw pass and discarded
/// afterwards. `d` is the final cubic path data; the curve starts at the
/// parent's vertical center and ends at the child's, so an arrowhead on the
/// terminal end points at the child.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorLayout {
    #[serde(rename = "childId")]
    pub child_id: String,
    #[serde(rename = "parentId")]
    pub parent_id: String,
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub control1: (f64, f64),
    pub control2: (f64, f64),
    pub d: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryLayout {
    pub surface: SurfaceBox,
    pub bounds: Option<Bounds>,
    pub cards: Vec<CardLayout>,
    pub connectors: Vec<ConnectorLayout>,
}

impl HistoryLayout {
    /// Cards as positioned entries, for feeding a draw pass directly.
    pub fn positioned_entries(&self) -> Vec<PositionedEntry> {
        self.cards
            .iter()
            .map(|card| {
                PositionedEntry::new(
                    HistoryEntry {
                        id: card.id.clone(),
                        parent_id: card.parent_id.clone(),
                    },
                    card.rect(),
                )
            })
            .collect()
    }
}
