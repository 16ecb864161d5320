use crate::model::{
    Bounds, CardLayout, ConnectorLayout, HistoryLayout, PositionedEntry, SurfaceBox,
};
use crate::svg::fmt_js;
use crate::{Error, Result};
use promptrail_core::geom::vertical_center;
use promptrail_core::{EntryIndex, HistoryConfig, HistoryEntry};

/// Vertical-center gap below which no connector is drawn; cards that close are
/// visually adjacent already. Override: `history.adjacencyThreshold`.
pub const DEFAULT_ADJACENCY_THRESHOLD: f64 = 80.0;
/// Horizontal offset of connector endpoints from the surface's left edge.
/// Override: `history.startX`.
pub const DEFAULT_START_X: f64 = 32.0;
/// How far left of `startX` the control points sit, bowing the curve outward.
/// Override: `history.curveOffset`.
pub const DEFAULT_CURVE_OFFSET: f64 = 40.0;
/// Stacked card height used by the layout pass. Override: `history.cardHeight`.
pub const DEFAULT_CARD_HEIGHT: f64 = 96.0;
/// Vertical gap between stacked cards. Override: `history.cardGap`.
pub const DEFAULT_CARD_GAP: f64 = 16.0;

const CARD_INSET: f64 = 16.0;

/// Layout pass: structure → positions.
///
/// Stacks one card per entry vertically inside the viewport-wide container and
/// computes the child→parent connectors for the resulting geometry. Hosts with
/// real measured card rects can skip this and call [`compute_connectors`]
/// directly.
pub fn layout_history(
    entries: &[HistoryEntry],
    active_id: Option<&str>,
    viewport: SurfaceBox,
    config: &HistoryConfig,
) -> Result<HistoryLayout> {
    if !(viewport.width.is_finite() && viewport.height.is_finite() && viewport.top.is_finite()) {
        return Err(Error::InvalidViewport {
            message: "viewport dimensions must be finite".to_string(),
        });
    }
    if viewport.width <= 0.0 {
        return Err(Error::InvalidViewport {
            message: format!("viewport width must be positive, got {}", viewport.width),
        });
    }

    let card_height = config
        .get_f64("history.cardHeight")
        .unwrap_or(DEFAULT_CARD_HEIGHT)
        .max(1.0);
    let card_gap = config
        .get_f64("history.cardGap")
        .unwrap_or(DEFAULT_CARD_GAP)
        .max(0.0);
    let start_x = config.get_f64("history.startX").unwrap_or(DEFAULT_START_X);
    let card_x = start_x + CARD_INSET;
    let card_width = config
        .get_f64("history.cardWidth")
        .unwrap_or(viewport.width - card_x - CARD_INSET)
        .max(1.0);

    let mut cards: Vec<CardLayout> = Vec::with_capacity(entries.len());
    let mut y = viewport.top + CARD_INSET;
    for entry in entries {
        cards.push(CardLayout {
            id: entry.id.clone(),
            parent_id: entry.parent_id.clone(),
            x: card_x,
            y,
            width: card_width,
            height: card_height,
            active: active_id.is_some_and(|active| active == entry.id && !entry.id.trim().is_empty()),
        });
        y += card_height + card_gap;
    }

    let content_height = if cards.is_empty() {
        CARD_INSET * 2.0
    } else {
        y - card_gap + CARD_INSET - viewport.top
    };
    let surface = SurfaceBox::new(
        viewport.width,
        content_height.max(viewport.height),
        viewport.top,
    );

    let positioned: Vec<PositionedEntry> = cards
        .iter()
        .zip(entries)
        .map(|(card, entry)| PositionedEntry::new(entry.clone(), card.rect()))
        .collect();
    let connectors = compute_connectors(&positioned, surface, config);
    let bounds = bounds_from_cards_and_connectors(&cards, &connectors);

    Ok(HistoryLayout {
        surface,
        bounds,
        cards,
        connectors,
    })
}

/// Connector geometry for the current set of positioned entries: exactly one
/// curve per (child, resolvable parent) pair whose vertical gap reaches the
/// adjacency threshold. Recomputed fresh on every draw pass.
pub fn compute_connectors(
    entries: &[PositionedEntry],
    surface: SurfaceBox,
    config: &HistoryConfig,
) -> Vec<ConnectorLayout> {
    let index = EntryIndex::build(entries.iter().map(|e| e.entry.id.as_str()));
    let threshold = config
        .get_f64("history.adjacencyThreshold")
        .unwrap_or(DEFAULT_ADJACENCY_THRESHOLD);
    let start_x = config.get_f64("history.startX").unwrap_or(DEFAULT_START_X);
    let curve_offset = config
        .get_f64("history.curveOffset")
        .unwrap_or(DEFAULT_CURVE_OFFSET);

    let mut connectors = Vec::new();
    for child in entries {
        let Some(parent_id) = child.entry.parent_id.as_deref() else {
            continue;
        };
        let Some(parent_position) = index.get(parent_id) else {
            // The parent may legitimately not be rendered (pagination, filtering).
            tracing::debug!(child = %child.entry.id, parent = %parent_id, "skipping dangling parent reference");
            continue;
        };
        let parent = &entries[parent_position];

        let start_y = vertical_center(&parent.rect, surface.top);
        let end_y = vertical_center(&child.rect, surface.top);
        if (end_y - start_y).abs() < threshold {
            continue;
        }

        connectors.push(curved_connector(
            &child.entry.id,
            parent_id,
            start_x,
            curve_offset,
            start_y,
            end_y,
        ));
    }
    connectors
}

/// Cubic curve from the parent's vertical center to the child's, bowing left
/// of the endpoints so it reads as a branch rather than the container edge.
fn curved_connector(
    child_id: &str,
    parent_id: &str,
    start_x: f64,
    curve_offset: f64,
    start_y: f64,
    end_y: f64,
) -> ConnectorLayout {
    let curve_x = start_x - curve_offset;
    let d = format!(
        "M {} {} C {} {}, {} {}, {} {}",
        fmt_js(start_x),
        fmt_js(start_y),
        fmt_js(curve_x),
        fmt_js(start_y),
        fmt_js(curve_x),
        fmt_js(end_y),
        fmt_js(start_x),
        fmt_js(end_y),
    );
    ConnectorLayout {
        child_id: child_id.to_string(),
        parent_id: parent_id.to_string(),
        start: (start_x, start_y),
        end: (start_x, end_y),
        control1: (curve_x, start_y),
        control2: (curve_x, end_y),
        d,
    }
}

fn bounds_from_cards_and_connectors(
    cards: &[CardLayout],
    connectors: &[ConnectorLayout],
) -> Option<Bounds> {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    let mut any = false;
    for card in cards {
        any = true;
        min_x = min_x.min(card.x);
        min_y = min_y.min(card.y);
        max_x = max_x.max(card.x + card.width);
        max_y = max_y.max(card.y + card.height);
    }
    for connector in connectors {
        any = true;
        for (x, y) in [
            connector.start,
            connector.end,
            connector.control1,
            connector.control2,
        ] {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if any {
        Some(Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    } else {
        None
    }
}
