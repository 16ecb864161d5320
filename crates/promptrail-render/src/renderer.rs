use crate::layout::compute_connectors;
use crate::model::{PositionedEntry, SurfaceBox};
use crate::svg::{Surface, SvgRenderOptions};
use promptrail_core::HistoryConfig;
use std::sync::{Arc, Mutex};

/// Viewport-resize signal source.
///
/// Hosts push the current container box into [`ResizeSignal::emit`]; attached
/// renderers run one full draw pass per event, in subscription order. Events
/// are never coalesced here; skipping intermediate redraws would be a
/// non-semantic optimization and is left to hosts.
#[derive(Clone, Default)]
pub struct ResizeSignal {
    inner: Arc<Mutex<SignalInner>>,
}

#[derive(Default)]
struct SignalInner {
    next_token: u64,
    subscribers: Vec<(u64, Box<dyn FnMut(SurfaceBox) + Send>)>,
}

impl ResizeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn subscribe(&self, callback: Box<dyn FnMut(SurfaceBox) + Send>) -> u64 {
        let Ok(mut inner) = self.inner.lock() else {
            return 0;
        };
        inner.next_token += 1;
        let token = inner.next_token;
        inner.subscribers.push((token, callback));
        token
    }

    fn unsubscribe(&self, token: u64) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        inner.subscribers.retain(|(t, _)| *t != token);
    }

    /// Delivers one resize event to every subscriber, in order.
    pub fn emit(&self, viewport: SurfaceBox) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        for (_, callback) in inner.subscribers.iter_mut() {
            callback(viewport);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.subscribers.len()).unwrap_or(0)
    }
}

/// Owns the drawing surface and runs full clear-and-redraw passes over it.
///
/// A renderer built [`without_surface`](Self::without_surface) models the host
/// variant that intentionally omits the connector canvas: every draw pass is
/// skipped silently.
#[derive(Debug, Clone)]
pub struct ConnectorRenderer {
    config: HistoryConfig,
    surface: Option<Surface>,
}

impl ConnectorRenderer {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            config,
            surface: Some(Surface::new()),
        }
    }

    pub fn without_surface(config: HistoryConfig) -> Self {
        Self {
            config,
            surface: None,
        }
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// One full draw pass: clear, rebuild the id index, re-size the surface,
    /// re-ensure the marker, then append one curve per resolvable
    /// child→parent pair. Idempotent for unchanged geometry; its only
    /// observable effect is the replaced set of drawn connectors.
    pub fn draw_pass(&mut self, entries: &[PositionedEntry], container: SurfaceBox) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        surface.clear();
        let connectors = compute_connectors(entries, container, &self.config);
        surface.set_dimensions(container);
        surface.ensure_arrow_marker();
        for connector in &connectors {
            surface.append_connector(connector);
        }
    }

    pub fn svg(&self, options: &SvgRenderOptions) -> Option<String> {
        self.surface.as_ref().map(|s| s.to_svg_string(options))
    }

    /// Attaches the renderer to a resize signal: one draw pass now, then one
    /// per emitted event. `read_entries` is invoked per pass so geometry is
    /// always re-read, mirroring a host whose entry set changes between
    /// passes. The returned guard detaches on drop.
    pub fn attach<F>(
        self,
        signal: &ResizeSignal,
        initial_viewport: SurfaceBox,
        mut read_entries: F,
    ) -> AttachedRenderer
    where
        F: FnMut() -> Vec<PositionedEntry> + Send + 'static,
    {
        let renderer = Arc::new(Mutex::new(self));

        if let Ok(mut r) = renderer.lock() {
            let entries = read_entries();
            r.draw_pass(&entries, initial_viewport);
        }

        let for_events = Arc::clone(&renderer);
        let token = signal.subscribe(Box::new(move |viewport| {
            let entries = read_entries();
            if let Ok(mut r) = for_events.lock() {
                r.draw_pass(&entries, viewport);
            }
        }));

        AttachedRenderer {
            signal: signal.clone(),
            token,
            renderer,
        }
    }
}

/// An attached renderer: subscribed to the viewport-resize signal, redrawing
/// on every event. Dropping it unsubscribes on all exit paths; there is no way
/// back to the attached state, a fresh attachment is a new instance.
pub struct AttachedRenderer {
    signal: ResizeSignal,
    token: u64,
    renderer: Arc<Mutex<ConnectorRenderer>>,
}

impl AttachedRenderer {
    pub fn svg(&self, options: &SvgRenderOptions) -> Option<String> {
        self.renderer.lock().ok().and_then(|r| r.svg(options))
    }

    pub fn connector_count(&self) -> usize {
        self.renderer
            .lock()
            .ok()
            .and_then(|r| r.surface().map(|s| s.connector_count()))
            .unwrap_or(0)
    }

    /// Explicit teardown; equivalent to dropping the guard.
    pub fn detach(self) {}
}

impl Drop for AttachedRenderer {
    fn drop(&mut self) {
        self.signal.unsubscribe(self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptrail_core::HistoryEntry;
    use promptrail_core::geom::rect;

    fn entries_two_cards() -> Vec<PositionedEntry> {
        vec![
            PositionedEntry::new(HistoryEntry::root("a"), rect(48.0, 80.0, 300.0, 40.0)),
            PositionedEntry::new(
                HistoryEntry::child_of("b", "a"),
                rect(48.0, 280.0, 300.0, 40.0),
            ),
        ]
    }

    fn viewport() -> SurfaceBox {
        SurfaceBox::new(400.0, 600.0, 0.0)
    }

    #[test]
    fn draw_pass_replaces_rather_than_accumulates() {
        let mut renderer = ConnectorRenderer::new(HistoryConfig::default());
        let entries = entries_two_cards();

        renderer.draw_pass(&entries, viewport());
        renderer.draw_pass(&entries, viewport());
        renderer.draw_pass(&entries, viewport());

        let surface = renderer.surface().unwrap();
        assert_eq!(surface.connector_count(), 1);
        assert_eq!(surface.marker_count(), 1);
    }

    #[test]
    fn draw_pass_is_idempotent_for_unchanged_geometry() {
        let mut renderer = ConnectorRenderer::new(HistoryConfig::default());
        let entries = entries_two_cards();

        renderer.draw_pass(&entries, viewport());
        let first = renderer.surface().unwrap().clone();
        renderer.draw_pass(&entries, viewport());
        let second = renderer.surface().unwrap().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_surface_skips_the_pass_silently() {
        let mut renderer = ConnectorRenderer::without_surface(HistoryConfig::default());
        renderer.draw_pass(&entries_two_cards(), viewport());
        assert!(renderer.surface().is_none());
        assert_eq!(renderer.svg(&SvgRenderOptions::default()), None);
    }

    #[test]
    fn attach_draws_immediately_and_on_each_resize() {
        let signal = ResizeSignal::new();
        let renderer = ConnectorRenderer::new(HistoryConfig::default());

        let attached = renderer.attach(&signal, viewport(), entries_two_cards);
        assert_eq!(attached.connector_count(), 1);
        assert_eq!(signal.subscriber_count(), 1);

        // A narrower viewport does not change vertical geometry; the pass
        // still runs and still yields exactly one connector.
        signal.emit(SurfaceBox::new(320.0, 600.0, 0.0));
        assert_eq!(attached.connector_count(), 1);
    }

    #[test]
    fn drop_detaches_and_stops_redrawing() {
        let signal = ResizeSignal::new();
        let renderer = ConnectorRenderer::new(HistoryConfig::default());

        let attached = renderer.attach(&signal, viewport(), entries_two_cards);
        assert_eq!(signal.subscriber_count(), 1);

        drop(attached);
        assert_eq!(signal.subscriber_count(), 0);
        // Emitting after detach must not panic.
        signal.emit(viewport());
    }

    #[test]
    fn detached_renderer_never_reattaches_implicitly() {
        let signal = ResizeSignal::new();
        ConnectorRenderer::new(HistoryConfig::default())
            .attach(&signal, viewport(), entries_two_cards)
            .detach();
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn entries_are_reread_on_every_pass() {
        let signal = ResizeSignal::new();
        let renderer = ConnectorRenderer::new(HistoryConfig::default());

        let source = Arc::new(Mutex::new(entries_two_cards()));
        let reader = Arc::clone(&source);
        let attached = renderer.attach(&signal, viewport(), move || {
            reader.lock().map(|e| e.clone()).unwrap_or_default()
        });
        assert_eq!(attached.connector_count(), 1);

        // Remove the parent between passes: the child's reference dangles and
        // the connector disappears on the next redraw.
        if let Ok(mut entries) = source.lock() {
            entries.remove(0);
        }
        signal.emit(viewport());
        assert_eq!(attached.connector_count(), 0);
    }
}
