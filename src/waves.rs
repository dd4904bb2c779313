use std::collections::BTreeSet;
use std::time::Duration;

use crate::palette::Palette;

/// Virtual pixels covered by one terminal cell
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;
/// Canvas is this much shorter than the viewport
pub const VIEWPORT_INSET_PX: f64 = 4.0;

const MIN_BAND_HEIGHT_PX: f64 = 300.0;
const BAND_HEIGHT_RATIO: f64 = 0.4;
const BOTTOM_DAMPING: f64 = 0.65;

/// `(position, alpha)` stops of each band's vertical gradient
pub const GRADIENT_STOPS: [(f64, f64); 3] = [
    (0.0, 255.0 / 255.0),
    (0.45, 232.0 / 255.0),
    (1.0, 80.0 / 255.0),
];

/// One animated band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveLayer {
    /// Top edge baseline as a fraction of viewport height
    pub baseline: f64,
    /// Radians per pixel along x
    pub wavelength: f64,
    pub amplitude: f64,
    /// Radians per second
    pub frequency: f64,
}

impl WaveLayer {
    pub const fn new(baseline: f64, wavelength: f64, amplitude: f64, frequency: f64) -> Self {
        Self {
            baseline,
            wavelength,
            amplitude,
            frequency,
        }
    }

    fn edge(&self, baseline_y: f64, amplitude: f64, x: f64, t: f64) -> f64 {
        baseline_y - (x * self.wavelength + t * self.frequency).sin() * amplitude
    }

    pub fn top_baseline(&self, viewport: Viewport) -> f64 {
        self.baseline * viewport.height
    }

    pub fn bottom_baseline(&self, viewport: Viewport) -> f64 {
        self.top_baseline(viewport) + band_height(viewport.height)
    }

    pub fn top_y(&self, viewport: Viewport, x: f64, t: f64) -> f64 {
        self.edge(self.top_baseline(viewport), self.amplitude, x, t)
    }

    pub fn bottom_y(&self, viewport: Viewport, x: f64, t: f64) -> f64 {
        self.edge(
            self.bottom_baseline(viewport),
            self.amplitude * BOTTOM_DAMPING,
            x,
            t,
        )
    }

    pub fn contains(&self, viewport: Viewport, x: f64, y: f64, t: f64) -> bool {
        y >= self.top_y(viewport, x, t) && y <= self.bottom_y(viewport, x, t)
    }

    /// Fill opacity at height `y`; the gradient runs from the top of the
    /// canvas down to this band's bottom baseline.
    pub fn alpha_at(&self, viewport: Viewport, y: f64) -> f64 {
        let span = self.bottom_baseline(viewport);
        if span <= 0.0 {
            return GRADIENT_STOPS[0].1;
        }
        gradient_alpha(y / span)
    }
}

pub const DEFAULT_LAYERS: [WaveLayer; 3] = [
    WaveLayer::new(0.1, 0.01, 45.0, 0.5),
    WaveLayer::new(0.4, 0.01, 42.0, 1.0),
    WaveLayer::new(0.7, 0.01, 39.0, 1.5),
];

pub fn band_height(viewport_height: f64) -> f64 {
    (viewport_height * BAND_HEIGHT_RATIO).max(MIN_BAND_HEIGHT_PX)
}

/// Piecewise-linear alpha over `GRADIENT_STOPS`, clamped at both ends
pub fn gradient_alpha(position: f64) -> f64 {
    let position = position.clamp(0.0, 1.0);
    for pair in GRADIENT_STOPS.windows(2) {
        let (p0, a0) = pair[0];
        let (p1, a1) = pair[1];
        if position <= p1 {
            let f = (position - p0) / (p1 - p0);
            return a0 + (a1 - a0) * f;
        }
    }
    GRADIENT_STOPS[GRADIENT_STOPS.len() - 1].1
}

pub fn blend(under: (u8, u8, u8), over: (u8, u8, u8), alpha: f64) -> (u8, u8, u8) {
    let mix = |u: u8, o: u8| (o as f64 * alpha + u as f64 * (1.0 - alpha)).round() as u8;
    (mix(under.0, over.0), mix(under.1, over.1), mix(under.2, over.2))
}

/// Canvas size in virtual pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Canvas for a terminal of `cols` x `rows` cells, minus the inset
    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self {
            width: cols as f64 * CELL_WIDTH_PX,
            height: (rows as f64 * CELL_HEIGHT_PX - VIEWPORT_INSET_PX).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(pub u64);

/// Hands out frame callbacks and tracks which are still pending
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: BTreeSet<FrameId>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.pending.insert(id);
        id
    }

    /// Returns whether `id` was still pending
    pub fn cancel(&mut self, id: FrameId) -> bool {
        self.pending.remove(&id)
    }

    /// Consume a pending frame so it fires exactly once
    pub fn take(&mut self, id: FrameId) -> bool {
        self.pending.remove(&id)
    }

    pub fn pending(&self) -> Vec<FrameId> {
        self.pending.iter().copied().collect()
    }
}

/// Animation loop over a set of wave layers. The clock is injected on every
/// call so frames can be driven deterministically.
#[derive(Debug)]
pub struct WaveRenderer {
    layers: Vec<WaveLayer>,
    palette: Palette,
    viewport: Viewport,
    scheduler: FrameScheduler,
    frame: Option<FrameId>,
    started_at: Duration,
    elapsed: f64,
}

impl WaveRenderer {
    pub fn new(palette: Palette, viewport: Viewport) -> Self {
        Self::with_layers(DEFAULT_LAYERS.to_vec(), palette, viewport)
    }

    pub fn with_layers(layers: Vec<WaveLayer>, palette: Palette, viewport: Viewport) -> Self {
        Self {
            layers,
            palette,
            viewport,
            scheduler: FrameScheduler::new(),
            frame: None,
            started_at: Duration::ZERO,
            elapsed: 0.0,
        }
    }

    /// Begin (or restart) the loop with its clock at zero
    pub fn start(&mut self, now: Duration) -> FrameId {
        self.stop();
        self.started_at = now;
        self.elapsed = 0.0;
        let id = self.scheduler.request();
        self.frame = Some(id);
        id
    }

    /// Cancel the pending frame; calling it again is a no-op
    pub fn stop(&mut self) {
        if let Some(id) = self.frame.take() {
            self.scheduler.cancel(id);
            tracing::trace!(frame = id.0, "cancelled wave frame");
        }
    }

    pub fn set_palette(&mut self, palette: Palette, now: Duration) -> FrameId {
        self.palette = palette;
        self.start(now)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Fire the pending frame and schedule the next one. Returns the phase
    /// time in seconds, or `None` when the loop is stopped.
    pub fn on_frame(&mut self, now: Duration) -> Option<f64> {
        let id = self.frame?;
        if !self.scheduler.take(id) {
            self.frame = None;
            return None;
        }
        self.elapsed = now.saturating_sub(self.started_at).as_secs_f64();
        self.frame = Some(self.scheduler.request());
        Some(self.elapsed)
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed
    }

    pub fn frame(&self) -> Option<FrameId> {
        self.frame
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn layers(&self) -> &[WaveLayer] {
        &self.layers
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Composite every layer over `background` at pixel `(x, y)`
    pub fn sample(&self, x: f64, y: f64, background: (u8, u8, u8)) -> (u8, u8, u8) {
        let t = self.elapsed;
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, layer)| layer.contains(self.viewport, x, y, t))
            .fold(background, |under, (i, layer)| {
                blend(under, self.palette.rgb(i), layer.alpha_at(self.viewport, y))
            })
    }
}

impl Drop for WaveRenderer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(colors: &[&str]) -> Palette {
        Palette {
            name: "test".into(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn renderer() -> WaveRenderer {
        WaveRenderer::new(
            palette(&["#ff0000", "#00ff00", "#0000ff"]),
            Viewport::new(800.0, 1000.0),
        )
    }

    #[test]
    fn test_band_height_has_minimum() {
        assert_eq!(band_height(100.0), 300.0);
        assert_eq!(band_height(1000.0), 400.0);
    }

    #[test]
    fn test_edges_at_time_zero() {
        let vp = Viewport::new(800.0, 1000.0);
        let layer = DEFAULT_LAYERS[0];
        assert!((layer.top_y(vp, 0.0, 0.0) - 100.0).abs() < 1e-9);
        assert!((layer.bottom_y(vp, 0.0, 0.0) - 500.0).abs() < 1e-9);

        // quarter period: sin = 1, the top rises by the full amplitude
        let x = std::f64::consts::FRAC_PI_2 / layer.wavelength;
        assert!((layer.top_y(vp, x, 0.0) - 55.0).abs() < 1e-9);
        assert!((layer.bottom_y(vp, x, 0.0) - (500.0 - 45.0 * 0.65)).abs() < 1e-9);
    }

    #[test]
    fn test_edges_move_with_time() {
        let vp = Viewport::new(800.0, 1000.0);
        let layer = DEFAULT_LAYERS[1];
        assert_ne!(layer.top_y(vp, 10.0, 0.0), layer.top_y(vp, 10.0, 1.0));
    }

    #[test]
    fn test_gradient_stops() {
        assert!((gradient_alpha(0.0) - 1.0).abs() < 1e-9);
        assert!((gradient_alpha(0.45) - 232.0 / 255.0).abs() < 1e-9);
        assert!((gradient_alpha(1.0) - 80.0 / 255.0).abs() < 1e-9);
        assert!((gradient_alpha(2.0) - 80.0 / 255.0).abs() < 1e-9);
        assert!((gradient_alpha(-1.0) - 1.0).abs() < 1e-9);
        let mid = gradient_alpha(0.7);
        assert!(mid < 232.0 / 255.0 && mid > 80.0 / 255.0);
    }

    #[test]
    fn test_blend() {
        assert_eq!(blend((0, 0, 0), (255, 255, 255), 1.0), (255, 255, 255));
        assert_eq!(blend((0, 0, 0), (255, 255, 255), 0.0), (0, 0, 0));
        assert_eq!(blend((0, 0, 0), (200, 100, 0), 0.5), (100, 50, 0));
    }

    #[test]
    fn test_viewport_from_cells_applies_inset() {
        let vp = Viewport::from_cells(80, 24);
        assert_eq!(vp.width, 640.0);
        assert_eq!(vp.height, 24.0 * 16.0 - 4.0);
        assert_eq!(Viewport::from_cells(0, 0).height, 0.0);
    }

    #[test]
    fn test_sample_outside_every_band_is_background() {
        let r = renderer();
        assert_eq!(r.sample(0.0, 0.0, (1, 2, 3)), (1, 2, 3));
    }

    #[test]
    fn test_sample_inside_first_band_uses_first_colour() {
        let r = renderer();
        // layer 0 spans 100..500 at x = 0; layer 1 starts at 400
        let (red, green, blue) = r.sample(0.0, 200.0, (0, 0, 0));
        assert!(red > 200);
        assert_eq!((green, blue), (0, 0));
    }

    #[test]
    fn test_later_layers_draw_over_earlier() {
        let r = renderer();
        let (red, green, _) = r.sample(0.0, 450.0, (0, 0, 0));
        assert!(green > red, "layer 1 should dominate the overlap");
    }

    #[test]
    fn test_short_palette_cycles_colours() {
        let r = WaveRenderer::new(palette(&["#00ff00"]), Viewport::new(800.0, 1000.0));
        // layer 2 spans 700..1100, well clear of the others at y = 900
        let (red, green, blue) = r.sample(0.0, 900.0, (0, 0, 0));
        assert_eq!((red, blue), (0, 0));
        assert!(green > 0);
    }

    #[test]
    fn test_frames_advance_clock_and_reschedule() {
        let mut r = renderer();
        assert_eq!(r.on_frame(Duration::from_secs(1)), None);

        let first = r.start(Duration::from_secs(10));
        let t = r.on_frame(Duration::from_millis(10_500));
        assert_eq!(t, Some(0.5));
        let next = r.frame().unwrap();
        assert!(next > first);
        assert_eq!(r.scheduler().pending(), vec![next]);

        assert_eq!(r.on_frame(Duration::from_secs(12)), Some(2.0));
        assert_eq!(r.scheduler().pending().len(), 1);
    }

    #[test]
    fn test_palette_change_cancels_before_rescheduling() {
        let mut r = renderer();
        let old = r.start(Duration::ZERO);
        r.on_frame(Duration::from_secs(3));
        let pending_before = r.frame().unwrap();
        assert_ne!(old, pending_before);

        let new = r.set_palette(palette(&["#ffffff"]), Duration::from_secs(3));
        assert_eq!(r.scheduler().pending(), vec![new]);
        assert!(!r.scheduler().pending().contains(&pending_before));
        assert_eq!(r.elapsed_secs(), 0.0);
        assert_eq!(r.on_frame(Duration::from_secs(4)), Some(1.0));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut r = renderer();
        r.start(Duration::ZERO);
        r.stop();
        r.stop();
        assert_eq!(r.frame(), None);
        assert!(r.scheduler().pending().is_empty());
        assert_eq!(r.on_frame(Duration::from_secs(1)), None);
    }

    #[test]
    fn test_resize_changes_geometry() {
        let mut r = renderer();
        r.resize(Viewport::new(800.0, 2000.0));
        assert_eq!(r.viewport().height, 2000.0);
        assert!((r.layers()[0].top_baseline(r.viewport()) - 200.0).abs() < 1e-9);
    }
}
