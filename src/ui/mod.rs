//! Host viewport interfaces.
//!
//! The engine never owns a screen. Whatever displays the document (a
//! browser, a GUI toolkit, a terminal) exposes its scrollable regions and
//! rendered heading anchors through these traits:
//! - [`ScrollPane`]: scroll position and extents of one scrollable region
//! - [`AnchorGeometry`]: where rendered heading anchors sit on screen
//! - [`viewport`]: a headless implementation of both

pub mod viewport;

pub use viewport::Viewport;

/// How a programmatic scroll should move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Interpolate where the host supports it.
    #[default]
    Smooth,
    /// Jump immediately.
    Instant,
}

/// One independently scrollable region.
///
/// All values are in host units (usually CSS pixels).
pub trait ScrollPane {
    /// Distance scrolled from the top of the content.
    fn scroll_top(&self) -> f64;

    /// Total content height.
    fn scroll_height(&self) -> f64;

    /// Visible height.
    fn client_height(&self) -> f64;

    /// Scroll to `top`. Hosts clamp out-of-range values.
    fn set_scroll_top(&mut self, top: f64, behavior: ScrollBehavior);
}

/// Geometry of rendered heading anchors.
pub trait AnchorGeometry {
    /// Top of the element carrying `id`, relative to the top of the
    /// viewport (negative once scrolled past). `None` when no such element
    /// is in the document.
    fn anchor_top(&self, id: &str) -> Option<f64>;

    /// Bring the element carrying `id` fully into view. Returns `false`
    /// when no such element exists.
    fn scroll_anchor_into_view(&mut self, id: &str, behavior: ScrollBehavior) -> bool;
}
