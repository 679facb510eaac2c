//! Headless viewport.
//!
//! The [`Viewport`] struct models a scrollable region over content of known
//! height, with heading anchors at known offsets. It implements the host
//! traits so the engine can run without a real screen.

use super::{AnchorGeometry, ScrollBehavior, ScrollPane};

/// A scrollable region with optional heading anchors.
///
/// # Example
///
/// ```
/// use markline::ui::{ScrollPane, Viewport};
///
/// let mut vp = Viewport::new(400.0, 1000.0);
/// assert_eq!(vp.max_scroll_top(), 600.0);
///
/// vp.scroll_by(250.0);
/// assert_eq!(vp.scroll_top(), 250.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    client_height: f64,
    scroll_height: f64,
    scroll_top: f64,
    /// Anchor id and its offset from the top of the content
    anchors: Vec<(String, f64)>,
    /// Behavior of the most recent programmatic scroll
    last_behavior: Option<ScrollBehavior>,
    /// Number of programmatic scrolls applied
    programmatic_scrolls: usize,
}

impl Viewport {
    /// Create a new viewport scrolled to the top.
    ///
    /// # Arguments
    ///
    /// * `client_height` - Visible height
    /// * `scroll_height` - Total content height
    pub const fn new(client_height: f64, scroll_height: f64) -> Self {
        Self {
            client_height,
            scroll_height,
            scroll_top: 0.0,
            anchors: Vec::new(),
            last_behavior: None,
            programmatic_scrolls: 0,
        }
    }

    /// Add an anchor at `offset` from the top of the content.
    #[must_use]
    pub fn with_anchor(mut self, id: impl Into<String>, offset: f64) -> Self {
        self.anchors.push((id.into(), offset));
        self
    }

    /// Replace all anchors (e.g. after the preview re-renders).
    pub fn set_anchors(&mut self, anchors: impl IntoIterator<Item = (String, f64)>) {
        self.anchors = anchors.into_iter().collect();
    }

    /// The largest valid scroll position; zero when content fits.
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Scroll fraction in `[0, 1]`; zero when content fits.
    pub fn scroll_ratio(&self) -> f64 {
        crate::sync::scroll_ratio(self)
    }

    /// Scroll by a signed amount, clamped to the content.
    ///
    /// This is a user scroll and does not count as programmatic.
    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_top = self.clamp(self.scroll_top + delta);
    }

    /// Scroll to an absolute position as the user would.
    pub fn user_scroll_to(&mut self, top: f64) {
        self.scroll_top = self.clamp(top);
    }

    pub const fn go_to_top(&mut self) {
        self.scroll_top = 0.0;
    }

    pub fn go_to_bottom(&mut self) {
        self.scroll_top = self.max_scroll_top();
    }

    /// Change the visible height (window resize).
    pub fn resize(&mut self, client_height: f64) {
        self.client_height = client_height;
        self.scroll_top = self.clamp(self.scroll_top);
    }

    /// Change the content height (e.g. after re-render).
    pub fn set_scroll_height(&mut self, scroll_height: f64) {
        self.scroll_height = scroll_height;
        self.scroll_top = self.clamp(self.scroll_top);
    }

    pub const fn last_behavior(&self) -> Option<ScrollBehavior> {
        self.last_behavior
    }

    pub const fn programmatic_scrolls(&self) -> usize {
        self.programmatic_scrolls
    }

    fn clamp(&self, top: f64) -> f64 {
        if top.is_nan() {
            return 0.0;
        }
        top.clamp(0.0, self.max_scroll_top())
    }
}

impl ScrollPane for Viewport {
    fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    fn client_height(&self) -> f64 {
        self.client_height
    }

    fn set_scroll_top(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scroll_top = self.clamp(top);
        self.last_behavior = Some(behavior);
        self.programmatic_scrolls += 1;
    }
}

impl AnchorGeometry for Viewport {
    fn anchor_top(&self, id: &str) -> Option<f64> {
        self.anchors
            .iter()
            .find(|(anchor, _)| anchor == id)
            .map(|(_, offset)| offset - self.scroll_top)
    }

    fn scroll_anchor_into_view(&mut self, id: &str, behavior: ScrollBehavior) -> bool {
        let Some(offset) = self
            .anchors
            .iter()
            .find(|(anchor, _)| anchor == id)
            .map(|(_, offset)| *offset)
        else {
            return false;
        };
        self.set_scroll_top(offset, behavior);
        true
    }
}
