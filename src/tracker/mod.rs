//! Active-heading tracking for the reading view.
//!
//! While a document scrolls, the tracker decides which outline entry is
//! "currently read": the last heading whose anchor has crossed the trigger
//! line near the top of the viewport, or the first heading when none has.
//! A viewport scrolled to the very top always reads the first heading.

use crate::outline::{HeadingRecord, Outline};
use crate::ui::{AnchorGeometry, ScrollPane};

/// Default distance from the viewport top to the reading focus line.
pub const DEFAULT_TRIGGER_OFFSET: f64 = 80.0;

/// Whether the tracker is listening to viewport events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Not mounted, or mounted with an empty outline.
    Idle,
    /// Mounted with at least one heading.
    Tracking,
}

/// Viewport events that can move the active heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    Scroll,
    Resize,
}

/// The heading currently considered in view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveHeading {
    /// Position in the outline
    pub index: usize,
    /// Anchor id of the heading
    pub id: String,
}

/// Tracks the active heading of one mounted view.
#[derive(Debug, Clone)]
pub struct ActiveHeadingTracker {
    trigger_offset: f64,
    mounted: bool,
    outline: Outline,
    active: Option<ActiveHeading>,
}

impl ActiveHeadingTracker {
    pub const fn new(trigger_offset: f64) -> Self {
        Self {
            trigger_offset,
            mounted: false,
            outline: Outline::empty(),
            active: None,
        }
    }

    pub const fn trigger_offset(&self) -> f64 {
        self.trigger_offset
    }

    pub fn state(&self) -> TrackerState {
        if self.mounted && !self.outline.is_empty() {
            TrackerState::Tracking
        } else {
            TrackerState::Idle
        }
    }

    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub const fn outline(&self) -> &Outline {
        &self.outline
    }

    pub const fn active(&self) -> Option<&ActiveHeading> {
        self.active.as_ref()
    }

    /// The active heading's full record.
    pub fn active_heading(&self) -> Option<&HeadingRecord> {
        self.active
            .as_ref()
            .and_then(|active| self.outline.get(active.index))
    }

    /// Attach to a view showing `outline`.
    pub fn mount(&mut self, outline: Outline) {
        self.mounted = true;
        self.set_outline(outline);
    }

    /// Replace the outline after the document changed.
    ///
    /// The active heading is cleared and recomputed on the next event.
    pub fn set_outline(&mut self, outline: Outline) {
        self.outline = outline;
        self.active = None;
        tracing::debug!(
            headings = self.outline.len(),
            state = ?self.state(),
            "tracker outline set"
        );
    }

    /// Detach from the view and drop the outline.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.outline = Outline::empty();
        self.active = None;
        tracing::debug!("tracker unmounted");
    }

    /// Recompute the active heading after a scroll or resize.
    ///
    /// Returns the new active heading only when it changed. Events are
    /// ignored while idle.
    pub fn handle_event(
        &mut self,
        event: ViewportEvent,
        geometry: &(impl ScrollPane + AnchorGeometry),
    ) -> Option<&ActiveHeading> {
        if self.state() == TrackerState::Idle {
            return None;
        }
        let index = self.select(geometry);
        if self.active.as_ref().is_some_and(|a| a.index == index) {
            return None;
        }
        let id = self.outline.get(index)?.id.clone();
        tracing::trace!(?event, index, id = %id, "active heading changed");
        self.active = Some(ActiveHeading { index, id });
        self.active.as_ref()
    }

    fn select(&self, geometry: &(impl ScrollPane + AnchorGeometry)) -> usize {
        // headings packed under the first one must not steal the top
        if geometry.scroll_top() <= 0.0 {
            return 0;
        }
        let mut selected = 0;
        for (index, heading) in self.outline.iter().enumerate() {
            if geometry
                .anchor_top(&heading.id)
                .is_some_and(|top| top <= self.trigger_offset)
            {
                selected = index;
            }
        }
        selected
    }
}

impl Default for ActiveHeadingTracker {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_OFFSET)
    }
}
