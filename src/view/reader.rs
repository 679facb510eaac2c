use crate::outline::{Outline, extract_outline_with};
use crate::tracker::{ActiveHeading, ActiveHeadingTracker, TrackerState, ViewportEvent};
use crate::ui::{AnchorGeometry, ScrollPane};

use super::EngineOptions;

/// Reading view of one post.
#[derive(Debug, Clone)]
pub struct ReaderView {
    options: EngineOptions,
    tracker: ActiveHeadingTracker,
}

impl ReaderView {
    /// Mount the view for `raw` and pick the initial active heading.
    pub fn mount(
        raw: &str,
        options: EngineOptions,
        geometry: &(impl ScrollPane + AnchorGeometry),
    ) -> Self {
        let mut tracker = ActiveHeadingTracker::new(options.trigger_offset);
        tracker.mount(extract_outline_with(raw, options.id_policy));
        tracker.handle_event(ViewportEvent::Scroll, geometry);
        Self { options, tracker }
    }

    pub const fn outline(&self) -> &Outline {
        self.tracker.outline()
    }

    pub const fn active(&self) -> Option<&ActiveHeading> {
        self.tracker.active()
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.state() == TrackerState::Tracking
    }

    /// Forward a host scroll or resize. Returns the active heading when it
    /// changed.
    pub fn on_viewport_event(
        &mut self,
        event: ViewportEvent,
        geometry: &(impl ScrollPane + AnchorGeometry),
    ) -> Option<&ActiveHeading> {
        self.tracker.handle_event(event, geometry)
    }

    /// Scroll to the outline entry at `index` (a table of contents click).
    ///
    /// Returns `false` when the index or its anchor does not exist, or the
    /// view was torn down.
    pub fn jump_to(&self, index: usize, geometry: &mut impl AnchorGeometry) -> bool {
        let Some(heading) = self.tracker.outline().get(index) else {
            return false;
        };
        geometry.scroll_anchor_into_view(&heading.id, self.options.scroll_behavior)
    }

    /// The post text changed; rebuild the outline.
    pub fn reload(&mut self, raw: &str, geometry: &(impl ScrollPane + AnchorGeometry)) {
        if !self.tracker.is_mounted() {
            return;
        }
        self.tracker
            .set_outline(extract_outline_with(raw, self.options.id_policy));
        self.tracker.handle_event(ViewportEvent::Scroll, geometry);
    }

    /// Release the outline and stop reacting to events.
    pub fn teardown(&mut self) {
        self.tracker.unmount();
    }
}
