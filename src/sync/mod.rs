//! Scroll synchronization between the editor's source and preview panes.
//!
//! Two mechanisms keep the panes aligned:
//! - proportional sync: a user scroll in one pane moves the other pane to
//!   the same scroll fraction
//! - heading navigation: jumping to an outline entry scrolls the preview
//!   to the heading's anchor and the source to the heading's line
//!
//! Every programmatic scroll arms a guard on the pane it moved, so the
//! scroll event the host echoes back is not mistaken for a user scroll.

mod ratio;

pub use ratio::{ratio_of, scroll_ratio, source_line_ratio, target_scroll_top};

use crate::editor::SourceBuffer;
use crate::outline::HeadingRecord;
use crate::ui::{AnchorGeometry, ScrollBehavior, ScrollPane};

/// Positions within this distance of an expected position are echoes.
pub const ECHO_TOLERANCE: f64 = 1.0;

/// One of the two editor panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Preview,
}

impl Side {
    pub const fn other(self) -> Self {
        match self {
            Self::Source => Self::Preview,
            Self::Preview => Self::Source,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Source => 0,
            Self::Preview => 1,
        }
    }
}

/// Echo suppression state for one pane.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Guard {
    Idle,
    /// An instant programmatic scroll landed here.
    Expect(f64),
    /// A smooth programmatic scroll is animating, towards `target` if known.
    UntilSettled { target: Option<f64> },
}

/// What a scroll event led to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOutcome {
    /// The other pane was moved to `target` (fraction `ratio`).
    Followed { ratio: f64, target: f64 },
    /// The event was the echo of our own programmatic scroll.
    EchoSuppressed,
    /// The pane is still animating towards a navigation target.
    Navigating,
}

/// What a heading jump did to each pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationOutcome {
    /// Whether the preview had an anchor for the heading.
    pub preview_scrolled: bool,
    /// The 1-based source line scrolled to, if the heading was found.
    pub source_line: Option<usize>,
}

/// Coordinates the source and preview panes of one editor.
#[derive(Debug, Clone)]
pub struct PaneSync {
    behavior: ScrollBehavior,
    guards: [Guard; 2],
}

impl PaneSync {
    /// `behavior` applies to heading navigation. Proportional sync always
    /// scrolls instantly so the follower tracks the driver.
    pub const fn new(behavior: ScrollBehavior) -> Self {
        Self {
            behavior,
            guards: [Guard::Idle; 2],
        }
    }

    /// Whether scroll events from `side` are currently being swallowed.
    pub fn is_guarded(&self, side: Side) -> bool {
        self.guards[side.slot()] != Guard::Idle
    }

    /// Handle a scroll event from `side`.
    pub fn on_scroll(
        &mut self,
        side: Side,
        source: &mut impl ScrollPane,
        preview: &mut impl ScrollPane,
    ) -> SyncOutcome {
        match side {
            Side::Source => self.follow(side, &*source, preview),
            Side::Preview => self.follow(side, &*preview, source),
        }
    }

    fn follow(
        &mut self,
        side: Side,
        driver: &impl ScrollPane,
        follower: &mut impl ScrollPane,
    ) -> SyncOutcome {
        let top = driver.scroll_top();
        match self.guards[side.slot()] {
            Guard::Idle => {}
            Guard::Expect(expected) => {
                self.guards[side.slot()] = Guard::Idle;
                if (top - expected).abs() <= ECHO_TOLERANCE {
                    tracing::trace!(?side, top, "scroll echo suppressed");
                    return SyncOutcome::EchoSuppressed;
                }
            }
            Guard::UntilSettled { target } => {
                if target.is_some_and(|t| (top - t).abs() <= ECHO_TOLERANCE) {
                    self.guards[side.slot()] = Guard::Idle;
                }
                return SyncOutcome::Navigating;
            }
        }

        let ratio = scroll_ratio(driver);
        let target = target_scroll_top(ratio, follower);
        follower.set_scroll_top(target, ScrollBehavior::Instant);
        self.guards[side.other().slot()] = Guard::Expect(follower.scroll_top());
        SyncOutcome::Followed { ratio, target }
    }

    /// Scroll both panes to `heading`.
    ///
    /// The preview jumps to the heading's anchor. The source jumps to the
    /// heading's line as a fraction of all lines. Either half is skipped
    /// silently when its target is missing.
    pub fn navigate_to_heading<S, P>(
        &mut self,
        heading: &HeadingRecord,
        buffer: &SourceBuffer,
        source: &mut S,
        preview: &mut P,
    ) -> NavigationOutcome
    where
        S: ScrollPane,
        P: ScrollPane + AnchorGeometry,
    {
        let landing = anchor_landing(preview, &heading.id);
        let preview_scrolled = preview.scroll_anchor_into_view(&heading.id, self.behavior);
        if preview_scrolled {
            self.arm(Side::Preview, preview.scroll_top(), landing);
        } else {
            tracing::debug!(id = %heading.id, "no preview anchor for heading");
        }

        let source_line = buffer.heading_line(heading);
        match source_line {
            Some(line) => {
                let ratio = source_line_ratio(line, buffer.line_count());
                let target = target_scroll_top(ratio, source);
                source.set_scroll_top(target, self.behavior);
                self.arm(Side::Source, source.scroll_top(), Some(target));
            }
            None => {
                tracing::debug!(text = %heading.text, "heading not found in source");
            }
        }

        NavigationOutcome {
            preview_scrolled,
            source_line,
        }
    }

    fn arm(&mut self, side: Side, landed: f64, target: Option<f64>) {
        self.guards[side.slot()] = match self.behavior {
            ScrollBehavior::Instant => Guard::Expect(landed),
            ScrollBehavior::Smooth => Guard::UntilSettled { target },
        };
    }

    /// The host reports that a smooth scroll on `side` finished.
    pub fn settle(&mut self, side: Side) {
        self.guards[side.slot()] = Guard::Idle;
    }

    /// Drop all guards (view teardown).
    pub fn reset(&mut self) {
        self.guards = [Guard::Idle; 2];
    }
}

/// Where `pane` comes to rest once the anchor `id` is scrolled to the top.
fn anchor_landing(pane: &(impl ScrollPane + AnchorGeometry), id: &str) -> Option<f64> {
    let top = pane.scroll_top() + pane.anchor_top(id)?;
    let max = (pane.scroll_height() - pane.client_height()).max(0.0);
    Some(top.clamp(0.0, max))
}

impl Default for PaneSync {
    fn default() -> Self {
        Self::new(ScrollBehavior::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::extract_outline;
    use crate::ui::Viewport;

    const DOC: &str = "# Intro\n\ntext\n\n## Install\n\nmore\n\n## Usage\n\nend\n";

    fn panes() -> (Viewport, Viewport) {
        let source = Viewport::new(200.0, 1200.0);
        let preview = Viewport::new(400.0, 2400.0)
            .with_anchor("intro", 0.0)
            .with_anchor("install", 700.0)
            .with_anchor("usage", 1500.0);
        (source, preview)
    }

    #[test]
    fn test_source_scroll_moves_preview_proportionally() {
        let (mut source, mut preview) = panes();
        let mut sync = PaneSync::default();
        source.user_scroll_to(500.0);
        let outcome = sync.on_scroll(Side::Source, &mut source, &mut preview);
        assert_eq!(
            outcome,
            SyncOutcome::Followed {
                ratio: 0.5,
                target: 1000.0
            }
        );
        assert_eq!(preview.scroll_top(), 1000.0);
        assert_eq!(preview.last_behavior(), Some(ScrollBehavior::Instant));
    }

    #[test]
    fn test_preview_scroll_moves_source() {
        let (mut source, mut preview) = panes();
        let mut sync = PaneSync::default();
        preview.go_to_bottom();
        sync.on_scroll(Side::Preview, &mut source, &mut preview);
        assert_eq!(source.scroll_top(), 1000.0);
    }

    #[test]
    fn test_echo_of_programmatic_scroll_is_suppressed() {
        let (mut source, mut preview) = panes();
        let mut sync = PaneSync::default();
        source.user_scroll_to(250.0);
        sync.on_scroll(Side::Source, &mut source, &mut preview);
        assert!(sync.is_guarded(Side::Preview));

        // The host fires a scroll event for the preview we just moved.
        source.user_scroll_to(0.0);
        let echo = sync.on_scroll(Side::Preview, &mut source, &mut preview);
        assert_eq!(echo, SyncOutcome::EchoSuppressed);
        assert_eq!(source.scroll_top(), 0.0, "echo must not drive the source");
        assert!(!sync.is_guarded(Side::Preview));
    }

    #[test]
    fn test_user_scroll_after_echo_window_syncs_again() {
        let (mut source, mut preview) = panes();
        let mut sync = PaneSync::default();
        source.user_scroll_to(250.0);
        sync.on_scroll(Side::Source, &mut source, &mut preview);

        // The user moved the preview before its echo arrived.
        preview.user_scroll_to(2000.0);
        let outcome = sync.on_scroll(Side::Preview, &mut source, &mut preview);
        assert!(matches!(outcome, SyncOutcome::Followed { .. }));
        assert_eq!(source.scroll_top(), 1000.0);
    }

    #[test]
    fn test_degenerate_follower_stays_at_top() {
        let mut source = Viewport::new(200.0, 1200.0);
        let mut preview = Viewport::new(400.0, 100.0);
        let mut sync = PaneSync::default();
        source.go_to_bottom();
        let outcome = sync.on_scroll(Side::Source, &mut source, &mut preview);
        assert_eq!(
            outcome,
            SyncOutcome::Followed {
                ratio: 1.0,
                target: 0.0
            }
        );
    }

    #[test]
    fn test_navigate_scrolls_both_panes() {
        let (mut source, mut preview) = panes();
        let buffer = SourceBuffer::from_text(DOC);
        let outline = extract_outline(DOC);
        let mut sync = PaneSync::new(ScrollBehavior::Instant);

        let usage = outline.get(2).unwrap();
        let outcome = sync.navigate_to_heading(usage, &buffer, &mut source, &mut preview);
        assert!(outcome.preview_scrolled);
        assert_eq!(outcome.source_line, Some(9));
        assert_eq!(preview.scroll_top(), 1500.0);
        // line 9 of 12 -> 0.75 of the 1000px range
        assert_eq!(source.scroll_top(), 750.0);
    }

    #[test]
    fn test_navigate_requests_smooth_scroll_by_default() {
        let (mut source, mut preview) = panes();
        let buffer = SourceBuffer::from_text(DOC);
        let outline = extract_outline(DOC);
        let mut sync = PaneSync::default();
        sync.navigate_to_heading(outline.get(1).unwrap(), &buffer, &mut source, &mut preview);
        assert_eq!(preview.last_behavior(), Some(ScrollBehavior::Smooth));
        assert_eq!(source.last_behavior(), Some(ScrollBehavior::Smooth));
    }

    #[test]
    fn test_smooth_navigation_ignores_events_until_settled() {
        let (mut source, mut preview) = panes();
        let buffer = SourceBuffer::from_text(DOC);
        let outline = extract_outline(DOC);
        let mut sync = PaneSync::default();
        sync.navigate_to_heading(outline.get(1).unwrap(), &buffer, &mut source, &mut preview);
        let source_top = source.scroll_top();

        // Intermediate animation frames on the preview
        preview.user_scroll_to(300.0);
        let outcome = sync.on_scroll(Side::Preview, &mut source, &mut preview);
        assert_eq!(outcome, SyncOutcome::Navigating);
        assert_eq!(source.scroll_top(), source_top);

        sync.settle(Side::Preview);
        let outcome = sync.on_scroll(Side::Preview, &mut source, &mut preview);
        assert!(matches!(outcome, SyncOutcome::Followed { .. }));
    }

    #[test]
    fn test_smooth_source_guard_clears_at_target() {
        let (mut source, mut preview) = panes();
        let buffer = SourceBuffer::from_text(DOC);
        let outline = extract_outline(DOC);
        let mut sync = PaneSync::default();
        sync.navigate_to_heading(outline.get(2).unwrap(), &buffer, &mut source, &mut preview);
        assert!(sync.is_guarded(Side::Source));
        // The final animation frame lands on the target.
        let outcome = sync.on_scroll(Side::Source, &mut source, &mut preview);
        assert_eq!(outcome, SyncOutcome::Navigating);
        assert!(!sync.is_guarded(Side::Source));
    }

    #[test]
    fn test_smooth_preview_guard_clears_at_anchor_without_settle() {
        let (mut source, mut preview) = panes();
        let buffer = SourceBuffer::from_text(DOC);
        let outline = extract_outline(DOC);
        let mut sync = PaneSync::default();
        sync.navigate_to_heading(outline.get(1).unwrap(), &buffer, &mut source, &mut preview);
        assert!(sync.is_guarded(Side::Preview));

        // The last animation frame lands on the anchor.
        let outcome = sync.on_scroll(Side::Preview, &mut source, &mut preview);
        assert_eq!(outcome, SyncOutcome::Navigating);
        assert!(!sync.is_guarded(Side::Preview));

        // No settle notification, yet user scrolls sync again.
        preview.user_scroll_to(1000.0);
        let outcome = sync.on_scroll(Side::Preview, &mut source, &mut preview);
        assert!(matches!(outcome, SyncOutcome::Followed { .. }));
        assert_eq!(source.scroll_top(), 500.0);
    }

    #[test]
    fn test_anchor_landing_clamps_to_scroll_range() {
        let mut preview = Viewport::new(400.0, 2400.0)
            .with_anchor("intro", 0.0)
            .with_anchor("end", 2300.0);
        preview.user_scroll_to(600.0);
        assert_eq!(anchor_landing(&preview, "intro"), Some(0.0));
        assert_eq!(anchor_landing(&preview, "end"), Some(2000.0));
        assert_eq!(anchor_landing(&preview, "missing"), None);
    }

    #[test]
    fn test_navigate_to_deleted_heading_leaves_source_untouched() {
        let (mut source, mut preview) = panes();
        let outline = extract_outline(DOC);
        let buffer = SourceBuffer::from_text("# Intro\n\ntext\n");
        let mut sync = PaneSync::new(ScrollBehavior::Instant);
        source.user_scroll_to(123.0);

        let usage = outline.get(2).unwrap();
        let outcome = sync.navigate_to_heading(usage, &buffer, &mut source, &mut preview);
        assert_eq!(outcome.source_line, None);
        assert!(outcome.preview_scrolled, "preview jump is independent");
        assert_eq!(source.scroll_top(), 123.0);
        assert!(!source.scroll_top().is_nan());
        assert!(!sync.is_guarded(Side::Source));
    }

    #[test]
    fn test_navigate_without_preview_anchor_still_moves_source() {
        let mut source = Viewport::new(200.0, 1200.0);
        let mut preview = Viewport::new(400.0, 2400.0);
        let buffer = SourceBuffer::from_text(DOC);
        let outline = extract_outline(DOC);
        let mut sync = PaneSync::new(ScrollBehavior::Instant);
        let outcome =
            sync.navigate_to_heading(outline.get(1).unwrap(), &buffer, &mut source, &mut preview);
        assert!(!outcome.preview_scrolled);
        assert_eq!(outcome.source_line, Some(5));
        assert_eq!(preview.scroll_top(), 0.0);
        assert!(!sync.is_guarded(Side::Preview));
    }

    #[test]
    fn test_reset_clears_guards() {
        let (mut source, mut preview) = panes();
        let mut sync = PaneSync::default();
        source.user_scroll_to(100.0);
        sync.on_scroll(Side::Source, &mut source, &mut preview);
        sync.reset();
        assert!(!sync.is_guarded(Side::Source));
        assert!(!sync.is_guarded(Side::Preview));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn follower_never_moves_up_while_driver_moves_down(
                tops in proptest::collection::vec(0.0..5000.0f64, 1..30),
                source_height in 0.0..6000.0f64,
                preview_height in 0.0..9000.0f64,
            ) {
                let mut source = Viewport::new(300.0, source_height);
                let mut preview = Viewport::new(500.0, preview_height);
                let mut sync = PaneSync::default();
                let mut tops = tops;
                tops.sort_by(f64::total_cmp);

                let mut last = 0.0;
                for top in tops {
                    source.user_scroll_to(top);
                    sync.on_scroll(Side::Source, &mut source, &mut preview);
                    prop_assert!(preview.scroll_top() >= last);
                    last = preview.scroll_top();
                    // Host echo for the programmatic preview scroll
                    let echo = sync.on_scroll(Side::Preview, &mut source, &mut preview);
                    prop_assert_eq!(echo, SyncOutcome::EchoSuppressed);
                }
            }
        }
    }
}
