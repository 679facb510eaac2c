//! Proportional scroll mapping between panes of different heights.

use crate::ui::ScrollPane;

/// Scroll fraction of `pane` in `[0, 1]`.
///
/// Content that fits the viewport (no scrollable range) maps to 0.
pub fn scroll_ratio(pane: &(impl ScrollPane + ?Sized)) -> f64 {
    ratio_of(pane.scroll_top(), pane.scroll_height(), pane.client_height())
}

/// Scroll fraction for raw extents, clamped to `[0, 1]`.
pub fn ratio_of(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let range = scroll_height - client_height;
    if range.is_nan() || range <= 0.0 || !scroll_top.is_finite() {
        return 0.0;
    }
    (scroll_top / range).clamp(0.0, 1.0)
}

/// Scroll position that puts `pane` at fraction `ratio`.
///
/// `0` maps to the top and `1` to exactly `scroll_height - client_height`.
pub fn target_scroll_top(ratio: f64, pane: &(impl ScrollPane + ?Sized)) -> f64 {
    let range = pane.scroll_height() - pane.client_height();
    if range.is_nan() || range <= 0.0 {
        return 0.0;
    }
    let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
    ratio * range
}

/// Approximate scroll fraction of a 1-based line in a text of
/// `total_lines` lines.
pub fn source_line_ratio(line: usize, total_lines: usize) -> f64 {
    if total_lines == 0 {
        return 0.0;
    }
    // Line counts stay far below 2^52
    #[allow(clippy::cast_precision_loss)]
    let ratio = line as f64 / total_lines as f64;
    ratio.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Viewport;

    #[test]
    fn test_ratio_at_ends() {
        assert_eq!(ratio_of(0.0, 1000.0, 400.0), 0.0);
        assert_eq!(ratio_of(600.0, 1000.0, 400.0), 1.0);
        assert_eq!(ratio_of(300.0, 1000.0, 400.0), 0.5);
    }

    #[test]
    fn test_ratio_zero_for_degenerate_geometry() {
        assert_eq!(ratio_of(0.0, 400.0, 400.0), 0.0);
        assert_eq!(ratio_of(50.0, 100.0, 400.0), 0.0);
        assert_eq!(ratio_of(0.0, 0.0, 0.0), 0.0);
        assert_eq!(ratio_of(f64::NAN, 1000.0, 400.0), 0.0);
        assert_eq!(ratio_of(10.0, f64::NAN, 400.0), 0.0);
    }

    #[test]
    fn test_ratio_clamps_overscroll() {
        assert_eq!(ratio_of(-40.0, 1000.0, 400.0), 0.0);
        assert_eq!(ratio_of(700.0, 1000.0, 400.0), 1.0);
    }

    #[test]
    fn test_target_hits_both_ends_exactly() {
        let pane = Viewport::new(300.0, 2300.0);
        assert_eq!(target_scroll_top(0.0, &pane), 0.0);
        assert_eq!(target_scroll_top(1.0, &pane), 2000.0);
        assert_eq!(target_scroll_top(0.25, &pane), 500.0);
    }

    #[test]
    fn test_target_zero_when_follower_fits() {
        let pane = Viewport::new(300.0, 200.0);
        assert_eq!(target_scroll_top(0.8, &pane), 0.0);
        assert_eq!(target_scroll_top(f64::NAN, &Viewport::new(1.0, 10.0)), 0.0);
    }

    #[test]
    fn test_source_line_ratio() {
        assert_eq!(source_line_ratio(5, 10), 0.5);
        assert_eq!(source_line_ratio(10, 10), 1.0);
        assert_eq!(source_line_ratio(1, 0), 0.0);
        assert_eq!(source_line_ratio(12, 10), 1.0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn mapping_is_monotonic(
                a in 0.0..1.0f64,
                b in 0.0..1.0f64,
                client in 0.0..2000.0f64,
                content in 0.0..50000.0f64,
            ) {
                let pane = Viewport::new(client, content);
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(target_scroll_top(lo, &pane) <= target_scroll_top(hi, &pane));
            }

            #[test]
            fn target_stays_in_range(
                ratio in -2.0..3.0f64,
                client in 0.0..2000.0f64,
                content in 0.0..50000.0f64,
            ) {
                let pane = Viewport::new(client, content);
                let target = target_scroll_top(ratio, &pane);
                prop_assert!(target >= 0.0);
                prop_assert!(target <= pane.max_scroll_top());
            }
        }
    }
}
