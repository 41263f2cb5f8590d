use crate::overlay::{centered_top_position, nudge_increment};

/// WHAT: Window centers horizontally and pins to the top of the display
/// WHY: The overlay's canonical placement is centered-top of the primary display
#[test]
fn given_wide_display_when_positioning_then_centered_at_top() {
    // Given: A 1920px display and an 1100px window
    // When: Computing the position
    let (x, y) = centered_top_position(1920, 1100);

    // Then: Centered horizontally, y pinned to 0
    assert_eq!(x, 410);
    assert_eq!(y, 0);
}

/// WHAT: Window exactly as wide as the display lands at x = 0
/// WHY: The centering arithmetic must not drift at the boundary
#[test]
fn given_window_equal_to_display_when_positioning_then_at_origin() {
    let (x, y) = centered_top_position(1100, 1100);

    assert_eq!(x, 0);
    assert_eq!(y, 0);
}

/// WHAT: Window wider than the display yields a negative x
/// WHY: Overhang splits evenly rather than clamping to one edge
#[test]
fn given_window_wider_than_display_when_positioning_then_x_goes_negative() {
    let (x, _) = centered_top_position(800, 1100);

    assert_eq!(x, -150);
}

/// WHAT: Nudge step is a tenth of the smaller display dimension, floored
/// WHY: Keeps movement proportional on any display without fractional pixels
#[test]
fn given_landscape_display_when_computing_increment_then_tenth_of_height() {
    // Given: 1920x1080, height is the smaller dimension
    let step = nudge_increment(1920, 1080);

    // Then: floor(1080 * 0.1)
    assert_eq!(step, 108);
}

/// WHAT: Odd dimensions floor rather than round
/// WHY: The step must be a whole pixel count
#[test]
fn given_odd_dimension_when_computing_increment_then_floored() {
    let step = nudge_increment(1366, 768);

    assert_eq!(step, 76);
}

/// WHAT: Portrait displays use the width as the smaller dimension
/// WHY: The increment follows min(width, height), not height alone
#[test]
fn given_portrait_display_when_computing_increment_then_tenth_of_width() {
    let step = nudge_increment(1080, 1920);

    assert_eq!(step, 108);
}
