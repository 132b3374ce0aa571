//! Geometry helpers for axis-aligned shape construction.
//!
//! All coordinates are canvas pixels with the origin at the top-left corner
//! and y growing downward.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Screen quadrant of a probe point relative to an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Right of and above the anchor.
    First = 1,
    /// Left of and above the anchor.
    Second = 2,
    /// Left of and below the anchor.
    Third = 3,
    /// Right of and below the anchor.
    Fourth = 4,
}

impl Quadrant {
    /// Quadrant number in `1..=4`.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Horizontal direction away from the anchor (+1 right, -1 left).
    pub fn x_sign(self) -> f64 {
        match self {
            Quadrant::First | Quadrant::Fourth => 1.0,
            Quadrant::Second | Quadrant::Third => -1.0,
        }
    }

    /// Vertical direction away from the anchor (-1 up, +1 down).
    pub fn y_sign(self) -> f64 {
        match self {
            Quadrant::First | Quadrant::Second => -1.0,
            Quadrant::Third | Quadrant::Fourth => 1.0,
        }
    }
}

/// Euclidean distance between two points.
pub fn distance(p1: Point, p2: Point) -> f64 {
    p1.distance(p2)
}

/// Classify `probe` into a screen quadrant around `anchor`.
///
/// Both comparisons are strict: a probe sharing the anchor's x counts as
/// "left" and one sharing its y counts as "above", so `probe == anchor`
/// lands in [`Quadrant::Second`].
pub fn quadrant(anchor: Point, probe: Point) -> Quadrant {
    let right = anchor.x < probe.x;
    let below = anchor.y < probe.y;
    match (right, below) {
        (true, false) => Quadrant::First,
        (false, false) => Quadrant::Second,
        (false, true) => Quadrant::Third,
        (true, true) => Quadrant::Fourth,
    }
}

/// Side length of the square dragged from `anchor` to `probe`.
///
/// The dominant axis wins so the result is always a true square.
pub fn square_side(anchor: Point, probe: Point) -> f64 {
    (anchor.x - probe.x).abs().max((anchor.y - probe.y).abs())
}

/// Corners of an axis-aligned square anchored at `anchor`.
///
/// Order: anchor, horizontal neighbour, diagonal, vertical neighbour.
pub fn square_corners(anchor: Point, side: f64, quadrant: Quadrant) -> [Point; 4] {
    rectangle_corners(anchor, side, side, quadrant)
}

/// Corners of an axis-aligned rectangle anchored at `anchor`.
///
/// `dx` and `dy` are magnitudes; the quadrant decides the direction. The
/// corner order matches [`square_corners`].
pub fn rectangle_corners(anchor: Point, dx: f64, dy: f64, quadrant: Quadrant) -> [Point; 4] {
    let x = anchor.x + quadrant.x_sign() * dx.abs();
    let y = anchor.y + quadrant.y_sign() * dy.abs();
    [
        anchor,
        Point::new(x, anchor.y),
        Point::new(x, y),
        Point::new(anchor.x, y),
    ]
}

/// Square preview for a drag from `anchor` to `probe`.
pub fn square_from_drag(anchor: Point, probe: Point) -> [Point; 4] {
    square_corners(anchor, square_side(anchor, probe), quadrant(anchor, probe))
}

/// Rectangle preview for a drag from `anchor` to `probe`.
///
/// The diagonal corner always lands exactly on `probe`.
pub fn rectangle_from_drag(anchor: Point, probe: Point) -> [Point; 4] {
    rectangle_corners(
        anchor,
        (anchor.x - probe.x).abs(),
        (anchor.y - probe.y).abs(),
        quadrant(anchor, probe),
    )
}
