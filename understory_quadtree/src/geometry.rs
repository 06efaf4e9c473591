// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Implicit cell geometry.
//!
//! Cells never store their rectangle. Traversals thread a [`Rect`] along and use
//! these helpers to derive a child's rectangle from its parent's, or the other way round.

use kurbo::{Line, Rect};

use crate::direction::Quadrant;

/// Sub-rectangle of `rect` covered by quadrant `q`.
pub fn quadrant_rect(rect: Rect, q: Quadrant) -> Rect {
    let c = rect.center();
    match q {
        Quadrant::NW => Rect::new(rect.x0, c.y, c.x, rect.y1),
        Quadrant::NE => Rect::new(c.x, c.y, rect.x1, rect.y1),
        Quadrant::SW => Rect::new(rect.x0, rect.y0, c.x, c.y),
        Quadrant::SE => Rect::new(c.x, rect.y0, rect.x1, c.y),
    }
}

/// Rectangle of the parent of a cell that covers `child` as quadrant `q`.
pub fn parent_rect(child: Rect, q: Quadrant) -> Rect {
    let w = child.width();
    let h = child.height();
    let (x0, x1) = if q.is_east() {
        (child.x0 - w, child.x1)
    } else {
        (child.x0, child.x1 + w)
    };
    let (y0, y1) = if q.is_north() {
        (child.y0 - h, child.y1)
    } else {
        (child.y0, child.y1 + h)
    };
    Rect::new(x0, y0, x1, y1)
}

/// Closed overlap test: rectangles that only touch along an edge or corner intersect.
pub fn intersects(a: Rect, b: Rect) -> bool {
    !(a.x1 < b.x0 || a.x0 > b.x1 || a.y1 < b.y0 || a.y0 > b.y1)
}

/// Whether the closed segment `seg` touches the closed rectangle `rect`.
///
/// Parametric (Liang–Barsky) clipping; `rect` must not be inverted.
pub fn segment_intersects(seg: Line, rect: Rect) -> bool {
    let d = seg.p1 - seg.p0;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let edges = [
        (-d.x, seg.p0.x - rect.x0),
        (d.x, rect.x1 - seg.p0.x),
        (-d.y, seg.p0.y - rect.y0),
        (d.y, rect.y1 - seg.p0.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            // Parallel to this edge: reject if outside of it.
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return false;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return false;
            }
            t1 = t1.min(r);
        }
    }
    t0 <= t1
}

/// Largest integer not greater than `v`, without needing `std` or `libm`.
#[inline]
pub(crate) fn floor_to_i64(v: f64) -> i64 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Grid coordinates are small; saturation on absurd inputs is acceptable."
    )]
    let i = v as i64;
    if (i as f64) > v { i - 1 } else { i }
}

/// Smallest integer not less than `v`, without needing `std` or `libm`.
#[inline]
pub(crate) fn ceil_to_i64(v: f64) -> i64 {
    -floor_to_i64(-v)
}
