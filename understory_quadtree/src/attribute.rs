// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Payloads attached to leaf cells.

use kurbo::Rect;

/// Domain data carried by a cell.
///
/// The grid is payload-agnostic. The only thing it asks of a payload is what to do
/// when its cell divides: [`divide`](Self::divide) runs exactly once, on the
/// transition from leaf to internal, after the grid's factory has produced a payload
/// for each of the four new children.
pub trait CellAttribute: Sized {
    /// Redistribute this payload into the children of a dividing cell.
    ///
    /// `envelope` is the rectangle of the dividing cell. `children` is indexed by
    /// [`Quadrant::index`](crate::Quadrant::index) and initially holds whatever the
    /// factory produced for each child. The parent keeps no payload afterwards.
    ///
    /// The default drops `self` and leaves the children as the factory made them.
    fn divide(self, envelope: Rect, children: &mut [Option<Self>; 4]) {
        let _ = (envelope, children);
    }
}

impl CellAttribute for () {}
