//! Order-maintenance timeline: a global total order of time-points.
//!
//! The timeline records the relative instant every unit of work ran. It is an
//! arena of slots addressed by stable [`TimePoint`] handles, threaded into a
//! doubly-linked total order. Insertion after a point and splicing out a span
//! are both O(1) relinking operations; no slot is ever deallocated while the
//! timeline lives, so handles held elsewhere cannot dangle.

use std::cmp::Ordering;

use slab::Slab;

use crate::error::FlowError;

/// Stable handle to a time-point owned by a [`Timeline`].
///
/// Handles are plain arena indices: cheap to copy, valid for the lifetime of
/// the timeline they came from, and meaningless for any other timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimePoint(usize);

/// One slot of the order arena.
///
/// `seq` is the point's creation sequence number, assigned monotonically and
/// never reused. A cleared `prev` link is the explicit tag left behind by a
/// splice: the point is no longer part of the live order.
struct Slot {
    seq: u64,
    prev: Option<TimePoint>,
    next: Option<TimePoint>,
}

/// The global total order of time-points.
pub struct Timeline {
    slots: Slab<Slot>,
    origin: TimePoint,
    next_seq: u64,
    live: usize,
}

impl Timeline {
    /// Create a timeline containing its sole origin point.
    pub fn new() -> Self {
        let mut slots = Slab::new();
        let origin = TimePoint(slots.insert(Slot {
            seq: 0,
            prev: None,
            next: None,
        }));
        Timeline {
            slots,
            origin,
            next_seq: 1,
            live: 1,
        }
    }

    /// The origin point, the earliest instant of the order.
    pub fn origin(&self) -> TimePoint {
        self.origin
    }

    /// Allocate a fresh point immediately following `after`. O(1).
    pub fn insert_after(&mut self, after: TimePoint) -> TimePoint {
        let seq = self.next_seq;
        self.next_seq += 1;
        let old_next = self.slots[after.0].next;
        let fresh = TimePoint(self.slots.insert(Slot {
            seq,
            prev: Some(after),
            next: old_next,
        }));
        if let Some(n) = old_next {
            self.slots[n.0].prev = Some(fresh);
        }
        self.slots[after.0].next = Some(fresh);
        self.live += 1;
        fresh
    }

    /// Remove the span `(start, end]` from the live order. O(1).
    ///
    /// `start` must be immediately followed by `end`, the only configuration
    /// the engine ever retires, since every edge span is a single hop when it
    /// passes the validity check. `start` is relinked directly to `end`'s
    /// former successor; `end` is left with its predecessor cleared, which is
    /// how later validity checks recognize the span as retired. The slot
    /// itself stays allocated and keeps its sequence number.
    pub fn splice_out(&mut self, start: TimePoint, end: TimePoint) -> Result<(), FlowError> {
        if self.slots[start.0].next != Some(end) {
            return Err(FlowError::InvalidSpan);
        }
        let after_end = self.slots[end.0].next;
        self.slots[start.0].next = after_end;
        if let Some(n) = after_end {
            self.slots[n.0].prev = Some(start);
        }
        self.slots[end.0].prev = None;
        self.live -= 1;
        Ok(())
    }

    /// Total order over time-points, usable as a priority key.
    ///
    /// The key is the point's *creation* sequence number, which equals list
    /// position only along a single forward-advancing cursor path; later
    /// insertions elsewhere do not renumber existing points. The engine only
    /// ever compares points produced along such a path, so the restricted
    /// guarantee holds for every comparison it performs. This is not a
    /// general order-maintenance labeling.
    pub fn compare(&self, a: TimePoint, b: TimePoint) -> Ordering {
        self.position(a).cmp(&self.position(b))
    }

    /// The creation sequence number of `p` (the ordering key of [`compare`]).
    ///
    /// [`compare`]: Timeline::compare
    pub fn position(&self, p: TimePoint) -> u64 {
        self.slots[p.0].seq
    }

    /// The immediate successor of `p` in the live order, if any.
    pub fn next(&self, p: TimePoint) -> Option<TimePoint> {
        self.slots[p.0].next
    }

    /// The immediate predecessor of `p` in the live order, if any.
    pub fn prev(&self, p: TimePoint) -> Option<TimePoint> {
        self.slots[p.0].prev
    }

    /// Whether `p` has been spliced out of the live order.
    ///
    /// The origin has no predecessor but is always live.
    pub fn is_detached(&self, p: TimePoint) -> bool {
        p != self.origin && self.slots[p.0].prev.is_none()
    }

    /// Number of points currently in the live order.
    pub fn live_points(&self) -> usize {
        self.live
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
