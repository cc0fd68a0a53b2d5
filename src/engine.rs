//! The engine context and the change-propagation scheduler.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cell::Cell;
use crate::edge::{Edge, PendingQueue};
use crate::error::FlowError;
use crate::timeline::{TimePoint, Timeline};
use crate::tracer::{NoopTracer, Tracer};

struct EngineShared {
    timeline: RefCell<Timeline>,
    /// The cursor: the instant "now". Always a live point; saved and
    /// restored around every nested re-execution.
    current: RefCell<TimePoint>,
    pending: RefCell<PendingQueue>,
    tracer: Rc<dyn Tracer>,
}

/// The self-adjusting computation context.
///
/// An `Engine` owns a [`Timeline`], the cursor, and the pending-edge queue,
/// and exposes the four primitives: [`create`](Engine::create),
/// [`read`](Engine::read), [`Cell::write`], and
/// [`propagate`](Engine::propagate). It is an explicit context object, not a
/// global: independent engines have independent timelines and never interact.
///
/// Cloning is cheap (all state is behind `Rc`) and everything is
/// single-threaded: exactly one logical thread drives an engine to
/// quiescence before another touches it.
#[derive(Clone)]
pub struct Engine {
    shared: Rc<EngineShared>,
}

impl Engine {
    /// Create an engine with the no-op tracer.
    pub fn new() -> Self {
        Self::with_tracer(Rc::new(NoopTracer))
    }

    /// Create an engine that reports execution events to `tracer`.
    pub fn with_tracer(tracer: Rc<dyn Tracer>) -> Self {
        let timeline = Timeline::new();
        let origin = timeline.origin();
        Engine {
            shared: Rc::new(EngineShared {
                timeline: RefCell::new(timeline),
                current: RefCell::new(origin),
                pending: RefCell::new(PendingQueue::new()),
                tracer,
            }),
        }
    }

    /// Allocate a cell and run its initializer.
    ///
    /// The initializer receives a handle to the still-uninitialized cell; it
    /// typically performs the initial write and may register reads of other
    /// cells. Its error, if any, is returned as-is.
    pub fn create<T, Q, F>(&self, equality: Q, initializer: F) -> Result<Cell<T>, FlowError>
    where
        T: 'static,
        Q: Fn(&T, &T) -> bool + 'static,
        F: FnOnce(&Cell<T>) -> Result<(), FlowError>,
    {
        let cell = Cell::new(self.clone(), Box::new(equality));
        initializer(&cell)?;
        Ok(cell)
    }

    /// Register `reaction` as a dependent read of `source`.
    ///
    /// The edge spans from the cursor to a freshly minted point, and the
    /// cursor advances to that point: every read performed after this one,
    /// sequentially or nested inside a reaction, occupies a strictly later
    /// timeline position. The reaction is *not* run now; it re-runs whenever
    /// a genuine write to `source` is propagated, receiving the then-current
    /// value.
    ///
    /// An edge's span is retired when it re-runs. A reaction that should
    /// keep firing on later writes re-registers itself (directly or through
    /// nested reads), regrowing a fresh span in the retired one's place.
    pub fn read<T, F>(&self, source: &Cell<T>, reaction: F)
    where
        T: Clone + 'static,
        F: Fn(T) -> Result<(), FlowError> + 'static,
    {
        let (start, end, key) = {
            let mut timeline = self.shared.timeline.borrow_mut();
            let start = *self.shared.current.borrow();
            let end = timeline.insert_after(start);
            *self.shared.current.borrow_mut() = end;
            (start, end, timeline.position(start))
        };
        let action = {
            let source = source.clone();
            move || -> Result<(), FlowError> {
                let value = source.read()?;
                reaction(value)
            }
        };
        source.push_edge(Edge {
            start,
            end,
            key,
            action: Rc::new(action),
        });
        self.shared.tracer.on_edge_registered(key);
    }

    /// Re-run every pending edge, earliest span first, until quiescence.
    ///
    /// Each iteration pops the pending edge with the minimal `start`
    /// position and honors it only if its span is still exactly one live
    /// hop; anything else was superseded by an earlier re-run and is
    /// discarded. An honored edge's span is spliced out of the timeline, the
    /// cursor is rewound to its `start`, and the reaction re-runs: its
    /// nested reads regrow a fresh span in the retired one's place and its
    /// writes may enqueue further edges. The cursor is restored afterwards.
    ///
    /// A reaction error aborts the whole call after the cursor is restored;
    /// there is no per-edge isolation and no rollback, so the timeline and
    /// queue may be left partially advanced. Termination is the caller's
    /// bargain: a reaction whose effects rewrite its own transitive input
    /// re-enqueues itself forever, and the engine does not detect it.
    pub fn propagate(&self) -> Result<(), FlowError> {
        loop {
            let Some(edge) = self.shared.pending.borrow_mut().pop() else {
                break;
            };

            let valid = {
                let timeline = self.shared.timeline.borrow();
                timeline.next(edge.start) == Some(edge.end)
                    && !timeline.is_detached(edge.end)
                    // Degenerate-span guard: a retired pair relinked into a
                    // reversed configuration must not be honored.
                    && timeline.prev(edge.start) != Some(edge.end)
            };
            if !valid {
                self.shared.tracer.on_edge_stale(edge.key);
                continue;
            }

            self.shared
                .timeline
                .borrow_mut()
                .splice_out(edge.start, edge.end)?;

            let saved = std::mem::replace(&mut *self.shared.current.borrow_mut(), edge.start);
            self.shared.tracer.on_edge_rerun(edge.key);
            let outcome = (edge.action)();
            *self.shared.current.borrow_mut() = saved;
            outcome?;
        }
        Ok(())
    }

    /// Number of edges currently in the pending queue (stale and duplicate
    /// entries included).
    pub fn pending_count(&self) -> usize {
        self.shared.pending.borrow().len()
    }

    /// Number of time-points currently in the live order.
    pub fn timeline_len(&self) -> usize {
        self.shared.timeline.borrow().live_points()
    }

    pub(crate) fn cursor(&self) -> TimePoint {
        *self.shared.current.borrow()
    }

    pub(crate) fn schedule(&self, edges: Vec<Edge>) {
        self.shared.tracer.on_write(edges.len());
        let mut pending = self.shared.pending.borrow_mut();
        for edge in edges {
            pending.push(edge);
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
