//! Change-tracked value slots.

use std::cell::RefCell;
use std::rc::Rc;

use crate::edge::Edge;
use crate::engine::Engine;
use crate::error::FlowError;
use crate::timeline::TimePoint;

/// Boxed equality strategy deciding whether a write is a genuine change.
pub(crate) type EqualsFn<T> = Box<dyn Fn(&T, &T) -> bool>;

struct CellState<T> {
    value: Option<T>,
    equals: EqualsFn<T>,
    /// Insertion-ordered set of edges registered against this cell. Writes
    /// schedule every entry but leave the set intact; entries are never
    /// removed, even after their span is retired.
    out_edges: Vec<Edge>,
    /// Cursor position of the last genuine write.
    written_at: Option<TimePoint>,
}

/// A mutable, change-tracked value slot (the "modifiable" of self-adjusting
/// computation).
///
/// Cells are created through [`Engine::create`] and shared by handle: cloning
/// a `Cell` clones the handle, not the value. A cell holds its engine, so
/// writes can stamp the current cursor and schedule recomputation without an
/// explicit engine argument. Reaction closures then capture only the cell
/// handles they touch.
pub struct Cell<T> {
    state: Rc<RefCell<CellState<T>>>,
    engine: Engine,
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Cell {
            state: Rc::clone(&self.state),
            engine: self.engine.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("addr", &Rc::as_ptr(&self.state))
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Cell<T> {
    pub(crate) fn new(engine: Engine, equals: EqualsFn<T>) -> Self {
        Cell {
            state: Rc::new(RefCell::new(CellState {
                value: None,
                equals,
                out_edges: Vec::new(),
                written_at: None,
            })),
            engine,
        }
    }

    /// The current value.
    ///
    /// Fails with [`FlowError::UninitializedRead`] if the cell was never
    /// written.
    pub fn read(&self) -> Result<T, FlowError>
    where
        T: Clone,
    {
        self.state
            .borrow()
            .value
            .clone()
            .ok_or(FlowError::UninitializedRead)
    }

    /// Store a new value and schedule every registered edge.
    ///
    /// A write of a value equal to the current one (under this cell's
    /// equality rule) is a complete no-op: nothing is scheduled and the
    /// write marker does not advance. Scheduling never re-runs anything
    /// synchronously; recomputation happens only inside
    /// [`Engine::propagate`].
    pub fn write(&self, value: T) {
        let edges = {
            let mut state = self.state.borrow_mut();
            if let Some(current) = state.value.as_ref() {
                if (state.equals)(current, &value) {
                    return;
                }
            }
            state.value = Some(value);
            state.written_at = Some(self.engine.cursor());
            state.out_edges.clone()
        };
        // The borrow is released before scheduling: enqueueing must be free
        // to observe this cell again.
        self.engine.schedule(edges);
    }

    /// Cursor position of the last genuine write, if any.
    pub fn written_at(&self) -> Option<TimePoint> {
        self.state.borrow().written_at
    }

    pub(crate) fn push_edge(&self, edge: Edge) {
        self.state.borrow_mut().out_edges.push(edge);
    }
}
