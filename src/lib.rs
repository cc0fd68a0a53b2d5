//! Timeflow: self-adjusting (incremental) computation.
//!
//! Values live in change-tracked [`Cell`]s; computations read cells and
//! register themselves as dependents; when an input changes, only the
//! computations whose recorded input actually changed are redone. The core is
//! the combination of a global order-maintenance [`Timeline`], which records
//! the relative instant every unit of work ran, and a priority-queue scheduler
//! that redoes exactly the stale spans of prior work, splicing them out of
//! the timeline and re-growing them in place.
//!
//! # Key properties
//!
//! - **Batched**: writes only schedule recomputation; nothing re-runs until
//!   [`Engine::propagate`].
//! - **Early cutoff**: each cell carries an equality rule; a write of an
//!   equal value fires nothing.
//! - **Dependency-ordered**: pending work is redone in ascending timeline
//!   order, so earlier-occurring work re-runs before later work that may
//!   depend on its output, without maintaining an explicit DAG.
//! - **Explicit context**: [`Engine`] is an ordinary value, not a hidden
//!   global; independent engines coexist.
//!
//! # Example
//!
//! ```
//! # fn main() -> Result<(), timeflow::FlowError> {
//! use timeflow::{equality, Engine};
//!
//! let engine = Engine::new();
//!
//! let input = engine.create(equality::partial_eq, |cell| {
//!     cell.write(5);
//!     Ok(())
//! })?;
//!
//! let doubled = engine.create(equality::partial_eq, |cell| {
//!     cell.write(input.read()? * 2);
//!     let target = cell.clone();
//!     engine.read(&input, move |value| {
//!         target.write(value * 2);
//!         Ok(())
//!     });
//!     Ok(())
//! })?;
//!
//! assert_eq!(doubled.read()?, 10);
//!
//! input.write(7);
//! engine.propagate()?;
//! assert_eq!(doubled.read()?, 14);
//! # Ok(())
//! # }
//! ```
//!
//! Single-threaded and purely synchronous: one logical thread drives an
//! engine from create/write through `propagate` to quiescence. There is no
//! cancellation, no per-reaction fault isolation, and no reclamation of
//! retired timeline spans or superseded edges.

mod cell;
mod edge;
mod engine;
pub mod equality;
mod error;
mod timeline;
pub mod tracer;

pub use cell::Cell;
pub use engine::Engine;
pub use error::FlowError;
pub use timeline::{TimePoint, Timeline};
pub use tracer::{NoopTracer, Tracer};
