//! Error types for cell access and change propagation.

use thiserror::Error;

/// Errors surfaced by cell reads and by [`propagate`](crate::Engine::propagate).
///
/// User errors raised inside reactions can be propagated with the `?`
/// operator via the [`FlowError::User`] variant; they abort the enclosing
/// `propagate` call outright. The engine performs no per-edge fault isolation
/// and no rollback of timeline or queue state, so a failed `propagate` leaves
/// both partially advanced.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A cell was read before it was ever written.
    #[error("read from an uninitialized cell")]
    UninitializedRead,

    /// A splice was attempted on time-points that are not adjacent.
    ///
    /// Unreachable through the engine's own call path, which validates
    /// adjacency before every splice.
    #[error("splice bounds are not adjacent in the timeline")]
    InvalidSpan,

    /// A user-defined error raised by a reaction.
    #[error(transparent)]
    User(#[from] anyhow::Error),
}

impl FlowError {
    /// Returns the inner user error if this is a [`FlowError::User`].
    pub fn user_error(&self) -> Option<&anyhow::Error> {
        match self {
            FlowError::User(e) => Some(e),
            _ => None,
        }
    }

    /// Attempts to downcast the user error to a specific type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        self.user_error().and_then(|e| e.downcast_ref::<E>())
    }
}
