//! Transition rules for lifecycle statuses.

use super::ValidationError;

/// A status enum with an explicit edge list.
///
/// ```ignore
/// let next = TransactionStatus::Pending.transition_to(TransactionStatus::Completed)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Every status reachable in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    /// `target` if the edge exists.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// No outgoing edges.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
