//! Transaction status state machine.
//!
//! A transaction starts pending, settles once into completed or failed, and
//! a completed transaction may later be refunded.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Created, gateway outcome not yet recorded.
    Pending,

    /// Gateway reported success. Entitlement may be granted.
    Completed,

    /// Gateway reported failure, or the attempt could not run.
    Failed,

    /// A completed payment that was returned to the payer.
    Refunded,
}

impl TransactionStatus {
    /// Wire name used in stored documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Refunded => "refunded",
        }
    }

    /// Returns true once the gateway outcome has been written.
    pub fn is_settled(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl StateMachine for TransactionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use TransactionStatus::*;
        matches!(
            (self, target),
            (Pending, Completed) | (Pending, Failed) | (Completed, Refunded)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TransactionStatus::*;
        match self {
            Pending => vec![Completed, Failed],
            Completed => vec![Refunded],
            Failed => vec![],
            Refunded => vec![],
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            "refunded" => Ok(TransactionStatus::Refunded),
            other => Err(format!("unknown transaction status '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TransactionStatus::*;

    const ALL: [TransactionStatus; 4] = [Pending, Completed, Failed, Refunded];

    #[test]
    fn pending_settles_into_completed_or_failed() {
        assert_eq!(Pending.transition_to(Completed), Ok(Completed));
        assert_eq!(Pending.transition_to(Failed), Ok(Failed));
        assert!(Pending.transition_to(Refunded).is_err());
    }

    #[test]
    fn completed_can_only_be_refunded() {
        assert_eq!(Completed.transition_to(Refunded), Ok(Refunded));
        assert!(Completed.transition_to(Failed).is_err());
        assert!(Completed.transition_to(Pending).is_err());
        assert!(Completed.transition_to(Completed).is_err());
    }

    #[test]
    fn failed_and_refunded_are_terminal() {
        assert!(Failed.is_terminal());
        assert!(Refunded.is_terminal());
        for target in ALL {
            assert!(!Failed.can_transition_to(&target));
            assert!(!Refunded.can_transition_to(&target));
        }
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn serializes_lowercase_and_parses_back() {
        assert_eq!(serde_json::to_string(&Completed).unwrap(), "\"completed\"");
        for status in ALL {
            assert_eq!(status.as_str().parse::<TransactionStatus>(), Ok(status));
        }
        assert!("settled".parse::<TransactionStatus>().is_err());
    }
}
