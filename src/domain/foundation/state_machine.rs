//! State machine trait for lifecycle status enums.
//!
//! Gives every lifecycle enum (currently the connection state) the same
//! validated-transition surface.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ConnectionState {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Connecting, Open) | (Open, Closing) | ...)
///     }
///     // ...
/// }
///
/// let next = ConnectionState::Open.transition_to(ConnectionState::Closing)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
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

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Switch {
        Off,
        On,
        Broken,
    }

    impl StateMachine for Switch {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Switch::Off => vec![Switch::On, Switch::Broken],
                Switch::On => vec![Switch::Off, Switch::Broken],
                Switch::Broken => vec![],
            }
        }
    }

    #[test]
    fn valid_transition_returns_target() {
        assert_eq!(Switch::Off.transition_to(Switch::On).unwrap(), Switch::On);
    }

    #[test]
    fn invalid_transition_names_both_states() {
        let err = Switch::Broken.transition_to(Switch::On).unwrap_err();
        assert!(err.to_string().contains("Broken"));
        assert!(err.to_string().contains("On"));
    }

    #[test]
    fn terminal_state_has_no_transitions() {
        assert!(Switch::Broken.is_terminal());
        assert!(!Switch::Off.is_terminal());
    }
}
