//! Connection lifecycle state.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::domain::foundation::StateMachine;

/// Lifecycle of an upgraded connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ConnectionState::Connecting,
            1 => ConnectionState::Open,
            2 => ConnectionState::Closing,
            _ => ConnectionState::Closed,
        }
    }
}

impl StateMachine for ConnectionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConnectionState::*;
        match self {
            Connecting => vec![Open, Closing, Closed],
            Open => vec![Closing, Closed],
            Closing => vec![Closed],
            Closed => vec![],
        }
    }
}

/// Atomic holder for a [`ConnectionState`].
///
/// Transitions are compare-and-swap, so when several tasks race to close a
/// connection exactly one of them observes the move to `Closed`.
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    pub fn new(state: ConnectionState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub fn load(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Moves to `target` if the transition is valid from the current state.
    ///
    /// Returns `true` only for the caller that performed the transition.
    pub fn transition(&self, target: ConnectionState) -> bool {
        let mut current = self.load();
        loop {
            if !current.can_transition_to(&target) {
                return false;
            }
            match self.0.compare_exchange(
                current as u8,
                target as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = ConnectionState::from_u8(actual),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn closed_is_terminal() {
        assert!(ConnectionState::Closed.is_terminal());
        assert!(!ConnectionState::Closing.is_terminal());
    }

    #[test]
    fn open_cannot_go_back_to_connecting() {
        assert!(ConnectionState::Open
            .transition_to(ConnectionState::Connecting)
            .is_err());
    }

    #[test]
    fn cell_follows_lifecycle() {
        let cell = StateCell::new(ConnectionState::Connecting);
        assert!(cell.transition(ConnectionState::Open));
        assert!(cell.transition(ConnectionState::Closing));
        assert!(!cell.transition(ConnectionState::Open));
        assert!(cell.transition(ConnectionState::Closed));
        assert_eq!(cell.load(), ConnectionState::Closed);
    }

    #[test]
    fn closing_twice_only_succeeds_once() {
        let cell = StateCell::new(ConnectionState::Open);
        assert!(cell.transition(ConnectionState::Closed));
        assert!(!cell.transition(ConnectionState::Closed));
    }

    #[test]
    fn concurrent_close_has_single_winner() {
        let cell = Arc::new(StateCell::new(ConnectionState::Open));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cell = cell.clone();
                std::thread::spawn(move || cell.transition(ConnectionState::Closed))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
