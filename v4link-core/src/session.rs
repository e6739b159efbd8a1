//! Exchange state tracking for a V4-link session
//!
//! One request/response exchange runs at a time:
//!
//! ```text
//! Idle ──begin──▶ Sent ──finish──▶ Complete | TimedOut | FrameError ──▶ Idle
//!                   └────abort (transport failure)─────────────────────▶ Idle
//! ```
//!
//! The terminal state of the last exchange stays readable through
//! [`Session::last_outcome`] after the session has returned to `Idle`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{Error, Result};

/// Exchange state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready for a new exchange
    Idle,

    /// Request written, waiting for the response
    Sent,

    /// Response decoded
    Complete,

    /// Deadline elapsed before a full response arrived
    TimedOut,

    /// Response bytes arrived but did not decode
    FrameError,
}

impl SessionState {
    /// Check if this state ends an exchange
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::TimedOut | Self::FrameError)
    }
}

/// Session state handle
///
/// Can be cloned cheaply (Arc internally); clones observe the same state.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    /// Number of exchanges started
    exchanges: AtomicU32,

    /// Current state
    state: parking_lot::RwLock<SessionState>,

    /// Terminal state of the most recent exchange
    last_outcome: parking_lot::RwLock<Option<SessionState>>,
}

impl Session {
    /// Create a new idle session
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                exchanges: AtomicU32::new(0),
                state: parking_lot::RwLock::new(SessionState::Idle),
                last_outcome: parking_lot::RwLock::new(None),
            }),
        }
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        *self.inner.state.read()
    }

    /// Check if a new exchange may start
    pub fn is_idle(&self) -> bool {
        self.state() == SessionState::Idle
    }

    /// Terminal state of the most recent finished exchange
    pub fn last_outcome(&self) -> Option<SessionState> {
        *self.inner.last_outcome.read()
    }

    /// Number of exchanges started on this session
    pub fn exchanges(&self) -> u32 {
        self.inner.exchanges.load(Ordering::Acquire)
    }

    /// Start an exchange (Idle → Sent)
    ///
    /// Returns the sequence number of the new exchange, starting at 1.
    pub fn begin(&self) -> Result<u32> {
        let mut state = self.inner.state.write();

        if *state != SessionState::Idle {
            return Err(Error::InvalidSessionState(format!(
                "Cannot start an exchange from state: {:?}",
                *state
            )));
        }

        *state = SessionState::Sent;
        Ok(self.inner.exchanges.fetch_add(1, Ordering::AcqRel).wrapping_add(1))
    }

    /// Finish the running exchange (Sent → outcome → Idle)
    pub fn finish(&self, outcome: SessionState) -> Result<()> {
        if !outcome.is_terminal() {
            return Err(Error::InvalidSessionState(format!(
                "Not a terminal state: {:?}",
                outcome
            )));
        }

        let mut state = self.inner.state.write();

        if *state != SessionState::Sent {
            return Err(Error::InvalidSessionState(format!(
                "Cannot finish an exchange from state: {:?}",
                *state
            )));
        }

        *self.inner.last_outcome.write() = Some(outcome);
        *state = SessionState::Idle;
        Ok(())
    }

    /// Abandon the running exchange without an outcome
    ///
    /// Used when the transport fails; the session becomes usable again.
    pub fn abort(&self) {
        *self.inner.state.write() = SessionState::Idle;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_new() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.last_outcome(), None);
        assert_eq!(session.exchanges(), 0);
    }

    #[test]
    fn test_session_complete_cycle() {
        let session = Session::new();

        assert_eq!(session.begin().unwrap(), 1);
        assert_eq!(session.state(), SessionState::Sent);

        session.finish(SessionState::Complete).unwrap();
        assert!(session.is_idle());
        assert_eq!(session.last_outcome(), Some(SessionState::Complete));
    }

    #[test]
    fn test_session_reusable_after_timeout() {
        let session = Session::new();

        session.begin().unwrap();
        session.finish(SessionState::TimedOut).unwrap();
        assert_eq!(session.last_outcome(), Some(SessionState::TimedOut));

        assert_eq!(session.begin().unwrap(), 2);
        session.finish(SessionState::FrameError).unwrap();
        assert_eq!(session.last_outcome(), Some(SessionState::FrameError));
        assert_eq!(session.exchanges(), 2);
    }

    #[test]
    fn test_no_overlapping_exchanges() {
        let session = Session::new();
        session.begin().unwrap();

        assert!(matches!(
            session.begin(),
            Err(Error::InvalidSessionState(_))
        ));
    }

    #[test]
    fn test_invalid_transitions() {
        let session = Session::new();

        // Nothing to finish
        assert!(session.finish(SessionState::Complete).is_err());

        // Sent and Idle are not outcomes
        session.begin().unwrap();
        assert!(session.finish(SessionState::Idle).is_err());
        assert!(session.finish(SessionState::Sent).is_err());
        assert_eq!(session.state(), SessionState::Sent);
    }

    #[test]
    fn test_abort_keeps_previous_outcome() {
        let session = Session::new();
        session.begin().unwrap();
        session.finish(SessionState::Complete).unwrap();

        session.begin().unwrap();
        session.abort();

        assert!(session.is_idle());
        assert_eq!(session.last_outcome(), Some(SessionState::Complete));
    }

    #[test]
    fn test_session_clone() {
        let session1 = Session::new();
        let session2 = session1.clone();

        session1.begin().unwrap();
        assert_eq!(session2.state(), SessionState::Sent);

        session1.finish(SessionState::Complete).unwrap();
        assert_eq!(session2.last_outcome(), Some(SessionState::Complete));
    }
}
