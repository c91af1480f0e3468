//! Operation state shared by every asynchronous operation.
//!
//! `OperationState` is the value readers see. `OperationSlot` owns one state
//! plus the token of the most recently issued request; it is the only way to
//! move a state between tags, and only the owning controller holds it
//! mutably.

use serde::Serialize;

use crate::error::ErrorInfo;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "payload", rename_all = "lowercase")]
pub enum OperationState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Failed(ErrorInfo),
}

impl<T> OperationState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, OperationState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, OperationState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            OperationState::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            OperationState::Failed(info) => Some(info),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OperationState::Idle => "idle",
            OperationState::Loading => "loading",
            OperationState::Success(_) => "success",
            OperationState::Failed(_) => "failed",
        }
    }
}

/// Sequence number captured when a request is issued and compared when its
/// result arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub struct OperationSlot<T> {
    state: OperationState<T>,
    latest: u64,
}

impl<T> Default for OperationSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OperationSlot<T> {
    pub fn new() -> Self {
        Self {
            state: OperationState::Idle,
            latest: 0,
        }
    }

    pub fn state(&self) -> &OperationState<T> {
        &self.state
    }

    /// Token of the request whose outcome the slot is waiting for, if any.
    pub fn pending(&self) -> Option<RequestToken> {
        self.state.is_loading().then_some(RequestToken(self.latest))
    }

    /// Enter `Loading`, dropping any previous payload, and hand out a fresh
    /// token. Every earlier token becomes stale.
    pub(crate) fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        self.state = OperationState::Loading;
        RequestToken(self.latest)
    }

    /// Apply an outcome. Returns `false` and leaves the state untouched when
    /// `token` is not the latest one issued.
    pub(crate) fn resolve(&mut self, token: RequestToken, outcome: Result<T, ErrorInfo>) -> bool {
        if token.0 != self.latest || !self.state.is_loading() {
            return false;
        }
        self.state = match outcome {
            Ok(value) => OperationState::Success(value),
            Err(info) => OperationState::Failed(info),
        };
        true
    }

    /// Back to `Idle`; any request still in flight is made stale.
    pub(crate) fn reset(&mut self) {
        self.latest += 1;
        self.state = OperationState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCause;

    #[test]
    fn test_begin_clears_previous_payload() {
        let mut slot = OperationSlot::new();
        let token = slot.begin();
        assert!(slot.resolve(token, Ok("first")));
        assert_eq!(slot.state(), &OperationState::Success("first"));

        slot.begin();
        assert_eq!(slot.state(), &OperationState::Loading);
        assert_eq!(slot.state().value(), None);
    }

    #[test]
    fn test_stale_token_is_ignored() {
        let mut slot = OperationSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert!(!slot.resolve(first, Ok(1)));
        assert!(slot.state().is_loading());

        assert!(slot.resolve(second, Ok(2)));
        assert!(!slot.resolve(first, Ok(1)));
        assert_eq!(slot.state(), &OperationState::Success(2));
    }

    #[test]
    fn test_token_resolves_once() {
        let mut slot = OperationSlot::new();
        let token = slot.begin();
        assert!(slot.resolve(
            token,
            Err(ErrorInfo::new(ErrorCause::Transport, "timed out"))
        ));
        assert!(!slot.resolve(token, Ok(5)));
        assert_eq!(slot.state().error().map(|e| e.cause), Some(ErrorCause::Transport));
    }

    #[test]
    fn test_reset_invalidates_in_flight() {
        let mut slot = OperationSlot::new();
        let token = slot.begin();
        slot.reset();
        assert!(slot.state().is_idle());
        assert!(!slot.resolve(token, Ok(())));
        assert!(slot.state().is_idle());
        assert_eq!(slot.pending(), None);
    }

    #[test]
    fn test_tokens_increase_monotonically() {
        let mut slot: OperationSlot<()> = OperationSlot::new();
        let a = slot.begin();
        slot.reset();
        let b = slot.begin();
        assert!(b > a);
        assert_eq!(slot.pending(), Some(b));
    }
}
