//! Per-call flow state machine: `Idle → Validating → Invoking → (Success | Failed)`.

use crate::domain::DomainError;
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Validating,
    Invoking,
    Success,
    Failed,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlowState::Idle => "idle",
            FlowState::Validating => "validating",
            FlowState::Invoking => "invoking",
            FlowState::Success => "success",
            FlowState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One flow invocation. Logs every transition; owned by a single call.
#[derive(Debug)]
pub struct FlowRun {
    flow: &'static str,
    state: FlowState,
}

impl FlowRun {
    pub fn start(flow: &'static str) -> Self {
        Self {
            flow,
            state: FlowState::Idle,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn enter(&mut self, next: FlowState) {
        debug!(flow = self.flow, from = %self.state, to = %next, "flow state");
        self.state = next;
    }

    /// Move to the terminal state matching `result` and hand the result back.
    pub fn finish<T>(mut self, result: Result<T, DomainError>) -> Result<T, DomainError> {
        match &result {
            Ok(_) => {
                self.enter(FlowState::Success);
                info!(flow = self.flow, "flow succeeded");
            }
            Err(e) => {
                self.enter(FlowState::Failed);
                warn!(flow = self.flow, error = %e, "flow failed");
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let mut run = FlowRun::start("test");
        assert_eq!(run.state(), FlowState::Idle);
        run.enter(FlowState::Validating);
        run.enter(FlowState::Invoking);
        assert_eq!(run.state(), FlowState::Invoking);
        let out = run.finish(Ok::<_, DomainError>(7));
        assert_eq!(out.unwrap(), 7);
    }

    #[test]
    fn test_failure_passes_error_through() {
        let run = FlowRun::start("test");
        let out: Result<(), _> = run.finish(Err(DomainError::Unconfigured("no key".into())));
        assert!(matches!(out, Err(DomainError::Unconfigured(_))));
    }
}
