//! Single-flight guard for execution requests

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{ClientError, ClientResult};

/// Allows at most one in-flight operation at a time
#[derive(Debug, Default)]
pub struct ExecutionGate {
    busy: AtomicBool,
}

impl ExecutionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate, failing fast if an operation is already running
    pub fn try_acquire(&self, activity: &'static str) -> ClientResult<GateGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::OperationInProgress(activity))?;
        Ok(GateGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the gate when dropped
#[derive(Debug)]
pub struct GateGuard<'a> {
    gate: &'a ExecutionGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}
