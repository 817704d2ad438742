//! # Submission Gate
//!
//! At most one in-flight operation per `(client, action)`. A second
//! submission while the first is unresolved fails `Busy` at once and never
//! reaches the store. The permit is released when dropped, whatever the
//! outcome of the operation.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::ClientId;
use portal_telemetry::log_client_event;

use crate::errors::PortalError;

/// Guarded user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateAction {
    Sign,
    AddRequest,
    CancelRequest,
    CreateClient,
    SaveClient,
    DeleteClient,
    ToggleLegacy,
}

impl GateAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sign => "sign",
            Self::AddRequest => "add request",
            Self::CancelRequest => "cancel request",
            Self::CreateClient => "create client",
            Self::SaveClient => "save client",
            Self::DeleteClient => "delete client",
            Self::ToggleLegacy => "toggle legacy signature",
        }
    }
}

impl std::fmt::Display for GateAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
pub struct SubmissionGate {
    in_flight: Mutex<HashSet<(ClientId, GateAction)>>,
}

impl SubmissionGate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim `(client, action)`.
    pub fn try_acquire(
        self: &Arc<Self>,
        client: &ClientId,
        action: GateAction,
    ) -> Result<SubmissionPermit, PortalError> {
        let key = (client.clone(), action);
        if !self.in_flight.lock().insert(key.clone()) {
            log_client_event!(
                debug,
                "gate",
                "Submission rejected, already in flight",
                client,
                action = %action
            );
            return Err(PortalError::Busy {
                client: client.clone(),
                action,
            });
        }
        Ok(SubmissionPermit {
            gate: Arc::clone(self),
            key,
        })
    }

    pub fn is_busy(&self, client: &ClientId, action: GateAction) -> bool {
        self.in_flight.lock().contains(&(client.clone(), action))
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }
}

/// Releases its slot on drop.
#[derive(Debug)]
pub struct SubmissionPermit {
    gate: Arc<SubmissionGate>,
    key: (ClientId, GateAction),
}

impl Drop for SubmissionPermit {
    fn drop(&mut self) {
        self.gate.in_flight.lock().remove(&self.key);
    }
}
