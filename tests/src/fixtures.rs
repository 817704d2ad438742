//! Shared test fixtures.

use std::path::Path;
use std::sync::Arc;

use portal_runtime::{PortalConfig, PortalContainer, PortalSession};
use shared_types::{AuthMethod, ClientId, Identity, ManualClock};
use sp_02_client_records::{ClientDocument, ClientRecordStore, InMemoryRecordStore};
use sp_05_signature_capture::{CaptureSession, Point};

/// 1x1 PNG as a data URL.
pub const PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Instant the fixture clock starts at.
pub const START_MILLIS: i64 = 1_700_000_000_000;

pub fn smith() -> ClientId {
    ClientId::new("smith@evans-portal.com").unwrap()
}

pub fn identity(id: &ClientId) -> Identity {
    Identity::new(id.clone(), AuthMethod::Password)
}

pub struct Portal {
    pub container: PortalContainer,
    pub clock: Arc<ManualClock>,
}

impl Portal {
    pub async fn session(&self, id: &ClientId) -> PortalSession {
        self.container.open_session(identity(id)).await.unwrap()
    }
}

fn build(store: Arc<dyn ClientRecordStore>) -> Portal {
    let clock = Arc::new(ManualClock::at_millis(START_MILLIS));
    let container =
        PortalContainer::with_parts(PortalConfig::default(), store, clock.clone()).unwrap();
    Portal { container, clock }
}

/// Portal over an in-memory store. The store handle is returned for
/// outage simulation and raw inspection.
pub fn memory_portal(
    docs: impl IntoIterator<Item = (ClientId, ClientDocument)>,
) -> (Portal, Arc<InMemoryRecordStore>) {
    let store = Arc::new(InMemoryRecordStore::with_documents(docs));
    (build(store.clone()), store)
}

/// Portal over a JSON file.
pub fn file_portal(path: &Path) -> Portal {
    build(Arc::new(sp_02_client_records::JsonFileRecordStore::new(path)))
}

/// Writes a raw collection file the way older tooling left it.
pub fn write_collection(path: &Path, clients: serde_json::Value) {
    let json = serde_json::json!({ "clients": clients });
    std::fs::write(path, serde_json::to_vec_pretty(&json).unwrap()).unwrap();
}

pub fn read_collection(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

/// A short diagonal stroke.
pub fn scribble(capture: &mut CaptureSession) {
    capture.begin_stroke(Point::new(30.0, 40.0));
    capture.extend_stroke(Point::new(120.0, 150.0));
    capture.extend_stroke(Point::new(260.0, 60.0));
    capture.end_stroke();
}
