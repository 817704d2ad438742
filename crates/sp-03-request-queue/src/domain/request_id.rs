//! Request id generation.
//!
//! Ids are creation times in epoch milliseconds, the format stored documents
//! already use. Two requests created within the same millisecond (or after a
//! clock step backwards) get the previous id plus one, so ids from one
//! generator are strictly increasing.

use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::{Clock, RequestId, Timestamp};

/// Monotonic millisecond id source.
pub struct RequestIdGenerator {
    clock: Arc<dyn Clock>,
    last: Mutex<i64>,
}

impl RequestIdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: Mutex::new(i64::MIN),
        }
    }

    /// Next id together with the creation instant it was derived from.
    pub fn next(&self) -> (RequestId, Timestamp) {
        let now = self.clock.now();
        let mut last = self.last.lock();
        let millis = now.timestamp_millis().max(last.saturating_add(1));
        *last = millis;
        (RequestId::from_millis(millis), now)
    }
}
