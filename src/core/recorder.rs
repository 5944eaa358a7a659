use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::{core::Quote, prelude::*};

/// Receives the ranking produced for every count during a recompute.
pub trait Recorder: Send + Sync {
    fn record(&self, since: DateTime<FixedOffset>, count: usize, hours: &[Quote]);
}

/// Emits every ranking as a debug event.
pub struct TracingRecorder;

impl TracingRecorder {
    #[must_use]
    pub fn shared() -> Arc<dyn Recorder> {
        Arc::new(Self)
    }
}

impl Recorder for TracingRecorder {
    fn record(&self, since: DateTime<FixedOffset>, count: usize, hours: &[Quote]) {
        debug!(%since, count, ?hours, "ranked");
    }
}

pub struct NoopRecorder;

impl Recorder for NoopRecorder {
    fn record(&self, _since: DateTime<FixedOffset>, _count: usize, _hours: &[Quote]) {}
}
