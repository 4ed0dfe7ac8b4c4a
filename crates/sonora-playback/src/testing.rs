//! In-memory engine for driving the controller in tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::engine::{AudioEngine, Decoded, EngineError};

/// How a scripted locator behaves when decoded
#[derive(Debug, Clone, Default)]
pub struct ClipScript {
    pub duration: f64,
    /// Time the decode takes
    pub delay: Duration,
    /// Decode error message, if it should fail
    pub fail: Option<String>,
}

impl ClipScript {
    pub fn lasting(duration: f64) -> Self {
        Self {
            duration,
            ..Default::default()
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail = Some(message.into());
        self
    }
}

#[derive(Debug)]
pub struct Clip {
    pub id: u64,
    pub locator: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Decode(String),
    Start { clip: u64, offset: f64 },
    Stop(u64),
    Volume { clip: u64, db: f64 },
    Cutoff { clip: u64, hz: f64 },
    Release(u64),
}

/// Engine that records every call instead of producing sound
pub struct ScriptedEngine {
    default_duration: f64,
    clips: HashMap<String, ClipScript>,
    next_id: AtomicU64,
    calls: Mutex<Vec<EngineCall>>,
    live: Mutex<HashSet<u64>>,
}

impl ScriptedEngine {
    pub fn new(default_duration: f64) -> Self {
        Self {
            default_duration,
            clips: HashMap::new(),
            next_id: AtomicU64::new(1),
            calls: Mutex::new(Vec::new()),
            live: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_clip(mut self, locator: impl Into<String>, script: ClipScript) -> Self {
        self.clips.insert(locator.into(), script);
        self
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().clone()
    }

    /// Ids passed to `release`, in order
    pub fn releases(&self) -> Vec<u64> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                EngineCall::Release(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Clips decoded and not yet released
    pub fn live_clips(&self) -> usize {
        self.live.lock().len()
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait::async_trait]
impl AudioEngine for ScriptedEngine {
    type Resource = Clip;

    async fn decode(&self, locator: &str) -> Result<Decoded<Clip>, EngineError> {
        self.record(EngineCall::Decode(locator.to_string()));

        let script = self
            .clips
            .get(locator)
            .cloned()
            .unwrap_or_else(|| ClipScript::lasting(self.default_duration));

        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        if let Some(message) = script.fail {
            return Err(EngineError::Decode(message));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.live.lock().insert(id);

        Ok(Decoded {
            resource: Clip {
                id,
                locator: locator.to_string(),
            },
            duration: script.duration,
        })
    }

    fn start(&self, resource: &Clip, offset: f64) -> Result<(), EngineError> {
        self.record(EngineCall::Start {
            clip: resource.id,
            offset,
        });
        Ok(())
    }

    fn stop(&self, resource: &Clip) {
        self.record(EngineCall::Stop(resource.id));
    }

    fn set_volume(&self, resource: &Clip, db: f64) {
        self.record(EngineCall::Volume {
            clip: resource.id,
            db,
        });
    }

    fn set_filter_cutoff(&self, resource: &Clip, hz: f64) {
        self.record(EngineCall::Cutoff {
            clip: resource.id,
            hz,
        });
    }

    fn release(&self, resource: Clip) {
        assert!(
            self.live.lock().remove(&resource.id),
            "clip {} ({}) released twice",
            resource.id,
            resource.locator
        );
        self.record(EngineCall::Release(resource.id));
    }
}
