use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use sonora_playback::{AudioEngine, Decoded, EngineError};

use crate::decoder::decode_bytes;
use crate::mixer::Mixer;
use crate::output::OutputThread;

/// A decoded clip registered as a mixer voice
#[derive(Debug)]
pub struct VoiceHandle {
    id: u64,
    locator: String,
}

impl VoiceHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }
}

/// `AudioEngine` backed by symphonia for decoding and cpal for output
pub struct CpalEngine {
    mixer: Arc<Mutex<Mixer>>,
    _output: Option<OutputThread>,
    http: reqwest::Client,
    next_voice: AtomicU64,
}

impl CpalEngine {
    /// Open the default output device
    pub fn new() -> Result<Self, EngineError> {
        let (output, mixer) = OutputThread::spawn()?;
        Ok(Self::build(mixer, Some(output)))
    }

    /// Engine with a mixer but no device; clips decode and track state but
    /// nothing is heard
    pub fn silent(sample_rate: u32, channels: usize) -> Self {
        Self::build(Arc::new(Mutex::new(Mixer::new(sample_rate, channels))), None)
    }

    fn build(mixer: Arc<Mutex<Mixer>>, output: Option<OutputThread>) -> Self {
        Self {
            mixer,
            _output: output,
            http: reqwest::Client::new(),
            next_voice: AtomicU64::new(1),
        }
    }

    pub fn voice_count(&self) -> usize {
        self.mixer.lock().voice_count()
    }

    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, EngineError> {
        let fetch_error = |reason: String| EngineError::Fetch {
            locator: locator.to_string(),
            reason,
        };

        if locator.starts_with("http://") || locator.starts_with("https://") {
            let response = self
                .http
                .get(locator)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| fetch_error(e.to_string()))?;
            let bytes = response
                .bytes()
                .await
                .map_err(|e| fetch_error(e.to_string()))?;
            return Ok(bytes.to_vec());
        }

        let path = locator.strip_prefix("file://").unwrap_or(locator);
        tokio::fs::read(path)
            .await
            .map_err(|e| fetch_error(e.to_string()))
    }
}

/// Lowercased file extension of a path or URL, ignoring query and fragment
fn extension_of(locator: &str) -> Option<String> {
    let path = locator.split(['?', '#']).next().unwrap_or(locator);
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[async_trait]
impl AudioEngine for CpalEngine {
    type Resource = VoiceHandle;

    async fn decode(&self, locator: &str) -> Result<Decoded<VoiceHandle>, EngineError> {
        let bytes = self.fetch(locator).await?;
        let extension = extension_of(locator);

        let clip = tokio::task::spawn_blocking(move || decode_bytes(bytes, extension.as_deref()))
            .await
            .map_err(|e| EngineError::Decode(format!("Decoder task failed: {e}")))??;

        let duration = clip.duration();
        let id = self.next_voice.fetch_add(1, Ordering::Relaxed);
        self.mixer.lock().add_voice(id, Arc::new(clip));
        tracing::debug!("Registered voice {id} for {locator}");

        Ok(Decoded {
            resource: VoiceHandle {
                id,
                locator: locator.to_string(),
            },
            duration,
        })
    }

    fn start(&self, resource: &VoiceHandle, offset: f64) -> Result<(), EngineError> {
        if self.mixer.lock().play(resource.id, offset) {
            Ok(())
        } else {
            Err(EngineError::Output(format!(
                "Voice {} ({}) is not registered",
                resource.id, resource.locator
            )))
        }
    }

    fn stop(&self, resource: &VoiceHandle) {
        self.mixer.lock().stop(resource.id);
    }

    fn set_volume(&self, resource: &VoiceHandle, db: f64) {
        self.mixer.lock().set_gain_db(resource.id, db);
    }

    fn set_filter_cutoff(&self, resource: &VoiceHandle, hz: f64) {
        self.mixer.lock().set_cutoff(resource.id, hz);
    }

    fn release(&self, resource: VoiceHandle) {
        if !self.mixer.lock().remove_voice(resource.id) {
            tracing::warn!("Voice {} was already gone", resource.id);
        }
    }
}
