//! Fake backend and a harness wiring it to the event loop

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use sonora_api::{
    ApiError, GenerateRequest, GenerateResponse, LibraryFile, LibraryResponse, MusicBackend,
    TranslateRequest, TranslateResponse,
};
use sonora_config::Config;
use sonora_playback::PlaybackController;
use sonora_playback::testing::ScriptedEngine;
use sonora_types::AppEvent;
use tokio::task::JoinSet;
use tokio::time::timeout;

use crate::controller::AppController;
use crate::state::AppState;

pub struct ScriptedReply {
    pub delay: Duration,
    pub result: Result<GenerateResponse, String>,
}

#[derive(Default)]
pub struct FakeBackend {
    generate_replies: Mutex<VecDeque<ScriptedReply>>,
    translate_delays: Mutex<VecDeque<Duration>>,
    listings: Mutex<VecDeque<(Duration, Vec<LibraryFile>)>>,
    library: Mutex<Vec<LibraryFile>>,
    pub generate_requests: Mutex<Vec<GenerateRequest>>,
    pub translate_requests: Mutex<Vec<TranslateRequest>>,
}

impl FakeBackend {
    pub fn replying(self, delay: Duration, result: Result<GenerateResponse, String>) -> Self {
        self.generate_replies
            .lock()
            .unwrap()
            .push_back(ScriptedReply { delay, result });
        self
    }

    pub fn with_library(self, files: Vec<LibraryFile>) -> Self {
        *self.library.lock().unwrap() = files;
        self
    }

    /// Next translate call answers after `delay`
    pub fn translating_after(self, delay: Duration) -> Self {
        self.translate_delays.lock().unwrap().push_back(delay);
        self
    }

    /// Next library call answers `files` after `delay`
    pub fn listing(self, delay: Duration, files: Vec<LibraryFile>) -> Self {
        self.listings.lock().unwrap().push_back((delay, files));
        self
    }
}

fn backend_error(message: String) -> ApiError {
    ApiError::Backend {
        status: 400,
        code: None,
        message,
    }
}

#[async_trait::async_trait]
impl MusicBackend for FakeBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ApiError> {
        self.generate_requests.lock().unwrap().push(request.clone());
        let reply = self.generate_replies.lock().unwrap().pop_front();
        let Some(reply) = reply else {
            return Err(backend_error("No scripted reply".into()));
        };

        tokio::time::sleep(reply.delay).await;
        reply.result.map_err(backend_error)
    }

    async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse, ApiError> {
        self.translate_requests.lock().unwrap().push(request.clone());
        let delay = self.translate_delays.lock().unwrap().pop_front();
        tokio::time::sleep(delay.unwrap_or_default()).await;
        Ok(TranslateResponse {
            text: Some(request.text.clone()),
            translated_text: format!("[{}] {}", request.target_locale, request.text),
            source_locale: request.source_locale.clone(),
            target_locale: request.target_locale.clone(),
            applied: request.source_locale != request.target_locale,
        })
    }

    async fn library(&self) -> Result<LibraryResponse, ApiError> {
        let scripted = self.listings.lock().unwrap().pop_front();
        let files = match scripted {
            Some((delay, files)) => {
                tokio::time::sleep(delay).await;
                files
            }
            None => self.library.lock().unwrap().clone(),
        };
        Ok(LibraryResponse { files })
    }
}

pub fn track(audio_path: &str, duration: f64) -> GenerateResponse {
    GenerateResponse {
        audio_path: audio_path.to_string(),
        duration,
        bpm: 120.0,
        prompt: String::new(),
        prompt_original: None,
        prompt_used: None,
        locale: None,
        translation: None,
        genre: None,
    }
}

pub fn library_file(filename: &str, created: f64) -> LibraryFile {
    LibraryFile {
        filename: filename.to_string(),
        path: format!("storage/{filename}"),
        size: 4096,
        created,
        modified: created,
    }
}

pub struct Harness {
    pub controller: AppController<ScriptedEngine>,
    pub engine: Arc<ScriptedEngine>,
    pub backend: Arc<FakeBackend>,
    pub tasks: JoinSet<anyhow::Result<()>>,
    pub tx: AsyncSender<AppEvent>,
    pub rx: AsyncReceiver<AppEvent>,
}

impl Harness {
    pub fn start(backend: FakeBackend, engine: ScriptedEngine) -> Self {
        let engine = Arc::new(engine);
        let backend = Arc::new(backend);
        let player = Arc::new(PlaybackController::new(
            Arc::clone(&engine),
            Duration::from_millis(100),
        ));
        let state = Arc::new(AppState::new(Config::default()));
        let controller = AppController::new(state, backend.clone(), player);
        let tasks = controller.spawn_core_tasks();
        let (tx, rx) = controller.ui_endpoints();

        Self {
            controller,
            engine,
            backend,
            tasks,
            tx,
            rx,
        }
    }

    pub async fn send(&self, event: AppEvent) {
        self.tx.send(event).await.unwrap();
    }

    /// Skip events until one matches
    pub async fn expect(&self, wanted: impl Fn(&AppEvent) -> bool) -> AppEvent {
        timeout(Duration::from_secs(10), async {
            loop {
                let event = self.rx.recv().await.unwrap();
                if wanted(&event) {
                    return event;
                }
            }
        })
        .await
        .expect("expected event never arrived")
    }

    /// Everything queued right now
    pub fn drain(&self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
