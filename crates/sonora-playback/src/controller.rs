use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::engine::{AudioEngine, Decoded, EngineError};
use crate::error::PlaybackError;
use crate::state::{LoadOutcome, MixerLevels, PlaybackSnapshot, PlaybackStatus, SessionId};

/// Owns at most one playback session and drives it through
/// `Empty -> Loading -> Paused <-> Playing`, with `Disposed` as the end.
///
/// Position sampling and end-of-clip handling run as tokio tasks tied to a
/// per-run cancellation token, so every manual transition invalidates them.
pub struct PlaybackController<E: AudioEngine> {
    shared: Arc<Shared<E>>,
    tick: Duration,
}

struct Shared<E: AudioEngine> {
    engine: Arc<E>,
    state: Mutex<Inner<E::Resource>>,
    updates: watch::Sender<PlaybackSnapshot>,
}

struct Inner<R> {
    status: PlaybackStatus,
    last_session: u64,
    pending: Option<PendingLoad>,
    session: Option<Session<R>>,
    levels: MixerLevels,
}

struct PendingLoad {
    id: SessionId,
    locator: String,
}

struct Session<R> {
    id: SessionId,
    locator: String,
    resource: R,
    duration: f64,
    position: f64,
    run: Option<PlayRun>,
}

/// One uninterrupted stretch of playback
struct PlayRun {
    offset: f64,
    started_at: Instant,
    cancel: CancellationToken,
}

impl PlayRun {
    fn position(&self, duration: f64) -> f64 {
        (self.offset + self.started_at.elapsed().as_secs_f64()).min(duration)
    }
}

impl<R> Inner<R> {
    fn next_id(&mut self) -> SessionId {
        self.last_session += 1;
        SessionId(self.last_session)
    }

    fn snapshot(&self) -> PlaybackSnapshot {
        let (session, locator, position, duration) = match (&self.session, &self.pending) {
            (Some(s), _) => (Some(s.id), Some(s.locator.clone()), s.position, s.duration),
            (None, Some(p)) => (Some(p.id), Some(p.locator.clone()), 0.0, 0.0),
            (None, None) => (None, None, 0.0, 0.0),
        };

        PlaybackSnapshot {
            status: self.status,
            session,
            locator,
            position,
            duration,
            volume_db: self.levels.volume_db,
            cutoff_hz: self.levels.cutoff_hz,
        }
    }
}

impl<E: AudioEngine> Shared<E> {
    fn publish(&self, inner: &Inner<E::Resource>) {
        self.updates.send_replace(inner.snapshot());
    }

    /// Cancel whatever is playing or loading and release the resource
    fn end_session(&self, inner: &mut Inner<E::Resource>) {
        if let Some(pending) = inner.pending.take() {
            tracing::debug!("Abandoning load {} of {}", pending.id, pending.locator);
        }

        if let Some(mut session) = inner.session.take() {
            if let Some(run) = session.run.take() {
                run.cancel.cancel();
                self.engine.stop(&session.resource);
            }
            tracing::debug!("Releasing session {} ({})", session.id, session.locator);
            self.engine.release(session.resource);
        }
    }

    fn halt_run(&self, session: &mut Session<E::Resource>) {
        if let Some(run) = session.run.take() {
            session.position = run.position(session.duration);
            run.cancel.cancel();
            self.engine.stop(&session.resource);
        }
    }

    /// One position sample. Returns false once the loop should stop.
    fn sample(&self, id: SessionId, cancel: &CancellationToken) -> bool {
        let mut guard = self.state.lock();
        if cancel.is_cancelled() {
            return false;
        }

        let inner = &mut *guard;
        let Some(session) = inner.session.as_mut().filter(|s| s.id == id) else {
            return false;
        };
        let Some(run) = session.run.as_ref() else {
            return false;
        };

        session.position = run.position(session.duration);
        let running = session.position < session.duration;
        self.publish(inner);
        running
    }

    /// Natural end of clip for the run owning `cancel`
    fn finish(&self, id: SessionId, cancel: &CancellationToken) {
        let mut guard = self.state.lock();
        if cancel.is_cancelled() {
            return;
        }

        let inner = &mut *guard;
        let Some(session) = inner.session.as_mut().filter(|s| s.id == id) else {
            return;
        };
        let Some(run) = session.run.take() else {
            return;
        };

        run.cancel.cancel();
        self.engine.stop(&session.resource);
        session.position = session.duration;
        inner.status = PlaybackStatus::Paused;
        tracing::debug!("Session {id} reached the end");
        self.publish(inner);
    }
}

async fn sample_loop<E: AudioEngine>(
    shared: Arc<Shared<E>>,
    id: SessionId,
    cancel: CancellationToken,
    tick: Duration,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + tick, tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if !shared.sample(id, &cancel) {
                    break;
                }
            }
        }
    }
}

async fn finish_at_end<E: AudioEngine>(
    shared: Arc<Shared<E>>,
    id: SessionId,
    cancel: CancellationToken,
    remaining: Duration,
) {
    tokio::select! {
        _ = cancel.cancelled() => {}
        _ = tokio::time::sleep(remaining) => shared.finish(id, &cancel),
    }
}

impl<E: AudioEngine> PlaybackController<E> {
    pub fn new(engine: Arc<E>, tick: Duration) -> Self {
        Self::with_levels(engine, tick, MixerLevels::default())
    }

    pub fn with_levels(engine: Arc<E>, tick: Duration, levels: MixerLevels) -> Self {
        let inner = Inner {
            status: PlaybackStatus::Empty,
            last_session: 0,
            pending: None,
            session: None,
            levels: MixerLevels::new(levels.volume_db, levels.cutoff_hz),
        };
        let (updates, _) = watch::channel(inner.snapshot());

        Self {
            shared: Arc::new(Shared {
                engine,
                state: Mutex::new(inner),
                updates,
            }),
            tick: tick.max(Duration::from_millis(1)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.shared.state.lock().snapshot()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.shared.state.lock().status
    }

    /// Replace the current session with a new source.
    ///
    /// The previous session is released before decoding starts. If another
    /// `load` or `dispose` happens while this decode is in flight, the
    /// decoded resource is released and `LoadOutcome::Discarded` returned.
    pub async fn load(&self, locator: impl Into<String>) -> Result<LoadOutcome, PlaybackError> {
        let locator = locator.into();

        let id = {
            let mut inner = self.shared.state.lock();
            if inner.status == PlaybackStatus::Disposed {
                tracing::debug!("Ignoring load of {locator} after dispose");
                return Ok(LoadOutcome::Discarded);
            }

            self.shared.end_session(&mut inner);
            let id = inner.next_id();
            inner.pending = Some(PendingLoad {
                id,
                locator: locator.clone(),
            });
            inner.status = PlaybackStatus::Loading;
            self.shared.publish(&inner);
            id
        };

        tracing::info!("Loading {locator} as session {id}");
        let decoded = self.shared.engine.decode(&locator).await;

        let mut guard = self.shared.state.lock();
        let inner = &mut *guard;
        if !matches!(&inner.pending, Some(pending) if pending.id == id) {
            if let Ok(stale) = decoded {
                self.shared.engine.release(stale.resource);
            }
            tracing::debug!("Discarded stale decode of {locator} (session {id})");
            return Ok(LoadOutcome::Discarded);
        }
        inner.pending = None;

        match decoded {
            Ok(Decoded { resource, duration }) => {
                let duration = if duration.is_finite() {
                    duration.max(0.0)
                } else {
                    0.0
                };
                self.shared
                    .engine
                    .set_volume(&resource, inner.levels.volume_db);
                self.shared
                    .engine
                    .set_filter_cutoff(&resource, inner.levels.cutoff_hz);

                inner.session = Some(Session {
                    id,
                    locator,
                    resource,
                    duration,
                    position: 0.0,
                    run: None,
                });
                inner.status = PlaybackStatus::Paused;
                self.shared.publish(inner);
                tracing::info!("Session {id} ready ({duration:.2}s)");

                Ok(LoadOutcome::Ready {
                    session: id,
                    duration,
                })
            }
            Err(source) => {
                inner.status = PlaybackStatus::Empty;
                self.shared.publish(inner);
                tracing::warn!("Failed to load {locator}: {source}");

                Err(PlaybackError::Load { locator, source })
            }
        }
    }

    /// Play from the stored position, or pause keeping the sampled position.
    /// Returns the resulting status; outside `Paused`/`Playing` nothing happens.
    pub fn toggle_play(&self) -> Result<PlaybackStatus, PlaybackError> {
        let mut guard = self.shared.state.lock();
        let inner = &mut *guard;

        match inner.status {
            PlaybackStatus::Paused => {
                let Some(session) = inner.session.as_mut() else {
                    return Ok(inner.status);
                };
                if session.position >= session.duration {
                    session.position = 0.0;
                }
                let offset = session.position;
                self.begin_run(session, offset)?;
                inner.status = PlaybackStatus::Playing;
            }
            PlaybackStatus::Playing => {
                if let Some(session) = inner.session.as_mut() {
                    self.shared.halt_run(session);
                }
                inner.status = PlaybackStatus::Paused;
            }
            other => {
                tracing::debug!("toggle_play ignored while {other:?}");
                return Ok(other);
            }
        }

        self.shared.publish(inner);
        Ok(inner.status)
    }

    /// Move to `target` seconds, clamped to the clip. Playing sessions restart
    /// from there, paused ones only change their resume position.
    /// Returns the clamped position, or `None` when nothing is loaded.
    pub fn seek(&self, target: f64) -> Result<Option<f64>, PlaybackError> {
        let mut guard = self.shared.state.lock();
        let inner = &mut *guard;
        let playing = inner.status == PlaybackStatus::Playing;

        let Some(session) = inner.session.as_mut() else {
            return Ok(None);
        };

        let target = if target.is_nan() {
            0.0
        } else {
            target.clamp(0.0, session.duration)
        };

        if playing {
            if let Some(run) = session.run.take() {
                run.cancel.cancel();
            }
            self.shared.engine.stop(&session.resource);

            if let Err(e) = self.begin_run(session, target) {
                session.position = target;
                inner.status = PlaybackStatus::Paused;
                self.shared.publish(inner);
                return Err(e.into());
            }
        } else {
            session.position = target;
        }

        self.shared.publish(inner);
        Ok(Some(target))
    }

    /// Clamp and store the gain; applied right away when a session is loaded
    pub fn set_volume(&self, db: f64) -> f64 {
        let mut inner = self.shared.state.lock();
        if inner.status == PlaybackStatus::Disposed {
            return inner.levels.volume_db;
        }

        let db = MixerLevels::clamp_volume(db);
        inner.levels.volume_db = db;
        if let Some(session) = &inner.session {
            self.shared.engine.set_volume(&session.resource, db);
        }
        self.shared.publish(&inner);
        db
    }

    /// Clamp and store the low-pass cutoff; applied right away when a session is loaded
    pub fn set_filter_cutoff(&self, hz: f64) -> f64 {
        let mut inner = self.shared.state.lock();
        if inner.status == PlaybackStatus::Disposed {
            return inner.levels.cutoff_hz;
        }

        let hz = MixerLevels::clamp_cutoff(hz);
        inner.levels.cutoff_hz = hz;
        if let Some(session) = &inner.session {
            self.shared.engine.set_filter_cutoff(&session.resource, hz);
        }
        self.shared.publish(&inner);
        hz
    }

    /// Release everything and refuse further work. Safe to call repeatedly.
    pub fn dispose(&self) {
        let mut inner = self.shared.state.lock();
        if inner.status == PlaybackStatus::Disposed {
            return;
        }

        self.shared.end_session(&mut inner);
        inner.status = PlaybackStatus::Disposed;
        self.shared.publish(&inner);
        tracing::debug!("Playback controller disposed");
    }

    /// Start the engine and spawn the sampling loop plus the end-of-clip timer
    fn begin_run(
        &self,
        session: &mut Session<E::Resource>,
        offset: f64,
    ) -> Result<(), EngineError> {
        self.shared.engine.start(&session.resource, offset)?;

        let cancel = CancellationToken::new();
        session.position = offset;
        session.run = Some(PlayRun {
            offset,
            started_at: Instant::now(),
            cancel: cancel.clone(),
        });

        let remaining = Duration::from_secs_f64((session.duration - offset).max(0.0));
        tokio::spawn(sample_loop(
            Arc::clone(&self.shared),
            session.id,
            cancel.clone(),
            self.tick,
        ));
        tokio::spawn(finish_at_end(
            Arc::clone(&self.shared),
            session.id,
            cancel,
            remaining,
        ));

        Ok(())
    }
}

impl<E: AudioEngine> Drop for PlaybackController<E> {
    fn drop(&mut self) {
        self.dispose();
    }
}
