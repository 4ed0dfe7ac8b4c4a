use std::fmt;

/// Identity of one loaded (or loading) source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// Nothing loaded
    #[default]
    Empty,
    /// Decode in flight
    Loading,
    /// Decoded and holding a resume position
    Paused,
    Playing,
    /// Terminal, every operation is ignored
    Disposed,
}

pub const MIN_VOLUME_DB: f64 = -24.0;
pub const MAX_VOLUME_DB: f64 = 6.0;
pub const DEFAULT_VOLUME_DB: f64 = -6.0;

pub const MIN_CUTOFF_HZ: f64 = 200.0;
pub const MAX_CUTOFF_HZ: f64 = 20000.0;
pub const DEFAULT_CUTOFF_HZ: f64 = 18000.0;

/// Gain and low-pass settings, applied to every session the controller loads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixerLevels {
    pub volume_db: f64,
    pub cutoff_hz: f64,
}

impl Default for MixerLevels {
    fn default() -> Self {
        Self {
            volume_db: DEFAULT_VOLUME_DB,
            cutoff_hz: DEFAULT_CUTOFF_HZ,
        }
    }
}

impl MixerLevels {
    pub fn new(volume_db: f64, cutoff_hz: f64) -> Self {
        Self {
            volume_db: Self::clamp_volume(volume_db),
            cutoff_hz: Self::clamp_cutoff(cutoff_hz),
        }
    }

    pub fn clamp_volume(db: f64) -> f64 {
        if db.is_nan() {
            DEFAULT_VOLUME_DB
        } else {
            db.clamp(MIN_VOLUME_DB, MAX_VOLUME_DB)
        }
    }

    pub fn clamp_cutoff(hz: f64) -> f64 {
        if hz.is_nan() {
            DEFAULT_CUTOFF_HZ
        } else {
            hz.clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ)
        }
    }
}

/// Everything an owner may display about the player
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub session: Option<SessionId>,
    pub locator: Option<String>,
    /// Seconds, within `[0, duration]`
    pub position: f64,
    /// Seconds, 0 until decoded
    pub duration: f64,
    pub volume_db: f64,
    pub cutoff_hz: f64,
}

/// Result of a `load` call that did not fail
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadOutcome {
    Ready { session: SessionId, duration: f64 },
    /// A newer load or a dispose overtook this one; its resource was released
    Discarded,
}
