//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LockController (domain)
//! ```
//!
//! Driven adapters (clock, switches, servo, LEDs, piezo, calendar, event
//! sinks, storage) implement these traits.  The
//! [`LockController`](super::service::LockController) consumes them via
//! generics, so the decision core never touches hardware or the network.

use embassy_time::Instant;

use crate::config::LockboxConfig;
use crate::error::{RemoteUnavailable, TimeUnavailable};

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: RTC / SNTP → domain)
// ───────────────────────────────────────────────────────────────

/// Local wall-clock time, as far as the schedule cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    /// 0–23
    pub hour: u8,
    /// 0–59
    pub minute: u8,
    /// 0–6, 0 = Sunday
    pub weekday: u8,
}

impl ClockReading {
    pub const fn new(hour: u8, minute: u8, weekday: u8) -> Self {
        Self {
            hour,
            minute,
            weekday,
        }
    }
}

/// Source of local time and of a monotonic timestamp.
///
/// `now()` fails until the wall clock has been synchronised.  `uptime()`
/// never fails and never goes backwards; cache and alarm timing use it so
/// an SNTP step cannot stretch or shrink a TTL.
pub trait ClockPort {
    fn now(&mut self) -> Result<ClockReading, TimeUnavailable>;

    fn uptime(&self) -> Instant;
}

// ───────────────────────────────────────────────────────────────
// Precondition port (driven adapter: switches → domain)
// ───────────────────────────────────────────────────────────────

/// Physical conditions that must hold before the box may lock.
pub trait PreconditionPort {
    /// Lid switch reports the lid shut.
    fn lid_closed(&mut self) -> bool;

    /// Phone switch reports a phone in the tray.
    fn phone_present(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → servo)
// ───────────────────────────────────────────────────────────────

/// Write-side port: drives the locking mechanism.
///
/// There is no position feedback; the controller's `LockState` is a
/// belief that mirrors the last command issued here.
pub trait ActuatorPort {
    /// Move the latch to the locked position.
    fn lock(&mut self);

    /// Move the latch to the unlocked position.
    fn unlock(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Feedback port (driven adapter: domain → LEDs / piezo)
// ───────────────────────────────────────────────────────────────

/// Whole-strip colour shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    /// Booting.
    Orange,
    /// Locked, or alarm sounding.
    Red,
    /// Unlocked.
    Green,
    /// Ready, no lock decision taken yet.
    Blue,
}

impl Colour {
    /// `(r, g, b)` at full intensity; brightness is applied by the driver.
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Orange => (255, 165, 0),
            Self::Red => (255, 0, 0),
            Self::Green => (0, 255, 0),
            Self::Blue => (0, 0, 255),
        }
    }
}

/// Piezo melodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tune {
    Lock,
    Unlock,
    Alarm,
}

/// User-visible and user-audible feedback.
pub trait FeedbackPort {
    fn show(&mut self, colour: Colour);

    /// Blocks until the melody has finished.
    fn play(&mut self, tune: Tune);
}

// ───────────────────────────────────────────────────────────────
// Calendar port (driven adapter: HTTP → domain)
// ───────────────────────────────────────────────────────────────

/// Remote "is today a locking day" lookup.
///
/// Implementations MUST bound the call with a fixed timeout and report a
/// timeout as [`RemoteUnavailable`].  A hung request would stall the
/// control loop.
pub trait CalendarPort {
    fn query(&mut self) -> Result<bool, RemoteUnavailable>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, BLE
/// status characteristic, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

/// Fan out to two sinks (e.g. serial log and BLE status notify).
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &super::events::AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before persisting.  Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`LockboxConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<LockboxConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &LockboxConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::NotFound => Self::Config("not found"),
            ConfigError::Corrupted => Self::Config("corrupted"),
            ConfigError::StorageFull => Self::Config("storage full"),
            ConfigError::IoError => Self::Config("storage I/O"),
        }
    }
}
