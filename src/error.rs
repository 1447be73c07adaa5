//! Unified error types for the Phonebox firmware.
//!
//! Every failure in the decision core degrades to "do nothing this cycle" or
//! "keep the last known-good value", so none of these are fatal.  They exist
//! to be logged and to steer the controller's fallbacks.  All variants are
//! `Copy` so they pass through the control loop without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Wall clock has not been synchronised yet.
    Time(TimeUnavailable),
    /// Remote calendar query failed or timed out.
    Remote(RemoteUnavailable),
    /// A remote-control message could not be parsed.
    Override(ParseError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time(e) => write!(f, "time: {e}"),
            Self::Remote(e) => write!(f, "remote: {e}"),
            Self::Override(e) => write!(f, "override: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// The wall clock has never synchronised (pre-SNTP), so local time is garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnavailable;

impl fmt::Display for TimeUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wall clock not synchronised")
    }
}

impl From<TimeUnavailable> for Error {
    fn from(e: TimeUnavailable) -> Self {
        Self::Time(e)
    }
}

// ---------------------------------------------------------------------------
// Remote calendar
// ---------------------------------------------------------------------------

/// The remote calendar could not give a verdict (transport error, timeout,
/// non-success status or an unexpected body).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteUnavailable;

impl fmt::Display for RemoteUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "remote calendar unavailable")
    }
}

impl From<RemoteUnavailable> for Error {
    fn from(e: RemoteUnavailable) -> Self {
        Self::Remote(e)
    }
}

// ---------------------------------------------------------------------------
// Remote-control messages
// ---------------------------------------------------------------------------

/// Rejection reasons for a raw remote-control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Zero-length write.
    Empty,
    /// Payload longer than the inbox slot.
    TooLong,
    /// Payload is not one of the recognised command words.
    Unrecognized,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::TooLong => write!(f, "command exceeds inbox capacity"),
            Self::Unrecognized => write!(f, "unrecognised override command"),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Override(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
