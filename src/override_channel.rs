//! Manual override from the remote control link.
//!
//! ```text
//! ┌──────────────┐  RawRemoteMessage  ┌─────────────┐  OverrideCommand  ┌────────────────┐
//! │  BLE stack   │───────────────────▶│ REMOTE_INBOX │──────────────────▶│ LockController │
//! │  (GATT task) │   latest wins      │  (Signal)    │  drained per cycle │                │
//! └──────────────┘                    └─────────────┘                   └────────────────┘
//! ```
//!
//! The BLE write callback runs on the Bluetooth task, so it never touches
//! controller state.  It posts the raw bytes into a single-slot signal; a
//! second write before the next cycle overwrites the first.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use heapless::Vec;
use log::{info, warn};

use crate::app::commands::OverrideCommand;
use crate::error::ParseError;

/// Largest write the inbox will hold.  Every valid command is at most 3 bytes.
pub const MAX_MESSAGE_LEN: usize = 32;

/// One write from the remote link, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRemoteMessage(Vec<u8, MAX_MESSAGE_LEN>);

impl RawRemoteMessage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        Vec::from_slice(bytes)
            .map(Self)
            .map_err(|()| ParseError::TooLong)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// ── Inbox ──────────────────────────────────────────────────────

/// Single-slot, latest-wins mailbox between the BLE task and the loop.
pub struct OverrideInbox(Signal<CriticalSectionRawMutex, RawRemoteMessage>);

impl OverrideInbox {
    pub const fn new() -> Self {
        Self(Signal::new())
    }

    /// Producer side.  Replaces any message not yet taken.
    pub fn post(&self, msg: RawRemoteMessage) {
        self.0.signal(msg);
    }

    /// Consumer side.  Non-blocking.
    pub fn take(&self) -> Option<RawRemoteMessage> {
        self.0.try_take()
    }
}

impl Default for OverrideInbox {
    fn default() -> Self {
        Self::new()
    }
}

/// The inbox the BLE GATT callback posts into.
pub static REMOTE_INBOX: OverrideInbox = OverrideInbox::new();

// ── Channel ────────────────────────────────────────────────────

/// Last accepted remote intent plus the override flag.
#[derive(Debug, Default)]
pub struct OverrideChannel {
    current: OverrideCommand,
    active: bool,
}

impl OverrideChannel {
    pub const fn new() -> Self {
        Self {
            current: OverrideCommand::None,
            active: false,
        }
    }

    /// Parse and record a remote message.
    ///
    /// Rejected messages leave both `current()` and `is_active()` untouched.
    pub fn receive(&mut self, msg: &RawRemoteMessage) -> Result<OverrideCommand, ParseError> {
        let cmd = match OverrideCommand::parse(msg.as_bytes()) {
            Ok(cmd) => cmd,
            Err(e) => {
                warn!("Override: ignoring {:?}: {}", msg.as_bytes(), e);
                return Err(e);
            }
        };
        self.current = cmd;
        match cmd {
            OverrideCommand::ForceLock | OverrideCommand::ForceUnlock => {
                self.active = true;
                info!("Override: {:?}, schedule suspended", cmd);
            }
            OverrideCommand::ClearOverride => {
                self.active = false;
                info!("Override: cleared, schedule resumes");
            }
            OverrideCommand::None => {}
        }
        Ok(cmd)
    }

    pub fn current(&self) -> OverrideCommand {
        self.current
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
