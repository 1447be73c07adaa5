//! Inbound commands to the application service.
//!
//! The remote control link (BLE Nordic UART) carries single-letter
//! commands that the [`LockController`](super::service::LockController)
//! interprets and acts upon.
//!
//! | Wire  | Command          | Effect                                   |
//! |-------|------------------|------------------------------------------|
//! | `U`   | `ForceUnlock`    | override on, unlock now                  |
//! | `L`   | `ForceLock`      | override on, lock now                    |
//! | `C`   | `ClearOverride`  | override off, schedule resumes next tick |

use crate::error::ParseError;

/// Manual intent received over the remote control link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverrideCommand {
    /// Nothing received since boot.
    #[default]
    None,
    ForceUnlock,
    ForceLock,
    ClearOverride,
}

impl OverrideCommand {
    /// Parse one raw write from the remote link.
    ///
    /// Terminal apps append a line ending, so a single trailing `\n` or
    /// `\r\n` is accepted.  Matching is case-sensitive.
    pub fn parse(raw: &[u8]) -> Result<Self, ParseError> {
        if raw.is_empty() {
            return Err(ParseError::Empty);
        }
        let body = raw
            .strip_suffix(b"\r\n")
            .or_else(|| raw.strip_suffix(b"\n"))
            .unwrap_or(raw);

        match body {
            b"U" => Ok(Self::ForceUnlock),
            b"L" => Ok(Self::ForceLock),
            b"C" => Ok(Self::ClearOverride),
            [] => Err(ParseError::Empty),
            _ => Err(ParseError::Unrecognized),
        }
    }

    /// Whether this command engages the override.
    pub fn is_force(self) -> bool {
        matches!(self, Self::ForceLock | Self::ForceUnlock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_and_terminated_letters() {
        assert_eq!(OverrideCommand::parse(b"U"), Ok(OverrideCommand::ForceUnlock));
        assert_eq!(OverrideCommand::parse(b"L\n"), Ok(OverrideCommand::ForceLock));
        assert_eq!(OverrideCommand::parse(b"C\r\n"), Ok(OverrideCommand::ClearOverride));
    }

    #[test]
    fn rejects_unknown_and_empty() {
        assert_eq!(OverrideCommand::parse(b""), Err(ParseError::Empty));
        assert_eq!(OverrideCommand::parse(b"\n"), Err(ParseError::Empty));
        assert_eq!(OverrideCommand::parse(b"X\n"), Err(ParseError::Unrecognized));
        assert_eq!(OverrideCommand::parse(b"l\n"), Err(ParseError::Unrecognized));
        assert_eq!(OverrideCommand::parse(b"LL"), Err(ParseError::Unrecognized));
        assert_eq!(OverrideCommand::parse(b"U\n\n"), Err(ParseError::Unrecognized));
    }

    #[test]
    fn only_force_commands_engage() {
        assert!(OverrideCommand::ForceLock.is_force());
        assert!(OverrideCommand::ForceUnlock.is_force());
        assert!(!OverrideCommand::ClearOverride.is_force());
        assert!(!OverrideCommand::None.is_force());
    }
}
