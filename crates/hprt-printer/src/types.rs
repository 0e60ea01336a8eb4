//! Value types shared by the session and the print operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PrinterError;

/// A paired printer: transport address plus a display label.
///
/// Built once during discovery and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterDescriptor {
    address: String,
    display_name: String,
}

impl PrinterDescriptor {
    pub fn new(address: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            display_name: display_name.into(),
        }
    }

    /// Transport-level identifier, unique per paired device.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Human-readable label. Not guaranteed unique, may be empty.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// How the SDK reaches the printer; rendered as the port-spec prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransportKind {
    #[default]
    Bluetooth,
    #[serde(rename = "WiFi")]
    WiFi,
    #[serde(rename = "USB")]
    Usb,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Bluetooth => "Bluetooth",
            TransportKind::WiFi => "WiFi",
            TransportKind::Usb => "USB",
        }
    }

    /// Native port spec: `"<kind>,<address>"`.
    pub fn port_spec(&self, address: &str) -> String {
        format!("{},{address}", self.as_str())
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bluetooth" => Ok(TransportKind::Bluetooth),
            "wifi" => Ok(TransportKind::WiFi),
            "usb" => Ok(TransportKind::Usb),
            other => Err(format!("unknown transport kind: {other}")),
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

bitflags::bitflags! {
    /// Text attribute bitmask understood by the SDK's `PrintText`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextAttribute: u8 {
        const MINI = 1;
        const BOLD = 2;
        const UNDERLINE = 4;
        const WHITE = 8;
        const DOUBLE_HEIGHT = 16;
        const DOUBLE_WIDTH = 32;
        const DOUBLE_BOTH = Self::DOUBLE_HEIGHT.bits() | Self::DOUBLE_WIDTH.bits();
    }
}

impl TextAttribute {
    pub const NORMAL: Self = Self::empty();
}

/// QR code placement on the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Justification {
    Left = 0,
    Center = 1,
    Right = 2,
}

impl FromStr for Justification {
    type Err = PrinterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Justification::Left),
            "C" => Ok(Justification::Center),
            "R" => Ok(Justification::Right),
            other => Err(PrinterError::InvalidJustification(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CutMode {
    Full = 0,
    Partial = 1,
}

/// Facade-side view of the port lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

/// How [`crate::PrinterSession::enable_transport`] succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableOutcome {
    /// Already on.
    Enabled,
    /// Already on and currently running device discovery.
    Discovering,
    /// Was off; came up before the deadline.
    EnabledAfterRequest,
}

impl fmt::Display for EnableOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnableOutcome::Enabled => f.write_str("Bluetooth is enabled"),
            EnableOutcome::Discovering => {
                f.write_str("Bluetooth is currently in device discovery process")
            }
            EnableOutcome::EnabledAfterRequest => f.write_str("Bluetooth has been enabled"),
        }
    }
}
