//! Native collaborator contracts.
//!
//! The HPRT SDK and the platform Bluetooth adapter are closed components.
//! Their calls are synchronous and either return or raise; a raised fault
//! surfaces here as [`NativeFault`].

use std::path::Path;

/// A fault raised by a native call, carrying its description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct NativeFault(String);

impl NativeFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Result of a single native call.
pub type NativeResult<T> = std::result::Result<T, NativeFault>;

/// The printer helper exposed by the vendor SDK.
///
/// All print calls are fire-and-forget: success means the SDK accepted the
/// command, not that paper came out.
pub trait PrinterSdk: Send + Sync {
    /// Open a port from a `"<kind>,<address>"` spec. Returns
    /// [`crate::PORT_OPEN_FAILED`] when the port cannot be opened.
    fn port_open(&self, spec: &str) -> NativeResult<i32>;

    fn port_close(&self) -> NativeResult<()>;

    fn is_opened(&self) -> bool;

    /// Print text with alignment, attribute bitmask and size.
    fn print_text(&self, text: &str, align: u8, attr: u8, size: u8) -> NativeResult<()>;

    /// Rasterise and print an image file. Hints are passed through unmodified.
    fn print_image(&self, path: &Path, halftone: u8, scale: u8, dpi: u8) -> NativeResult<()>;

    /// Stream a prebuilt command file to the printer.
    fn print_binary_file(&self, path: &Path) -> NativeResult<()>;

    /// `size` and `level` are already in the SDK's calibrated form.
    fn print_qr_code(&self, text: &str, size: u8, level: u8, justify: u8) -> NativeResult<()>;

    fn print_and_feed(&self, units: u32) -> NativeResult<()>;

    fn cut_paper(&self, mode: u8) -> NativeResult<()>;

    fn set_character_set(&self, index: u8) -> NativeResult<()>;

    fn set_language_encoding(&self, encoding: &str) -> NativeResult<()>;

    /// Text encoding the SDK uses for a codepage language (e.g. `"gb2312"`).
    fn language_encoding_for(&self, language: &str) -> NativeResult<String>;

    /// Codepage index the SDK assigns to a language.
    fn code_page_index_for(&self, language: &str) -> NativeResult<u8>;
}

/// A paired device as reported by the platform adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDevice {
    pub address: String,
    /// `None` when the platform has no cached name for the device.
    pub name: Option<String>,
}

/// The platform Bluetooth adapter.
pub trait BluetoothRadio: Send + Sync {
    fn is_enabled(&self) -> bool;

    fn is_discovering(&self) -> bool;

    /// Ask the platform to turn the radio on. Returns whether the request
    /// was accepted; the radio may still come up later or not at all.
    fn enable(&self) -> bool;

    /// Addresses of bonded devices in platform enumeration order.
    fn bonded_devices(&self) -> Vec<String>;

    fn remote_device(&self, address: &str) -> NativeResult<RemoteDevice>;
}
