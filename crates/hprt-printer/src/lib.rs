//! Session facade over the HPRT Bluetooth receipt-printer SDK.
//!
//! Every operation forwards into the native SDK ([`PrinterSdk`]) or the
//! platform radio ([`BluetoothRadio`]) and turns the synchronous outcome
//! into an async [`Result`]. Command framing, codepages and rasterisation
//! all live behind those traits.
//!
//! Callers serialize access: one session, one open port, no internal locking.

pub mod mock;
pub mod native;
pub mod options;
mod print;
pub mod profile;
pub mod session;
mod stored_image;
pub mod types;
pub mod watch;

// Re-exports for convenience
pub use native::{BluetoothRadio, NativeFault, PrinterSdk, RemoteDevice};
pub use options::SessionOptions;
pub use print::{CUT_FEED_UNITS, HORIZONTAL_LINE, QR_LEVEL_OFFSET};
pub use profile::PrinterProfile;
pub use session::PrinterSession;
pub use types::{
    Alignment, CutMode, EnableOutcome, Justification, PrinterDescriptor, SessionState,
    TextAttribute, TransportKind,
};
pub use watch::TransportWatch;

/// Value the SDK returns from `PortOpen` when the port could not be opened.
pub const PORT_OPEN_FAILED: i32 = -1;

/// Errors that can occur during printer operations.
#[derive(Debug, thiserror::Error)]
pub enum PrinterError {
    #[error("Bluetooth is not supported on this device")]
    UnsupportedHardware,

    #[error("Bluetooth was not enabled after {0} ms, please enable it manually")]
    EnableTimeout(u64),

    #[error("No port could be opened for {0}")]
    PortOpenFailed(String),

    #[error("Failed to close port: {0}")]
    PortCloseFailed(String),

    #[error("Native operation failed: {0}")]
    NativeOperationFault(String),

    #[error("Unknown QR code justification {0:?} (expected \"L\", \"C\" or \"R\")")]
    InvalidJustification(String),

    #[error("QR code size {0} is out of range")]
    InvalidQrSize(u8),

    #[error("Invalid image payload: {0}")]
    ImageDecode(String),
}

impl From<NativeFault> for PrinterError {
    fn from(fault: NativeFault) -> Self {
        PrinterError::NativeOperationFault(fault.to_string())
    }
}

/// Result type alias for printer operations.
pub type Result<T> = std::result::Result<T, PrinterError>;
