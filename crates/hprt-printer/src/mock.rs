//! Mock SDK and radio for testing and dry runs.
//!
//! [`MockPrinter`] records every native call and can be told to raise on
//! specific operations. [`MockRadio`] simulates an adapter that is on, off,
//! or comes up some time after an enable request.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::native::{BluetoothRadio, NativeFault, NativeResult, PrinterSdk, RemoteDevice};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A native call as seen by [`MockPrinter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    PortOpen(String),
    PortClose,
    PrintText {
        text: String,
        align: u8,
        attr: u8,
        size: u8,
    },
    PrintImage {
        path: PathBuf,
        halftone: u8,
        scale: u8,
        dpi: u8,
    },
    PrintBinaryFile(PathBuf),
    PrintQrCode {
        text: String,
        size: u8,
        level: u8,
        justify: u8,
    },
    PrintAndFeed(u32),
    CutPaper(u8),
    SetCharacterSet(u8),
    SetLanguageEncoding(String),
}

impl SdkCall {
    /// Operation name used by [`MockPrinter::fail_operation`].
    pub fn operation(&self) -> &'static str {
        match self {
            SdkCall::PortOpen(_) => "port_open",
            SdkCall::PortClose => "port_close",
            SdkCall::PrintText { .. } => "print_text",
            SdkCall::PrintImage { .. } => "print_image",
            SdkCall::PrintBinaryFile(_) => "print_binary_file",
            SdkCall::PrintQrCode { .. } => "print_qr_code",
            SdkCall::PrintAndFeed(_) => "print_and_feed",
            SdkCall::CutPaper(_) => "cut_paper",
            SdkCall::SetCharacterSet(_) => "set_character_set",
            SdkCall::SetLanguageEncoding(_) => "set_language_encoding",
        }
    }
}

/// Recording stand-in for the HPRT printer helper.
///
/// Calls that are told to fail are still recorded.
#[derive(Debug)]
pub struct MockPrinter {
    calls: Mutex<Vec<SdkCall>>,
    opened: AtomicBool,
    port_open_result: AtomicI32,
    failures: Mutex<HashMap<&'static str, String>>,
    languages: Mutex<HashMap<String, (String, u8)>>,
}

impl Default for MockPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPrinter {
    /// A printer that accepts every call and opens ports with handle `0`.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            opened: AtomicBool::new(false),
            port_open_result: AtomicI32::new(0),
            failures: Mutex::new(HashMap::new()),
            languages: Mutex::new(HashMap::new()),
        }
    }

    /// Builder: register a codepage language with its encoding and index.
    pub fn with_language(self, language: &str, encoding: &str, index: u8) -> Self {
        lock(&self.languages).insert(language.to_string(), (encoding.to_string(), index));
        self
    }

    /// Value returned by the next `port_open` calls.
    pub fn set_port_open_result(&self, value: i32) {
        self.port_open_result.store(value, Ordering::SeqCst);
    }

    /// Make `operation` (see [`SdkCall::operation`]) raise with `message`.
    pub fn fail_operation(&self, operation: &'static str, message: &str) {
        lock(&self.failures).insert(operation, message.to_string());
    }

    /// Stop raising on `operation`.
    pub fn clear_failure(&self, operation: &'static str) {
        lock(&self.failures).remove(operation);
    }

    /// All calls recorded so far, in order.
    pub fn calls(&self) -> Vec<SdkCall> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    fn check(&self, operation: &'static str) -> NativeResult<()> {
        match lock(&self.failures).get(operation) {
            Some(message) => Err(NativeFault::new(message.clone())),
            None => Ok(()),
        }
    }

    fn record(&self, call: SdkCall) -> NativeResult<()> {
        let operation = call.operation();
        tracing::debug!(?call, "SDK call");
        lock(&self.calls).push(call);
        self.check(operation)
    }
}

impl PrinterSdk for MockPrinter {
    fn port_open(&self, spec: &str) -> NativeResult<i32> {
        self.record(SdkCall::PortOpen(spec.to_string()))?;
        let result = self.port_open_result.load(Ordering::SeqCst);
        if result != crate::PORT_OPEN_FAILED {
            self.opened.store(true, Ordering::SeqCst);
        }
        Ok(result)
    }

    fn port_close(&self) -> NativeResult<()> {
        self.opened.store(false, Ordering::SeqCst);
        self.record(SdkCall::PortClose)
    }

    fn is_opened(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    fn print_text(&self, text: &str, align: u8, attr: u8, size: u8) -> NativeResult<()> {
        self.record(SdkCall::PrintText {
            text: text.to_string(),
            align,
            attr,
            size,
        })
    }

    fn print_image(&self, path: &Path, halftone: u8, scale: u8, dpi: u8) -> NativeResult<()> {
        self.record(SdkCall::PrintImage {
            path: path.to_path_buf(),
            halftone,
            scale,
            dpi,
        })
    }

    fn print_binary_file(&self, path: &Path) -> NativeResult<()> {
        self.record(SdkCall::PrintBinaryFile(path.to_path_buf()))
    }

    fn print_qr_code(&self, text: &str, size: u8, level: u8, justify: u8) -> NativeResult<()> {
        self.record(SdkCall::PrintQrCode {
            text: text.to_string(),
            size,
            level,
            justify,
        })
    }

    fn print_and_feed(&self, units: u32) -> NativeResult<()> {
        self.record(SdkCall::PrintAndFeed(units))
    }

    fn cut_paper(&self, mode: u8) -> NativeResult<()> {
        self.record(SdkCall::CutPaper(mode))
    }

    fn set_character_set(&self, index: u8) -> NativeResult<()> {
        self.record(SdkCall::SetCharacterSet(index))
    }

    fn set_language_encoding(&self, encoding: &str) -> NativeResult<()> {
        self.record(SdkCall::SetLanguageEncoding(encoding.to_string()))
    }

    fn language_encoding_for(&self, language: &str) -> NativeResult<String> {
        self.check("language_encoding_for")?;
        lock(&self.languages)
            .get(language)
            .map(|(encoding, _)| encoding.clone())
            .ok_or_else(|| NativeFault::new(format!("unknown language: {language}")))
    }

    fn code_page_index_for(&self, language: &str) -> NativeResult<u8> {
        self.check("code_page_index_for")?;
        lock(&self.languages)
            .get(language)
            .map(|(_, index)| *index)
            .ok_or_else(|| NativeFault::new(format!("unknown language: {language}")))
    }
}

/// What a disabled [`MockRadio`] does after an enable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableBehavior {
    /// Comes up as soon as enable is requested.
    Immediate,
    /// Comes up once this much (tokio) time has passed since the request.
    After(Duration),
    /// Never comes up.
    Never,
}

/// Simulated platform Bluetooth adapter.
#[derive(Debug)]
pub struct MockRadio {
    enabled: AtomicBool,
    discovering: AtomicBool,
    behavior: EnableBehavior,
    requested_at: Mutex<Option<Instant>>,
    enable_requests: AtomicU32,
    bonded: Mutex<Vec<RemoteDevice>>,
    lookup_failure: Mutex<Option<String>>,
}

impl MockRadio {
    fn with_state(enabled: bool, behavior: EnableBehavior) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            discovering: AtomicBool::new(false),
            behavior,
            requested_at: Mutex::new(None),
            enable_requests: AtomicU32::new(0),
            bonded: Mutex::new(Vec::new()),
            lookup_failure: Mutex::new(None),
        }
    }

    /// A radio that is already on.
    pub fn enabled() -> Self {
        Self::with_state(true, EnableBehavior::Immediate)
    }

    /// A radio that is off and reacts to enable requests with `behavior`.
    pub fn disabled(behavior: EnableBehavior) -> Self {
        Self::with_state(false, behavior)
    }

    /// Builder: add a bonded device (enumeration order = insertion order).
    pub fn with_bonded(self, address: &str, name: Option<&str>) -> Self {
        lock(&self.bonded).push(RemoteDevice {
            address: address.to_string(),
            name: name.map(str::to_string),
        });
        self
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        if !enabled {
            *lock(&self.requested_at) = None;
        }
    }

    pub fn set_discovering(&self, discovering: bool) {
        self.discovering.store(discovering, Ordering::SeqCst);
    }

    /// Make `remote_device` raise with `message`.
    pub fn fail_lookups(&self, message: &str) {
        *lock(&self.lookup_failure) = Some(message.to_string());
    }

    /// Number of enable requests received.
    pub fn enable_requests(&self) -> u32 {
        self.enable_requests.load(Ordering::SeqCst)
    }
}

impl BluetoothRadio for MockRadio {
    fn is_enabled(&self) -> bool {
        if self.enabled.load(Ordering::SeqCst) {
            return true;
        }
        match (self.behavior, *lock(&self.requested_at)) {
            (EnableBehavior::After(delay), Some(at)) => at.elapsed() >= delay,
            _ => false,
        }
    }

    fn is_discovering(&self) -> bool {
        self.discovering.load(Ordering::SeqCst)
    }

    fn enable(&self) -> bool {
        self.enable_requests.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            EnableBehavior::Immediate => self.enabled.store(true, Ordering::SeqCst),
            EnableBehavior::After(_) => {
                lock(&self.requested_at).get_or_insert_with(Instant::now);
            }
            EnableBehavior::Never => {}
        }
        true
    }

    fn bonded_devices(&self) -> Vec<String> {
        lock(&self.bonded)
            .iter()
            .map(|d| d.address.clone())
            .collect()
    }

    fn remote_device(&self, address: &str) -> NativeResult<RemoteDevice> {
        if let Some(message) = lock(&self.lookup_failure).as_ref() {
            return Err(NativeFault::new(message.clone()));
        }
        lock(&self.bonded)
            .iter()
            .find(|d| d.address == address)
            .cloned()
            .ok_or_else(|| NativeFault::new(format!("no bonded device {address}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_calls_are_still_recorded() {
        let printer = MockPrinter::new();
        printer.fail_operation("cut_paper", "cutter jammed");

        let err = printer.cut_paper(1).unwrap_err();
        assert_eq!(err.message(), "cutter jammed");
        assert_eq!(printer.calls(), vec![SdkCall::CutPaper(1)]);

        printer.clear_failure("cut_paper");
        assert!(printer.cut_paper(1).is_ok());
    }

    #[test]
    fn port_state_follows_open_and_close() {
        let printer = MockPrinter::new();
        assert!(!printer.is_opened());
        printer.port_open("Bluetooth,AA").unwrap();
        assert!(printer.is_opened());
        printer.port_close().unwrap();
        assert!(!printer.is_opened());

        printer.set_port_open_result(crate::PORT_OPEN_FAILED);
        assert_eq!(printer.port_open("Bluetooth,AA").unwrap(), -1);
        assert!(!printer.is_opened());
    }

    #[test]
    fn immediate_radio_turns_on_when_asked() {
        let radio = MockRadio::disabled(EnableBehavior::Immediate);
        assert!(!radio.is_enabled());
        assert!(radio.enable());
        assert!(radio.is_enabled());
        assert_eq!(radio.enable_requests(), 1);
    }

    #[test]
    fn languages_resolve_through_registry() {
        let printer = MockPrinter::new().with_language("Chinese", "gb2312", 255);
        assert_eq!(printer.language_encoding_for("Chinese").unwrap(), "gb2312");
        assert_eq!(printer.code_page_index_for("Chinese").unwrap(), 255);
        assert!(printer.language_encoding_for("Klingon").is_err());
    }
}
