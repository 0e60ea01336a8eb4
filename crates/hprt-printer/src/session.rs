//! Radio gating, paired-device discovery and the port lifecycle.
//!
//! Print operations live in `print.rs` on the same type.

use std::sync::Arc;
use std::time::Duration;

use crate::native::{BluetoothRadio, PrinterSdk};
use crate::options::SessionOptions;
use crate::profile::PrinterProfile;
use crate::types::{EnableOutcome, PrinterDescriptor, SessionState};
use crate::watch::TransportWatch;
use crate::{PORT_OPEN_FAILED, PrinterError, Result};

/// Async facade over one native printer helper and the platform radio.
///
/// Only one port is modelled. Opening a second one while connected is left
/// to the SDK; callers must serialize access to the session.
pub struct PrinterSession<P, R> {
    pub(crate) sdk: P,
    radio: Option<Arc<R>>,
    pub(crate) options: SessionOptions,
    state: SessionState,
}

impl<P: PrinterSdk, R: BluetoothRadio> PrinterSession<P, R> {
    /// Create a session. Pass `None` for `radio` on hardware without Bluetooth.
    pub fn new(sdk: P, radio: Option<R>, options: SessionOptions) -> Self {
        Self {
            sdk,
            radio: radio.map(Arc::new),
            options,
            state: SessionState::Disconnected,
        }
    }

    pub fn sdk(&self) -> &P {
        &self.sdk
    }

    pub fn radio(&self) -> Option<&R> {
        self.radio.as_deref()
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn profile(&self) -> &PrinterProfile {
        &self.options.profile
    }

    pub fn profile_mut(&mut self) -> &mut PrinterProfile {
        &mut self.options.profile
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    // --- Connectivity gating ---

    /// Make sure the radio is on.
    ///
    /// If it is off, an enable request is issued and the radio is sampled
    /// exactly once when `timeout` (default from options) has elapsed. A radio
    /// that comes up just after the deadline is still reported as
    /// [`PrinterError::EnableTimeout`].
    pub async fn enable_transport(&self, timeout: Option<Duration>) -> Result<EnableOutcome> {
        let radio = self
            .radio
            .as_deref()
            .ok_or(PrinterError::UnsupportedHardware)?;

        if radio.is_enabled() {
            let outcome = if radio.is_discovering() {
                EnableOutcome::Discovering
            } else {
                EnableOutcome::Enabled
            };
            tracing::debug!(?outcome, "Bluetooth already enabled");
            return Ok(outcome);
        }

        let wait = timeout.unwrap_or(self.options.enable_timeout);
        let accepted = radio.enable();
        let wait_ms = duration_millis(wait);
        tracing::info!(accepted, wait_ms, "Requested Bluetooth enable");

        tokio::time::sleep(wait).await;

        if radio.is_enabled() {
            tracing::info!("Bluetooth enabled");
            Ok(EnableOutcome::EnabledAfterRequest)
        } else {
            tracing::warn!(wait_ms, "Bluetooth did not come up");
            Err(PrinterError::EnableTimeout(wait_ms))
        }
    }

    /// Snapshot of the radio state. `false` when there is no radio.
    pub fn is_transport_enabled(&self) -> bool {
        radio_enabled(self.radio.as_deref())
    }

    /// Same snapshot as [`Self::is_transport_enabled`]; never fails.
    pub async fn is_transport_enabled_async(&self) -> bool {
        self.is_transport_enabled()
    }

    /// Observe the radio state every `watch_interval`, yielding only changes.
    ///
    /// Must be called from within a tokio runtime.
    pub fn watch_transport(&self) -> TransportWatch
    where
        R: 'static,
    {
        TransportWatch::spawn(self.radio.clone(), self.options.watch_interval)
    }

    // --- Discovery ---

    /// List bonded devices in platform order. An empty registry is not an error.
    pub async fn discover_paired_printers(&self) -> Result<Vec<PrinterDescriptor>> {
        let radio = self
            .radio
            .as_deref()
            .ok_or(PrinterError::UnsupportedHardware)?;

        let printers = radio
            .bonded_devices()
            .iter()
            .map(|address| -> Result<PrinterDescriptor> {
                let device = radio.remote_device(address)?;
                Ok(PrinterDescriptor::new(
                    device.address,
                    device.name.unwrap_or_default(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(count = printers.len(), "Paired printers enumerated");
        Ok(printers)
    }

    // --- Session lifecycle ---

    /// Open a port to `printer` using the profile's transport kind.
    pub async fn connect(&mut self, printer: &PrinterDescriptor) -> Result<()> {
        let spec = self.options.profile.connect_type.port_spec(printer.address());
        tracing::info!(port = %spec, name = %printer.display_name(), "Opening printer port");

        self.state = SessionState::Connecting;
        match self.sdk.port_open(&spec) {
            Ok(PORT_OPEN_FAILED) => {
                self.state = SessionState::Disconnected;
                tracing::warn!(port = %spec, "No ports open");
                Err(PrinterError::PortOpenFailed(spec))
            }
            Ok(handle) => {
                self.state = SessionState::Connected;
                tracing::info!(port = %spec, handle, "Printer connected");
                Ok(())
            }
            Err(fault) => {
                self.state = SessionState::Disconnected;
                tracing::error!(port = %spec, error = %fault, "Port open raised");
                Err(fault.into())
            }
        }
    }

    /// Close the port. The session ends up disconnected even if the SDK raises.
    pub async fn disconnect(&mut self) -> Result<()> {
        self.state = SessionState::Disconnecting;
        let result = self.sdk.port_close();
        self.state = SessionState::Disconnected;

        match result {
            Ok(()) => {
                tracing::info!("Printer port closed");
                Ok(())
            }
            Err(fault) => {
                tracing::warn!(error = %fault, "Port close raised");
                Err(PrinterError::PortCloseFailed(fault.to_string()))
            }
        }
    }

    /// Whether the SDK reports an open port.
    pub fn is_connected(&self) -> bool {
        self.sdk.is_opened()
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub(crate) fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn radio_enabled<R: BluetoothRadio>(radio: Option<&R>) -> bool {
    radio.is_some_and(|r| r.is_enabled())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{EnableBehavior, MockPrinter, MockRadio, SdkCall};

    fn session(radio: Option<MockRadio>) -> PrinterSession<MockPrinter, MockRadio> {
        PrinterSession::new(MockPrinter::new(), radio, SessionOptions::default())
    }

    #[tokio::test]
    async fn enable_without_radio_is_unsupported() {
        let s = session(None);
        let err = s.enable_transport(None).await.unwrap_err();
        assert!(matches!(err, PrinterError::UnsupportedHardware));
        assert!(!s.is_transport_enabled());
        assert!(!s.is_transport_enabled_async().await);
    }

    #[tokio::test(start_paused = true)]
    async fn enable_when_already_on_does_not_wait() {
        let s = session(Some(MockRadio::enabled()));
        let start = tokio::time::Instant::now();

        assert_eq!(
            s.enable_transport(None).await.unwrap(),
            EnableOutcome::Enabled
        );
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(s.radio().unwrap().enable_requests(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn enable_reports_discovery_in_progress() {
        let radio = MockRadio::enabled();
        radio.set_discovering(true);
        let s = session(Some(radio));

        assert_eq!(
            s.enable_transport(None).await.unwrap(),
            EnableOutcome::Discovering
        );
    }

    #[tokio::test(start_paused = true)]
    async fn enable_waits_full_timeout_before_failing() {
        let s = session(Some(MockRadio::disabled(EnableBehavior::Never)));
        let start = tokio::time::Instant::now();

        let err = s.enable_transport(None).await.unwrap_err();

        assert!(matches!(err, PrinterError::EnableTimeout(6000)));
        assert!(start.elapsed() >= Duration::from_millis(6000));
        assert_eq!(s.radio().unwrap().enable_requests(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn enable_succeeds_when_radio_comes_up_in_time() {
        let radio = MockRadio::disabled(EnableBehavior::After(Duration::from_millis(1500)));
        let s = session(Some(radio));

        let outcome = s
            .enable_transport(Some(Duration::from_millis(2000)))
            .await
            .unwrap();
        assert_eq!(outcome, EnableOutcome::EnabledAfterRequest);
    }

    #[tokio::test(start_paused = true)]
    async fn enable_after_deadline_is_reported_as_timeout() {
        let radio = MockRadio::disabled(EnableBehavior::After(Duration::from_millis(2500)));
        let s = session(Some(radio));

        let err = s
            .enable_transport(Some(Duration::from_millis(2000)))
            .await
            .unwrap_err();
        assert!(matches!(err, PrinterError::EnableTimeout(2000)));

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(s.is_transport_enabled());
    }

    #[tokio::test]
    async fn discovery_preserves_platform_order() {
        let radio = MockRadio::enabled()
            .with_bonded("66:77:88:99:AA:BB", Some("Kitchen"))
            .with_bonded("00:11:22:33:44:55", None);
        let s = session(Some(radio));

        let printers = s.discover_paired_printers().await.unwrap();
        assert_eq!(
            printers,
            vec![
                PrinterDescriptor::new("66:77:88:99:AA:BB", "Kitchen"),
                PrinterDescriptor::new("00:11:22:33:44:55", ""),
            ]
        );
    }

    #[tokio::test]
    async fn discovery_with_empty_registry_is_empty() {
        let s = session(Some(MockRadio::enabled()));
        assert!(s.discover_paired_printers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn discovery_lookup_fault_is_propagated() {
        let radio = MockRadio::enabled().with_bonded("00:11:22:33:44:55", Some("MPT-II"));
        radio.fail_lookups("device vanished");
        let s = session(Some(radio));

        let err = s.discover_paired_printers().await.unwrap_err();
        assert!(matches!(err, PrinterError::NativeOperationFault(m) if m == "device vanished"));
    }

    #[tokio::test]
    async fn connect_uses_profile_transport_kind() {
        let mut s = session(Some(MockRadio::enabled()));
        s.profile_mut().connect_type = crate::TransportKind::WiFi;
        let printer = PrinterDescriptor::new("192.168.1.40", "Counter");

        s.connect(&printer).await.unwrap();

        assert_eq!(s.state(), SessionState::Connected);
        assert_eq!(
            s.sdk().calls(),
            vec![SdkCall::PortOpen("WiFi,192.168.1.40".into())]
        );
    }

    #[tokio::test]
    async fn connect_sentinel_maps_to_port_open_failed() {
        let mut s = session(Some(MockRadio::enabled()));
        s.sdk().set_port_open_result(PORT_OPEN_FAILED);
        let printer = PrinterDescriptor::new("00:11:22:33:44:55", "MPT-II");

        let err = s.connect(&printer).await.unwrap_err();

        assert!(matches!(err, PrinterError::PortOpenFailed(_)));
        assert_eq!(
            err.to_string(),
            "No port could be opened for Bluetooth,00:11:22:33:44:55"
        );
        assert_eq!(s.state(), SessionState::Disconnected);
        assert!(!s.is_connected());
    }

    #[tokio::test]
    async fn connect_accepts_any_non_sentinel_handle() {
        for handle in [0, 1, 7, -2] {
            let mut s = session(None);
            s.sdk().set_port_open_result(handle);
            s.connect(&PrinterDescriptor::new("AA", "")).await.unwrap();
            assert_eq!(s.state(), SessionState::Connected);
        }
    }

    #[tokio::test]
    async fn connect_fault_is_native_fault() {
        let mut s = session(None);
        s.sdk().fail_operation("port_open", "socket closed");

        let err = s
            .connect(&PrinterDescriptor::new("AA", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, PrinterError::NativeOperationFault(m) if m == "socket closed"));
        assert_eq!(s.state(), SessionState::Disconnected);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let mut s = session(None);
        s.disconnect().await.unwrap();
        s.disconnect().await.unwrap();
        assert_eq!(s.state(), SessionState::Disconnected);
        assert_eq!(s.sdk().calls(), vec![SdkCall::PortClose, SdkCall::PortClose]);
    }

    #[tokio::test]
    async fn disconnect_fault_still_ends_disconnected() {
        let mut s = session(None);
        s.connect(&PrinterDescriptor::new("AA", "")).await.unwrap();
        s.sdk().fail_operation("port_close", "already closed by peer");

        let err = s.disconnect().await.unwrap_err();
        assert!(matches!(err, PrinterError::PortCloseFailed(m) if m == "already closed by peer"));
        assert_eq!(s.state(), SessionState::Disconnected);
    }

    #[test]
    fn duration_millis_saturates() {
        assert_eq!(duration_millis(Duration::from_millis(6000)), 6000);
        assert_eq!(duration_millis(Duration::from_micros(1500)), 1);
        assert_eq!(duration_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn radio_enabled_handles_missing_radio() {
        assert!(!radio_enabled::<MockRadio>(None));
        let radio = MockRadio::enabled();
        assert!(radio_enabled(Some(&radio)));
    }
}
