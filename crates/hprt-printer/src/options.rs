//! Session configuration options.
//!
//! Timing for radio enablement and polling, where decoded images are stored,
//! and the printer profile the session starts with.

use std::path::PathBuf;
use std::time::Duration;

use crate::profile::PrinterProfile;

/// Default wait before checking whether the radio came up.
pub const DEFAULT_ENABLE_TIMEOUT: Duration = Duration::from_millis(6000);

/// Default sampling interval for [`crate::TransportWatch`].
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for a [`crate::PrinterSession`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// How long `enable_transport` waits before its single check.
    pub enable_timeout: Duration,

    /// How often the transport watch samples the radio.
    pub watch_interval: Duration,

    /// Application document storage; decoded base64 images are written here.
    pub documents_dir: PathBuf,

    /// Initial printer profile.
    pub profile: PrinterProfile,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            enable_timeout: DEFAULT_ENABLE_TIMEOUT,
            watch_interval: DEFAULT_WATCH_INTERVAL,
            documents_dir: std::env::temp_dir(),
            profile: PrinterProfile::default(),
        }
    }
}

impl SessionOptions {
    /// Create options with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the enable timeout.
    pub fn with_enable_timeout(mut self, timeout: Duration) -> Self {
        self.enable_timeout = timeout;
        self
    }

    /// Builder: set the watch interval.
    ///
    /// # Panics
    /// Panics if the interval is zero.
    pub fn with_watch_interval(mut self, interval: Duration) -> Self {
        assert!(
            !interval.is_zero(),
            "Watch interval must be greater than zero"
        );
        self.watch_interval = interval;
        self
    }

    /// Builder: set the documents directory.
    pub fn with_documents_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.documents_dir = dir.into();
        self
    }

    /// Builder: set the printer profile.
    pub fn with_profile(mut self, profile: PrinterProfile) -> Self {
        self.profile = profile;
        self
    }
}
