//! Runtime host configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use hprt_printer::{PrinterProfile, SessionOptions, TransportKind};

use super::validation::{validate_address, validate_setting};

/// Runtime configuration populated from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub printer_address: String,
    pub printer_name: String,
    pub connect_type: TransportKind,
    pub enable_timeout_ms: u64,
    /// Overrides the profile's tear spacing when set.
    pub tear_spacing: Option<u32>,
    pub documents_dir: PathBuf,
    pub profile_path: Option<PathBuf>,
    pub codepage: String,
    pub new_lines: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            printer_address: String::new(),
            printer_name: "MPT-II".into(),
            connect_type: TransportKind::Bluetooth,
            enable_timeout_ms: 6000,
            tear_spacing: None,
            documents_dir: default_documents_dir(),
            profile_path: None,
            codepage: String::new(),
            new_lines: 2,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let g = |key: &str| -> Result<String, anyhow::Error> {
            let value = lookup(key).unwrap_or_default();
            if !value.is_empty() {
                validate_setting(key, &value)
                    .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;
            }
            Ok(value)
        };
        let defaults = Self::default();

        let connect_type_raw = g("HPRT_CONNECT_TYPE")?;
        let connect_type = if connect_type_raw.is_empty() {
            defaults.connect_type
        } else {
            connect_type_raw
                .parse::<TransportKind>()
                .map_err(|e| anyhow::anyhow!(e))?
        };

        let printer_address = g("HPRT_PRINTER_ADDRESS")?;
        validate_address(connect_type.as_str(), &printer_address)
            .map_err(|e| anyhow::anyhow!("validation error for HPRT_PRINTER_ADDRESS: {e}"))?;

        let tear_spacing = g("HPRT_TEAR_SPACING")?;

        Ok(Self {
            printer_address,
            printer_name: {
                let n = g("HPRT_PRINTER_NAME")?;
                if n.is_empty() { defaults.printer_name } else { n }
            },
            connect_type,
            enable_timeout_ms: parse_u64(&g("HPRT_ENABLE_TIMEOUT_MS")?, defaults.enable_timeout_ms),
            tear_spacing: (!tear_spacing.is_empty()).then(|| parse_u32(&tear_spacing, 0)),
            documents_dir: {
                let d = g("HPRT_DOCUMENTS_DIR")?;
                if d.is_empty() { defaults.documents_dir } else { PathBuf::from(d) }
            },
            profile_path: Some(g("HPRT_PROFILE_PATH")?)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            codepage: g("HPRT_CODEPAGE")?,
            new_lines: parse_u64(&g("HPRT_NEW_LINES")?, defaults.new_lines as u64) as usize,
        })
    }

    /// Read the JSON profile (if configured) and apply overrides.
    pub fn profile(&self) -> Result<PrinterProfile, anyhow::Error> {
        let mut profile = match &self.profile_path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    anyhow::anyhow!("failed to read profile {}: {e}", path.display())
                })?;
                PrinterProfile::from_json(&json)?
            }
            None => PrinterProfile::default(),
        };

        profile.connect_type = self.connect_type;
        if let Some(units) = self.tear_spacing {
            profile.tear_spacing = units;
        }
        Ok(profile)
    }

    /// Session options for this configuration.
    pub fn session_options(&self) -> Result<SessionOptions, anyhow::Error> {
        Ok(SessionOptions::new()
            .with_enable_timeout(Duration::from_millis(self.enable_timeout_ms))
            .with_documents_dir(&self.documents_dir)
            .with_profile(self.profile()?))
    }
}

fn default_documents_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".hprt-host")
}

fn parse_u64(s: &str, default: u64) -> u64 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn parse_u32(s: &str, default: u32) -> u32 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
