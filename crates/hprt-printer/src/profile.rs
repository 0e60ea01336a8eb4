//! Capabilities and print preferences of the targeted printer.
//!
//! Owned by the session. Pairing or configuration code fills it in; print
//! operations read from it (e.g. the tear spacing fed after a QR code).

use serde::{Deserialize, Serialize};

use crate::types::TransportKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrinterProfile {
    pub barcode: String,
    /// Printable width in dots.
    pub printable_width: u32,
    /// Whether the printer has a cutter.
    pub cut: bool,
    pub cut_spacing: u32,
    /// Feed units after a QR code so it clears the tear bar.
    pub tear_spacing: u32,
    pub connect_type: TransportKind,
    pub cash_drawer: bool,
    pub buzzer: bool,
    pub page_mode: bool,
    pub page_mode_area: String,
    pub get_remaining_power: bool,
    pub sample_receipt: bool,
    pub status_mode: u8,
}

impl Default for PrinterProfile {
    fn default() -> Self {
        Self {
            barcode: String::new(),
            printable_width: 0,
            cut: false,
            cut_spacing: 0,
            tear_spacing: 0,
            connect_type: TransportKind::Bluetooth,
            cash_drawer: false,
            buzzer: false,
            page_mode: false,
            page_mode_area: String::new(),
            get_remaining_power: false,
            sample_receipt: true,
            status_mode: 0,
        }
    }
}

impl PrinterProfile {
    /// Parse a profile from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_tear_spacing(mut self, units: u32) -> Self {
        self.tear_spacing = units;
        self
    }

    pub fn with_connect_type(mut self, kind: TransportKind) -> Self {
        self.connect_type = kind;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fresh_printer() {
        let p = PrinterProfile::default();
        assert_eq!(p.tear_spacing, 0);
        assert_eq!(p.connect_type, TransportKind::Bluetooth);
        assert!(p.sample_receipt);
        assert!(!p.cut);
        assert!(p.page_mode_area.is_empty());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let p = PrinterProfile::from_json(
            r#"{"printableWidth": 384, "tearSpacing": 120, "connectType": "WiFi", "buzzer": true}"#,
        )
        .unwrap();

        assert_eq!(p.printable_width, 384);
        assert_eq!(p.tear_spacing, 120);
        assert_eq!(p.connect_type, TransportKind::WiFi);
        assert!(p.buzzer);
        assert!(p.sample_receipt);
        assert_eq!(p.status_mode, 0);
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(PrinterProfile::from_json(r#"{"tearSpacing": "lots"}"#).is_err());
    }
}
