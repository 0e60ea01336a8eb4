//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_MAC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9A-Fa-f]{2}[:\-]){5}([0-9A-Fa-f]{2})$").unwrap());
static RE_HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z.\-]+(:[0-9]{1,5})?$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "HPRT_CONNECT_TYPE" => {
            if !["bluetooth", "wifi", "usb"].contains(&value.to_ascii_lowercase().as_str()) {
                return Err("must be 'bluetooth', 'wifi' or 'usb'".into());
            }
        }
        "HPRT_ENABLE_TIMEOUT_MS" => validate_int_range(value, 100, 60_000)?,
        "HPRT_TEAR_SPACING" => validate_int_range(value, 0, 2_000)?,
        "HPRT_NEW_LINES" => validate_int_range(value, 0, 20)?,
        "HPRT_CODEPAGE" => {
            if !value.is_empty() && value.split(',').nth(1).is_none_or(|l| l.trim().is_empty()) {
                return Err("expected '<index>,<Language>'".into());
            }
        }
        "HPRT_PRINTER_NAME" => {
            if value.len() > 255 {
                return Err("printer name must be at most 255 characters".into());
            }
        }
        _ => {}
    }
    Ok(())
}

/// Validate a printer address for the given transport.
pub fn validate_address(connect_type: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    match connect_type.to_ascii_lowercase().as_str() {
        "bluetooth" if !RE_MAC.is_match(value) => {
            Err("invalid Bluetooth address (expected AA:BB:CC:DD:EE:FF)".into())
        }
        "wifi" if !RE_HOST.is_match(value) => {
            Err("invalid network address (expected host or host:port)".into())
        }
        _ => Ok(()),
    }
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_connect_type() {
        assert!(validate_setting("HPRT_CONNECT_TYPE", "bluetooth").is_ok());
        assert!(validate_setting("HPRT_CONNECT_TYPE", "WiFi").is_ok());
        assert!(validate_setting("HPRT_CONNECT_TYPE", "serial").is_err());
    }

    #[test]
    fn test_valid_bluetooth_address() {
        assert!(validate_address("bluetooth", "AA:BB:CC:DD:EE:FF").is_ok());
        assert!(validate_address("bluetooth", "aa-bb-cc-dd-ee-ff").is_ok());
        assert!(validate_address("bluetooth", "invalid").is_err());
        assert!(validate_address("bluetooth", "").is_ok()); // empty is ok
        assert!(validate_address("wifi", "192.168.1.40:9100").is_ok());
        assert!(validate_address("wifi", "printer host").is_err());
    }

    #[test]
    fn test_valid_ranges() {
        assert!(validate_setting("HPRT_ENABLE_TIMEOUT_MS", "6000").is_ok());
        assert!(validate_setting("HPRT_ENABLE_TIMEOUT_MS", "50").is_err());
        assert!(validate_setting("HPRT_ENABLE_TIMEOUT_MS", "soon").is_err());
        assert!(validate_setting("HPRT_TEAR_SPACING", "120").is_ok());
        assert!(validate_setting("HPRT_TEAR_SPACING", "-1").is_err());
    }

    #[test]
    fn test_valid_codepage() {
        assert!(validate_setting("HPRT_CODEPAGE", "").is_ok());
        assert!(validate_setting("HPRT_CODEPAGE", "15,Chinese").is_ok());
        assert!(validate_setting("HPRT_CODEPAGE", "15").is_err());
        assert!(validate_setting("HPRT_CODEPAGE", "15, ").is_err());
    }
}
