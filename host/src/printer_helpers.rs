use hprt_printer::PrinterDescriptor;

/// Pick the paired printer matching `target` (address in any notation, or name).
/// With an empty target the first paired printer wins.
pub fn find_target_printer(
    printers: Vec<PrinterDescriptor>,
    target: &str,
) -> Option<PrinterDescriptor> {
    if target.is_empty() {
        return printers.into_iter().next();
    }
    printers
        .into_iter()
        .find(|p| printer_matches_target(p.address(), p.display_name(), target))
}

pub fn normalize_device_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn printer_matches_target(address: &str, name: &str, target: &str) -> bool {
    address.eq_ignore_ascii_case(target)
        || normalize_device_id(address) == normalize_device_id(target)
        || (!name.is_empty() && name.eq_ignore_ascii_case(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_device_id_removes_separators() {
        assert_eq!(normalize_device_id("AA:BB:CC:DD:EE:FF"), "aabbccddeeff");
        assert_eq!(normalize_device_id("aa-bb-cc-dd-ee-ff"), "aabbccddeeff");
    }

    #[test]
    fn target_matching_logic() {
        assert!(printer_matches_target("AA:BB:CC:DD:EE:FF", "MPT-II", "aabbccddeeff"));
        assert!(printer_matches_target("001122334455", "MPT-II", "mpt-ii"));
        assert!(!printer_matches_target("001122334455", "", "not-found"));
    }

    #[test]
    fn empty_target_takes_first() {
        let printers = vec![
            PrinterDescriptor::new("00:11:22:33:44:55", "Bar"),
            PrinterDescriptor::new("66:77:88:99:AA:BB", "Kitchen"),
        ];
        assert_eq!(
            find_target_printer(printers.clone(), "").unwrap().display_name(),
            "Bar"
        );
        assert_eq!(
            find_target_printer(printers, "kitchen").unwrap().address(),
            "66:77:88:99:AA:BB"
        );
    }
}
