use super::*;

fn device(name: &str, address: &str, format: RegistryFormat) -> CameraDevice {
    CameraDevice {
        name: name.into(),
        address: address.into(),
        enabled: true,
        format,
    }
}

#[test]
fn parenthesized_addresses() {
    let f = RegistryFormat::Parenthesized;
    assert_eq!(f.parse_address("Front Door Camera (1)").as_deref(), Some("1"));
    assert_eq!(f.parse_address("Back Yard (12)").as_deref(), Some("12"));
    assert_eq!(f.parse_address("Camera Name ( 5 )").as_deref(), Some(" 5 "));
    assert_eq!(f.parse_address("Camera ()").as_deref(), Some(""));
    assert_eq!(f.parse_address("Invalid Address Format"), None);
    assert_eq!(f.parse_address("Camera (incomplete"), None);
    assert_eq!(f.parse_address("Camera incomplete)"), None);
}

#[test]
fn server_qualified_addresses() {
    let f = RegistryFormat::ServerQualified;
    assert_eq!(f.parse_address("server123:01").as_deref(), Some("1"));
    assert_eq!(f.parse_address("server456:005").as_deref(), Some("5"));
    assert_eq!(f.parse_address("server789:12").as_deref(), Some("12"));
    assert_eq!(f.parse_address("server123:00").as_deref(), Some("0"));
    assert_eq!(f.parse_address("server123:0").as_deref(), Some("0"));
    assert_eq!(f.parse_address("server:123:01").as_deref(), Some("123:01"));
    assert_eq!(f.parse_address("server123_01"), None);
    assert_eq!(f.parse_address(":01"), None);
    assert_eq!(f.parse_address("server123:"), None);
}

#[test]
fn discover_spans_both_registries_sorted_by_number() {
    let dir = CameraDirectory::new(vec![
        device("Driveway", "server123:02", RegistryFormat::ServerQualified),
        device("Front Door", "Front Door Camera (1)", RegistryFormat::Parenthesized),
        device("Porch", "Porch (10)", RegistryFormat::Parenthesized),
    ]);
    let found = dir.discover();
    let numbers: Vec<&str> = found.iter().map(|c| c.number.as_str()).collect();
    assert_eq!(numbers, ["1", "2", "10"]);
    assert_eq!(found[1].format, RegistryFormat::ServerQualified);
}

#[test]
fn discover_skips_disabled_and_unparseable_devices() {
    let mut disabled = device("Disabled", "Disabled Camera (2)", RegistryFormat::Parenthesized);
    disabled.enabled = false;
    let dir = CameraDirectory::new(vec![
        device("Valid", "Valid Camera (1)", RegistryFormat::Parenthesized),
        disabled,
        device("Invalid", "Invalid Address Format", RegistryFormat::Parenthesized),
    ]);
    let found = dir.discover();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Valid");
}

#[test]
fn resolve_across_registries_with_manual_fallback() {
    let dir = CameraDirectory::new(vec![
        device("Front Door", "Front Door (5)", RegistryFormat::Parenthesized),
        device("Garage", "server123:03", RegistryFormat::ServerQualified),
    ]);

    let front = dir.resolve("5").unwrap();
    assert_eq!(front.number, "5");
    assert_eq!(front.display_name, "Front Door");

    assert_eq!(dir.resolve("3").unwrap().display_name, "Garage");

    let manual = dir.resolve("99").unwrap();
    assert_eq!(manual.number, "99");
    assert_eq!(manual.display_name, "camera 99");

    assert_eq!(dir.resolve("driveway"), None);
}

#[test]
fn padded_parenthesized_number_resolves_to_its_device() {
    let dir = CameraDirectory::new(vec![device(
        "Porch",
        "Camera Name ( 5 )",
        RegistryFormat::Parenthesized,
    )]);

    let porch = dir.resolve("5").unwrap();
    assert_eq!(porch.number, "5");
    assert_eq!(porch.display_name, "Porch");
    assert_eq!(dir.resolve(" 5 ").unwrap().display_name, "Porch");
}
