use super::*;

fn configured() -> ServerConfig {
    ServerConfig {
        host: Some("192.168.1.100".into()),
        port: Some(8000),
        username: Some("testuser".into()),
        password: Some("testpass".into()),
        ..ServerConfig::default()
    }
}

#[test]
fn base_url_follows_tls_flag() {
    let mut cfg = configured();
    assert_eq!(cfg.base_url().as_deref(), Some("http://192.168.1.100:8000"));
    cfg.use_tls = true;
    assert_eq!(cfg.base_url().as_deref(), Some("https://192.168.1.100:8000"));
}

#[test]
fn missing_host_or_port_is_unconfigured() {
    assert!(ServerConfig::default().base_url().is_none());
    let no_port = ServerConfig {
        port: None,
        ..configured()
    };
    assert!(no_port.base_url().is_none());
    let blank_host = ServerConfig {
        host: Some("  ".into()),
        ..configured()
    };
    assert!(matches!(
        blank_host.require_base_url(),
        Err(CamsnapError::Config(_))
    ));
}

#[test]
fn auth_defaults_to_basic_only_with_a_username() {
    assert_eq!(configured().auth_scheme(), AuthScheme::Basic);

    let anonymous = ServerConfig {
        username: Some(String::new()),
        password: Some(String::new()),
        ..configured()
    };
    assert_eq!(anonymous.auth_scheme(), AuthScheme::None);
    assert!(anonymous.credential().is_none());

    let digest = ServerConfig {
        auth: Some(AuthScheme::Digest),
        ..configured()
    };
    assert_eq!(digest.credential().unwrap().scheme, AuthScheme::Digest);
}

#[test]
fn certificate_verification_is_on_by_default() {
    let opts = configured().fetch_options();
    assert!(!opts.accept_invalid_certs);
    assert_eq!(opts.timeout, Duration::from_secs(100));
}

#[test]
fn debug_output_hides_password() {
    let dbg = format!("{:?}", configured());
    assert!(!dbg.contains("testpass"));
    assert!(dbg.contains("testuser"));
}

#[test]
fn settings_parse_from_json() {
    let json = r#"{
        "server": { "host": "cam.local", "port": 8000, "use_tls": true, "auth": "digest",
                    "username": "u", "password": "p", "accept_invalid_certs": true },
        "cameras": [
            { "name": "Front Door", "address": "Front Door Camera (1)" },
            { "name": "Garage", "address": "server123:05", "format": "server_qualified",
              "enabled": false }
        ]
    }"#;
    let settings = Settings::from_reader(json.as_bytes()).unwrap();
    assert_eq!(settings.server.base_url().as_deref(), Some("https://cam.local:8000"));
    assert_eq!(settings.server.auth_scheme(), AuthScheme::Digest);
    assert!(settings.server.accept_invalid_certs);
    assert_eq!(settings.cameras.len(), 2);
    assert!(settings.cameras[0].enabled);
    assert!(!settings.cameras[1].enabled);
}

#[test]
fn settings_reject_unknown_fields() {
    let err = Settings::from_reader(r#"{ "server": { "hostname": "x" } }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, CamsnapError::Config(_)));
}

#[test]
fn replace_swaps_whole_value_and_keeps_old_snapshots() {
    let handle = ConfigHandle::new(configured());
    let before = handle.snapshot();

    let previous = handle.replace(ServerConfig {
        host: Some("192.168.1.101".into()),
        port: Some(8001),
        use_tls: true,
        ..configured()
    });

    assert_eq!(previous.base_url(), before.base_url());
    assert_eq!(before.base_url().as_deref(), Some("http://192.168.1.100:8000"));
    assert_eq!(
        handle.snapshot().base_url().as_deref(),
        Some("https://192.168.1.101:8001")
    );
}
