use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CamsnapError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        CamsnapError::composition("x")
            .to_string()
            .contains("composition error:")
    );
    assert!(
        CamsnapError::from(FetchError::Timeout)
            .to_string()
            .contains("fetch error:")
    );
}

#[test]
fn fetch_error_classes_render_distinctly() {
    assert_eq!(FetchError::Timeout.to_string(), "the request timed out");
    assert!(FetchError::Status(404).to_string().contains("404"));
    assert!(
        FetchError::Connection("refused".into())
            .to_string()
            .starts_with("connection failed")
    );
    assert!(
        FetchError::MissingCredentials("digest")
            .to_string()
            .starts_with("digest authentication")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CamsnapError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
