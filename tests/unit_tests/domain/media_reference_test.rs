use murmur::domain::{MediaCredentials, MediaReference};

#[test]
fn given_credentials_when_debug_formatted_then_password_is_redacted() {
    let reference = MediaReference::new("https://api.twilio.com/media/ME123")
        .with_credentials(MediaCredentials::new("AC123", "super-secret"));

    let rendered = format!("{:?}", reference);

    assert!(rendered.contains("AC123"));
    assert!(rendered.contains("[REDACTED]"));
    assert!(!rendered.contains("super-secret"));
}

#[test]
fn given_reference_without_extras_when_built_then_has_no_credentials_or_type() {
    let reference = MediaReference::new("https://example.com/a.ogg");

    assert_eq!(reference.url(), "https://example.com/a.ogg");
    assert!(reference.credentials().is_none());
    assert!(reference.declared_content_type().is_none());
}

#[test]
fn given_declared_content_type_when_built_then_is_exposed() {
    let reference =
        MediaReference::new("https://example.com/a").with_declared_content_type("audio/ogg");

    assert_eq!(reference.declared_content_type(), Some("audio/ogg"));
}
