use dermis_foundation::security::{
    check_password_strength, sanitize_html, sanitize_object, CsrfTokenManager, FetchOptions,
    SecureFetch, SecuritySession, CSRF_HEADER,
};
use dermis_foundation::validation::{
    validate_form, validate_with_rules, FormSchema, ValidationRules,
};
use dermis_kernel::config::SecurityConfig;
use dermis_kernel::error::SecurityError;
use dermis_kernel::security::{ManualClock, StrengthLabel, TokenStore};
use dermis_testing::{
    credentials_schema, init_test_tracing, signup_form, CallCounter, FlakyTokenStore,
};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

const CONFIG: &str = r#"
[rate_limit]
max_attempts = 3
window_ms = 1000

[csrf]
storage_key = "app_csrf"

[sanitizer]
allowed_tags = ["b", "i", "a"]

[forms.login]
email = "email"
password = "passwordSimple"

[forms.profile.bio]
max_length = 10
"#;

fn write_config() -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(CONFIG.as_bytes())?;
    Ok(file)
}

#[test]
fn login_form_reports_every_bad_field() {
    init_test_tracing();
    let data = json!({ "email": "bad", "password": "short" });
    let result = validate_form(data.as_object().unwrap(), &credentials_schema());

    assert!(!result.valid);
    assert_eq!(result.error_count(), 2);
    assert_eq!(result.error_for("email"), Some("Please enter a valid email address"));
    assert_eq!(result.error_for("password"), Some("Password must be at least 8 characters"));
}

#[test]
fn signup_form_accepts_good_data() {
    let data = json!({
        "email": "jane@clinic.example",
        "password": "MyP@ssw0rd123",
        "name": "Jane O'Hara",
    });
    let result = validate_form(data.as_object().unwrap(), &signup_form());
    assert!(result.valid, "unexpected errors: {:?}", result.errors);
}

#[test]
fn custom_rule_runs_only_after_built_in_rules_pass() {
    let counter = CallCounter::new();
    counter.reject("admin");
    let rules = counter.attach(ValidationRules::new().required().min_length(3));

    assert_eq!(
        validate_with_rules(Some("ab"), &rules).error(),
        Some("Must be at least 3 characters")
    );
    assert_eq!(validate_with_rules(None, &rules).error(), Some("This field is required"));
    assert_eq!(counter.calls(), 0);

    assert_eq!(
        validate_with_rules(Some(" admin "), &rules).error(),
        Some("admin is not allowed")
    );
    assert!(validate_with_rules(Some("jane"), &rules).valid);
    assert_eq!(counter.seen(), vec!["admin", "jane"]);
}

#[test]
fn csrf_manager_survives_storage_outage() {
    init_test_tracing();
    let store = Arc::new(FlakyTokenStore::new());
    let csrf = CsrfTokenManager::new(store.clone());

    csrf.set_token("first");
    store.set_failing(true);

    // reads fail closed, writes are dropped
    assert_eq!(csrf.get_token(), None);
    csrf.set_token("second");
    csrf.clear_token();
    let headers = csrf.create_secure_headers(&Default::default());
    assert!(headers.get(CSRF_HEADER).is_none());
    assert_eq!(store.failure_count(), 4);

    store.set_failing(false);
    assert_eq!(csrf.get_token().as_deref(), Some("first"));
}

#[test]
fn session_from_config_file() -> anyhow::Result<()> {
    init_test_tracing();
    let file = write_config()?;
    let config = SecurityConfig::from_file(file.path().to_str().unwrap())?;

    let store = Arc::new(FlakyTokenStore::new());
    let clock = ManualClock::new();
    let session =
        SecuritySession::from_config_with_clock(&config, store.clone(), Arc::new(clock.clone()))?;

    for _ in 0..3 {
        session.begin_login()?;
    }
    assert!(matches!(
        session.begin_login(),
        Err(SecurityError::RateLimited { .. })
    ));

    session.login_succeeded("tok");
    assert_eq!(store.peek("app_csrf").as_deref(), Some("tok"));
    assert_eq!(store.get("csrf_token")?, None);
    assert!(session.begin_login().is_ok());

    session.logout();
    assert_eq!(store.peek("app_csrf"), None);
    Ok(())
}

#[test]
fn forms_and_sanitizer_from_config() -> anyhow::Result<()> {
    let file = write_config()?;
    let config = SecurityConfig::from_file(file.path().to_str().unwrap())?;

    let login = FormSchema::from_spec(&config.forms["login"])?;
    let data = json!({ "email": "a@b.io", "password": "" });
    let result = validate_form(data.as_object().unwrap(), &login);
    assert_eq!(result.error_for("password"), Some("passwordSimple is required"));

    let profile = FormSchema::from_spec(&config.forms["profile"])?;
    let data = json!({ "bio": "far too long a bio" });
    let result = validate_form(data.as_object().unwrap(), &profile);
    assert_eq!(result.error_for("bio"), Some("Must be no more than 10 characters"));

    let allowed: Vec<&str> = config.sanitizer.allowed_tags.iter().map(String::as_str).collect();
    assert_eq!(
        sanitize_html(
            Some(r#"<a href="javascript:x()">hi</a> <u>there</u><script>x</script>"#),
            &allowed
        ),
        "<a>hi</a> there"
    );
    Ok(())
}

#[test]
fn sanitized_payload_keeps_shape() {
    let payload = json!({
        "a": "<script>x</script>ok",
        "b": { "c": "<img onerror=\"y()\">" },
        "tags": ["safe", 1, false],
    });
    let clean = sanitize_object(&payload);
    assert_eq!(clean, json!({
        "a": "ok",
        "b": { "c": "&lt;img &gt;" },
        "tags": ["safe", 1, false],
    }));
}

#[test]
fn password_feedback() {
    let weak = check_password_strength("password");
    assert_eq!(weak.label, StrengthLabel::Weak);
    assert_eq!(weak.label.to_string(), "Weak");

    let strong = check_password_strength("MyP@ssw0rd123");
    assert_eq!(strong.label.to_string(), "Very Strong");
}

#[tokio::test]
async fn secure_fetch_uses_session_token() -> anyhow::Result<()> {
    let config = SecurityConfig::default();
    let session = SecuritySession::from_config(&config, Arc::new(FlakyTokenStore::new()))?;
    session.login_succeeded("session-token");

    let fetch = SecureFetch::new(session.csrf().clone())?;
    let request = fetch
        .request(
            "https://api.example.com/records",
            &FetchOptions::new().method(reqwest::Method::DELETE),
        )
        .build()?;

    assert_eq!(request.method(), &reqwest::Method::DELETE);
    assert_eq!(request.headers()[CSRF_HEADER], "session-token");
    assert_eq!(request.headers()["content-type"], "application/json");
    Ok(())
}

#[tokio::test]
async fn rate_limited_error_reports_retry_time() {
    let config = SecurityConfig::default();
    let clock = ManualClock::new();
    let session = SecuritySession::from_config_with_clock(
        &config,
        Arc::new(FlakyTokenStore::new()),
        Arc::new(clock.clone()),
    )
    .unwrap();

    for _ in 0..5 {
        session.begin_login().unwrap();
    }
    clock.advance(Duration::from_secs(15));

    let err = session.begin_login().unwrap_err();
    assert_eq!(err.to_string(), "Too many attempts, retry in 45s");
}
