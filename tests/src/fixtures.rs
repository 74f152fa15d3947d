use dermis_foundation::validation::{FormSchema, ValidationRules};
use dermis_kernel::security::NamedPattern;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route `tracing` output to the test harness writer.
///
/// Honours `RUST_LOG`; defaults to `debug` for the dermis crates. Safe to
/// call from every test.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("dermis_foundation=debug,dermis_kernel=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Login form: email plus the relaxed password pattern.
pub fn credentials_schema() -> FormSchema {
    FormSchema::new()
        .field("email", NamedPattern::Email)
        .field("password", NamedPattern::PasswordSimple)
}

/// Signup form: strong password, a person name and an optional phone.
pub fn signup_form() -> FormSchema {
    FormSchema::new()
        .field("email", NamedPattern::Email)
        .field("password", NamedPattern::Password)
        .field("name", NamedPattern::Name)
        .field(
            "nickname",
            ValidationRules::new().min_length(2).max_length(20),
        )
}
