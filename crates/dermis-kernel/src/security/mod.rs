//! Client security toolkit kernel contracts
//!
//! Provides the contracts shared by the client-side security toolkit:
//! - **Validation types**: `NamedPattern`, `ValidationResult`, `FormValidationResult`
//! - **Password strength**: `PasswordStrength`, `StrengthLabel`
//! - **Token storage**: the `TokenStore` capability used for the CSRF token
//! - **Time**: the `Clock` used by sliding-window throttling
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │              dermis-kernel/security              │
//! │  ┌────────────┐  ┌──────────────┐  ┌──────────┐  │
//! │  │NamedPattern│  │  TokenStore  │  │  Clock   │  │
//! │  │ Validation-│  │  StoreError  │  │          │  │
//! │  │   Result   │  │              │  │          │  │
//! │  └────────────┘  └──────────────┘  └──────────┘  │
//! └──────────────────────────────────────────────────┘
//!                        ▲ traits / types
//!                        │
//! ┌──────────────────────────────────────────────────┐
//! │         dermis-foundation/{validation,security}  │
//! │  patterns · rules · form · sanitizer · csrf      │
//! │  fetch · rate_limiter · password · session       │
//! └──────────────────────────────────────────────────┘
//! ```

pub mod clock;
pub mod store;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{StoreError, StoreResult, TokenStore};
pub use types::{
    FormValidationResult, NamedPattern, PasswordStrength, StrengthLabel, ValidationResult,
};
