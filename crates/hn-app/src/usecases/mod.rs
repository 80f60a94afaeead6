//! Use cases: one struct per operation the shells can trigger.

pub mod bootstrap_app;
pub mod complete_onboarding;
pub mod login;
pub mod logout;
pub mod notifications;

pub use bootstrap_app::BootstrapApp;
pub use complete_onboarding::CompleteOnboarding;
pub use login::{Login, LoginError};
pub use logout::Logout;
