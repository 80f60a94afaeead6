//! # hn-app
//!
//! Application layer for HomeNet: use cases, the credential store and the
//! notification synchronizer. Depends on `hn-core` ports only; every
//! adapter comes in through `Arc<dyn Port>`.

pub mod deps;
pub mod push;
pub mod session;
pub mod usecases;

pub use deps::CoreDeps;
pub use push::PushTokenProvider;
pub use session::{CredentialStore, SessionStateHandle};
pub use usecases::bootstrap_app::BootstrapApp;
pub use usecases::complete_onboarding::CompleteOnboarding;
pub use usecases::login::{Login, LoginError};
pub use usecases::logout::Logout;
pub use usecases::notifications::{
    ListNotifications, MarkAllNotificationsRead, MarkNotificationRead, NotificationSynchronizer,
    ReconcileInbox, SharedInbox,
};
