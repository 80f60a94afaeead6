//! Authentication domain: persisted sessions, login payloads and profiles.

pub mod credentials;
pub mod profile;
pub mod session;

pub use credentials::{AuthSession, LoginCredentials};
pub use profile::UserProfile;
pub use session::StoredSession;
