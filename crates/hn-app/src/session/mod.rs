//! Session management: the credential store over durable storage and the
//! committed session state the shells observe.

pub mod credential_store;
pub mod state;

pub use credential_store::CredentialStore;
pub use state::SessionStateHandle;
