//! Port interfaces for the application layer
//!
//! Use cases see the outside world only through these traits; the
//! adapters in `hn-infra` and the mobile shells implement them. The
//! domain stays compilable and testable with nothing real attached.
//!
//! A port lives here when it is a business capability, is depended upon by
//! more than one use case, and is implemented by the infrastructure or
//! platform layer. Anything narrower belongs next to the domain that owns
//! it.

pub mod access_token;
pub mod api_client;
mod clock;
pub mod key_value_store;
pub mod notification_renderer;
pub mod platform;
pub mod push_messaging;

pub use clock::*;

pub use access_token::AccessTokenProviderPort;
pub use api_client::{ApiClientPort, ApiError, PushTokenRegistration};
pub use key_value_store::{KeyValueStoreError, KeyValueStorePort};
pub use notification_renderer::NotificationRendererPort;
pub use platform::{OsFamily, OsInfo, PlatformPort};
pub use push_messaging::{PushError, PushMessagingPort};
