use serde::{Deserialize, Serialize};

use super::id_macro::string_id;

/// Notification identifier.
///
/// Carries the provider message id when the push payload includes one, so a
/// message observed through more than one delivery path collapses into a
/// single record. Messages without an id get a locally generated UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(String);

string_id!(NotificationId);
