use serde::{Deserialize, Serialize};

use super::id_macro::string_id;

/// Backend customer identifier.
///
/// Opaque to the client: it is only compared and echoed back to the API,
/// never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

string_id!(UserId);
