use std::fmt;

use serde::Deserialize;

/// Logged-in user, handed explicitly to every authenticated call.
///
/// The token is opaque, it is only ever forwarded as a bearer header.
#[derive(Deserialize, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub balance: f64,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("balance", &self.balance)
            .finish_non_exhaustive()
    }
}
