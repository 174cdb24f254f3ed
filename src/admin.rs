//! Administrative maintenance operations: password resets and wholesale
//! API-credential replacement.

use serde::Deserialize;
use serde::Serialize;

pub mod command;
pub mod credentials;
pub mod hasher;
pub mod password;

/// An application user account.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    /// Identifier of the user.
    pub id: u64,

    /// Login name.
    pub login: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Hashed password in `scheme$salt$digest` form (see [`hasher`]).
    #[serde(default)]
    pub password: String,
}

/// OAuth2 API client credentials.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiClient {
    /// Identifier of the client record.
    pub id: u64,

    /// Human-readable client name.
    pub name: String,

    /// The public client identifier handed to integrations.
    pub random_id: String,

    /// The client secret.
    pub secret: String,
}
