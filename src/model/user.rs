//! User accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to newly registered users
pub const DEFAULT_ROLE: &str = "user";

/// Stored user document
///
/// `password` holds the argon2 hash. This type never crosses the API
/// boundary; responses carry [`PublicUser`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Projection safe to return to clients
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

/// User shape returned by the API, stripped of credential material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_projection_drops_password() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
            password: "$argon2id$v=19$...".to_string(),
            role: DEFAULT_ROLE.to_string(),
            created_at: Utc::now(),
        };

        let public = user.public();
        let json = serde_json::to_value(&public).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "dana@example.com");
        assert_eq!(json["role"], "user");
    }
}
