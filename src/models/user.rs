//! User model as served by the user collaborator

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User record fetched from the user service
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

/// Short user reference embedded in loan responses.
///
/// Falls back to placeholders when the user service could not be reached
/// during enrichment.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserShort {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl UserShort {
    pub fn unknown(id: Uuid) -> Self {
        Self {
            id,
            name: "Unknown".to_string(),
            email: "Unknown".to_string(),
        }
    }
}

impl From<User> for UserShort {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}
