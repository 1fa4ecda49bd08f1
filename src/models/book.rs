//! Book model as served by the book collaborator

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Book record fetched from the book service
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    /// Total owned copies
    pub copies: i32,
    /// Currently lendable copies, `0 <= available_copies <= copies`
    pub available_copies: i32,
}

/// Availability counter after an increment/decrement adjustment
#[derive(Debug, Clone, Deserialize)]
pub struct BookAvailability {
    pub id: Uuid,
    pub available_copies: i32,
}

/// Short book reference embedded in loan responses.
///
/// Falls back to placeholders when the book service could not be reached
/// during enrichment.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookShort {
    pub id: Uuid,
    pub title: String,
    pub author: String,
}

impl BookShort {
    pub fn unknown(id: Uuid) -> Self {
        Self {
            id,
            title: "Unknown".to_string(),
            author: "Unknown".to_string(),
        }
    }
}

impl From<Book> for BookShort {
    fn from(b: Book) -> Self {
        Self {
            id: b.id,
            title: b.title,
            author: b.author,
        }
    }
}
