//! Wire models for the tracking backend.
//!
//! | Module            | Types                                              |
//! |-------------------|----------------------------------------------------|
//! | `progress`        | `Task`, `ProgressField`, `Stage`                   |
//! | `record`          | `Record` (untyped resource), `percentage`          |
//! | `mass_production` | `MassProduction`, `StageRef`, `StageSlot`, filter  |
//! | `call`            | `Call`, `CallStatus`, `CallFilter`                 |
//! | `user`            | `User`                                             |

pub mod call;
pub(crate) mod de;
pub mod mass_production;
pub mod progress;
pub mod record;
pub mod user;

use serde::Deserialize;

pub use call::{Call, CallFilter, CallStatus};
pub use mass_production::{MassProduction, MassProductionFilter, StageRef, StageSlot};
pub use progress::{ProgressField, Stage, Task};
pub use record::{Record, percentage};
pub use user::User;

/// A list response: either a bare array or a pagination envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Items(Vec<T>),
    Page(Page<T>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(alias = "items", alias = "results", alias = "rows")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default, alias = "totalPages")]
    pub total_pages: Option<u64>,
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Items(items) => items,
            Listing::Page(page) => page.data,
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Listing::Items(items) => items,
            Listing::Page(page) => &page.data,
        }
    }

    /// Total across all pages when the backend reports it.
    pub fn total(&self) -> Option<u64> {
        match self {
            Listing::Items(items) => Some(items.len() as u64),
            Listing::Page(page) => page.total,
        }
    }

    pub fn items_mut(&mut self) -> &mut [T] {
        match self {
            Listing::Items(items) => items,
            Listing::Page(page) => &mut page.data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listing_accepts_bare_array() {
        let listing: Listing<Record> = serde_json::from_value(json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!(listing.items().len(), 2);
        assert_eq!(listing.total(), Some(2));
    }

    #[test]
    fn test_listing_accepts_page_envelope() {
        let listing: Listing<Record> = serde_json::from_value(json!({
            "data": [{"id": 1}],
            "total": 41,
            "page": 3,
            "totalPages": 5
        }))
        .unwrap();
        assert_eq!(listing.total(), Some(41));
        match &listing {
            Listing::Page(page) => assert_eq!(page.total_pages, Some(5)),
            Listing::Items(_) => panic!("Expected Page"),
        }
        assert_eq!(listing.into_items().len(), 1);
    }
}
