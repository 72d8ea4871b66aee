//! Common types used throughout the crate
//!
//! Records, pages, and the JSON shape both HTTP endpoints answer with.

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Page size used when a request does not name a usable one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Partition key of the demo collection
pub const DEFAULT_PARTITION: &str = "Book";

// ============================================================================
// Record
// ============================================================================

/// A single stored item: partition key, sort key and payload.
///
/// `(pk, sk)` identifies a record; records within a partition are ordered
/// lexicographically by `sk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Partition key (the collection)
    pub pk: String,
    /// Sort key, unique within the partition
    pub sk: String,
    /// Display title
    pub title: String,
}

impl Record {
    /// Create a new record
    pub fn new(pk: impl Into<String>, sk: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
            title: title.into(),
        }
    }
}

// ============================================================================
// Page
// ============================================================================

/// One page of results plus the token that resumes after it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Records in ascending sort key order
    pub items: Vec<Record>,
    /// Cursor for the following page, `None` once the collection is exhausted
    pub next_cursor: Option<String>,
}

impl Page {
    /// Create a page
    pub fn new(items: Vec<Record>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// Final page with no further cursor
    pub fn last(items: Vec<Record>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    /// Whether another page may follow
    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// An empty page with no cursor, the signal of an exhausted scan
    pub fn is_exhausted(&self) -> bool {
        self.items.is_empty() && self.next_cursor.is_none()
    }
}

// ============================================================================
// Wire format
// ============================================================================

/// JSON body returned by the pagination endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooksResponse {
    /// Records in the page
    pub books: Vec<Record>,
    /// Opaque continuation token, omitted on the final page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl From<Page> for BooksResponse {
    fn from(page: Page) -> Self {
        Self {
            books: page.items,
            next_page_token: page.next_cursor,
        }
    }
}

impl From<BooksResponse> for Page {
    fn from(response: BooksResponse) -> Self {
        Self {
            items: response.books,
            // Some clients blank the token instead of dropping it
            next_cursor: response.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_books_response_omits_absent_token() {
        let response = BooksResponse::from(Page::last(vec![Record::new("Book", "Book#00", "Book 0")]));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            json!({"books": [{"pk": "Book", "sk": "Book#00", "title": "Book 0"}]})
        );
    }

    #[test]
    fn test_books_response_token_field_name() {
        let response = BooksResponse::from(Page::new(vec![], Some("abc".to_string())));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["nextPageToken"], "abc");
    }

    #[test]
    fn test_page_from_response_blank_token() {
        let response: BooksResponse =
            serde_json::from_value(json!({"books": [], "nextPageToken": ""})).unwrap();
        let page = Page::from(response);
        assert!(page.is_exhausted());
    }

    #[test]
    fn test_page_flags() {
        assert!(Page::default().is_exhausted());
        assert!(!Page::default().has_next());

        let page = Page::new(vec![], Some("token".to_string()));
        assert!(page.has_next());
        assert!(!page.is_exhausted());
    }
}
