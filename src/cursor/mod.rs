//! Cursor module
//!
//! Turns a position in a partition into an opaque continuation token and back.
//!
//! # Overview
//!
//! A token is the base64 (URL-safe, unpadded) form of a small versioned JSON
//! envelope holding the partition key and sort key of the last record a page
//! returned. Tokens are safe to put in a query string as-is. Decoding validates
//! the envelope and reports anything else as [`Error::MalformedCursor`].
//!
//! [`Error::MalformedCursor`]: crate::error::Error::MalformedCursor

mod codec;

pub use codec::{CursorCodec, Position, CURSOR_VERSION};
