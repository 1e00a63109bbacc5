//! Pagination module
//!
//! Supports: Cursor (`next_page` field), Next URL (HATEOAS link)
//!
//! # Overview
//!
//! A paginator looks at the decoded body of the most recent response and
//! decides whether another page exists. When it does, it yields an opaque
//! [`PageToken`] that the request builder threads into the next request.
//! A missing token is the only terminal condition of a pagination loop.

mod strategies;
mod types;

pub use strategies::{CursorPaginator, NextUrlPaginator};
pub use types::{lookup_field, PageToken, PaginationConfig, Paginator};
