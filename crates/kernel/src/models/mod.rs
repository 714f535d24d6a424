//! Document models.

pub mod page;

pub use page::{DocumentKind, PageDocument, ValidationError};
