//! The placeholder template contract: token syntax, extraction and the
//! schema-backed registry used for insertion and advisory validation.

mod extract;
mod registry;

pub use extract::{extract_placeholders, should_extract, wrap_token, MIN_EXTRACT_LEN};
pub use registry::{escape_html, PlaceholderRegistry};
