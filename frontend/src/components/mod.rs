pub mod payments;
pub mod templates;
