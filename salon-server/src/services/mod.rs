//! Business workflows that span more than one repository

pub mod completion;

pub use completion::{CompletionError, build_sale_draft, complete_appointment};
