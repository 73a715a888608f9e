//! Invoice document model, profiles and errors.
//!
//! The model is dialect-neutral: every reader fills the same
//! [`InvoiceDescriptor`] and every writer consumes it.

mod builder;
mod descriptor;
mod error;
mod profile;
mod types;

pub use builder::*;
pub use error::*;
pub use profile::*;
pub use types::*;
