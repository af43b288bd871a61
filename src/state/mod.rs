//! Form state module

mod field;
mod form;
mod phones;
mod record;

pub use field::*;
pub use form::*;
pub use phones::*;
pub use record::*;
