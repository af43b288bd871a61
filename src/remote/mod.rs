//! Remote capability module

mod directory;
mod traits;

pub use directory::*;
pub use traits::*;
