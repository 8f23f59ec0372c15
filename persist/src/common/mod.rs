//! Common types shared across the crate: the value model, locks and small
//! utilities.

mod constants;
mod dictionary;
mod lock;
mod util;
mod value;

pub use constants::*;
pub use dictionary::*;
pub use lock::*;
pub use util::*;
pub use value::*;
