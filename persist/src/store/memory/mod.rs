mod config;
mod map;
mod store;

pub use config::*;
pub use map::*;
pub use store::*;
