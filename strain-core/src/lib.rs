mod collection;
mod config;
mod constants;
mod sample;
mod stats;

pub use collection::*;
pub use config::*;
pub use constants::*;
pub use sample::*;
pub use stats::*;
