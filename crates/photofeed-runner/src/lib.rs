pub mod config;
pub mod feed;
pub mod manifest;
pub mod runner;

pub use config::*;
pub use feed::*;
pub use manifest::*;
pub use runner::*;
