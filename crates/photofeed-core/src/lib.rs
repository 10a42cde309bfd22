pub mod cycle;
pub mod error;
pub mod fingerprint;
pub mod model;
pub mod render;
pub mod resolve;

pub use cycle::*;
pub use error::*;
pub use fingerprint::*;
pub use model::*;
pub use render::*;
pub use resolve::*;
