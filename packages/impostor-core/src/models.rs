pub mod assignment;
pub mod config;
pub mod player;
pub mod setup;

pub use assignment::*;
pub use config::*;
pub use player::*;
pub use setup::*;
