pub mod engine;
pub mod error;
pub mod fallback;
pub mod models;
pub mod selector;
pub mod session;
pub mod words;

pub use engine::*;
pub use error::*;
pub use fallback::*;
pub use models::*;
pub use selector::*;
pub use session::*;
pub use words::*;
