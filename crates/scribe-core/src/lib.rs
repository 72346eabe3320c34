pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::ScribeConfig;
pub use error::{Result, ScribeError};
pub use events::SessionEvent;
pub use types::*;
