pub mod engine;
pub mod error;
pub mod game;

pub use error::{EngineError, Result};
