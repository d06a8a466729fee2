pub mod board;
pub mod catalog;
pub mod deck;
pub mod preview;
pub mod resolver;
pub mod scoring;
pub mod transform;
pub mod types;
