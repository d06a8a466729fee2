pub mod arena;
pub mod models;
pub mod rng;
pub mod rules;
pub mod simulator;
pub mod strategy;
