pub mod cli;
pub mod commands;
pub mod distribution;
pub mod error;
pub mod genome;
pub mod overlap;
pub mod utils;
pub mod variants;
pub mod writers;
