pub mod analyze;
pub mod distribution;
pub mod sample;
