pub mod constants;
pub mod input;
pub mod runner;
pub mod sim;
pub mod start_gate;

pub use sim::{default_script, SimConfig, SimSummary, Simulation};
