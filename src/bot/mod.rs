pub mod orchestrator;
pub mod stats;
