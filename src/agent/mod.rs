//! Agent configuration and processing for user agents, miners, and scripts.

pub mod user_agents;
pub mod miner_distributor;
pub mod pure_scripts;
pub mod simulation_monitor;

pub use user_agents::process_user_agents;
pub use miner_distributor::process_miner_distributor;
pub use pure_scripts::process_pure_script_agents;
pub use simulation_monitor::process_simulation_monitor;
