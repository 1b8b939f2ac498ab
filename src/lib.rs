pub mod admission;
pub mod arrival;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod population;
pub mod protocol;
pub mod scenario;
pub mod simulation;
pub mod types;
