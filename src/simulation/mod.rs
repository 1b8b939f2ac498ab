pub mod harness;

pub use harness::{HarnessConfig, LocalSimulationHarness, RunStatus};
