pub mod generator;

pub use generator::{ArrivalGenerator, CandidateSource, CyclingSource};
