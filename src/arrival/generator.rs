use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    error::{BouncerError, configuration_error},
    population::PopulationModel,
    types::AttributeVector,
};

/// Produces the attributes of successive arrivals. Indices are assigned by
/// whoever owns the stream.
pub trait CandidateSource: Send {
    fn next_attributes(&mut self) -> AttributeVector;
}

pub struct ArrivalGenerator<R = StdRng> {
    model: Arc<PopulationModel>,
    rng: R,
    drawn: u64,
}

impl ArrivalGenerator<StdRng> {
    pub fn seeded(model: Arc<PopulationModel>, seed: u64) -> Self {
        Self::with_rng(model, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(model: Arc<PopulationModel>) -> Self {
        Self::with_rng(model, StdRng::from_os_rng())
    }
}

impl<R: Rng> ArrivalGenerator<R> {
    pub fn with_rng(model: Arc<PopulationModel>, rng: R) -> Self {
        Self {
            model,
            rng,
            drawn: 0,
        }
    }

    pub fn model(&self) -> &PopulationModel {
        &self.model
    }

    pub fn drawn(&self) -> u64 {
        self.drawn
    }

    pub fn draw(&mut self) -> AttributeVector {
        self.drawn = self.drawn.saturating_add(1);
        self.model.sample(&mut self.rng)
    }
}

impl<R: Rng + Send> CandidateSource for ArrivalGenerator<R> {
    fn next_attributes(&mut self) -> AttributeVector {
        self.draw()
    }
}

/// Replays a fixed list of attribute patterns forever.
#[derive(Debug, Clone)]
pub struct CyclingSource {
    patterns: Vec<AttributeVector>,
    cursor: usize,
}

impl CyclingSource {
    pub fn new(patterns: Vec<AttributeVector>) -> Result<Self, BouncerError> {
        if patterns.is_empty() {
            return Err(configuration_error("cycling source needs at least one pattern"));
        }
        Ok(Self {
            patterns,
            cursor: 0,
        })
    }

    pub fn constant(pattern: AttributeVector) -> Self {
        Self {
            patterns: vec![pattern],
            cursor: 0,
        }
    }
}

impl CandidateSource for CyclingSource {
    fn next_attributes(&mut self) -> AttributeVector {
        let pattern = self.patterns[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.patterns.len();
        pattern
    }
}
