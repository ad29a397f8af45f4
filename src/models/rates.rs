use serde::{Deserialize, Serialize};

/// Per-pair probability of applying crossover during a generation step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct CrossoverRate(f64);

#[derive(Debug, thiserror::Error)]
#[error("crossover rate must be between 0.0 and 1.0, got {0}")]
pub struct CrossoverRateOutOfRange(f64);

impl CrossoverRate {
    pub fn new(value: f64) -> Result<Self, CrossoverRateOutOfRange> {
        if !(0.0..=1.0).contains(&value) {
            return Err(CrossoverRateOutOfRange(value));
        }

        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for CrossoverRate {
    fn default() -> Self {
        Self(0.6)
    }
}

/// Per-individual probability of applying mutation during a generation step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct MutationRate(f64);

#[derive(Debug, thiserror::Error)]
#[error("mutation rate must be between 0.0 and 1.0, got {0}")]
pub struct MutationRateOutOfRange(f64);

impl MutationRate {
    pub fn new(value: f64) -> Result<Self, MutationRateOutOfRange> {
        if !(0.0..=1.0).contains(&value) {
            return Err(MutationRateOutOfRange(value));
        }

        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for MutationRate {
    fn default() -> Self {
        Self(0.01)
    }
}

/// The pair of operator probabilities driving one population.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Rates {
    pub(crate) crossover: CrossoverRate,
    pub(crate) mutation: MutationRate,
}

#[derive(Debug, thiserror::Error)]
pub enum RateError {
    #[error("Crossover rate error: {0}")]
    Crossover(#[from] CrossoverRateOutOfRange),
    #[error("Mutation rate error: {0}")]
    Mutation(#[from] MutationRateOutOfRange),
}

impl Rates {
    pub fn new(crossover: f64, mutation: f64) -> Result<Self, RateError> {
        Ok(Self {
            crossover: CrossoverRate::new(crossover)?,
            mutation: MutationRate::new(mutation)?,
        })
    }

    pub fn from_parts(crossover: CrossoverRate, mutation: MutationRate) -> Self {
        Self {
            crossover,
            mutation,
        }
    }
}
