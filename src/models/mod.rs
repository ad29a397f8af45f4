mod codec;
mod evaluator;
mod gene;
mod landscape;
mod population;
mod rates;

pub use codec::{Codec, CodecError, DomainError};
pub use evaluator::Evaluator;
pub use gene::Gene;
pub use landscape::SinePeaks;
pub use population::{Best, Population, PopulationError};
pub use rates::{
    CrossoverRate, CrossoverRateOutOfRange, MutationRate, MutationRateOutOfRange, RateError, Rates,
};
