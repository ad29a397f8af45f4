//! Binary-encoded genetic algorithm for maximizing a bounded, multimodal
//! two-variable real function.
//!
//! Each individual is a 2×`field_bits` chromosome: two fixed-width unsigned
//! fields encoding the `(x, y)` coordinates through a lossy, monotonic
//! [`models::Codec`]. Evolution runs fitness-proportionate selection,
//! single-point crossover over the concatenated chromosome, and per-bit
//! mutation, tracking the best decoded individual of every generation.
//!
//! ```no_run
//! use bitga::{Codec, Population, Rates, SinePeaks};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let codec = Codec::new(-5.0, 5.0, 23)?;
//! let rates = Rates::new(0.6, 0.01)?;
//! let mut population = Population::new(500, codec, rates, SinePeaks::default())?;
//!
//! population.evolve(100);
//!
//! let best = population.best();
//! println!("({:.3}, {:.3}) -> {:.3}", best.x, best.y, best.fitness);
//! # Ok(())
//! # }
//! ```

pub mod models;

pub use models::{
    Best, Codec, CodecError, DomainError, Evaluator, Gene, Population, PopulationError, Rates,
    SinePeaks,
};
