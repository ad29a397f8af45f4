//! Searches the bundled sine-peaks landscape for its maximum and prints the
//! best `(x, y, fitness)` triple: population of 500, 100 generations,
//! pc = 0.6, pm = 0.01.

use anyhow::Result;
use bitga::{Codec, Population, Rates, SinePeaks};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let codec = Codec::new(-5.0, 5.0, 23)?;
    let rates = Rates::new(0.6, 0.01)?;
    let mut population = Population::new(500, codec, rates, SinePeaks::default())?;

    population.evolve(100);

    let best = population.best();
    println!(
        "best after {} generations: x = {:.3}, y = {:.3}, fitness = {:.3}",
        population.history().len() - 1,
        best.x,
        best.y,
        best.fitness
    );

    Ok(())
}
