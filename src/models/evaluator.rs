/// Objective function returning the fitness of a decoded individual.
///
/// Must be pure and deterministic given its inputs. Any real value may be
/// returned; negative fitness is clamped to zero by the elimination step
/// before selection.
pub trait Evaluator {
    fn fitness(&self, x: f64, y: f64) -> f64;
}

impl<F> Evaluator for F
where
    F: Fn(f64, f64) -> f64,
{
    fn fitness(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}
