use crate::models::{Codec, DomainError};
use rand::Rng;

/// Exchanges the low `width` bits between two fields.
fn swap_suffix(a: &mut u32, b: &mut u32, width: u32) {
    let mask = (((1u64 << width) - 1) & u32::MAX as u64) as u32;
    let exchanged = (*a ^ *b) & mask;
    *a ^= exchanged;
    *b ^= exchanged;
}

/// One individual: two codec-encoded coordinate fields.
///
/// A gene has no identity beyond its bit content and is copied by value
/// during selection, so no aliasing survives a generation step. Field widths
/// and the real-number domain come from the [`Codec`] passed into each
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gene {
    x_bits: u32,
    y_bits: u32,
}

impl Gene {
    /// Encodes both coordinates through the codec.
    pub fn new(codec: &Codec, x: f64, y: f64) -> Result<Self, DomainError> {
        Ok(Self {
            x_bits: codec.encode(x)?,
            y_bits: codec.encode(y)?,
        })
    }

    /// A gene with uniformly random bit fields, equivalent to seeding both
    /// coordinates uniformly within the domain.
    pub fn random<R: Rng>(codec: &Codec, rng: &mut R) -> Self {
        Self {
            x_bits: codec.random_bits(rng),
            y_bits: codec.random_bits(rng),
        }
    }

    /// Decodes both fields back into real coordinates.
    pub fn decode(&self, codec: &Codec) -> (f64, f64) {
        (codec.decode(self.x_bits), codec.decode(self.y_bits))
    }

    /// Flips one bit chosen uniformly among all `2 * field_bits` chromosome
    /// positions. Total: every reachable bit pattern decodes in-range.
    pub fn mutate<R: Rng>(&mut self, codec: &Codec, rng: &mut R) {
        let index = rng.random_range(0..codec.chromosome_bits());
        self.flip_bit(codec, index);
    }

    /// Single-point crossover over the concatenation of both fields, x first.
    ///
    /// Draws a cut uniformly from `[1, 2 * field_bits - 1]` and exchanges the
    /// bit suffix starting at the cut: each gene keeps its own prefix and
    /// receives the other's suffix. Both operands mutate in place. One cut
    /// over the logical concatenation, never two independent per-field cuts.
    pub fn crossover<R: Rng>(&mut self, other: &mut Self, codec: &Codec, rng: &mut R) {
        let cut = rng.random_range(1..codec.chromosome_bits());
        self.crossover_at(other, codec, cut);
    }

    /// Splices the pair at a known cut position, chromosome positions counted
    /// from the most significant bit of the x field.
    pub(crate) fn crossover_at(&mut self, other: &mut Self, codec: &Codec, cut: u32) {
        let field_bits = codec.field_bits();

        if cut < field_bits {
            // Cut inside x: mix x at the cut, the y suffix swaps wholesale.
            swap_suffix(&mut self.x_bits, &mut other.x_bits, field_bits - cut);
            std::mem::swap(&mut self.y_bits, &mut other.y_bits);
        } else {
            // Cut at or past the field boundary: x is prefix on both sides,
            // y mixes at `cut - field_bits`. The boundary cut degenerates to
            // a wholesale y swap.
            swap_suffix(
                &mut self.y_bits,
                &mut other.y_bits,
                codec.chromosome_bits() - cut,
            );
        }
    }

    /// Flips the chromosome bit at `index`, MSB of x first.
    pub(crate) fn flip_bit(&mut self, codec: &Codec, index: u32) {
        let field_bits = codec.field_bits();

        if index < field_bits {
            self.x_bits ^= 1 << (field_bits - 1 - index);
        } else {
            self.y_bits ^= 1 << (codec.chromosome_bits() - 1 - index);
        }
    }

    pub fn x_bits(&self) -> u32 {
        self.x_bits
    }

    pub fn y_bits(&self) -> u32 {
        self.y_bits
    }
}
