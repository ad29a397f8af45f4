use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("InvalidDomain: lower bound must be smaller than upper. min={min}, max={max}")]
    InvalidDomain { min: f64, max: f64 },
    #[error("InvalidFieldBits: field width must be between 1 and {max} bits. field_bits={field_bits}")]
    InvalidFieldBits { field_bits: u32, max: u32 },
}

impl CodecError {
    pub(crate) fn invalid_domain(min: f64, max: f64) -> Self {
        Self::InvalidDomain { min, max }
    }

    pub(crate) fn invalid_field_bits(field_bits: u32) -> Self {
        Self::InvalidFieldBits {
            field_bits,
            max: u32::BITS,
        }
    }
}

/// A coordinate handed to [`Codec::encode`] fell outside the encodable domain.
///
/// Surfaced at construction time; the caller must retry with an in-range value.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("value {value} is outside the encodable domain [{min}, {max}]")]
pub struct DomainError {
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// Lossy, monotonic mapping between a bounded real number and a fixed-width
/// unsigned bit field.
///
/// `encode` and `decode` are inverse up to one quantization step: for every
/// in-range `v`, `|decode(encode(v)) - v| <= step()`. Every bit pattern of
/// `field_bits` width decodes to a value inside the domain, so the genetic
/// operators can never produce an invalid individual.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Codec {
    domain_min: f64,
    domain_max: f64,
    field_bits: u32,
}

impl Codec {
    #[instrument(level = "debug", fields(domain_min = domain_min, domain_max = domain_max, field_bits = field_bits))]
    pub fn new(domain_min: f64, domain_max: f64, field_bits: u32) -> Result<Self, CodecError> {
        if !(domain_min < domain_max) {
            return Err(CodecError::invalid_domain(domain_min, domain_max));
        }

        if field_bits == 0 || field_bits > u32::BITS {
            return Err(CodecError::invalid_field_bits(field_bits));
        }

        Ok(Self {
            domain_min,
            domain_max,
            field_bits,
        })
    }

    /// Encodes a real coordinate as a `field_bits`-wide unsigned integer.
    ///
    /// Rejects values outside `[domain_min, domain_max]` instead of silently
    /// wrapping them. `domain_max` itself lands on the top step.
    pub fn encode(&self, value: f64) -> Result<u32, DomainError> {
        if !(self.domain_min..=self.domain_max).contains(&value) {
            return Err(DomainError {
                value,
                min: self.domain_min,
                max: self.domain_max,
            });
        }

        let raw = ((value - self.domain_min) * self.scale()).floor() as u64;
        Ok(raw.min(self.max_field_value() as u64) as u32)
    }

    /// Decodes a bit field back into a real coordinate.
    pub fn decode(&self, bits: u32) -> f64 {
        bits as f64 / self.scale() + self.domain_min
    }

    /// Returns a uniformly random bit field in `[0, 2^field_bits)`.
    pub fn random_bits<R: Rng>(&self, rng: &mut R) -> u32 {
        rng.random_range(0..(1u64 << self.field_bits)) as u32
    }

    /// Encoded steps per unit of domain: `2^field_bits / (domain_max - domain_min)`.
    pub fn scale(&self) -> f64 {
        (1u64 << self.field_bits) as f64 / (self.domain_max - self.domain_min)
    }

    /// The smallest real-number difference distinguishable by the encoding.
    pub fn step(&self) -> f64 {
        1.0 / self.scale()
    }

    pub fn field_bits(&self) -> u32 {
        self.field_bits
    }

    /// Total bits in one chromosome, both fields concatenated.
    pub fn chromosome_bits(&self) -> u32 {
        2 * self.field_bits
    }

    pub fn domain_min(&self) -> f64 {
        self.domain_min
    }

    pub fn domain_max(&self) -> f64 {
        self.domain_max
    }

    fn max_field_value(&self) -> u32 {
        (((1u64 << self.field_bits) - 1) & u32::MAX as u64) as u32
    }
}

impl Default for Codec {
    /// Domain `[-5.0, 5.0]` with 23 bits per field, a 46-bit chromosome.
    fn default() -> Self {
        Self {
            domain_min: -5.0,
            domain_max: 5.0,
            field_bits: 23,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn it_validates_construction() {
        assert!(Codec::new(5.0, -5.0, 23).is_err());
        assert!(Codec::new(1.0, 1.0, 23).is_err());
        assert!(Codec::new(-5.0, 5.0, 0).is_err());
        assert!(Codec::new(-5.0, 5.0, 33).is_err());

        assert!(Codec::new(-5.0, 5.0, 23).is_ok());
        assert!(Codec::new(0.0, 1.0, 32).is_ok());
    }

    #[test]
    fn it_rejects_out_of_domain_values() {
        let codec = Codec::default();

        assert!(codec.encode(-5.001).is_err());
        assert!(codec.encode(5.001).is_err());
        assert!(codec.encode(f64::NAN).is_err());

        assert!(codec.encode(-5.0).is_ok());
        assert!(codec.encode(5.0).is_ok());
        assert!(codec.encode(0.0).is_ok());
    }

    #[test]
    fn it_encodes_domain_edges() {
        let codec = Codec::default();

        assert_eq!(codec.encode(-5.0).unwrap(), 0);
        assert_eq!(codec.encode(5.0).unwrap(), (1 << 23) - 1);
    }

    #[test]
    fn it_round_trips_within_one_quantization_step() {
        let codec = Codec::default();
        let step = codec.step();

        let mut value = -5.0;
        while value <= 5.0 {
            let decoded = codec.decode(codec.encode(value).unwrap());
            assert!(
                (decoded - value).abs() <= step,
                "round-trip error for {value}: decoded {decoded}, step {step}"
            );
            value += 0.0137;
        }
    }

    #[test]
    fn it_encodes_monotonically() {
        let codec = Codec::default();

        let mut previous = codec.encode(-5.0).unwrap();
        let mut value = -4.9;
        while value <= 5.0 {
            let encoded = codec.encode(value).unwrap();
            assert!(encoded >= previous);
            previous = encoded;
            value += 0.1;
        }
    }

    #[test]
    fn it_decodes_any_bit_pattern_in_domain() {
        let codec = Codec::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let decoded = codec.decode(codec.random_bits(&mut rng));
            assert!((-5.0..5.0).contains(&decoded));
        }
    }
}
