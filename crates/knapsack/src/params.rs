//! Knapsack key sampling and native evaluation.

use ark_ff::{BigInteger, PrimeField};
use ark_std::rand::{rngs::StdRng, Rng, SeedableRng};
use ark_std::UniformRand;
use r1cs_core::R1csError;

/// Number of field elements per digest unless configured otherwise.
pub const DEFAULT_DIMENSION: usize = 1;

/// Seed for [`KnapsackParameters::sample`]; fixed so every sampler derives the
/// same key.
pub const DEFAULT_SEED: u64 = 0x6b6e_6170_7361_636b;

/// The public key of a knapsack hash: `dimension` rows of `input_len`
/// field elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KnapsackParameters<F: PrimeField> {
    input_len: usize,
    dimension: usize,
    coefficients: Vec<F>,
}

impl<F: PrimeField> KnapsackParameters<F> {
    /// Sample the default key for `input_len`-bit blocks.
    ///
    /// Deterministic: sampling twice yields identical parameters.
    pub fn sample(input_len: usize) -> Self {
        Self::sample_with_seed(input_len, DEFAULT_DIMENSION, DEFAULT_SEED)
    }

    pub fn sample_with_seed(input_len: usize, dimension: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::sample_with_rng(&mut rng, input_len, dimension)
    }

    pub fn sample_with_rng<R: Rng + ?Sized>(rng: &mut R, input_len: usize, dimension: usize) -> Self {
        let coefficients = (0..input_len * dimension).map(|_| F::rand(rng)).collect();
        tracing::debug!(input_len, dimension, "sampled knapsack key");
        Self {
            input_len,
            dimension,
            coefficients,
        }
    }

    /// Parameters for compressing two digests of this construction's own
    /// length into one.
    pub fn for_two_to_one(dimension: usize) -> Self {
        let digest_len = dimension * F::MODULUS_BIT_SIZE as usize;
        Self::sample_with_seed(2 * digest_len, dimension, DEFAULT_SEED)
    }

    pub fn input_len(&self) -> usize {
        self.input_len
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Bits per output element.
    pub fn element_bits() -> usize {
        F::MODULUS_BIT_SIZE as usize
    }

    pub fn digest_len(&self) -> usize {
        self.dimension * Self::element_bits()
    }

    /// Key row for output element `i`.
    pub fn row(&self, i: usize) -> &[F] {
        &self.coefficients[i * self.input_len..(i + 1) * self.input_len]
    }

    /// The knapsack sums, one per output element.
    pub fn hash_to_field(&self, input: &[bool]) -> Result<Vec<F>, R1csError> {
        if input.len() != self.input_len {
            return Err(R1csError::LengthMismatch {
                what: "knapsack input block",
                expected: self.input_len,
                actual: input.len(),
            });
        }
        Ok((0..self.dimension)
            .map(|i| {
                self.row(i)
                    .iter()
                    .zip(input)
                    .filter(|(_, bit)| **bit)
                    .fold(F::zero(), |acc, (coefficient, _)| acc + coefficient)
            })
            .collect())
    }

    /// The digest: each knapsack sum as `element_bits()` little-endian bits.
    pub fn hash(&self, input: &[bool]) -> Result<Vec<bool>, R1csError> {
        let elements = self.hash_to_field(input)?;
        Ok(elements.iter().flat_map(|e| field_to_bits(*e)).collect())
    }
}

/// Canonical little-endian bits of `value`, `F::MODULUS_BIT_SIZE` long.
pub(crate) fn field_to_bits<F: PrimeField>(value: F) -> Vec<bool> {
    let mut bits = value.into_bigint().to_bits_le();
    bits.truncate(F::MODULUS_BIT_SIZE as usize);
    bits
}
