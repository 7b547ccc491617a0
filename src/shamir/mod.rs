mod polynomial;
mod share;

use std::collections::btree_map::{BTreeMap, Entry};

use num_bigint::BigUint;
use polynomial::Polynomial;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::error::{Result, SharingError};
use crate::field::{FieldElement, PrimeField};

pub use share::{Share, ShareConfig, MAX_SHARES, MAX_SHARE_VALUE_LEN};

/// Split `secret` into `config.num_shares()` shares, any `config.threshold()`
/// of which recover it.
///
/// The secret is read as a big-endian integer and must be below the field
/// prime. With a threshold of 1 the polynomial is constant and every share
/// value equals the encoded secret.
pub fn generate_shares(
    field: &PrimeField,
    secret: &[u8],
    config: &ShareConfig,
) -> Result<Vec<Share>> {
    let mut rng = ChaCha20Rng::from_entropy();
    generate_shares_with_rng(field, secret, config, &mut rng)
}

/// Same as [`generate_shares`] with a caller-supplied CSPRNG.
pub fn generate_shares_with_rng<R: RngCore + CryptoRng>(
    field: &PrimeField,
    secret: &[u8],
    config: &ShareConfig,
    rng: &mut R,
) -> Result<Vec<Share>> {
    // An index congruent to 0 would evaluate the polynomial at the secret.
    if BigUint::from(config.num_shares()) >= *field.modulus() {
        return Err(SharingError::Config(format!(
            "{} shares do not fit in a field of {} bits",
            config.num_shares(),
            field.modulus().bits()
        )));
    }

    let constant = field.element_from_secret(secret)?;
    let polynomial = Polynomial::random(field, constant, config.threshold(), rng);

    (1..=config.num_shares())
        .map(|x| {
            let y = polynomial.evaluate(field, &FieldElement::from(u64::from(x)));
            Share::new(x, field.encode(&y))
        })
        .collect()
}

/// Recover the secret from at least `threshold` shares by Lagrange
/// interpolation at zero.
///
/// Repeated copies of the same share are ignored. Two shares carrying the
/// same index but different values are rejected. Only the `threshold` lowest
/// indices take part in the interpolation.
pub fn reconstruct_secret(field: &PrimeField, shares: &[Share], threshold: u32) -> Result<Vec<u8>> {
    if threshold < 1 {
        return Err(SharingError::Config("threshold must be at least 1".into()));
    }

    let mut points: BTreeMap<u32, FieldElement> = BTreeMap::new();
    for share in shares {
        let y = field.decode(share.value())?;
        match points.entry(share.index()) {
            Entry::Occupied(existing) => {
                if *existing.get() != y {
                    return Err(SharingError::DuplicateIndex(share.index()));
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(y);
            }
        }
    }

    if points.len() < threshold as usize {
        return Err(SharingError::InsufficientShares {
            needed: threshold as usize,
            got: points.len(),
        });
    }

    // Any `threshold` points determine the polynomial.
    let quorum: Vec<(u32, FieldElement)> = points.into_iter().take(threshold as usize).collect();
    let secret = interpolate_at_zero(field, &quorum)?;
    Ok(field.secret_from_element(&secret))
}

fn interpolate_at_zero(field: &PrimeField, points: &[(u32, FieldElement)]) -> Result<FieldElement> {
    let mut value = FieldElement::zero();

    for &(i, ref y_i) in points {
        let x_i = FieldElement::from(u64::from(i));
        let mut numerator = FieldElement::one();
        let mut denominator = FieldElement::one();

        for &(j, _) in points {
            if i == j {
                continue;
            }
            let x_j = FieldElement::from(u64::from(j));
            numerator = field.multiply(&numerator, &field.negate(&x_j));
            denominator = field.multiply(&denominator, &field.subtract(&x_i, &x_j));
        }

        let inverse = field.inverse(&denominator).ok_or_else(|| {
            SharingError::Encoding(format!("share index {} collides modulo the field prime", i))
        })?;
        let basis = field.multiply(&numerator, &inverse);
        value = field.add(&value, &field.multiply(y_i, &basis));
    }

    Ok(value)
}
