use rand::{CryptoRng, RngCore};

use crate::field::{FieldElement, PrimeField};

/// A sharing polynomial. Coefficient 0 is the secret.
///
/// Intentionally not `Debug` or `Clone`: it only lives for one sharing call.
pub(crate) struct Polynomial {
    coefficients: Vec<FieldElement>,
}

impl Polynomial {
    /// Build a polynomial of degree `threshold - 1` with random upper coefficients.
    pub(crate) fn random<R: RngCore + CryptoRng>(
        field: &PrimeField,
        secret: FieldElement,
        threshold: u32,
        rng: &mut R,
    ) -> Self {
        let degree = threshold.saturating_sub(1) as usize;
        let mut coefficients = Vec::with_capacity(degree + 1);
        coefficients.push(secret);
        for _ in 0..degree {
            coefficients.push(field.random_element(rng));
        }
        Self { coefficients }
    }

    #[cfg(test)]
    pub(crate) fn from_coefficients(coefficients: Vec<FieldElement>) -> Self {
        Self { coefficients }
    }

    pub(crate) fn evaluate(&self, field: &PrimeField, x: &FieldElement) -> FieldElement {
        let mut result = FieldElement::zero();
        let mut power = FieldElement::one();

        for coeff in &self.coefficients {
            result = field.add(&result, &field.multiply(coeff, &power));
            power = field.multiply(&power, x);
        }

        result
    }
}
