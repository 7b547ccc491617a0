//! Arithmetic over a prime field `GF(p)` backed by arbitrary-precision integers.
//!
//! Every operation reduces its result into `[0, p)`. Inputs do not need to be
//! reduced beforehand; a value built with [`FieldElement::new`] from an
//! arbitrary integer is handled the same as one produced by the field itself.

use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{Result, SharingError};

/// The secp256k1 base-field prime, big-endian.
pub const DEFAULT_PRIME: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFC, 0x2F,
];

/// Bytes of entropy drawn for each random field element.
pub const ENTROPY_BYTES: usize = 32;

/// An integer interpreted modulo the field prime.
///
/// `Debug` output is redacted: elements carry secrets and polynomial
/// coefficients.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FieldElement(BigUint);

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldElement").field(&"<redacted>").finish()
    }
}

impl FieldElement {
    pub fn new(value: BigUint) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn one() -> Self {
        Self(BigUint::one())
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

/// A prime field with a fixed modulus.
///
/// The modulus is treated as immutable configuration. Primality is the
/// caller's responsibility; [`PrimeField::default`] uses [`DEFAULT_PRIME`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeField {
    modulus: BigUint,
    width: usize,
}

impl Default for PrimeField {
    fn default() -> Self {
        let modulus = BigUint::from_bytes_be(&DEFAULT_PRIME);
        Self {
            width: DEFAULT_PRIME.len(),
            modulus,
        }
    }
}

impl PrimeField {
    /// Create a field over `modulus`, which must be a prime greater than 2.
    pub fn new(modulus: BigUint) -> Result<Self> {
        if modulus <= BigUint::from(2u8) {
            return Err(SharingError::Config(
                "field modulus must be greater than 2".into(),
            ));
        }
        let width = ((modulus.bits() + 7) / 8) as usize;
        Ok(Self { modulus, width })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Length in bytes of the canonical encoding of an element.
    pub fn byte_width(&self) -> usize {
        self.width
    }

    pub fn reduce(&self, value: &BigUint) -> FieldElement {
        FieldElement(value % &self.modulus)
    }

    pub fn add(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        FieldElement((&a.0 + &b.0) % &self.modulus)
    }

    pub fn subtract(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        let a = &a.0 % &self.modulus;
        let b = &b.0 % &self.modulus;
        FieldElement((a + &self.modulus - b) % &self.modulus)
    }

    pub fn negate(&self, a: &FieldElement) -> FieldElement {
        self.subtract(&FieldElement::zero(), a)
    }

    pub fn multiply(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        FieldElement((&a.0 * &b.0) % &self.modulus)
    }

    /// `base^exponent mod p` for any non-negative exponent.
    pub fn power(&self, base: &FieldElement, exponent: &BigUint) -> FieldElement {
        FieldElement(base.0.modpow(exponent, &self.modulus))
    }

    /// Multiplicative inverse by Fermat's little theorem. `None` for zero.
    pub fn inverse(&self, a: &FieldElement) -> Option<FieldElement> {
        let reduced = self.reduce(&a.0);
        if reduced.is_zero() {
            return None;
        }
        let exponent = &self.modulus - BigUint::from(2u8);
        Some(self.power(&reduced, &exponent))
    }

    /// Draw a uniformly distributed element from `ENTROPY_BYTES` of entropy.
    pub fn random_element<R: RngCore + CryptoRng>(&self, rng: &mut R) -> FieldElement {
        let mut bytes = Zeroizing::new([0u8; ENTROPY_BYTES]);
        rng.fill_bytes(&mut bytes[..]);
        self.reduce(&BigUint::from_bytes_be(&bytes[..]))
    }

    /// Read secret bytes as a big-endian integer.
    ///
    /// Values that do not fit below the modulus are rejected rather than
    /// wrapped, since wrapping would silently lose information.
    pub fn element_from_secret(&self, secret: &[u8]) -> Result<FieldElement> {
        let value = BigUint::from_bytes_be(secret);
        if value >= self.modulus {
            return Err(SharingError::Encoding(format!(
                "secret of {} bytes does not fit below the {}-bit field prime",
                secret.len(),
                self.modulus.bits()
            )));
        }
        Ok(FieldElement(value))
    }

    /// Minimal big-endian bytes of an element. Zero maps to an empty string,
    /// so leading zero bytes of an original secret are not recovered.
    pub fn secret_from_element(&self, element: &FieldElement) -> Vec<u8> {
        let reduced = self.reduce(&element.0);
        if reduced.is_zero() {
            return Vec::new();
        }
        reduced.0.to_bytes_be()
    }

    /// Canonical fixed-width big-endian encoding.
    pub fn encode(&self, element: &FieldElement) -> Vec<u8> {
        let digits = self.reduce(&element.0).0.to_bytes_be();
        let mut out = vec![0u8; self.width];
        // `digits` is at most `width` bytes long since the value is reduced.
        out[self.width - digits.len()..].copy_from_slice(&digits);
        out
    }

    /// Decode a big-endian value, accepting short encodings but nothing that
    /// is wider than the field or not below the modulus.
    pub fn decode(&self, bytes: &[u8]) -> Result<FieldElement> {
        if bytes.len() > self.width {
            return Err(SharingError::Encoding(format!(
                "field element is {} bytes, expected at most {}",
                bytes.len(),
                self.width
            )));
        }
        let value = BigUint::from_bytes_be(bytes);
        if value >= self.modulus {
            return Err(SharingError::Encoding(
                "field element is not below the modulus".into(),
            ));
        }
        Ok(FieldElement(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn small_field() -> PrimeField {
        PrimeField::new(BigUint::from(23u32)).unwrap()
    }

    #[test]
    fn test_default_prime() {
        let field = PrimeField::default();
        let expected = BigUint::parse_bytes(
            b"FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
            16,
        )
        .unwrap();
        assert_eq!(field.modulus(), &expected);
        assert_eq!(field.byte_width(), 32);
    }

    #[test]
    fn test_rejects_tiny_modulus() {
        assert!(PrimeField::new(BigUint::from(2u32)).is_err());
        assert!(PrimeField::new(BigUint::zero()).is_err());
    }

    #[test]
    fn test_basic_arithmetic() {
        let field = small_field();
        let a = FieldElement::from(20);
        let b = FieldElement::from(7);

        assert_eq!(field.add(&a, &b), FieldElement::from(4));
        assert_eq!(field.multiply(&a, &b), FieldElement::from(2));
        assert_eq!(field.subtract(&b, &a), FieldElement::from(10));
        assert_eq!(field.negate(&b), FieldElement::from(16));
        assert_eq!(field.negate(&FieldElement::zero()), FieldElement::zero());
    }

    #[test]
    fn test_unreduced_inputs() {
        let field = small_field();
        // 100 = 8 (mod 23), 50 = 4 (mod 23)
        let a = FieldElement::from(100);
        let b = FieldElement::from(50);

        assert_eq!(field.add(&a, &b), FieldElement::from(12));
        assert_eq!(field.multiply(&a, &b), FieldElement::from(9));
        assert_eq!(field.subtract(&b, &a), FieldElement::from(19));
        assert_eq!(
            field.power(&a, &BigUint::from(2u32)),
            FieldElement::from(18)
        );
    }

    #[test]
    fn test_power() {
        let field = small_field();
        let base = FieldElement::from(5);

        assert_eq!(field.power(&base, &BigUint::zero()), FieldElement::one());
        assert_eq!(field.power(&base, &BigUint::from(3u32)), FieldElement::from(10));
        // Fermat: a^(p-1) = 1
        assert_eq!(field.power(&base, &BigUint::from(22u32)), FieldElement::one());
    }

    #[test]
    fn test_large_field_results_are_reduced() {
        let field = PrimeField::default();
        let p_minus_one = FieldElement::new(field.modulus() - BigUint::one());

        let sum = field.add(&p_minus_one, &p_minus_one);
        assert!(sum.as_biguint() < field.modulus());
        assert_eq!(sum, FieldElement::new(field.modulus() - BigUint::from(2u32)));

        // (-1)^2 = 1
        assert_eq!(field.multiply(&p_minus_one, &p_minus_one), FieldElement::one());
    }

    #[test]
    fn test_inverse() {
        let field = PrimeField::default();
        let a = FieldElement::from(123_456_789);
        let inv = field.inverse(&a).unwrap();
        assert_eq!(field.multiply(&a, &inv), FieldElement::one());

        assert!(field.inverse(&FieldElement::zero()).is_none());
        assert!(field
            .inverse(&FieldElement::new(field.modulus().clone()))
            .is_none());
    }

    #[test]
    fn test_encode_is_fixed_width() {
        let field = PrimeField::default();
        let encoded = field.encode(&FieldElement::from(1));
        assert_eq!(encoded.len(), 32);
        assert_eq!(encoded[31], 1);
        assert!(encoded[..31].iter().all(|b| *b == 0));

        assert_eq!(field.decode(&encoded).unwrap(), FieldElement::from(1));
        assert_eq!(field.decode(&[1]).unwrap(), FieldElement::from(1));
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        let field = PrimeField::default();
        assert!(matches!(
            field.decode(&DEFAULT_PRIME),
            Err(SharingError::Encoding(_))
        ));
        assert!(matches!(
            field.decode(&[1u8; 33]),
            Err(SharingError::Encoding(_))
        ));
    }

    #[test]
    fn test_secret_encoding() {
        let field = PrimeField::default();
        let element = field.element_from_secret(b"hello").unwrap();
        assert_eq!(field.secret_from_element(&element), b"hello");

        assert_eq!(
            field.secret_from_element(&field.element_from_secret(b"").unwrap()),
            Vec::<u8>::new()
        );

        // 32 bytes of 0xFF is above the prime
        assert!(matches!(
            field.element_from_secret(&[0xFF; 32]),
            Err(SharingError::Encoding(_))
        ));
        assert!(field.element_from_secret(&[0xFF; 31]).is_ok());
    }

    #[test]
    fn test_debug_is_redacted() {
        let field = PrimeField::default();
        let element = field.element_from_secret(b"top secret").unwrap();
        let rendered = format!("{:?}", element);

        assert_eq!(rendered, r#"FieldElement("<redacted>")"#);
        assert!(!rendered.contains(&element.as_biguint().to_string()));
    }

    #[test]
    fn test_random_element_in_range() {
        let field = small_field();
        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        for _ in 0..200 {
            let element = field.random_element(&mut rng);
            assert!(element.as_biguint() < field.modulus());
        }
    }
}
