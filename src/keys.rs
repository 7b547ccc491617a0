//! Sources of the symmetric key used to seal share envelopes.
//!
//! [`SessionKeyPair`] hands out its raw X25519 secret as the symmetric key,
//! matching peers that do the same. [`DerivedKey`] derives a dedicated key
//! from the session secret instead. Both plug into the service through
//! [`SymmetricKeySource`].

use std::fmt;

use rand::rngs::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

pub const SYMMETRIC_KEY_LEN: usize = 32;

/// BLAKE3 context string for [`DerivedKey`].
pub const DERIVED_KEY_CONTEXT: &str = "sharecrypt 2024-06-01 share envelope key v1";

pub type SymmetricKey = Zeroizing<[u8; SYMMETRIC_KEY_LEN]>;

/// Provides the key for authenticated share encryption.
pub trait SymmetricKeySource: Send + Sync {
    fn symmetric_key(&self) -> SymmetricKey;

    /// Public half of the underlying key pair, if there is one.
    fn public_key(&self) -> Option<PublicKey> {
        None
    }
}

/// An X25519 key pair that lives as long as one service instance.
pub struct SessionKeyPair {
    secret: StaticSecret,
    public: PublicKey,
}

impl SessionKeyPair {
    /// Generate a fresh key pair from the OS random source.
    pub fn generate() -> Self {
        Self::from_secret(StaticSecret::random_from_rng(OsRng))
    }

    /// Rebuild a key pair from known secret bytes.
    pub fn from_secret_bytes(bytes: [u8; SYMMETRIC_KEY_LEN]) -> Self {
        Self::from_secret(StaticSecret::from(bytes))
    }

    fn from_secret(secret: StaticSecret) -> Self {
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    pub fn public(&self) -> &PublicKey {
        &self.public
    }
}

impl SymmetricKeySource for SessionKeyPair {
    fn symmetric_key(&self) -> SymmetricKey {
        Zeroizing::new(self.secret.to_bytes())
    }

    fn public_key(&self) -> Option<PublicKey> {
        Some(self.public)
    }
}

impl fmt::Debug for SessionKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeyPair")
            .field("public", &self.public.as_bytes())
            .finish_non_exhaustive()
    }
}

/// A symmetric key derived from a session secret with BLAKE3 `derive_key`.
pub struct DerivedKey {
    session: SessionKeyPair,
    key: SymmetricKey,
}

impl DerivedKey {
    pub fn from_session(session: SessionKeyPair) -> Self {
        let secret = session.symmetric_key();
        let key = Zeroizing::new(blake3::derive_key(DERIVED_KEY_CONTEXT, &secret[..]));
        Self { session, key }
    }

    pub fn session(&self) -> &SessionKeyPair {
        &self.session
    }
}

impl SymmetricKeySource for DerivedKey {
    fn symmetric_key(&self) -> SymmetricKey {
        self.key.clone()
    }

    fn public_key(&self) -> Option<PublicKey> {
        Some(*self.session.public())
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_reuses_secret() {
        let pair = SessionKeyPair::from_secret_bytes([9u8; 32]);
        assert_eq!(*pair.symmetric_key(), [9u8; 32]);
        assert_eq!(pair.public_key(), Some(PublicKey::from(&StaticSecret::from([9u8; 32]))));
    }

    #[test]
    fn test_generated_pairs_differ() {
        let a = SessionKeyPair::generate();
        let b = SessionKeyPair::generate();
        assert_ne!(*a.symmetric_key(), *b.symmetric_key());
        assert_ne!(a.public().as_bytes(), b.public().as_bytes());
    }

    #[test]
    fn test_derived_key_is_distinct_and_stable() {
        let raw = *SessionKeyPair::from_secret_bytes([5u8; 32]).symmetric_key();
        let derived = DerivedKey::from_session(SessionKeyPair::from_secret_bytes([5u8; 32]));
        let again = DerivedKey::from_session(SessionKeyPair::from_secret_bytes([5u8; 32]));

        assert_ne!(*derived.symmetric_key(), raw);
        assert_eq!(*derived.symmetric_key(), *again.symmetric_key());
        assert_eq!(derived.public_key(), Some(*derived.session().public()));
    }

    #[test]
    fn test_debug_hides_secret() {
        let pair = SessionKeyPair::from_secret_bytes([0xAB; 32]);
        let rendered = format!("{:?}", pair);
        assert!(rendered.contains("public"));
        assert!(!rendered.contains("171, 171, 171"));
    }
}
