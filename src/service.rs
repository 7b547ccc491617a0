use tracing::{debug, warn};
use x25519_dalek::PublicKey;

use crate::crypto::{self, Envelope};
use crate::error::{Result, SharingError};
use crate::field::PrimeField;
use crate::keys::{DerivedKey, SessionKeyPair, SymmetricKeySource};
use crate::shamir::{self, Share, ShareConfig};

/// Facade over share generation, reconstruction and envelope encryption.
///
/// Holds only immutable state, so one instance can be shared across threads.
#[derive(Debug)]
pub struct SecretSharingService<K = SessionKeyPair> {
    field: PrimeField,
    keys: K,
}

impl SecretSharingService<SessionKeyPair> {
    /// Default field and a freshly generated session key pair whose secret is
    /// used directly as the envelope key.
    pub fn new() -> Self {
        Self::with_key_source(PrimeField::default(), SessionKeyPair::generate())
    }
}

impl Default for SecretSharingService<SessionKeyPair> {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretSharingService<DerivedKey> {
    /// Default field with an envelope key derived from a fresh session secret.
    pub fn with_derived_key() -> Self {
        Self::with_key_source(
            PrimeField::default(),
            DerivedKey::from_session(SessionKeyPair::generate()),
        )
    }
}

impl<K: SymmetricKeySource> SecretSharingService<K> {
    pub fn with_key_source(field: PrimeField, keys: K) -> Self {
        Self { field, keys }
    }

    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    pub fn key_source(&self) -> &K {
        &self.keys
    }

    pub fn public_key(&self) -> Option<PublicKey> {
        self.keys.public_key()
    }

    pub fn generate_shares(&self, secret: &[u8], config: &ShareConfig) -> Result<Vec<Share>> {
        let shares = shamir::generate_shares(&self.field, secret, config)?;
        debug!(
            num_shares = config.num_shares(),
            threshold = config.threshold(),
            "generated shares"
        );
        Ok(shares)
    }

    pub fn reconstruct_secret(&self, shares: &[Share], threshold: u32) -> Result<Vec<u8>> {
        let secret = shamir::reconstruct_secret(&self.field, shares, threshold)?;
        debug!(supplied = shares.len(), threshold, "reconstructed secret");
        Ok(secret)
    }

    pub fn encrypt_share(&self, share: &Share) -> Result<Envelope> {
        let key = self.keys.symmetric_key();
        let envelope = crypto::encrypt(share, &key)?;
        debug!(index = share.index(), "sealed share");
        Ok(envelope)
    }

    pub fn decrypt_share(&self, envelope: &Envelope) -> Result<Share> {
        let key = self.keys.symmetric_key();
        match crypto::decrypt(envelope, &key) {
            Ok(share) => {
                debug!(index = share.index(), "opened share");
                Ok(share)
            }
            Err(SharingError::Decryption) => {
                warn!("envelope failed authentication");
                Err(SharingError::Decryption)
            }
            Err(e) => Err(e),
        }
    }
}
