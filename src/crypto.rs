use base64::{engine::general_purpose, Engine as _};
use chacha20poly1305::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    XChaCha20Poly1305, XNonce,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Result, SharingError};
use crate::keys::SYMMETRIC_KEY_LEN;
use crate::shamir::Share;

/// XChaCha20-Poly1305 nonce length.
pub const NONCE_LEN: usize = 24;

/// One encrypted share, ready for transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Base64-encoded ciphertext, Poly1305 tag included
    pub ciphertext: String,
    /// Base64-encoded 24-byte nonce
    pub nonce: String,
}

/// Encrypt a share under `key` with a fresh random nonce.
pub fn encrypt(share: &Share, key: &[u8; SYMMETRIC_KEY_LEN]) -> Result<Envelope> {
    let plaintext = Zeroizing::new(
        serde_json::to_vec(share).map_err(|_| SharingError::Encryption)?,
    );

    let cipher = XChaCha20Poly1305::new(key.into());
    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_slice())
        .map_err(|_| SharingError::Encryption)?;

    Ok(Envelope {
        ciphertext: general_purpose::STANDARD.encode(&ciphertext),
        nonce: general_purpose::STANDARD.encode(nonce),
    })
}

/// Decrypt an envelope produced by [`encrypt`].
///
/// Every authentication problem (wrong key, altered ciphertext, altered or
/// truncated nonce) yields the same [`SharingError::Decryption`].
pub fn decrypt(envelope: &Envelope, key: &[u8; SYMMETRIC_KEY_LEN]) -> Result<Share> {
    let ciphertext = general_purpose::STANDARD
        .decode(&envelope.ciphertext)
        .map_err(|e| SharingError::Encoding(format!("ciphertext is not base64: {}", e)))?;
    let nonce_bytes = general_purpose::STANDARD
        .decode(&envelope.nonce)
        .map_err(|e| SharingError::Encoding(format!("nonce is not base64: {}", e)))?;

    if nonce_bytes.len() != NONCE_LEN {
        return Err(SharingError::Decryption);
    }
    let nonce = XNonce::from_slice(&nonce_bytes);

    let cipher = XChaCha20Poly1305::new(key.into());
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(nonce, ciphertext.as_ref())
            .map_err(|_| SharingError::Decryption)?,
    );

    serde_json::from_slice(&plaintext)
        .map_err(|_| SharingError::MalformedShare("decrypted payload is not a share".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shamir::{MAX_SHARES, MAX_SHARE_VALUE_LEN};
    use std::collections::HashSet;

    const KEY: [u8; 32] = [0x11; 32];

    fn sample_share() -> Share {
        Share::new(2, vec![7u8; 32]).unwrap()
    }

    fn flip_byte(encoded: &str, position: usize) -> String {
        let mut bytes = general_purpose::STANDARD.decode(encoded).unwrap();
        bytes[position] ^= 0x01;
        general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn test_encrypt_decrypt() {
        let share = sample_share();
        let envelope = encrypt(&share, &KEY).unwrap();
        let decrypted = decrypt(&envelope, &KEY).unwrap();
        assert_eq!(decrypted, share);

        let nonce = general_purpose::STANDARD.decode(&envelope.nonce).unwrap();
        assert_eq!(nonce.len(), NONCE_LEN);
    }

    #[test]
    fn test_wrong_key() {
        let envelope = encrypt(&sample_share(), &KEY).unwrap();
        let result = decrypt(&envelope, &[0x22; 32]);
        assert_eq!(result, Err(SharingError::Decryption));
    }

    #[test]
    fn test_tampered_ciphertext() {
        let envelope = encrypt(&sample_share(), &KEY).unwrap();
        let len = general_purpose::STANDARD.decode(&envelope.ciphertext).unwrap().len();

        for position in 0..len {
            let tampered = Envelope {
                ciphertext: flip_byte(&envelope.ciphertext, position),
                nonce: envelope.nonce.clone(),
            };
            assert_eq!(decrypt(&tampered, &KEY), Err(SharingError::Decryption));
        }
    }

    #[test]
    fn test_tampered_nonce() {
        let envelope = encrypt(&sample_share(), &KEY).unwrap();

        for position in 0..NONCE_LEN {
            let tampered = Envelope {
                ciphertext: envelope.ciphertext.clone(),
                nonce: flip_byte(&envelope.nonce, position),
            };
            assert_eq!(decrypt(&tampered, &KEY), Err(SharingError::Decryption));
        }
    }

    #[test]
    fn test_truncated_nonce() {
        let envelope = encrypt(&sample_share(), &KEY).unwrap();
        let mut nonce = general_purpose::STANDARD.decode(&envelope.nonce).unwrap();
        nonce.truncate(12);

        let truncated = Envelope {
            ciphertext: envelope.ciphertext,
            nonce: general_purpose::STANDARD.encode(nonce),
        };
        assert_eq!(decrypt(&truncated, &KEY), Err(SharingError::Decryption));
    }

    #[test]
    fn test_invalid_base64() {
        let envelope = Envelope {
            ciphertext: "%%%".into(),
            nonce: general_purpose::STANDARD.encode([0u8; NONCE_LEN]),
        };
        assert!(matches!(decrypt(&envelope, &KEY), Err(SharingError::Encoding(_))));
    }

    #[test]
    fn test_malformed_plaintext() {
        let cipher = XChaCha20Poly1305::new((&KEY).into());
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = cipher.encrypt(&nonce, b"not a share".as_ref()).unwrap();

        let envelope = Envelope {
            ciphertext: general_purpose::STANDARD.encode(ciphertext),
            nonce: general_purpose::STANDARD.encode(nonce),
        };
        assert!(matches!(
            decrypt(&envelope, &KEY),
            Err(SharingError::MalformedShare(_))
        ));
    }

    #[test]
    fn test_encryption_failure_is_not_a_share_error() {
        let error = SharingError::Encryption;
        assert_eq!(error.to_string(), "encryption failed");
        assert_ne!(error, SharingError::Decryption);

        // Largest share value still seals and opens.
        let share = Share::new(MAX_SHARES, vec![0xEE; MAX_SHARE_VALUE_LEN]).unwrap();
        let envelope = encrypt(&share, &KEY).unwrap();
        assert_eq!(decrypt(&envelope, &KEY).unwrap(), share);
    }

    #[test]
    fn test_nonce_uniqueness() {
        let share = sample_share();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let envelope = encrypt(&share, &KEY).unwrap();
            assert!(seen.insert(envelope.nonce));
        }
    }

    #[test]
    fn test_envelope_wire_format() {
        let envelope = encrypt(&sample_share(), &KEY).unwrap();
        let json = serde_json::to_value(&envelope).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.contains_key("ciphertext"));
        assert!(object.contains_key("nonce"));
    }
}
