//! Threshold secret sharing over a 256-bit prime field, with each share
//! sealed in its own authenticated envelope.
//!
//! ```
//! use sharecrypt::{SecretSharingService, ShareConfig};
//!
//! let service = SecretSharingService::new();
//! let config = ShareConfig::new(5, 3).unwrap();
//! let shares = service.generate_shares(b"hello", &config).unwrap();
//!
//! let envelope = service.encrypt_share(&shares[0]).unwrap();
//! assert_eq!(service.decrypt_share(&envelope).unwrap(), shares[0]);
//!
//! let secret = service.reconstruct_secret(&shares[2..], 3).unwrap();
//! assert_eq!(secret, b"hello");
//! ```

pub mod crypto;
pub mod error;
pub mod field;
pub mod keys;
pub mod service;
pub mod shamir;

pub use crypto::Envelope;
pub use error::{Result, SharingError};
pub use field::{FieldElement, PrimeField};
pub use keys::{DerivedKey, SessionKeyPair, SymmetricKeySource};
pub use service::SecretSharingService;
pub use shamir::{Share, ShareConfig};
