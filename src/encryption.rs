use num_bigint::BigUint;
use p256::ProjectivePoint;
use rand::{CryptoRng, RngCore};

use crate::dlog::{self, SearchLimits};
use crate::error::{Error, Result};
use crate::group::{CyclicGroup, DomainParameters, KeyPair, PrivateKey, PublicKey};

pub mod ec_elgamal;
pub mod elgamal;

pub use ec_elgamal::EcElGamal;
pub use elgamal::ElGamal;

/// One encrypted vote bit.
#[derive(Debug, Clone, PartialEq)]
pub enum Ciphertext {
    /// `(g^k, g^v * y^k) mod p`.
    Modular { c1: BigUint, c2: BigUint },
    /// `(k * G, Encode(v) + k * P)`.
    Curve { r: ProjectivePoint, c: ProjectivePoint },
}

/// Vote encryption dispatches to exponential ElGamal or EC ElGamal.
impl DomainParameters {
    pub fn generate_encryption_keys(&self, rng: impl RngCore + CryptoRng) -> KeyPair {
        match self {
            Self::Modular(group) => {
                let (private, public) = ElGamal::new(group).generate_keys(rng);
                KeyPair {
                    private,
                    public: PublicKey::Modular(public),
                }
            }
            Self::Curve(group) => {
                let (private, public) = EcElGamal::new(group).generate_keys(rng);
                KeyPair {
                    private,
                    public: PublicKey::Curve(public),
                }
            }
        }
    }

    /// Encrypt a single vote bit (0 or 1).
    pub fn encrypt_vote(
        &self,
        rng: impl RngCore + CryptoRng,
        bit: u8,
        key: &PublicKey,
    ) -> Result<Ciphertext> {
        match (self, key) {
            (Self::Modular(group), PublicKey::Modular(y)) => {
                let (c1, c2) = ElGamal::new(group).encrypt_vote(rng, bit, y)?;
                Ok(Ciphertext::Modular { c1, c2 })
            }
            (Self::Curve(group), PublicKey::Curve(point)) => {
                let (r, c) = EcElGamal::new(group).encrypt(rng, bit, point)?;
                Ok(Ciphertext::Curve { r, c })
            }
            _ => Err(Error::SchemeMismatch),
        }
    }

    /// Whether the ciphertext belongs to this scheme.
    pub fn supports(&self, ciphertext: &Ciphertext) -> bool {
        matches!(
            (self, ciphertext),
            (Self::Modular(_), Ciphertext::Modular { .. }) | (Self::Curve(_), Ciphertext::Curve { .. })
        )
    }

    /// The encryption of nothing: `(1, 1)` or `(O, O)`.
    pub fn identity_ciphertext(&self) -> Ciphertext {
        match self {
            Self::Modular(group) => Ciphertext::Modular {
                c1: group.identity(),
                c2: group.identity(),
            },
            Self::Curve(group) => Ciphertext::Curve {
                r: group.identity(),
                c: group.identity(),
            },
        }
    }

    /// Homomorphic combination: the result decrypts to the sum of the two votes.
    pub fn combine(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        match (self, a, b) {
            (
                Self::Modular(group),
                Ciphertext::Modular { c1: a1, c2: a2 },
                Ciphertext::Modular { c1: b1, c2: b2 },
            ) => {
                let (c1, c2) = ElGamal::new(group).combine((a1, a2), (b1, b2));
                Ok(Ciphertext::Modular { c1, c2 })
            }
            (
                Self::Curve(group),
                Ciphertext::Curve { r: a_r, c: a_c },
                Ciphertext::Curve { r: b_r, c: b_c },
            ) => {
                let (r, c) = EcElGamal::new(group).combine((a_r, a_c), (b_r, b_c));
                Ok(Ciphertext::Curve { r, c })
            }
            _ => Err(Error::SchemeMismatch),
        }
    }

    /// Decrypt a (possibly aggregated) ciphertext to the number of ones it holds.
    pub fn decrypt_count(
        &self,
        ciphertext: &Ciphertext,
        key: &PrivateKey,
        limits: &SearchLimits,
    ) -> Result<u64> {
        match (self, ciphertext) {
            (Self::Modular(group), Ciphertext::Modular { c1, c2 }) => {
                let encoded = ElGamal::new(group).decrypt(c1, c2, key)?;
                dlog::solve(group, group.generator(), &encoded, limits)
            }
            (Self::Curve(group), Ciphertext::Curve { r, c }) => {
                let encoded = EcElGamal::new(group).decrypt_point(r, c, key);
                dlog::solve(group, group.generator(), &encoded, limits)
            }
            _ => Err(Error::SchemeMismatch),
        }
    }
}
