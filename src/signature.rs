use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

use crate::error::Result;
use crate::group::{DomainParameters, KeyPair, PrivateKey, PublicKey};

pub mod dsa;
pub mod ecdsa;

pub use dsa::Dsa;
pub use ecdsa::Ecdsa;

/// A DSA or ECDSA signature.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Signature {
    pub r: BigUint,
    pub s: BigUint,
}

impl Signature {
    /// Both components lie in the open interval `(0, order)`.
    pub fn is_well_formed(&self, order: &BigUint) -> bool {
        let in_range = |value: &BigUint| !value.is_zero() && value < order;
        in_range(&self.r) && in_range(&self.s)
    }
}

/// Signing dispatches to DSA or ECDSA depending on the parameters.
impl DomainParameters {
    pub fn generate_signing_keys(&self, rng: impl RngCore + CryptoRng) -> KeyPair {
        match self {
            Self::Modular(group) => {
                let (private, public) = Dsa::new(group).generate_keys(rng);
                KeyPair {
                    private,
                    public: PublicKey::Modular(public),
                }
            }
            Self::Curve(group) => {
                let (private, public) = Ecdsa::new(group).generate_keys(rng);
                KeyPair {
                    private,
                    public: PublicKey::Curve(public),
                }
            }
        }
    }

    pub fn sign(
        &self,
        rng: impl RngCore + CryptoRng,
        message: &[u8],
        key: &PrivateKey,
    ) -> Result<Signature> {
        match self {
            Self::Modular(group) => Dsa::new(group).sign(rng, message, key),
            Self::Curve(group) => Ecdsa::new(group).sign(rng, message, key),
        }
    }

    /// A key from the other scheme never verifies.
    pub fn verify(&self, message: &[u8], signature: &Signature, key: &PublicKey) -> bool {
        match (self, key) {
            (Self::Modular(group), PublicKey::Modular(y)) => {
                Dsa::new(group).verify(message, signature, y)
            }
            (Self::Curve(group), PublicKey::Curve(point)) => {
                Ecdsa::new(group).verify(message, signature, point)
            }
            _ => false,
        }
    }
}
