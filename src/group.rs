use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use p256::ProjectivePoint;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use std::fmt::{self, Debug, Formatter};

use crate::config::SchemeKind;
use crate::error::{Error, Result};

pub mod modp;
pub mod p256_impl;

pub use modp::ModpGroup;
pub use p256_impl::CurveGroup;

/// A cyclic group of prime order, written multiplicatively.
///
/// For the curve group "multiply" means point addition and "power" means
/// scalar multiplication.
pub trait CyclicGroup {
    type Element: Clone + Debug + PartialEq;

    /// How many integers one element occupies in the canonical ballot layout.
    const FIELDS: usize;

    fn identity(&self) -> Self::Element;

    fn generator(&self) -> &Self::Element;

    /// Order of the subgroup generated by `generator()`.
    fn order(&self) -> &BigUint;

    fn operate(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    fn invert(&self, a: &Self::Element) -> Result<Self::Element>;

    fn power(&self, base: &Self::Element, exponent: &BigUint) -> Self::Element;

    /// Integers written for this element in the canonical ballot layout.
    fn to_fields(&self, element: &Self::Element) -> Vec<BigUint>;

    /// Inverse of `to_fields`. `None` if the integers do not describe an element.
    fn from_fields(&self, fields: &[BigUint]) -> Option<Self::Element>;
}

/// The group every scheme of one election runs over.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainParameters {
    /// Prime-order subgroup of the integers modulo a large prime: DSA and ElGamal.
    Modular(ModpGroup),
    /// Elliptic-curve group: ECDSA and EC ElGamal.
    Curve(CurveGroup),
}

impl DomainParameters {
    /// The standard parameters for the given scheme.
    pub fn standard(kind: SchemeKind) -> Self {
        match kind {
            SchemeKind::Modular => Self::Modular(ModpGroup::rfc5114()),
            SchemeKind::Curve => Self::Curve(CurveGroup::p256()),
        }
    }

    pub fn kind(&self) -> SchemeKind {
        match self {
            Self::Modular(_) => SchemeKind::Modular,
            Self::Curve(_) => SchemeKind::Curve,
        }
    }

    /// The prime order that signature components are reduced by.
    pub fn order(&self) -> &BigUint {
        match self {
            Self::Modular(group) => group.order(),
            Self::Curve(group) => group.order(),
        }
    }
}

/// The two groups of an election: one for ballot signatures, one for vote
/// encryption. They are chosen independently, so DSA may sign EC ElGamal
/// ballots and ECDSA may sign modular ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionParameters {
    pub signature: DomainParameters,
    pub encryption: DomainParameters,
}

impl ElectionParameters {
    pub fn standard(signature: SchemeKind, encryption: SchemeKind) -> Self {
        Self {
            signature: DomainParameters::standard(signature),
            encryption: DomainParameters::standard(encryption),
        }
    }
}

/// A secret scalar. Deliberately neither serializable nor printable.
#[derive(Clone, Eq, PartialEq)]
pub struct PrivateKey(BigUint);

impl PrivateKey {
    pub fn new(scalar: BigUint) -> Self {
        Self(scalar)
    }

    pub fn scalar(&self) -> &BigUint {
        &self.0
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// The public half of a key pair: `g^x mod p` or `x * G`.
#[derive(Debug, Clone, PartialEq)]
pub enum PublicKey {
    Modular(BigUint),
    Curve(ProjectivePoint),
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub private: PrivateKey,
    pub public: PublicKey,
}

/// SHA-256 of `message`, read as a big-endian integer.
pub fn hash_to_int(message: &[u8]) -> BigUint {
    BigUint::from_bytes_be(&Sha256::digest(message))
}

/// The inverse of `value` modulo `modulus`.
pub fn mod_inverse(value: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    value.modinv(modulus).ok_or(Error::NotInvertible)
}

/// Uniform integer in `[1, bound - 1]`.
pub(crate) fn random_nonzero_below(mut rng: impl RngCore + CryptoRng, bound: &BigUint) -> BigUint {
    rng.gen_biguint_range(&BigUint::one(), bound)
}
