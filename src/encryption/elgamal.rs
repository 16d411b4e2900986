use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use crate::error::{Error, Result};
use crate::group::{mod_inverse, random_nonzero_below, CyclicGroup, ModpGroup, PrivateKey};

/// ElGamal over a MODP group.
///
/// `encrypt` is the textbook multiplicative scheme. `encrypt_vote` encodes a
/// vote `v` as `g^v` first, which turns the multiplicative homomorphism into
/// an additive one on the votes.
#[derive(Debug, Clone, Copy)]
pub struct ElGamal<'a> {
    group: &'a ModpGroup,
}

impl<'a> ElGamal<'a> {
    pub fn new(group: &'a ModpGroup) -> Self {
        Self { group }
    }

    /// `x` uniform in `[1, p - 2]`, `y = g^x mod p`.
    pub fn generate_keys(&self, rng: impl RngCore + CryptoRng) -> (PrivateKey, BigUint) {
        let x = self.random_exponent(rng);
        let y = self.group.g().modpow(&x, self.group.p());
        (PrivateKey::new(x), y)
    }

    /// Encrypt `m` in `[1, p - 1]`.
    pub fn encrypt(
        &self,
        rng: impl RngCore + CryptoRng,
        m: &BigUint,
        y: &BigUint,
    ) -> Result<(BigUint, BigUint)> {
        let p = self.group.p();
        if m.is_zero() || m >= p {
            return Err(Error::InvalidVoteEncoding(
                "plaintext must lie in [1, p - 1]".into(),
            ));
        }
        let k = self.random_exponent(rng);
        let c1 = self.group.g().modpow(&k, p);
        let c2 = (m * y.modpow(&k, p)) % p;
        Ok((c1, c2))
    }

    /// Encrypt `g^v` for a vote `v` of 0 or 1.
    pub fn encrypt_vote(
        &self,
        rng: impl RngCore + CryptoRng,
        v: u8,
        y: &BigUint,
    ) -> Result<(BigUint, BigUint)> {
        if v > 1 {
            return Err(Error::InvalidVoteEncoding(format!(
                "vote must be 0 or 1, got {v}"
            )));
        }
        let encoded = self.group.power(self.group.g(), &BigUint::from(v));
        self.encrypt(rng, &encoded, y)
    }

    /// `c2 * (c1^x)^-1 mod p`. For vote ciphertexts this is `g^v`, not `v`.
    pub fn decrypt(&self, c1: &BigUint, c2: &BigUint, key: &PrivateKey) -> Result<BigUint> {
        let p = self.group.p();
        let shared = c1.modpow(key.scalar(), p);
        let shared_inv = mod_inverse(&shared, p)?;
        Ok((c2 * shared_inv) % p)
    }

    /// Componentwise product: decrypts to the product of the plaintexts.
    pub fn combine(
        &self,
        (a1, a2): (&BigUint, &BigUint),
        (b1, b2): (&BigUint, &BigUint),
    ) -> (BigUint, BigUint) {
        (self.group.operate(a1, b1), self.group.operate(a2, b2))
    }

    /// Uniform in `[1, p - 2]`.
    fn random_exponent(&self, rng: impl RngCore + CryptoRng) -> BigUint {
        random_nonzero_below(rng, &(self.group.p() - BigUint::one()))
    }
}
