use log::warn;
use num_bigint::BigUint;
use num_traits::Zero;
use p256::ProjectivePoint;
use rand::{CryptoRng, RngCore};

use super::Signature;
use crate::error::{Error, Result};
use crate::group::{
    hash_to_int, mod_inverse, random_nonzero_below, CurveGroup, CyclicGroup, PrivateKey,
};

/// Fresh nonces drawn before giving up on a signature.
pub const MAX_NONCE_ATTEMPTS: usize = 64;

/// ECDSA over the curve group, with integer scalars.
#[derive(Debug, Clone, Copy)]
pub struct Ecdsa<'a> {
    group: &'a CurveGroup,
}

impl<'a> Ecdsa<'a> {
    pub fn new(group: &'a CurveGroup) -> Self {
        Self { group }
    }

    /// `x` uniform in `[1, n - 1]`, `P = x * G`.
    pub fn generate_keys(&self, rng: impl RngCore + CryptoRng) -> (PrivateKey, ProjectivePoint) {
        let x = random_nonzero_below(rng, self.group.order());
        let public = self.group.power(self.group.base_point(), &x);
        (PrivateKey::new(x), public)
    }

    /// Sign, drawing a new nonce whenever `r` or `s` comes out as zero.
    pub fn sign(
        &self,
        mut rng: impl RngCore + CryptoRng,
        message: &[u8],
        key: &PrivateKey,
    ) -> Result<Signature> {
        for attempt in 1..=MAX_NONCE_ATTEMPTS {
            let k = random_nonzero_below(&mut rng, self.group.order());
            match self.sign_with_nonce(message, key, &k)? {
                Some(signature) => return Ok(signature),
                None => warn!("Degenerate ECDSA nonce on attempt {attempt}, retrying"),
            }
        }
        Err(Error::NonceRetriesExhausted(MAX_NONCE_ATTEMPTS))
    }

    /// `None` if this nonce yields `r = 0` or `s = 0`.
    pub(crate) fn sign_with_nonce(
        &self,
        message: &[u8],
        key: &PrivateKey,
        k: &BigUint,
    ) -> Result<Option<Signature>> {
        let n = self.group.order();
        let point = self.group.power(self.group.base_point(), k);
        let r = match self.group.x_coordinate(&point) {
            Some(x) => x % n,
            None => return Ok(None),
        };
        if r.is_zero() {
            return Ok(None);
        }
        let e = hash_to_int(message);
        let k_inv = mod_inverse(k, n)?;
        let s = (k_inv * (e + &r * key.scalar())) % n;
        if s.is_zero() {
            return Ok(None);
        }
        Ok(Some(Signature { r, s }))
    }

    pub fn verify(&self, message: &[u8], signature: &Signature, public: &ProjectivePoint) -> bool {
        let n = self.group.order();
        if !signature.is_well_formed(n) {
            return false;
        }
        let w = match mod_inverse(&signature.s, n) {
            Ok(w) => w,
            Err(_) => return false,
        };
        let e = hash_to_int(message);
        let u1 = (e * &w) % n;
        let u2 = (&signature.r * &w) % n;
        let point = self.group.operate(
            &self.group.power(self.group.base_point(), &u1),
            &self.group.power(public, &u2),
        );
        // The identity has no x coordinate and is rejected here.
        match self.group.x_coordinate(&point) {
            Some(x) => x % n == signature.r,
            None => false,
        }
    }
}
