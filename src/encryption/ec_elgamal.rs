use p256::ProjectivePoint;
use rand::{CryptoRng, RngCore};

use crate::error::{Error, Result};
use crate::group::{random_nonzero_below, CurveGroup, CyclicGroup, PrivateKey};

/// ElGamal on the curve, encrypting single bits: 0 as the identity, 1 as `G`.
#[derive(Debug, Clone, Copy)]
pub struct EcElGamal<'a> {
    group: &'a CurveGroup,
}

impl<'a> EcElGamal<'a> {
    pub fn new(group: &'a CurveGroup) -> Self {
        Self { group }
    }

    pub fn encode(&self, bit: u8) -> Result<ProjectivePoint> {
        match bit {
            0 => Ok(self.group.identity()),
            1 => Ok(*self.group.base_point()),
            _ => Err(Error::InvalidVoteEncoding(format!(
                "vote must be 0 or 1, got {bit}"
            ))),
        }
    }

    pub fn decode(&self, point: &ProjectivePoint) -> Result<u8> {
        if self.group.is_identity(point) {
            Ok(0)
        } else if point == self.group.base_point() {
            Ok(1)
        } else {
            Err(Error::InvalidVoteEncoding(
                "decrypted point is neither O nor G".into(),
            ))
        }
    }

    /// `x` uniform in `[1, n - 1]`, `P = x * G`.
    pub fn generate_keys(&self, rng: impl RngCore + CryptoRng) -> (PrivateKey, ProjectivePoint) {
        let x = random_nonzero_below(rng, self.group.order());
        let public = self.group.power(self.group.base_point(), &x);
        (PrivateKey::new(x), public)
    }

    /// `(k * G, Encode(bit) + k * P)`.
    pub fn encrypt(
        &self,
        rng: impl RngCore + CryptoRng,
        bit: u8,
        public: &ProjectivePoint,
    ) -> Result<(ProjectivePoint, ProjectivePoint)> {
        let encoded = self.encode(bit)?;
        let k = random_nonzero_below(rng, self.group.order());
        let r = self.group.power(self.group.base_point(), &k);
        let c = self
            .group
            .operate(&encoded, &self.group.power(public, &k));
        Ok((r, c))
    }

    /// Decrypt a single, un-aggregated ciphertext to its bit.
    pub fn decrypt(
        &self,
        r: &ProjectivePoint,
        c: &ProjectivePoint,
        key: &PrivateKey,
    ) -> Result<u8> {
        self.decode(&self.decrypt_point(r, c, key))
    }

    /// `C - x * R`: the encoded plaintext, `(sum of bits) * G` for an aggregate.
    pub fn decrypt_point(
        &self,
        r: &ProjectivePoint,
        c: &ProjectivePoint,
        key: &PrivateKey,
    ) -> ProjectivePoint {
        let shared = self.group.power(r, key.scalar());
        *c - shared
    }

    /// Componentwise point addition.
    pub fn combine(
        &self,
        (a_r, a_c): (&ProjectivePoint, &ProjectivePoint),
        (b_r, b_c): (&ProjectivePoint, &ProjectivePoint),
    ) -> (ProjectivePoint, ProjectivePoint) {
        (self.group.operate(a_r, b_r), self.group.operate(a_c, b_c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use num_bigint::BigUint;

    use crate::dlog::{self, SearchLimits};

    #[test]
    fn test_encoding() {
        let group = CurveGroup::p256();
        let elgamal = EcElGamal::new(&group);
        for bit in [0, 1] {
            assert_eq!(elgamal.decode(&elgamal.encode(bit).unwrap()), Ok(bit));
        }
        assert!(matches!(elgamal.encode(2), Err(Error::InvalidVoteEncoding(_))));
        let two_g = group.power(group.base_point(), &BigUint::from(2_u32));
        assert!(matches!(elgamal.decode(&two_g), Err(Error::InvalidVoteEncoding(_))));
    }

    #[test]
    fn test_encrypt_decrypt() {
        let mut rng = rand::thread_rng();
        let group = CurveGroup::p256();
        let elgamal = EcElGamal::new(&group);
        let (x, public) = elgamal.generate_keys(&mut rng);

        let messages = [1, 0, 1, 1, 0];
        let ciphertexts = messages
            .iter()
            .map(|bit| elgamal.encrypt(&mut rng, *bit, &public).unwrap())
            .collect::<Vec<_>>();
        for (bit, (r, c)) in messages.iter().zip(&ciphertexts) {
            assert_eq!(elgamal.decrypt(r, c, &x), Ok(*bit));
        }

        // The aggregate holds 3 * G, which no longer decodes as a single bit.
        let identity = (group.identity(), group.identity());
        let (r_sum, c_sum) = ciphertexts.iter().fold(identity, |(ar, ac), (r, c)| {
            elgamal.combine((&ar, &ac), (r, c))
        });
        assert!(matches!(
            elgamal.decrypt(&r_sum, &c_sum, &x),
            Err(Error::InvalidVoteEncoding(_))
        ));
        let encoded = elgamal.decrypt_point(&r_sum, &c_sum, &x);
        assert_eq!(
            dlog::solve(&group, group.base_point(), &encoded, &SearchLimits::new(5)),
            Ok(3)
        );
    }

    #[test]
    fn test_wrong_key() {
        let mut rng = rand::thread_rng();
        let group = CurveGroup::p256();
        let elgamal = EcElGamal::new(&group);
        let (_, public) = elgamal.generate_keys(&mut rng);
        let (other, _) = elgamal.generate_keys(&mut rng);
        let (r, c) = elgamal.encrypt(&mut rng, 1, &public).unwrap();
        assert!(elgamal.decrypt(&r, &c, &other).is_err());
    }
}
