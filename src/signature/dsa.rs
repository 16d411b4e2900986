use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use super::Signature;
use crate::error::Result;
use crate::group::{hash_to_int, mod_inverse, random_nonzero_below, ModpGroup, PrivateKey};

/// DSA over a MODP group.
///
/// A nonce giving `r = 0` or `s = 0` is not retried: for a 256-bit `q` the
/// chance is negligible, and such a signature simply fails to verify.
#[derive(Debug, Clone, Copy)]
pub struct Dsa<'a> {
    group: &'a ModpGroup,
}

impl<'a> Dsa<'a> {
    pub fn new(group: &'a ModpGroup) -> Self {
        Self { group }
    }

    /// `x` uniform in `[1, q - 1]`, `y = g^x mod p`.
    pub fn generate_keys(&self, rng: impl RngCore + CryptoRng) -> (PrivateKey, BigUint) {
        let x = random_nonzero_below(rng, self.group.q());
        let y = self.group.g().modpow(&x, self.group.p());
        (PrivateKey::new(x), y)
    }

    pub fn sign(
        &self,
        rng: impl RngCore + CryptoRng,
        message: &[u8],
        key: &PrivateKey,
    ) -> Result<Signature> {
        let k = random_nonzero_below(rng, self.group.q());
        self.sign_with_nonce(message, key, &k)
    }

    pub(crate) fn sign_with_nonce(
        &self,
        message: &[u8],
        key: &PrivateKey,
        k: &BigUint,
    ) -> Result<Signature> {
        let q = self.group.q();
        let r = self.group.g().modpow(k, self.group.p()) % q;
        let e = hash_to_int(message);
        let k_inv = mod_inverse(k, q)?;
        let s = (k_inv * (e + key.scalar() * &r)) % q;
        Ok(Signature { r, s })
    }

    pub fn verify(&self, message: &[u8], signature: &Signature, y: &BigUint) -> bool {
        let (p, q) = (self.group.p(), self.group.q());
        if !signature.is_well_formed(q) {
            return false;
        }
        let w = match mod_inverse(&signature.s, q) {
            Ok(w) => w,
            Err(_) => return false,
        };
        let e = hash_to_int(message);
        let u1 = (e * &w) % q;
        let u2 = (&signature.r * &w) % q;
        let v = (self.group.g().modpow(&u1, p) * y.modpow(&u2, p)) % p % q;
        v == signature.r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(digits: &str) -> BigUint {
        BigUint::parse_bytes(digits.as_bytes(), 16).unwrap()
    }

    #[test]
    fn test_known_answer() {
        let group = ModpGroup::rfc5114();
        let dsa = Dsa::new(&group);
        let x = hex("49582493d17932dabd014bb712fc55af453ebfb2767537007b0ccff6e857e6a3");
        let k = hex("7e7f77278fe5232f30056200582ab6e7cae23992bca75929573b779c62ef4759");
        let msg = b"An important message !";

        let signature = dsa
            .sign_with_nonce(msg, &PrivateKey::new(x.clone()), &k)
            .unwrap();
        assert_eq!(
            signature.r,
            hex("5ddf26ae653f5583e44259985262c84b483b74be46dec74b07906c5896e26e5a")
        );
        assert_eq!(
            signature.s,
            hex("194101d2c55ac599e4a61603bc6667dcc23bd2e9bdbef353ec3cb839dcce6ec1")
        );

        let y = group.g().modpow(&x, group.p());
        assert!(dsa.verify(msg, &signature, &y));
    }

    #[test]
    fn test_signing() {
        let mut rng = rand::thread_rng();
        let group = ModpGroup::rfc5114();
        let dsa = Dsa::new(&group);
        let (priv_key, pub_key) = dsa.generate_keys(&mut rng);

        // Sign and verify.
        let msg = b"This is a message.";
        let signature = dsa.sign(&mut rng, msg, &priv_key).unwrap();
        assert!(dsa.verify(msg, &signature, &pub_key));

        // Message mismatch.
        let mut different_msg = msg.to_vec();
        different_msg[0] ^= 1;
        assert!(!dsa.verify(&different_msg, &signature, &pub_key));

        // Component mismatch.
        let mut bad = signature.clone();
        bad.r += 1_u32;
        assert!(!dsa.verify(msg, &bad, &pub_key));
        let mut bad = signature.clone();
        bad.s += 1_u32;
        assert!(!dsa.verify(msg, &bad, &pub_key));

        // Key mismatch.
        let (_, new_pub) = dsa.generate_keys(&mut rng);
        assert!(!dsa.verify(msg, &signature, &new_pub));
    }

    #[test]
    fn test_out_of_range_components() {
        let mut rng = rand::thread_rng();
        let group = ModpGroup::rfc5114();
        let dsa = Dsa::new(&group);
        let (priv_key, pub_key) = dsa.generate_keys(&mut rng);
        let signature = dsa.sign(&mut rng, b"msg", &priv_key).unwrap();

        let zero_s = Signature {
            r: signature.r.clone(),
            s: BigUint::from(0_u32),
        };
        assert!(!dsa.verify(b"msg", &zero_s, &pub_key));
        let wide_r = Signature {
            r: &signature.r + group.q(),
            s: signature.s.clone(),
        };
        assert!(!dsa.verify(b"msg", &wide_r, &pub_key));
    }

    #[test]
    fn test_degenerate_s_is_not_retried() {
        let group = ModpGroup::rfc5114();
        let dsa = Dsa::new(&group);
        let q = group.q();
        let k = BigUint::from(12345_u32);
        let msg = b"degenerate";

        // Choose x so that e + x * r = 0 mod q.
        let r = group.g().modpow(&k, group.p()) % q;
        let e = hash_to_int(msg) % q;
        let x = ((q - e) * mod_inverse(&r, q).unwrap()) % q;
        let y = group.g().modpow(&x, group.p());

        let signature = dsa.sign_with_nonce(msg, &PrivateKey::new(x), &k).unwrap();
        assert_eq!(signature.s, BigUint::from(0_u32));
        assert!(!dsa.verify(msg, &signature, &y));
    }
}
