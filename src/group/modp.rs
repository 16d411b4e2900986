use num_traits::Zero;

use super::*;

/// RFC 5114 section 2.3: 2048-bit MODP group with a 256-bit prime order subgroup.
const RFC5114_P: &str = "87A8E61DB4B6663CFFBBD19C651959998CEEF608660DD0F25D2CEED4435E3B00\
                         E00DF8F1D61957D4FAF7DF4561B2AA3016C3D91134096FAA3BF4296D830E9A7C\
                         209E0C6497517ABD5A8A9D306BCF67ED91F9E6725B4758C022E0B1EF4275BF7B\
                         6C5BFC11D45F9088B941F54EB1E59BB8BC39A0BF12307F5C4FDB70C581B23F76\
                         B63ACAE1CAA6B7902D52526735488A0EF13C6D9A51BFA4AB3AD8347796524D8E\
                         F6A167B5A41825D967E144E5140564251CCACB83E6B486F6B3CA3F7971506026\
                         C0B857F689962856DED4010ABD0BE621C3A3960A54E710C375F26375D7014103\
                         A4B54330C198AF126116D2276E11715F693877FAD7EF09CADB094AE91E1A1597";

const RFC5114_Q: &str = "8CF83642A709A097B447997640129DA299B1A47D1EB3750BA308B0FE64F5FBD3";

const RFC5114_G: &str = "3FB32C9B73134D0B2E77506660EDBD484CA7B18F21EF205407F4793A1A0BA125\
                         10DBC15077BE463FFF4FED4AAC0BB555BE3A6C1B0C6B47B1BC3773BF7E8C6F62\
                         901228F8C28CBB18A55AE31341000A650196F931C77A57F2DDF463E5E9EC144B\
                         777DE62AAAB8A8628AC376D282D6ED3864E67982428EBC831D14348F6F2F9193\
                         B5045AF2767164E1DFC967C1FB3F2E55A4BD1BFFE83B9C80D052B985D182EA0A\
                         DB2A3B7313D3FE14C8484B1E052588B9B7D2BBD2DF016199ECD06E1557CD0915\
                         B3353BBB64E0EC377FD028370DF92B52C7891428CDC67EB6184B523D1DB246C3\
                         2F63078490F00EF8D647D148D47954515E2327CFEF98C582664B4C0F6CC41659";

/// The subgroup of order `q` generated by `g` in the integers modulo `p`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ModpGroup {
    p: BigUint,
    q: BigUint,
    g: BigUint,
}

impl ModpGroup {
    /// Check that `g` generates a subgroup of order `q` modulo `p`.
    /// Primality of `p` and `q` is trusted, not tested.
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> Result<Self> {
        let one = BigUint::one();
        if p <= BigUint::from(3_u32) || q <= one {
            return Err(Error::InvalidParameters("modulus or order too small".into()));
        }
        if !((&p - &one) % &q).is_zero() {
            return Err(Error::InvalidParameters("q does not divide p - 1".into()));
        }
        if g <= one || g >= p {
            return Err(Error::InvalidParameters("generator out of range".into()));
        }
        if !g.modpow(&q, &p).is_one() {
            return Err(Error::InvalidParameters("generator does not have order q".into()));
        }
        Ok(Self { p, q, g })
    }

    pub fn rfc5114() -> Self {
        let parse =
            |hex: &str| BigUint::parse_bytes(hex.as_bytes(), 16).expect("Valid hex constant");
        Self {
            p: parse(RFC5114_P),
            q: parse(RFC5114_Q),
            g: parse(RFC5114_G),
        }
    }

    /// The prime modulus.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// The prime subgroup order.
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    pub fn g(&self) -> &BigUint {
        &self.g
    }
}

impl CyclicGroup for ModpGroup {
    type Element = BigUint;

    const FIELDS: usize = 1;

    fn identity(&self) -> BigUint {
        BigUint::one()
    }

    fn generator(&self) -> &BigUint {
        &self.g
    }

    fn order(&self) -> &BigUint {
        &self.q
    }

    fn operate(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    fn invert(&self, a: &BigUint) -> Result<BigUint> {
        mod_inverse(a, &self.p)
    }

    fn power(&self, base: &BigUint, exponent: &BigUint) -> BigUint {
        base.modpow(exponent, &self.p)
    }

    fn to_fields(&self, element: &BigUint) -> Vec<BigUint> {
        vec![element.clone()]
    }

    /// Only members of the order-`q` subgroup are accepted: every honest
    /// ciphertext component is a power of `g`.
    fn from_fields(&self, fields: &[BigUint]) -> Option<BigUint> {
        match fields {
            [value]
                if !value.is_zero()
                    && value < &self.p
                    && value.modpow(&self.q, &self.p).is_one() =>
            {
                Some(value.clone())
            }
            _ => None,
        }
    }
}
