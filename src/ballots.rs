use rand::{CryptoRng, RngCore};

use crate::codec;
use crate::encryption::Ciphertext;
use crate::error::{Error, Result};
use crate::group::{ElectionParameters, KeyPair, PrivateKey, PublicKey};
use crate::signature::Signature;

/// A vote for exactly one candidate: one entry per candidate, a single 1.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OneHotVote(Vec<u8>);

impl OneHotVote {
    pub fn new(entries: Vec<u8>, candidate_count: usize) -> Result<Self> {
        if entries.len() != candidate_count {
            return Err(Error::InvalidVoteEncoding(format!(
                "expected {candidate_count} entries, found {}",
                entries.len()
            )));
        }
        if let Some(bad) = entries.iter().find(|v| **v > 1) {
            return Err(Error::InvalidVoteEncoding(format!(
                "entries must be 0 or 1, found {bad}"
            )));
        }
        let ones = entries.iter().filter(|v| **v == 1).count();
        if ones != 1 {
            return Err(Error::InvalidVoteEncoding(format!(
                "expected exactly one 1, found {ones}"
            )));
        }
        Ok(Self(entries))
    }

    /// A vote for the candidate at `index` (zero-based).
    pub fn for_candidate(index: usize, candidate_count: usize) -> Result<Self> {
        if index >= candidate_count {
            return Err(Error::InvalidVoteEncoding(format!(
                "candidate {index} out of range for {candidate_count} candidates"
            )));
        }
        let mut entries = vec![0; candidate_count];
        entries[index] = 1;
        Ok(Self(entries))
    }

    pub fn entries(&self) -> &[u8] {
        &self.0
    }

    /// Index of the chosen candidate.
    pub fn choice(&self) -> usize {
        self.0.iter().position(|v| *v == 1).unwrap_or_default()
    }
}

/// An encrypted, signed one-hot vote.
///
/// The signature covers the canonical serialization of `ciphertexts`. Once
/// encrypted, one-hotness can no longer be checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Ballot {
    /// One ciphertext per candidate, in candidate order.
    pub ciphertexts: Vec<Ciphertext>,
    pub signature: Signature,
    pub signer_id: String,
}

impl Ballot {
    /// Encrypt `vote` slot by slot under `election_key` and sign the result.
    pub fn new(
        mut rng: impl RngCore + CryptoRng,
        params: &ElectionParameters,
        election_key: &PublicKey,
        vote: &OneHotVote,
        signer_id: impl Into<String>,
        signing_key: &PrivateKey,
    ) -> Result<Self> {
        let ciphertexts = vote
            .entries()
            .iter()
            .map(|bit| params.encryption.encrypt_vote(&mut rng, *bit, election_key))
            .collect::<Result<Vec<_>>>()?;
        let signature =
            params
                .signature
                .sign(&mut rng, &codec::serialize(&ciphertexts), signing_key)?;

        Ok(Self {
            ciphertexts,
            signature,
            signer_id: signer_id.into(),
        })
    }

    /// Rebuild a ballot received in the canonical layout.
    pub fn from_bytes(
        params: &ElectionParameters,
        signer_id: impl Into<String>,
        bytes: &[u8],
        signature: Signature,
        candidate_count: usize,
    ) -> Result<Self> {
        Ok(Self {
            ciphertexts: codec::deserialize(&params.encryption, bytes, candidate_count)?,
            signature,
            signer_id: signer_id.into(),
        })
    }

    /// The signed bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        codec::serialize(&self.ciphertexts)
    }

    /// Check the signature against the signer's public key.
    pub fn verify(&self, params: &ElectionParameters, signer_key: &PublicKey) -> bool {
        params
            .signature
            .verify(&self.to_bytes(), &self.signature, signer_key)
    }
}

/// A registered voter and their signing keys.
#[derive(Debug, Clone)]
pub struct Voter {
    pub id: String,
    pub keys: KeyPair,
}

impl Voter {
    /// A voter with fresh signing keys for the election's signature scheme.
    pub fn new(
        rng: impl RngCore + CryptoRng,
        params: &ElectionParameters,
        id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            keys: params.signature.generate_signing_keys(rng),
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keys.public
    }

    /// Encrypt and sign a ballot for `vote`.
    pub fn cast(
        &self,
        rng: impl RngCore + CryptoRng,
        params: &ElectionParameters,
        election_key: &PublicKey,
        vote: &OneHotVote,
    ) -> Result<Ballot> {
        Ballot::new(rng, params, election_key, vote, &self.id, &self.keys.private)
    }
}
