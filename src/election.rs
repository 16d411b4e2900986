use indexmap::IndexMap;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::ballots::Ballot;
use crate::config::ElectionConfig;
use crate::error::{Error, Result};
use crate::group::{DomainParameters, ElectionParameters, PrivateKey, PublicKey};
use crate::signature::Signature;
use crate::tally::TallyAccumulator;

/// Phase of an election. Transitions only move forward.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum ElectionState {
    /// Accepting ballots.
    Open,
    /// No further ballots accepted; waiting for the tally.
    Closed,
    /// Results are final.
    Tallied,
}

/// Final count per candidate, in candidate order.
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ElectionResults(IndexMap<String, u64>);

impl ElectionResults {
    pub fn get(&self, candidate: &str) -> Option<u64> {
        self.0.get(candidate).copied()
    }

    /// Counts in candidate order.
    pub fn counts(&self) -> Vec<u64> {
        self.0.values().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Total number of votes counted.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }
}

/// An election run by a single authority holding the decryption key.
///
/// Ballots are checked on admission: the signer must be registered and may
/// vote once, the ballot must have one ciphertext per candidate, and the
/// signature must verify against the signer's registered key. Rejected
/// ballots never reach the tally.
#[derive(Debug)]
pub struct Election {
    params: ElectionParameters,
    config: ElectionConfig,
    /// Encryption key of the authority.
    authority_key: PublicKey,
    /// Registered signing keys by voter ID.
    voters: IndexMap<String, PublicKey>,
    /// Accepted ballots by signer ID.
    ballots: IndexMap<String, Ballot>,
    state: ElectionState,
    results: Option<ElectionResults>,
}

impl Election {
    /// Open a new election. The authority key must belong to the configured
    /// encryption scheme.
    pub fn new(config: ElectionConfig, authority_key: PublicKey) -> Result<Self> {
        config.validate()?;
        let params = config.parameters();
        if !key_matches(&params.encryption, &authority_key) {
            return Err(Error::SchemeMismatch);
        }
        info!(
            "Opened election with {} candidates, {:?} signatures and {:?} encryption",
            config.candidates.len(),
            config.signature,
            config.encryption
        );
        Ok(Self {
            params,
            config,
            authority_key,
            voters: IndexMap::new(),
            ballots: IndexMap::new(),
            state: ElectionState::Open,
            results: None,
        })
    }

    pub fn params(&self) -> &ElectionParameters {
        &self.params
    }

    pub fn candidates(&self) -> &[String] {
        &self.config.candidates
    }

    pub fn authority_key(&self) -> &PublicKey {
        &self.authority_key
    }

    pub fn state(&self) -> ElectionState {
        self.state
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    pub fn ballot_count(&self) -> usize {
        self.ballots.len()
    }

    /// Results, once tallied.
    pub fn results(&self) -> Option<&ElectionResults> {
        self.results.as_ref()
    }

    /// Add a voter to the roster. The key must belong to the signature scheme.
    pub fn register_voter(&mut self, id: impl Into<String>, signing_key: PublicKey) -> Result<()> {
        let id = id.into();
        self.expect_state(ElectionState::Open)?;
        if !key_matches(&self.params.signature, &signing_key) {
            return Err(Error::SchemeMismatch);
        }
        if self.voters.contains_key(&id) {
            return Err(Error::DuplicateVoter(id));
        }
        debug!("Registered voter `{id}`");
        self.voters.insert(id, signing_key);
        Ok(())
    }

    /// Admit a ballot. A rejected ballot leaves the election unchanged.
    pub fn accept(&mut self, ballot: Ballot) -> Result<()> {
        if let Err(e) = self.check_ballot(&ballot) {
            warn!("Rejected ballot from `{}`: {e}", ballot.signer_id);
            return Err(e);
        }
        debug!("Accepted ballot from `{}`", ballot.signer_id);
        self.ballots.insert(ballot.signer_id.clone(), ballot);
        Ok(())
    }

    /// Admit a ballot received in the canonical byte layout.
    pub fn accept_bytes(&mut self, signer_id: &str, bytes: &[u8], signature: Signature) -> Result<()> {
        let ballot = Ballot::from_bytes(
            &self.params,
            signer_id,
            bytes,
            signature,
            self.config.candidates.len(),
        )
        .map_err(|e| {
            warn!("Rejected ballot from `{signer_id}`: {e}");
            e
        })?;
        self.accept(ballot)
    }

    /// Stop accepting ballots.
    pub fn close(&mut self) -> Result<()> {
        self.expect_state(ElectionState::Open)?;
        self.state = ElectionState::Closed;
        info!(
            "Election closed with {} ballots from {} registered voters",
            self.ballots.len(),
            self.voters.len()
        );
        Ok(())
    }

    /// Homomorphically sum every accepted ballot and decrypt the totals.
    ///
    /// Each count is searched up to the configured bound, or the number of
    /// registered voters if none is set. If any count cannot be recovered the
    /// tally is aborted and the election stays closed.
    pub fn tally(&mut self, authority_private_key: &PrivateKey) -> Result<ElectionResults> {
        self.expect_state(ElectionState::Closed)?;
        let limits = self.config.search_limits(self.voters.len());

        let counts = self
            .accumulate()
            .and_then(|tally| tally.decrypt(authority_private_key, &limits))
            .map_err(|e| {
                error!("Tally aborted: {e}");
                e
            })?;

        let results = ElectionResults(
            self.config
                .candidates
                .iter()
                .cloned()
                .zip(counts)
                .collect(),
        );
        for (candidate, count) in results.iter() {
            info!("{candidate}: {count}");
        }
        self.state = ElectionState::Tallied;
        self.results = Some(results.clone());
        Ok(results)
    }

    fn accumulate(&self) -> Result<TallyAccumulator> {
        let mut tally =
            TallyAccumulator::new(&self.params.encryption, self.config.candidates.len());
        for ballot in self.ballots.values() {
            tally.fold(&ballot.ciphertexts)?;
        }
        Ok(tally)
    }

    fn check_ballot(&self, ballot: &Ballot) -> Result<()> {
        self.expect_state(ElectionState::Open)?;
        let signer_key = self
            .voters
            .get(&ballot.signer_id)
            .ok_or_else(|| Error::UnknownVoter(ballot.signer_id.clone()))?;
        if self.ballots.contains_key(&ballot.signer_id) {
            return Err(Error::DuplicateBallot(ballot.signer_id.clone()));
        }

        let expected = self.config.candidates.len();
        if ballot.ciphertexts.len() != expected {
            return Err(Error::MalformedBallot(format!(
                "expected {expected} ciphertexts, found {}",
                ballot.ciphertexts.len()
            )));
        }
        if !ballot.ciphertexts.iter().all(|ct| self.params.encryption.supports(ct)) {
            return Err(Error::MalformedBallot(
                "ciphertext from another scheme".into(),
            ));
        }

        if !ballot.signature.is_well_formed(self.params.signature.order()) {
            return Err(Error::InvalidSignatureComponent);
        }
        if !ballot.verify(&self.params, signer_key) {
            return Err(Error::SignatureRejected {
                signer_id: ballot.signer_id.clone(),
            });
        }
        Ok(())
    }

    fn expect_state(&self, expected: ElectionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::WrongPhase {
                expected,
                actual: self.state,
            })
        }
    }
}

fn key_matches(params: &DomainParameters, key: &PublicKey) -> bool {
    matches!(
        (params, key),
        (DomainParameters::Modular(_), PublicKey::Modular(_))
            | (DomainParameters::Curve(_), PublicKey::Curve(_))
    )
}
