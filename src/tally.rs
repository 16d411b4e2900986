use crate::dlog::SearchLimits;
use crate::encryption::Ciphertext;
use crate::error::{Error, Result};
use crate::group::{DomainParameters, PrivateKey};

/// Running homomorphic sum of ballots, one aggregate ciphertext per candidate.
///
/// Combination is commutative, so disjoint sets of ballots may be folded into
/// separate accumulators and merged afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TallyAccumulator {
    params: DomainParameters,
    slots: Vec<Ciphertext>,
    ballots: usize,
}

impl TallyAccumulator {
    /// An empty tally: every slot holds the encryption of zero.
    pub fn new(params: &DomainParameters, candidate_count: usize) -> Self {
        Self {
            params: params.clone(),
            slots: vec![params.identity_ciphertext(); candidate_count],
            ballots: 0,
        }
    }

    /// Add one ballot's ciphertexts, slot by slot.
    pub fn fold(&mut self, ciphertexts: &[Ciphertext]) -> Result<()> {
        self.check_shape(ciphertexts)?;
        let slots = self
            .slots
            .iter()
            .zip(ciphertexts)
            .map(|(total, ct)| self.params.combine(total, ct))
            .collect::<Result<Vec<_>>>()?;
        self.slots = slots;
        self.ballots += 1;
        Ok(())
    }

    /// Combine with an accumulator built over a disjoint set of ballots.
    pub fn merge(&mut self, other: &TallyAccumulator) -> Result<()> {
        if self.params.kind() != other.params.kind() {
            return Err(Error::SchemeMismatch);
        }
        self.check_shape(&other.slots)?;
        let slots = self
            .slots
            .iter()
            .zip(&other.slots)
            .map(|(a, b)| self.params.combine(a, b))
            .collect::<Result<Vec<_>>>()?;
        self.slots = slots;
        self.ballots += other.ballots;
        Ok(())
    }

    /// Number of ballots folded in, merges included.
    pub fn ballot_count(&self) -> usize {
        self.ballots
    }

    pub fn slots(&self) -> &[Ciphertext] {
        &self.slots
    }

    /// Decrypt every slot to its count.
    ///
    /// Fails as a whole if any slot overflows `limits`.
    pub fn decrypt(&self, key: &PrivateKey, limits: &SearchLimits) -> Result<Vec<u64>> {
        self.slots
            .iter()
            .map(|slot| self.params.decrypt_count(slot, key, limits))
            .collect()
    }

    fn check_shape(&self, ciphertexts: &[Ciphertext]) -> Result<()> {
        if ciphertexts.len() != self.slots.len() {
            return Err(Error::MalformedBallot(format!(
                "expected {} ciphertexts, found {}",
                self.slots.len(),
                ciphertexts.len()
            )));
        }
        if !ciphertexts.iter().all(|ct| self.params.supports(ct)) {
            return Err(Error::MalformedBallot(
                "ciphertext from another scheme".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ballots::OneHotVote;
    use crate::config::SchemeKind;
    use crate::group::{KeyPair, PublicKey};

    fn encrypt(params: &DomainParameters, key: &PublicKey, choice: usize, count: usize) -> Vec<Ciphertext> {
        let mut rng = rand::thread_rng();
        let vote = OneHotVote::for_candidate(choice, count).unwrap();
        vote.entries()
            .iter()
            .map(|bit| params.encrypt_vote(&mut rng, *bit, key).unwrap())
            .collect()
    }

    fn setup(kind: SchemeKind) -> (DomainParameters, KeyPair) {
        let params = DomainParameters::standard(kind);
        let keys = params.generate_encryption_keys(rand::thread_rng());
        (params, keys)
    }

    #[test]
    fn test_empty() {
        let (params, keys) = setup(SchemeKind::Modular);
        let tally = TallyAccumulator::new(&params, 3);
        assert_eq!(tally.ballot_count(), 0);
        assert_eq!(tally.decrypt(&keys.private, &SearchLimits::new(0)), Ok(vec![0, 0, 0]));
    }

    #[test]
    fn test_fold() {
        for kind in [SchemeKind::Modular, SchemeKind::Curve] {
            let (params, keys) = setup(kind);
            let mut tally = TallyAccumulator::new(&params, 3);
            for choice in [0, 2, 2, 1, 2] {
                tally.fold(&encrypt(&params, &keys.public, choice, 3)).unwrap();
            }
            assert_eq!(tally.ballot_count(), 5);
            assert_eq!(tally.decrypt(&keys.private, &SearchLimits::new(5)), Ok(vec![1, 1, 3]));
        }
    }

    #[test]
    fn test_merge_matches_sequential() {
        for kind in [SchemeKind::Modular, SchemeKind::Curve] {
            let (params, keys) = setup(kind);
            let ballots = [1, 0, 1, 1, 2, 0]
                .iter()
                .map(|choice| encrypt(&params, &keys.public, *choice, 3))
                .collect::<Vec<_>>();

            let mut sequential = TallyAccumulator::new(&params, 3);
            for ballot in &ballots {
                sequential.fold(ballot).unwrap();
            }

            let (left, right) = ballots.split_at(2);
            let mut a = TallyAccumulator::new(&params, 3);
            let mut b = TallyAccumulator::new(&params, 3);
            left.iter().for_each(|ballot| a.fold(ballot).unwrap());
            right.iter().for_each(|ballot| b.fold(ballot).unwrap());
            b.merge(&a).unwrap();

            // Same group elements, not only the same counts.
            assert_eq!(b, sequential);
            assert_eq!(b.decrypt(&keys.private, &SearchLimits::new(6)), Ok(vec![2, 3, 1]));
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let (params, keys) = setup(SchemeKind::Curve);
        let (modular, modular_keys) = setup(SchemeKind::Modular);
        let mut tally = TallyAccumulator::new(&params, 3);

        assert!(matches!(
            tally.fold(&encrypt(&params, &keys.public, 0, 2)),
            Err(Error::MalformedBallot(_))
        ));
        assert!(matches!(
            tally.fold(&encrypt(&modular, &modular_keys.public, 0, 3)),
            Err(Error::MalformedBallot(_))
        ));
        assert_eq!(
            tally.merge(&TallyAccumulator::new(&modular, 3)),
            Err(Error::SchemeMismatch)
        );
        assert!(matches!(
            tally.merge(&TallyAccumulator::new(&params, 2)),
            Err(Error::MalformedBallot(_))
        ));
        assert_eq!(tally.ballot_count(), 0);
    }

    #[test]
    fn test_bound_too_small() {
        let (params, keys) = setup(SchemeKind::Curve);
        let mut tally = TallyAccumulator::new(&params, 2);
        for _ in 0..3 {
            tally.fold(&encrypt(&params, &keys.public, 1, 2)).unwrap();
        }
        assert_eq!(
            tally.decrypt(&keys.private, &SearchLimits::new(2)),
            Err(Error::TallyOverflow { bound: 2 })
        );
        assert_eq!(tally.decrypt(&keys.private, &SearchLimits::new(3)), Ok(vec![0, 3]));
    }
}
