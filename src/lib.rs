pub mod ballots;
pub mod codec;
pub mod config;
pub mod dlog;
pub mod election;
pub mod encryption;
pub mod error;
pub mod group;
pub mod signature;
pub mod tally;

pub use crate::ballots::{Ballot, OneHotVote, Voter};
pub use crate::config::{ElectionConfig, SchemeKind};
pub use crate::dlog::SearchLimits;
pub use crate::election::{Election, ElectionResults, ElectionState};
pub use crate::encryption::Ciphertext;
pub use crate::error::{Error, Result};
pub use crate::group::{
    CurveGroup, CyclicGroup, DomainParameters, ElectionParameters, KeyPair, ModpGroup,
    PrivateKey, PublicKey,
};
pub use crate::signature::Signature;
pub use crate::tally::TallyAccumulator;

#[cfg(test)]
mod tests {
    use super::*;

    const CANDIDATES: &[&str] = &["C1", "C2", "C3", "C4", "C5"];

    /// Run a full election where ballot `i` votes for candidate `choices[i]`
    /// (1-indexed), returning the results.
    fn run_election(
        signature: SchemeKind,
        encryption: SchemeKind,
        choices: &[usize],
    ) -> ElectionResults {
        let mut rng = rand::thread_rng();
        let config = ElectionConfig::with_schemes(
            signature,
            encryption,
            CANDIDATES.iter().map(|c| c.to_string()).collect(),
        );
        let params = config.parameters();
        let authority = params.encryption.generate_encryption_keys(&mut rng);
        let mut election = Election::new(config, authority.public.clone()).unwrap();

        let voters = (0..choices.len())
            .map(|i| Voter::new(&mut rng, &params, format!("V{}", i + 1)))
            .collect::<Vec<_>>();
        for voter in &voters {
            election
                .register_voter(voter.id.clone(), voter.public_key().clone())
                .unwrap();
        }

        for (voter, choice) in voters.iter().zip(choices) {
            let vote = OneHotVote::for_candidate(choice - 1, CANDIDATES.len()).unwrap();
            let ballot = voter
                .cast(&mut rng, &params, &authority.public, &vote)
                .unwrap();
            election.accept(ballot).unwrap();
        }

        election.close().unwrap();
        election.tally(&authority.private).unwrap()
    }

    #[test]
    fn test_modular_election() {
        let results = run_election(
            SchemeKind::Modular,
            SchemeKind::Modular,
            &[1, 2, 1, 3, 4, 5, 1, 2, 3, 4],
        );
        assert_eq!(results.counts(), [3, 2, 2, 2, 1]);
        assert_eq!(results.get("C1"), Some(3));
        assert_eq!(results.get("C5"), Some(1));
    }

    #[test]
    fn test_curve_election() {
        let results = run_election(
            SchemeKind::Curve,
            SchemeKind::Curve,
            &[1, 2, 1, 3, 4, 5, 1, 2, 3, 4],
        );
        assert_eq!(results.counts(), [3, 2, 2, 2, 1]);
    }

    #[test]
    fn test_mixed_schemes() {
        // DSA-signed EC ElGamal ballots, and ECDSA-signed modular ones.
        for (signature, encryption) in [
            (SchemeKind::Modular, SchemeKind::Curve),
            (SchemeKind::Curve, SchemeKind::Modular),
        ] {
            let results = run_election(signature, encryption, &[1, 2, 1, 3, 4, 5, 1, 2, 3, 4]);
            assert_eq!(results.counts(), [3, 2, 2, 2, 1]);
        }
    }

    #[test]
    fn test_even_split() {
        for kind in [SchemeKind::Modular, SchemeKind::Curve] {
            let results = run_election(kind, kind, &[5, 1, 2, 3, 4, 1, 2, 3, 4, 5]);
            assert_eq!(results.counts(), [2, 2, 2, 2, 2]);
            assert_eq!(results.total(), 10);
        }
    }

    #[test]
    fn test_no_ballots() {
        let results = run_election(SchemeKind::Curve, SchemeKind::Curve, &[]);
        assert_eq!(results.counts(), [0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_signed_bytes() {
        // The ballot travels as canonical bytes plus a signature, and the
        // receiver verifies exactly those bytes.
        let mut rng = rand::thread_rng();
        for kind in [SchemeKind::Modular, SchemeKind::Curve] {
            let params = ElectionParameters::standard(kind, kind);
            let authority = params.encryption.generate_encryption_keys(&mut rng);
            let voter = Voter::new(&mut rng, &params, "V1");
            let vote = OneHotVote::new(vec![0, 0, 1], 3).unwrap();
            let ballot = voter
                .cast(&mut rng, &params, &authority.public, &vote)
                .unwrap();

            let bytes = ballot.to_bytes();
            assert_eq!(bytes.iter().filter(|b| **b == b'\n').count(), 3);
            assert!(params
                .signature
                .verify(&bytes, &ballot.signature, voter.public_key()));

            let mut flipped = bytes.clone();
            flipped[0] ^= 0x01;
            assert!(!params
                .signature
                .verify(&flipped, &ballot.signature, voter.public_key()));
        }
    }
}
