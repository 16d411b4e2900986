use std::io::Write;
use std::time::{Duration, Instant};

use rand::Rng;

use elgamal_vote::codec;
use elgamal_vote::{Ballot, Election, ElectionConfig, OneHotVote, SchemeKind, Voter};

#[rustfmt::skip]
const CANDIDATES: [&str; 8] = [
    "Alice",
    "Bob",
    "Carol",
    "Dave",
    "Eve",
    "Fred",
    "Grace",
    "Harry",
];

const NUM_VOTES: usize = 500;

fn main() {
    for signature in [SchemeKind::Modular, SchemeKind::Curve] {
        for encryption in [SchemeKind::Modular, SchemeKind::Curve] {
            benchmark(signature, encryption);
        }
    }
}

fn benchmark(signature_kind: SchemeKind, encryption_kind: SchemeKind) {
    let mut rng = rand::thread_rng();
    let config = ElectionConfig::with_schemes(
        signature_kind,
        encryption_kind,
        CANDIDATES.iter().map(|c| c.to_string()).collect(),
    );
    let params = config.parameters();
    let authority = params.encryption.generate_encryption_keys(&mut rng);
    let mut election = Election::new(config, authority.public.clone()).unwrap();

    let mut encrypt_dur = Duration::ZERO;
    let mut sign_dur = Duration::ZERO;
    let mut accept_dur = Duration::ZERO;
    let mut expected = [0_u64; CANDIDATES.len()];

    for i in 0..NUM_VOTES {
        let voter = Voter::new(&mut rng, &params, i.to_string());
        election
            .register_voter(voter.id.clone(), voter.public_key().clone())
            .unwrap();

        // Pick a random candidate to vote for.
        let candidate_index = rng.gen_range(0..CANDIDATES.len());
        expected[candidate_index] += 1;
        let vote = OneHotVote::for_candidate(candidate_index, CANDIDATES.len()).unwrap();

        // Encrypt and sign separately, to time the two.
        let start = Instant::now();
        let ciphertexts = vote
            .entries()
            .iter()
            .map(|bit| {
                params
                    .encryption
                    .encrypt_vote(&mut rng, *bit, &authority.public)
                    .unwrap()
            })
            .collect::<Vec<_>>();
        encrypt_dur += start.elapsed();

        let start = Instant::now();
        let signature = params
            .signature
            .sign(&mut rng, &codec::serialize(&ciphertexts), &voter.keys.private)
            .unwrap();
        sign_dur += start.elapsed();

        let ballot = Ballot {
            ciphertexts,
            signature,
            signer_id: voter.id,
        };
        let start = Instant::now();
        election.accept(ballot).unwrap();
        accept_dur += start.elapsed();

        let num_done = i + 1;
        if num_done % (NUM_VOTES / 100) == 0 {
            let done = num_done as f32 / NUM_VOTES as f32 * 100.0;
            print!("\r{:.0}% cast", done);
            std::io::stdout().flush().unwrap();
        }
    }

    election.close().unwrap();
    let start = Instant::now();
    let results = election.tally(&authority.private).unwrap();
    let tally_dur = start.elapsed();
    assert_eq!(results.counts(), expected);

    println!(
        "\n\n== {:?} signatures, {:?} encryption: {} ballots ==",
        signature_kind, encryption_kind, NUM_VOTES
    );
    println!(
        "Encryption time:    {:12.8}s (AVG {:6.0}µs)",
        encrypt_dur.as_secs_f64(),
        encrypt_dur.as_secs_f64() * 1000000.0 / NUM_VOTES as f64,
    );
    println!(
        "Signature time:     {:12.8}s (AVG {:6.0}µs)",
        sign_dur.as_secs_f64(),
        sign_dur.as_secs_f64() * 1000000.0 / NUM_VOTES as f64,
    );
    println!(
        "Acceptance time:    {:12.8}s (AVG {:6.0}µs)",
        accept_dur.as_secs_f64(),
        accept_dur.as_secs_f64() * 1000000.0 / NUM_VOTES as f64,
    );
    println!(
        "Tally time:         {:12.8}s (AVG {:6.0}µs)",
        tally_dur.as_secs_f64(),
        tally_dur.as_secs_f64() * 1000000.0 / NUM_VOTES as f64,
    );
}
