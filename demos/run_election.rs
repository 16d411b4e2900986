use clap::{ArgEnum, Parser};

use elgamal_vote::{Election, ElectionConfig, OneHotVote, SchemeKind, Voter};

/// Used when no configuration file is given.
const DEFAULT_CONFIG: &str = r#"{
    "signature": "curve",
    "encryption": "curve",
    "candidates": ["C1", "C2", "C3", "C4", "C5"]
}"#;

/// 1-indexed choice of each voter, used when none are given.
const DEFAULT_VOTES: &[usize] = &[1, 2, 1, 3, 4, 5, 1, 2, 3, 4];

/// A scheme as named on the command line.
#[derive(Debug, Clone, Copy, ArgEnum)]
enum SchemeArg {
    Modular,
    Curve,
}

impl From<SchemeArg> for SchemeKind {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Modular => SchemeKind::Modular,
            SchemeArg::Curve => SchemeKind::Curve,
        }
    }
}

/// The CLI arguments to parse.
#[derive(Debug, Parser)]
#[clap(name = "run-election", about = "Run a homomorphically tallied election.", long_about = None)]
struct Args {
    /// JSON election configuration.
    #[clap(long)]
    config: Option<String>,

    /// Override the configured signature scheme.
    #[clap(long, arg_enum)]
    signature: Option<SchemeArg>,

    /// Override the configured encryption scheme.
    #[clap(long, arg_enum)]
    encryption: Option<SchemeArg>,

    /// 1-indexed candidate choice of each voter.
    votes: Vec<usize>,
}

fn main() {
    let args = Args::parse();
    let mut rng = rand::thread_rng();

    let json = match &args.config {
        Some(path) => std::fs::read_to_string(path).unwrap(),
        None => DEFAULT_CONFIG.to_string(),
    };
    let mut config = ElectionConfig::from_json(&json).unwrap();
    if let Some(signature) = args.signature {
        config.signature = signature.into();
    }
    if let Some(encryption) = args.encryption {
        config.encryption = encryption.into();
    }
    let votes = if args.votes.is_empty() {
        DEFAULT_VOTES.to_vec()
    } else {
        args.votes
    };
    println!(
        "Running an election with {} voters, {:?} signatures and {:?} encryption",
        votes.len(),
        config.signature,
        config.encryption
    );

    // Create a new election.
    let params = config.parameters();
    let authority = params.encryption.generate_encryption_keys(&mut rng);
    let candidate_count = config.candidates.len();
    let mut election = Election::new(config, authority.public.clone()).unwrap();

    // Register voters.
    let voters = (1..=votes.len())
        .map(|i| Voter::new(&mut rng, &params, format!("V{i}")))
        .collect::<Vec<_>>();
    for voter in &voters {
        election
            .register_voter(voter.id.clone(), voter.public_key().clone())
            .unwrap();
    }

    // Cast ballots, sending each one as bytes plus a signature.
    for (voter, choice) in voters.iter().zip(&votes) {
        let vote = match choice
            .checked_sub(1)
            .map(|index| OneHotVote::for_candidate(index, candidate_count))
        {
            Some(Ok(vote)) => vote,
            _ => {
                println!("{}: no candidate {}, skipped", voter.id, choice);
                continue;
            }
        };
        let ballot = voter
            .cast(&mut rng, &params, &authority.public, &vote)
            .unwrap();
        let bytes = ballot.to_bytes();
        println!("{}: {} bytes", voter.id, bytes.len());
        election
            .accept_bytes(&voter.id, &bytes, ballot.signature)
            .unwrap();
    }

    // A second ballot from the same voter is refused.
    if let Some(first) = voters.first() {
        let vote = OneHotVote::for_candidate(0, candidate_count).unwrap();
        let again = first
            .cast(&mut rng, &params, &authority.public, &vote)
            .unwrap();
        if let Err(e) = election.accept(again) {
            println!("Refused: {e}");
        }
    }

    // Close and tally.
    election.close().unwrap();
    let results = election.tally(&authority.private).unwrap();

    // Announce the results.
    println!("Results:");
    for (candidate, count) in results.iter() {
        println!("{}: {} votes", candidate, count);
    }
    println!("{}", serde_json::to_string_pretty(&results).unwrap());
}
