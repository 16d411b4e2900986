use thiserror::Error;

use crate::election::ElectionState;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while running an election.
///
/// Per-ballot problems (`MalformedBallot`, `SignatureRejected`, ...) reject
/// only the offending ballot. `TallyOverflow` and `NotInvertible` abort the
/// whole tally.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Error {
    /// A signature's `r` or `s` lies outside `(0, order)`.
    #[error("signature component out of range")]
    InvalidSignatureComponent,

    /// A well-formed signature that does not verify against the signer's key.
    #[error("signature from `{signer_id}` failed to verify")]
    SignatureRejected { signer_id: String },

    /// A modular inverse was requested for a value sharing a factor with the modulus.
    #[error("value has no inverse modulo the group modulus")]
    NotInvertible,

    /// The canonical ballot layout could not be parsed.
    #[error("malformed ballot: {0}")]
    MalformedBallot(String),

    /// The discrete-log search ran out of candidates.
    #[error("tally exceeds the search bound of {bound}")]
    TallyOverflow { bound: u64 },

    /// A vote vector or plaintext that cannot be encrypted or decoded.
    #[error("invalid vote encoding: {0}")]
    InvalidVoteEncoding(String),

    /// ECDSA kept drawing degenerate nonces.
    #[error("no usable signing nonce after {0} attempts")]
    NonceRetriesExhausted(usize),

    /// Values from the modular and curve schemes were mixed.
    #[error("modular and curve values cannot be mixed")]
    SchemeMismatch,

    /// Domain parameters that do not describe a prime-order subgroup.
    #[error("invalid domain parameters: {0}")]
    InvalidParameters(String),

    #[error("voter `{0}` is not registered")]
    UnknownVoter(String),

    #[error("voter `{0}` is already registered")]
    DuplicateVoter(String),

    #[error("voter `{0}` has already cast a ballot")]
    DuplicateBallot(String),

    /// An operation was attempted in the wrong phase of the election.
    #[error("election is {actual:?}, expected {expected:?}")]
    WrongPhase {
        expected: ElectionState,
        actual: ElectionState,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}
