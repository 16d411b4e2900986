use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::dlog::{SearchLimits, DEFAULT_MAX_ITERATIONS};
use crate::error::{Error, Result};
use crate::group::ElectionParameters;

/// Which group a scheme runs over: DSA and ElGamal modulo a prime, or ECDSA
/// and EC ElGamal on the curve.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeKind {
    Modular,
    Curve,
}

/// Static settings of one election.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct ElectionConfig {
    /// Scheme voters sign their ballots with.
    pub signature: SchemeKind,

    /// Scheme votes are encrypted under.
    pub encryption: SchemeKind,

    /// Candidate names, in ballot slot order.
    pub candidates: Vec<String>,

    /// Largest count the tally may report for a single candidate.
    /// Defaults to the number of registered voters.
    #[serde(default)]
    pub tally_bound: Option<u64>,

    #[serde(default = "default_max_search_iterations")]
    pub max_search_iterations: u64,
}

fn default_max_search_iterations() -> u64 {
    DEFAULT_MAX_ITERATIONS
}

impl ElectionConfig {
    /// Both schemes over the same group.
    pub fn new(scheme: SchemeKind, candidates: Vec<String>) -> Self {
        Self::with_schemes(scheme, scheme, candidates)
    }

    pub fn with_schemes(
        signature: SchemeKind,
        encryption: SchemeKind,
        candidates: Vec<String>,
    ) -> Self {
        Self {
            signature,
            encryption,
            candidates,
            tally_bound: None,
            max_search_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.candidates.is_empty() {
            return Err(Error::Config("no candidates".into()));
        }
        let mut seen = HashSet::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            if candidate.is_empty() {
                return Err(Error::Config("empty candidate name".into()));
            }
            if !seen.insert(candidate.as_str()) {
                return Err(Error::Config(format!("duplicate candidate `{candidate}`")));
            }
        }
        if self.max_search_iterations == 0 {
            return Err(Error::Config("max_search_iterations must be positive".into()));
        }
        if let Some(bound) = self.tally_bound {
            if bound >= self.max_search_iterations {
                return Err(Error::Config(format!(
                    "tally_bound {bound} is not below max_search_iterations {}",
                    self.max_search_iterations
                )));
            }
        }
        Ok(())
    }

    pub fn parameters(&self) -> ElectionParameters {
        ElectionParameters::standard(self.signature, self.encryption)
    }

    /// Search limits for a tally over `voter_count` registered voters.
    pub fn search_limits(&self, voter_count: usize) -> SearchLimits {
        let bound = self.tally_bound.unwrap_or(voter_count as u64);
        SearchLimits::new(bound).with_max_iterations(self.max_search_iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let config = ElectionConfig::from_json(
            r#"{"signature": "curve", "encryption": "curve", "candidates": ["C1", "C2", "C3"]}"#,
        )
        .unwrap();
        assert_eq!(config.signature, SchemeKind::Curve);
        assert_eq!(config.encryption, SchemeKind::Curve);
        assert_eq!(config.candidates, ["C1", "C2", "C3"]);
        assert_eq!(config.tally_bound, None);
        assert_eq!(config.max_search_iterations, DEFAULT_MAX_ITERATIONS);
        assert_eq!(config.parameters().encryption.kind(), SchemeKind::Curve);

        let config = ElectionConfig::from_json(
            r#"{
                "signature": "modular",
                "encryption": "modular",
                "candidates": ["Alice", "Bob"],
                "tally_bound": 100,
                "max_search_iterations": 1000
            }"#,
        )
        .unwrap();
        assert_eq!(config, {
            let mut expected = ElectionConfig::new(
                SchemeKind::Modular,
                vec!["Alice".into(), "Bob".into()],
            );
            expected.tally_bound = Some(100);
            expected.max_search_iterations = 1000;
            expected
        });
        assert_eq!(config.search_limits(3), SearchLimits::new(100).with_max_iterations(1000));
    }

    #[test]
    fn test_mixed_schemes() {
        let config = ElectionConfig::from_json(
            r#"{"signature": "modular", "encryption": "curve", "candidates": ["A", "B"]}"#,
        )
        .unwrap();
        assert_eq!(
            config,
            ElectionConfig::with_schemes(
                SchemeKind::Modular,
                SchemeKind::Curve,
                vec!["A".into(), "B".into()]
            )
        );
        let params = config.parameters();
        assert_eq!(params.signature.kind(), SchemeKind::Modular);
        assert_eq!(params.encryption.kind(), SchemeKind::Curve);
    }

    #[test]
    fn test_bound_defaults_to_voters() {
        let config = ElectionConfig::new(SchemeKind::Modular, vec!["A".into()]);
        assert_eq!(config.search_limits(10), SearchLimits::new(10));
    }

    #[test]
    fn test_invalid() {
        let invalid = [
            r#"{"signature": "curve", "encryption": "curve"}"#,
            r#"{"signature": "curve", "candidates": ["A"]}"#,
            r#"{"signature": "edwards", "encryption": "curve", "candidates": ["A"]}"#,
            r#"{"signature": "curve", "encryption": "curve", "candidates": []}"#,
            r#"{"signature": "curve", "encryption": "curve", "candidates": ["A", "A"]}"#,
            r#"{"signature": "curve", "encryption": "curve", "candidates": [""]}"#,
            r#"{"signature": "curve", "encryption": "curve", "candidates": ["A"], "max_search_iterations": 0}"#,
            r#"{"signature": "curve", "encryption": "curve", "candidates": ["A"], "tally_bound": 10, "max_search_iterations": 10}"#,
            "not json",
        ];
        for json in invalid {
            assert!(
                matches!(ElectionConfig::from_json(json), Err(Error::Config(_))),
                "accepted {json}"
            );
        }
    }
}
