//! Outcome vocabulary, tier expressions and presets.

use std::fmt;
use std::str::FromStr;

use crate::constants::{
    GROUND_TRUTH_FEED, REGRESSION_FEED, REGRESSION_SENTINEL_COUNT, REPRODUCTION_FEED,
};
use crate::store::{OutcomeKind, OutcomeValue};

/// Where one named outcome comes from and how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeSpec {
    /// Name used in tiers and in output records.
    pub name: String,
    /// Feed stem: values are read from `output_{i}_{feed}.jsonl`.
    pub feed: String,
    /// JSON field inside each feed record.
    pub field: String,
    /// Value shape.
    pub kind: OutcomeKind,
    /// Value assumed when the record or field is missing.
    pub default: OutcomeValue,
}

impl OutcomeSpec {
    /// Boolean outcome defaulting to `false`.
    pub fn boolean(
        name: impl Into<String>,
        feed: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            feed: feed.into(),
            field: field.into(),
            kind: OutcomeKind::Bool,
            default: OutcomeValue::Bool(false),
        }
    }

    /// Count outcome with an explicit worst-case default.
    pub fn count(
        name: impl Into<String>,
        feed: impl Into<String>,
        field: impl Into<String>,
        default: u64,
    ) -> Self {
        Self {
            name: name.into(),
            feed: feed.into(),
            field: field.into(),
            kind: OutcomeKind::Count,
            default: OutcomeValue::Count(default),
        }
    }

    /// Failing regression tests, from `regression_test_results`.
    pub fn regression() -> Self {
        Self::count(
            "regression",
            REGRESSION_FEED,
            "regression",
            REGRESSION_SENTINEL_COUNT,
        )
    }

    /// Whether the reproduction test passed, from `reproduction_test_results`.
    pub fn reproduction() -> Self {
        Self::boolean("reproduction", REPRODUCTION_FEED, "reproduction")
    }

    /// FAIL_TO_PASS, PASS_TO_PASS and combined ground-truth results.
    pub fn ground_truth() -> Vec<Self> {
        ["f2p_result", "p2p_result", "overall_result"]
            .into_iter()
            .map(|name| Self::boolean(name, GROUND_TRUTH_FEED, name))
            .collect()
    }
}

/// One priority level: a conjunction of outcome predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSpec {
    outcomes: Vec<String>,
}

impl TierSpec {
    /// Builds a tier requiring every named outcome to pass.
    pub fn new<I, S>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outcomes: outcomes.into_iter().map(Into::into).collect(),
        }
    }

    /// Outcome names in this conjunction.
    pub fn outcomes(&self) -> &[String] {
        &self.outcomes
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl fmt::Display for TierSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.outcomes.join("+"))
    }
}

impl FromStr for TierSpec {
    type Err = String;

    /// Parses `a+b+c`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let outcomes: Vec<String> = s.split('+').map(|p| p.trim().to_string()).collect();
        if outcomes.iter().any(|p| p.is_empty()) {
            return Err(format!("empty predicate in tier '{s}'"));
        }
        Ok(Self { outcomes })
    }
}

/// Named outcome vocabularies with their tier lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Vote over every valid patch.
    #[default]
    Plain,
    /// Prefer the fewest failing regression tests.
    Regression,
    /// Prefer regression-best samples whose reproduction test passes, then regression-best.
    Reproduction,
    /// Prefer samples passing all ground-truth tests, then FAIL_TO_PASS.
    GroundTruthOverall,
    /// Prefer samples passing FAIL_TO_PASS.
    GroundTruthF2p,
    /// Prefer samples passing PASS_TO_PASS.
    GroundTruthP2p,
}

impl Preset {
    /// Outcome vocabulary loaded for this preset.
    pub fn outcomes(&self) -> Vec<OutcomeSpec> {
        match self {
            Preset::Plain => Vec::new(),
            Preset::Regression => vec![OutcomeSpec::regression()],
            Preset::Reproduction => vec![OutcomeSpec::regression(), OutcomeSpec::reproduction()],
            Preset::GroundTruthOverall | Preset::GroundTruthF2p | Preset::GroundTruthP2p => {
                OutcomeSpec::ground_truth()
            }
        }
    }

    /// Tiers, most restrictive first.
    pub fn tiers(&self) -> Vec<TierSpec> {
        match self {
            Preset::Plain => Vec::new(),
            Preset::Regression => vec![TierSpec::new(["regression"])],
            Preset::Reproduction => vec![
                TierSpec::new(["regression", "reproduction"]),
                TierSpec::new(["regression"]),
            ],
            Preset::GroundTruthOverall => vec![
                TierSpec::new(["overall_result"]),
                TierSpec::new(["f2p_result"]),
            ],
            Preset::GroundTruthF2p => vec![TierSpec::new(["f2p_result"])],
            Preset::GroundTruthP2p => vec![TierSpec::new(["p2p_result"])],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Plain => "plain",
            Preset::Regression => "regression",
            Preset::Reproduction => "reproduction",
            Preset::GroundTruthOverall => "ground-truth-overall",
            Preset::GroundTruthF2p => "ground-truth-f2p",
            Preset::GroundTruthP2p => "ground-truth-p2p",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "plain" | "none" => Ok(Self::Plain),
            "regression" => Ok(Self::Regression),
            "reproduction" => Ok(Self::Reproduction),
            "ground-truth-overall" | "overall" => Ok(Self::GroundTruthOverall),
            "ground-truth-f2p" | "f2p" => Ok(Self::GroundTruthF2p),
            "ground-truth-p2p" | "p2p" => Ok(Self::GroundTruthP2p),
            _ => Err(format!("Unknown preset: {}", s)),
        }
    }
}
