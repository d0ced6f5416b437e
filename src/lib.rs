//! # propstep
//! propstep searches for line-numbered proofs in propositional logic.
//!
//! Given a list of hypotheses and a conclusion, it saturates the hypotheses
//! under a fixed catalog of inference rules ([`RULES`]), reduces implication
//! goals with the deduction method, and reconstructs the derivation as
//! numbered lines citing the rule and the earlier lines each step used.
//!
//! ```
//! use propstep::Prover;
//!
//! let outcome = Prover::default().parse_and_prove("A ^ A>B", "B").unwrap();
//! assert!(outcome.is_proved());
//! println!("{}", outcome.report().english);
//! ```
//!
//! The proof is rendered twice, once in words and once with `¬ ∧ ∨ → ↔`.
//! Failing to find a proof is an ordinary [`SearchOutcome`], not an [`Error`].
pub mod ast;
mod cli;
pub mod knowledge;
mod logic;
pub mod proofs;
mod repl;
pub mod rules;
pub mod scheduler;
pub mod util;

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub use ast::{parse_formula, parse_hypotheses, Formula, ParseError, Span, Symbol, Truth};
pub use cli::*;
pub use knowledge::{Fact, FactId, KnowledgeBase, Provenance};
pub use logic::Assumption;
pub use proofs::{Citation, ProofLine, ProofTrace};
pub use rules::{Rule, RuleName, RULES};
pub use scheduler::{RunReport, Saturation, SearchConfig, SearchLimit};
use util::{HashMap, ListDisplay};

/// Reported in both renderings when the conclusion is not derivable.
pub const NOT_DERIVABLE: &str =
    "Unfortunately, your inputted hypothesis does not derive this conclusion";

/// Everything one proof search owns: the knowledge base, the deduction-method
/// assumptions made so far and the lines already emitted for the proof.
///
/// A context serves a single hypotheses/conclusion pair; nothing is shared
/// between contexts except the read-only rule catalog.
#[derive(Clone, Debug, Default)]
pub struct ProofContext {
    pub(crate) config: SearchConfig,
    pub(crate) kb: KnowledgeBase,
    /// Facts at or past this index arrived after the last pass started.
    pub(crate) frontier: usize,
    pub(crate) assumptions: Vec<Assumption>,
    /// Fact to proof line number.
    pub(crate) emitted: HashMap<FactId, usize>,
    pub(crate) report: RunReport,
}

impl ProofContext {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Adds a hypothesis. Returns `None` if an equal fact is already known.
    pub fn add_hypothesis(&mut self, formula: Formula) -> Option<FactId> {
        self.kb.push(Fact::hypothesis(formula))
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn assumptions(&self) -> &[Assumption] {
        &self.assumptions
    }

    /// Counts and timings accumulated over every pass so far.
    pub fn report(&self) -> &RunReport {
        &self.report
    }
}

/// How a proof search ended.
#[derive(Clone, Debug)]
pub enum SearchOutcome {
    Proved(ProofTrace),
    /// The closure was reached without the conclusion.
    NotDerivable,
    LimitExceeded(SearchLimit),
}

impl SearchOutcome {
    pub fn is_proved(&self) -> bool {
        matches!(self, SearchOutcome::Proved(_))
    }

    pub fn trace(&self) -> Option<&ProofTrace> {
        match self {
            SearchOutcome::Proved(trace) => Some(trace),
            _ => None,
        }
    }

    /// Renders the outcome. Failures put the same message in both fields.
    pub fn report(&self) -> ProofReport {
        match self {
            SearchOutcome::Proved(trace) => ProofReport {
                english: trace.to_english(),
                symbolic: trace.to_symbolic(),
            },
            SearchOutcome::NotDerivable => ProofReport::uniform(NOT_DERIVABLE.to_string()),
            SearchOutcome::LimitExceeded(limit) => ProofReport::uniform(format!(
                "The search limit was exceeded ({limit}) before this conclusion could be derived"
            )),
        }
    }
}

/// The rendered result of a search, one field per notation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProofReport {
    #[cfg_attr(feature = "serde", serde(rename = "String"))]
    pub english: String,
    #[cfg_attr(feature = "serde", serde(rename = "Symbol"))]
    pub symbolic: String,
}

impl ProofReport {
    fn uniform(message: String) -> Self {
        Self {
            english: message.clone(),
            symbolic: message,
        }
    }

    /// `{"String": ..., "Symbol": ...}`
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A hypotheses/conclusion pair, written `hypotheses |- conclusion`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    pub hypotheses: Vec<Formula>,
    pub conclusion: Formula,
}

impl Problem {
    /// Parses one problem per line, skipping blank lines and `#` comments.
    pub fn parse_many(input: &str) -> Result<Vec<Problem>, Error> {
        input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::parse)
            .collect()
    }
}

impl FromStr for Problem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hypotheses, conclusion) = s
            .split_once("|-")
            .or_else(|| s.split_once('⊢'))
            .ok_or_else(|| Error::MalformedProblem(s.to_string()))?;
        Ok(Problem {
            hypotheses: parse_hypotheses(hypotheses)?,
            conclusion: parse_formula(conclusion)?,
        })
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ⊢ {}", ListDisplay(&self.hypotheses, ", "), self.conclusion)
    }
}

/// The configured entry point: builds a fresh [`ProofContext`] per problem.
#[derive(Clone, Debug, Default)]
pub struct Prover {
    pub config: SearchConfig,
}

impl Prover {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn context(&self, hypotheses: &[Formula]) -> ProofContext {
        let mut ctx = ProofContext::new(self.config.clone());
        for hypothesis in hypotheses {
            if ctx.add_hypothesis(hypothesis.clone()).is_none() {
                log::debug!("Skipping repeated hypothesis {hypothesis}");
            }
        }
        ctx
    }

    pub fn prove(&self, hypotheses: &[Formula], conclusion: &Formula) -> SearchOutcome {
        let mut ctx = self.context(hypotheses);
        let outcome = ctx.prove_goal(conclusion);
        log::debug!("Search finished:\n{}", ctx.report());
        outcome
    }

    pub fn prove_problem(&self, problem: &Problem) -> SearchOutcome {
        self.prove(&problem.hypotheses, &problem.conclusion)
    }

    /// Parses a hypothesis list (separated by top-level `^` or `,`) and a
    /// conclusion, then proves.
    pub fn parse_and_prove(
        &self,
        hypotheses: &str,
        conclusion: &str,
    ) -> Result<SearchOutcome, Error> {
        let hypotheses = parse_hypotheses(hypotheses)?;
        let conclusion = parse_formula(conclusion)?;
        Ok(self.prove(&hypotheses, &conclusion))
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ParseError(#[from] ParseError),
    #[error("IO error: {}: {1}", .0.display())]
    IoError(PathBuf, std::io::Error),
    #[error("Expected `hypotheses |- conclusion`, found {0:?}")]
    MalformedProblem(String),
}
