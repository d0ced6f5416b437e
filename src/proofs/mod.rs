//! Proof reconstruction: walk provenance back from the goal and number every
//! fact the derivation uses exactly once, parents first.

mod proof_format;

use std::fmt::{self, Display, Formatter};

use smallvec::SmallVec;

pub use proof_format::{English, Notation, Symbolic, Written};

use crate::ast::Formula;
use crate::knowledge::{FactId, Provenance};
use crate::logic::Assumption;
use crate::rules::RuleName;
use crate::ProofContext;

/// Why a proof line holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Citation {
    Hypothesis,
    Deduction,
    /// A rule applied to earlier lines, cited by their numbers.
    Rule {
        name: RuleName,
        lines: SmallVec<[usize; 2]>,
    },
}

impl Display for Citation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Citation::Hypothesis => write!(f, "Hypothesis"),
            Citation::Deduction => write!(f, "Hypothesis (by Deduction Method)"),
            Citation::Rule { name, lines } => {
                write!(f, "{name}")?;
                for line in lines {
                    write!(f, ", {line}")?;
                }
                Ok(())
            }
        }
    }
}

/// One numbered step of a proof. Numbers start at 1.
#[derive(Clone, Debug)]
pub struct ProofLine {
    pub index: usize,
    pub formula: Formula,
    pub citation: Citation,
}

/// A finished proof: the deduction-method steps taken, then the numbered lines.
#[derive(Clone, Debug)]
pub struct ProofTrace {
    pub assumptions: Vec<Assumption>,
    pub lines: Vec<ProofLine>,
    /// Line number of the final goal.
    pub goal: usize,
}

impl ProofTrace {
    pub fn to_english(&self) -> String {
        proof_format::render(self, &English)
    }

    pub fn to_symbolic(&self) -> String {
        proof_format::render(self, &Symbolic)
    }

    /// The line proving the final goal. With the deduction method this can
    /// be a hypothesis listed before the assumptions.
    pub fn conclusion(&self) -> &ProofLine {
        &self.lines[self.goal - 1]
    }
}

impl ProofContext {
    /// Numbers the hypotheses, then the deduction-method assumptions, then
    /// everything `goal` was derived from.
    pub(crate) fn reconstruct(&mut self, goal: FactId) -> ProofTrace {
        self.emitted.clear();
        let hypotheses: Vec<FactId> = self
            .kb
            .all()
            .filter(|(_, fact)| fact.is_hypothesis())
            .map(|(id, _)| id)
            .collect();
        let assumed: Vec<FactId> = self.assumptions.iter().filter_map(|a| a.fact).collect();

        let mut lines = vec![];
        for id in hypotheses.into_iter().chain(assumed) {
            self.emit(id, &mut lines);
        }
        let goal = self.emit(goal, &mut lines);
        ProofTrace {
            assumptions: self.assumptions.clone(),
            lines,
            goal,
        }
    }

    /// Emits `id` after its parents unless it already has a line; returns its line number.
    fn emit(&mut self, id: FactId, lines: &mut Vec<ProofLine>) -> usize {
        if let Some(&line) = self.emitted.get(&id) {
            return line;
        }
        let fact = self.kb.get(id).clone();
        let parent_lines: SmallVec<[usize; 2]> = fact
            .parents()
            .iter()
            .map(|parent| self.emit(*parent, lines))
            .collect();
        let citation = match fact.provenance {
            Provenance::Hypothesis => Citation::Hypothesis,
            Provenance::Deduction => Citation::Deduction,
            Provenance::Rule { name, .. } => Citation::Rule {
                name,
                lines: parent_lines,
            },
        };
        let index = lines.len() + 1;
        lines.push(ProofLine {
            index,
            formula: fact.formula,
            citation,
        });
        self.emitted.insert(id, index);
        index
    }
}
