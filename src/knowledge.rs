//! The deduplicated fact store and the atom truth table.

use std::fmt::{self, Display, Formatter};

use smallvec::SmallVec;

use crate::ast::{Formula, Symbol, Truth};
use crate::rules::RuleName;
use crate::util::{HashMap, HashSet, IndexMap};

/// An index into a [`KnowledgeBase`]. Facts are never removed, so ids stay valid
/// for the whole proof session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactId(usize);

impl FactId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for FactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a fact came to be known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provenance {
    Hypothesis,
    /// The antecedent of an implication goal, assumed by the deduction method.
    Deduction,
    Rule {
        name: RuleName,
        parents: SmallVec<[FactId; 2]>,
    },
}

/// A formula known to hold, together with its provenance.
#[derive(Clone, Debug)]
pub struct Fact {
    pub formula: Formula,
    pub provenance: Provenance,
}

impl Fact {
    pub fn hypothesis(formula: Formula) -> Self {
        Fact {
            formula: formula.holding(),
            provenance: Provenance::Hypothesis,
        }
    }

    pub fn deduction(formula: Formula) -> Self {
        Fact {
            formula: formula.holding(),
            provenance: Provenance::Deduction,
        }
    }

    pub fn derived(formula: Formula, name: RuleName, parents: &[FactId]) -> Self {
        Fact {
            formula,
            provenance: Provenance::Rule {
                name,
                parents: parents.iter().copied().collect(),
            },
        }
    }

    pub fn parents(&self) -> &[FactId] {
        match &self.provenance {
            Provenance::Rule { parents, .. } => parents,
            Provenance::Hypothesis | Provenance::Deduction => &[],
        }
    }

    pub fn is_hypothesis(&self) -> bool {
        self.provenance == Provenance::Hypothesis
    }
}

/// An append-only set of facts, unique up to [`Formula::equals`].
///
/// Facts are bucketed by [`Formula::dedup_key`] so an insert only compares
/// against candidates that can be equal. The atom table tracks the truth of
/// every atom the stored facts mention.
#[derive(Clone, Debug, Default)]
pub struct KnowledgeBase {
    facts: Vec<Fact>,
    buckets: HashMap<u64, SmallVec<[FactId; 4]>>,
    /// Facts dropped by the trivial-implication filter. They still block
    /// re-insertion but no longer match rules or goals.
    pruned: HashSet<FactId>,
    atoms: IndexMap<Symbol, Truth>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `fact` unless an equal fact is already stored. Returns whether the
    /// knowledge base changed.
    pub fn insert(&mut self, fact: Fact) -> bool {
        self.push(fact).is_some()
    }

    /// Like [`KnowledgeBase::insert`], returning the new fact's id.
    pub fn push(&mut self, fact: Fact) -> Option<FactId> {
        let key = fact.formula.dedup_key();
        if let Some(existing) = self.find_equal(key, &fact.formula) {
            let known = &self.facts[existing.0].formula;
            if let (Formula::Atom { name, .. }, false) = (known, known.matches(&fact.formula)) {
                log::warn!(
                    "Ignoring {}: it contradicts {known}, so {name} stays {}",
                    fact.formula,
                    self.truth(*name)
                );
            }
            return None;
        }

        let id = FactId(self.facts.len());
        let mut names = vec![];
        fact.formula.collect_atoms(&mut names);
        for name in names {
            self.atoms.entry(name).or_default();
        }
        if let Formula::Atom { name, truth, .. } = &fact.formula {
            if truth.is_known() {
                self.update_atom_truth(*name, *truth);
            }
        }
        self.facts.push(fact);
        self.buckets.entry(key).or_default().push(id);
        Some(id)
    }

    fn find_equal(&self, key: u64, formula: &Formula) -> Option<FactId> {
        self.buckets
            .get(&key)?
            .iter()
            .copied()
            .find(|id| self.facts[id.0].formula.equals(formula))
    }

    /// Whether a fact equal to `fact` has been stored, pruned or not.
    pub fn contains(&self, fact: &Fact) -> bool {
        self.find_equal(fact.formula.dedup_key(), &fact.formula)
            .is_some()
    }

    /// The live fact that matches `formula` exactly, polarity included.
    pub fn find(&self, formula: &Formula) -> Option<FactId> {
        self.find_equal(formula.dedup_key(), formula)
            .filter(|id| self.is_live(*id) && self.facts[id.0].formula.matches(formula))
    }

    pub fn get(&self, id: FactId) -> &Fact {
        &self.facts[id.0]
    }

    pub fn is_live(&self, id: FactId) -> bool {
        !self.pruned.contains(&id)
    }

    /// Every live fact, in insertion order.
    pub fn all(&self) -> impl Iterator<Item = (FactId, &Fact)> + '_ {
        self.facts
            .iter()
            .enumerate()
            .map(|(i, fact)| (FactId(i), fact))
            .filter(|(id, _)| self.is_live(*id))
    }

    /// The number of stored facts, including pruned ones.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Sets the truth of `name`. Overwriting a known value with its opposite
    /// means the facts are contradictory, which is logged.
    pub fn update_atom_truth(&mut self, name: Symbol, value: Truth) {
        let entry = self.atoms.entry(name).or_default();
        if entry.is_known() && value.is_known() && *entry != value {
            log::warn!("Truth of {name} flips from {entry} to {value}");
        }
        *entry = value;
    }

    pub fn truth(&self, name: Symbol) -> Truth {
        self.atoms.get(&name).copied().unwrap_or_default()
    }

    /// The atom table in order of first appearance.
    pub fn atoms(&self) -> &IndexMap<Symbol, Truth> {
        &self.atoms
    }

    /// Drops every `A → A` fact from matching and lookup. Returns how many
    /// facts were newly pruned.
    pub fn prune_trivial_implications(&mut self) -> usize {
        let trivial: Vec<FactId> = self
            .all()
            .filter(|(_, fact)| {
                matches!(&fact.formula, Formula::Implies { left, right, .. } if left.matches(right))
            })
            .map(|(id, _)| id)
            .collect();
        for id in &trivial {
            log::debug!("Pruning trivial implication {}", self.facts[id.0].formula);
            self.pruned.insert(*id);
        }
        trivial.len()
    }
}
