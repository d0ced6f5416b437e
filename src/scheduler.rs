//! The fixpoint driver: saturates the knowledge base under [`RULES`].
//!
//! Each pass first searches every rule against the facts present when the
//! pass started and only then inserts what it found, so the order rules are
//! listed in never changes what a pass derives.

use std::fmt::{self, Display, Formatter};

use instant::{Duration, Instant};
use smallvec::{smallvec, SmallVec};

use crate::ast::Formula;
use crate::knowledge::{Fact, FactId};
use crate::rules::{Premises, RuleName, RULES};
use crate::util::HashMap;
use crate::ProofContext;

/// Bounds on a proof search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Stop once the knowledge base holds this many facts.
    pub max_facts: usize,
    /// Stop after this many passes over the rule catalog.
    pub max_passes: usize,
    /// Only match facts that include at least one fact new since the last pass.
    pub seminaive: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_facts: 2048,
            max_passes: 128,
            seminaive: true,
        }
    }
}

/// The bound a search ran into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchLimit {
    Facts(usize),
    Passes(usize),
}

impl Display for SearchLimit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SearchLimit::Facts(n) => write!(f, "more than {n} facts"),
            SearchLimit::Passes(n) => write!(f, "more than {n} passes"),
        }
    }
}

/// How a call to [`ProofContext::saturate`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Saturation {
    /// The goal was already known or became known.
    GoalFound(FactId),
    /// A pass derived nothing new.
    Closed,
    LimitExceeded(SearchLimit),
}

/// Running the fixpoint driver produces a report of the results.
/// Calling `union` on two run reports adds the counts and timings together.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// If any fact was added, this is true.
    pub updated: bool,
    pub passes: usize,
    pub facts_added: usize,
    pub num_matches_per_rule: HashMap<RuleName, usize>,
    pub search_time_per_rule: HashMap<RuleName, Duration>,
    pub apply_time: Duration,
}

impl RunReport {
    fn add_rule_search_time(&mut self, rule: RuleName, time: Duration) {
        *self.search_time_per_rule.entry(rule).or_default() += time;
    }

    fn add_rule_num_matches(&mut self, rule: RuleName, num_matches: usize) {
        *self.num_matches_per_rule.entry(rule).or_default() += num_matches;
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.updated |= other.updated;
        out.passes += other.passes;
        out.facts_added += other.facts_added;
        out.apply_time += other.apply_time;
        for (rule, matches) in &other.num_matches_per_rule {
            out.add_rule_num_matches(*rule, *matches);
        }
        for (rule, time) in &other.search_time_per_rule {
            out.add_rule_search_time(*rule, *time);
        }
        out
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut rules: Vec<RuleName> = self
            .num_matches_per_rule
            .keys()
            .chain(self.search_time_per_rule.keys())
            .copied()
            .collect();
        rules.sort();
        rules.dedup();
        for rule in rules {
            let search_time = self
                .search_time_per_rule
                .get(&rule)
                .copied()
                .unwrap_or_default()
                .as_secs_f64();
            let num_matches = self.num_matches_per_rule.get(&rule).copied().unwrap_or(0);
            writeln!(
                f,
                "Rule {rule}: search {search_time:.3}s, num matches {num_matches}"
            )?;
        }
        writeln!(
            f,
            "{} passes added {} facts, apply {:.3}s",
            self.passes,
            self.facts_added,
            self.apply_time.as_secs_f64()
        )
    }
}

/// A conclusion found during the search phase, waiting to be inserted.
struct Match {
    rule: RuleName,
    formula: Formula,
    parents: SmallVec<[FactId; 2]>,
}

impl ProofContext {
    /// Runs passes until `goal` is known, a pass adds nothing, or a limit is hit.
    pub fn saturate(&mut self, goal: &Formula) -> Saturation {
        loop {
            if let Some(id) = self.kb.find(goal) {
                log::info!("Breaking early because {goal} is known");
                return Saturation::GoalFound(id);
            }
            if let Err(limit) = self.limit_check() {
                return Saturation::LimitExceeded(limit);
            }
            if self.report.passes >= self.config.max_passes {
                let limit = SearchLimit::Passes(self.config.max_passes);
                log::warn!("Search stopped at {limit}");
                return Saturation::LimitExceeded(limit);
            }

            let pass = self.step_rules();
            self.report = self.report.union(&pass);
            log::debug!("knowledge base size: {}", self.kb.len());
            log::debug!("Made {} updates", pass.facts_added);

            if !pass.updated {
                log::debug!("Closure reached after {} passes", self.report.passes);
                return Saturation::Closed;
            }
        }
    }

    fn limit_check(&self) -> Result<(), SearchLimit> {
        if self.kb.len() > self.config.max_facts {
            let limit = SearchLimit::Facts(self.config.max_facts);
            log::warn!("Search stopped at {limit}");
            Err(limit)
        } else {
            Ok(())
        }
    }

    /// One pass: search every rule, then apply every match.
    fn step_rules(&mut self) -> RunReport {
        let mut report = RunReport {
            passes: 1,
            ..Default::default()
        };
        let snapshot = self.kb.len();
        let matches = self.search_rules(snapshot, &mut report);

        let apply_start = Instant::now();
        for Match {
            rule,
            formula,
            parents,
        } in matches
        {
            // one past the limit so the caller can tell the search was cut short
            if self.kb.len() > self.config.max_facts {
                break;
            }
            if self.kb.insert(Fact::derived(formula, rule, &parents)) {
                report.updated = true;
                report.facts_added += 1;
            }
        }
        report.apply_time = apply_start.elapsed();
        self.frontier = snapshot;
        report
    }

    /// Search all the rules against the first `snapshot` facts.
    fn search_rules(&self, snapshot: usize, report: &mut RunReport) -> Vec<Match> {
        let fresh_from = if self.config.seminaive {
            self.frontier
        } else {
            0
        };
        let live: Vec<(FactId, &Formula)> = self
            .kb
            .all()
            .take_while(|(id, _)| id.index() < snapshot)
            .map(|(id, fact)| (id, &fact.formula))
            .collect();
        let is_fresh = |id: FactId| id.index() >= fresh_from;

        let mut matches = vec![];
        for rule in RULES.iter() {
            let search_start = Instant::now();
            let before = matches.len();
            match rule.premises {
                Premises::One(shape) => {
                    for &(id, formula) in live.iter().filter(|(id, f)| is_fresh(*id) && shape(f)) {
                        for conclusion in rule.apply(formula, None) {
                            matches.push(Match {
                                rule: rule.name,
                                formula: conclusion,
                                parents: smallvec![id],
                            });
                        }
                    }
                }
                Premises::Two(first_shape, second_shape) => {
                    let seconds: Vec<_> = live.iter().filter(|(_, f)| second_shape(f)).collect();
                    for &(i, first) in live.iter().filter(|(_, f)| first_shape(f)) {
                        for &&(j, second) in &seconds {
                            if i == j || !(is_fresh(i) || is_fresh(j)) {
                                continue;
                            }
                            for conclusion in rule.apply(first, Some(second)) {
                                matches.push(Match {
                                    rule: rule.name,
                                    formula: conclusion,
                                    parents: smallvec![i, j],
                                });
                            }
                        }
                    }
                }
            }
            report.add_rule_num_matches(rule.name, matches.len() - before);
            report.add_rule_search_time(rule.name, search_start.elapsed());
        }
        matches
    }
}
