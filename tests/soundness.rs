//! Every rule, applied to premises that hold, only concludes formulas that
//! hold under every valuation of the atoms involved.

use propstep::*;

const ATOMS: [&str; 3] = ["A", "B", "C"];

fn literals() -> Vec<Formula> {
    ["A", "B", "A'", "B'"]
        .iter()
        .map(|s| parse_formula(s).unwrap())
        .collect()
}

/// Literals, every compound of two literals, and a few deeper shapes the
/// rules look for.
fn pool() -> Vec<Formula> {
    let literals = literals();
    let mut pool = literals.clone();
    for left in &literals {
        for right in &literals {
            for negated in [false, true] {
                pool.push(Formula::and(left.clone(), right.clone()).with_negation(negated));
                pool.push(Formula::or(left.clone(), right.clone()).with_negation(negated));
                pool.push(Formula::implies(left.clone(), right.clone()).with_negation(negated));
                pool.push(Formula::iff(left.clone(), right.clone()).with_negation(negated));
            }
        }
    }
    for deeper in [
        "(A^B)>C",
        "(A^B)vC",
        "Cv(A^B)",
        "(AvC)^(BvC)",
        "(CvA)^(CvB)",
        "A>(B>C)",
        "(A>B)'",
        "A'>C",
        "A>C",
        "B>C",
        "AvA",
        "C",
    ] {
        pool.push(parse_formula(deeper).unwrap());
    }
    pool.into_iter().map(Formula::holding).collect()
}

trait WithNegation {
    fn with_negation(self, negated: bool) -> Self;
}

impl WithNegation for Formula {
    fn with_negation(self, negated: bool) -> Self {
        if negated {
            self.not()
        } else {
            self
        }
    }
}

fn valuations() -> impl Iterator<Item = impl Fn(Symbol) -> bool> {
    (0..1u32 << ATOMS.len()).map(|bits| {
        move |name: Symbol| {
            let i = ATOMS
                .iter()
                .position(|atom| Symbol::from(*atom) == name)
                .unwrap();
            bits & (1 << i) != 0
        }
    })
}

fn check(rule: &Rule, premises: &[&Formula], conclusions: &[Formula]) {
    for valuation in valuations() {
        if premises.iter().all(|p| p.evaluate(&valuation)) {
            for conclusion in conclusions {
                assert!(
                    conclusion.evaluate(&valuation),
                    "{} derived {conclusion} from {}",
                    rule.name,
                    premises
                        .iter()
                        .map(|p| p.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
    }
}

#[test]
fn every_rule_is_sound() {
    let pool = pool();
    let mut fired = std::collections::BTreeSet::new();
    for rule in RULES.iter() {
        for first in &pool {
            if rule.arity() == 1 {
                let conclusions = rule.apply(first, None);
                if !conclusions.is_empty() {
                    fired.insert(rule.name);
                }
                check(rule, &[first], &conclusions);
                continue;
            }
            for second in &pool {
                let conclusions = rule.apply(first, Some(second));
                if !conclusions.is_empty() {
                    fired.insert(rule.name);
                }
                check(rule, &[first, second], &conclusions);
            }
        }
    }
    // every rule was exercised at least once
    assert_eq!(fired.len(), RULES.len());
}

#[test]
fn derived_facts_hold_under_hypotheses() {
    // for each closure, every fact must hold wherever all hypotheses do
    for hypotheses in ["A>B, B>C", "AvB, A'", "(A^B)', A", "A<>B, C", "(A^B)vC"] {
        let hypotheses = parse_hypotheses(hypotheses).unwrap();
        let mut ctx = Prover::default().context(&hypotheses);
        ctx.saturate(&parse_formula("A^(B^C)'").unwrap());
        for valuation in valuations() {
            if hypotheses.iter().all(|h| h.evaluate(&valuation)) {
                for (_, fact) in ctx.knowledge().all() {
                    assert!(fact.formula.evaluate(&valuation), "{}", fact.formula);
                }
            }
        }
    }
}
