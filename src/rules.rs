//! The inference rule catalog.
//!
//! Each rule is a pure function from one or two premise formulas to the
//! formulas it concludes. The fixpoint driver iterates [`RULES`] generically;
//! nothing here knows how saturation runs.

use std::fmt::{self, Display, Formatter};

use crate::ast::{Connective, Formula, Truth};

/// The name a rule is cited by in a proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleName {
    ModusPonens,
    ModusTollens,
    HypotheticalSyllogism,
    ConditionalDisjunction,
    Contraposition,
    Exportation,
    ConjunctionElimination,
    ConjunctionIntroduction,
    DeMorgan,
    Distribution,
    ProofByCases,
    SelfReference,
    BiconditionalElimination,
    BiconditionalIntroduction,
}

impl Display for RuleName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleName::ModusPonens => "Modus Ponens",
            RuleName::ModusTollens => "Modus Tollens",
            RuleName::HypotheticalSyllogism => "Hypothetical Syllogism",
            RuleName::ConditionalDisjunction => "Conditional Disjunction",
            RuleName::Contraposition => "Contraposition",
            RuleName::Exportation => "Exportation",
            RuleName::ConjunctionElimination => "Conjunction Elimination",
            RuleName::ConjunctionIntroduction => "Conjunction Introduction",
            RuleName::DeMorgan => "De Morgan's Laws",
            RuleName::Distribution => "Distribution",
            RuleName::ProofByCases => "Proof by Cases",
            RuleName::SelfReference => "Self-Reference",
            RuleName::BiconditionalElimination => "Biconditional Elimination",
            RuleName::BiconditionalIntroduction => "Biconditional Introduction",
        };
        f.write_str(name)
    }
}

/// A shape test on a single premise.
pub type Shape = fn(&Formula) -> bool;

/// What a rule consumes: one fact, or an ordered pair of distinct facts.
#[derive(Clone, Copy)]
pub enum Premises {
    One(Shape),
    Two(Shape, Shape),
}

pub struct Rule {
    pub name: RuleName,
    /// Cheap applicability tests; `produce` still checks the full pattern.
    pub premises: Premises,
    pub produce: fn(&Formula, Option<&Formula>) -> Vec<Formula>,
}

impl Rule {
    pub fn arity(&self) -> usize {
        match self.premises {
            Premises::One(_) => 1,
            Premises::Two(..) => 2,
        }
    }

    fn applies(&self, first: &Formula, second: Option<&Formula>) -> bool {
        match (self.premises, second) {
            (Premises::One(shape), None) => shape(first),
            (Premises::Two(a, b), Some(second)) => a(first) && b(second),
            _ => false,
        }
    }

    /// The rule's conclusions, empty when the premises do not fit.
    pub fn apply(&self, first: &Formula, second: Option<&Formula>) -> Vec<Formula> {
        if self.applies(first, second) {
            (self.produce)(first, second)
        } else {
            vec![]
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("arity", &self.arity())
            .finish()
    }
}

lazy_static::lazy_static! {
    /// Every rule, in the order the fixpoint driver applies them.
    pub static ref RULES: Vec<Rule> = vec![
        Rule {
            name: RuleName::ModusPonens,
            premises: Premises::Two(any, is_implication),
            produce: modus_ponens,
        },
        Rule {
            name: RuleName::ModusTollens,
            premises: Premises::Two(any, is_implication),
            produce: modus_tollens,
        },
        Rule {
            name: RuleName::HypotheticalSyllogism,
            premises: Premises::Two(is_any_implication, is_any_implication),
            produce: hypothetical_syllogism,
        },
        Rule {
            name: RuleName::ConditionalDisjunction,
            premises: Premises::One(|f| is_implication(f) || is_disjunction(f)),
            produce: conditional_disjunction,
        },
        Rule {
            name: RuleName::Contraposition,
            premises: Premises::One(is_implication),
            produce: contraposition,
        },
        Rule {
            name: RuleName::Exportation,
            premises: Premises::One(|f| {
                matches!(f, Formula::Implies { left, negated: false, .. } if is_conjunction(left))
            }),
            produce: exportation,
        },
        Rule {
            name: RuleName::ConjunctionElimination,
            premises: Premises::One(is_conjunction),
            produce: conjunction_elimination,
        },
        Rule {
            name: RuleName::ConjunctionIntroduction,
            premises: Premises::Two(is_known_atom, is_known_atom),
            produce: conjunction_introduction,
        },
        Rule {
            name: RuleName::DeMorgan,
            premises: Premises::One(|f| matches!(f, Formula::And { .. } | Formula::Or { .. })),
            produce: de_morgan,
        },
        Rule {
            name: RuleName::Distribution,
            premises: Premises::One(|f| is_disjunction(f) || is_conjunction(f)),
            produce: distribution,
        },
        Rule {
            name: RuleName::ProofByCases,
            premises: Premises::Two(is_implication, is_implication),
            produce: proof_by_cases,
        },
        Rule {
            name: RuleName::SelfReference,
            premises: Premises::One(is_disjunction),
            produce: self_reference,
        },
        Rule {
            name: RuleName::BiconditionalElimination,
            premises: Premises::One(|f| matches!(f, Formula::Iff { negated: false, .. })),
            produce: biconditional_elimination,
        },
        Rule {
            name: RuleName::BiconditionalIntroduction,
            premises: Premises::Two(is_implication, is_implication),
            produce: biconditional_introduction,
        },
    ];
}

fn any(_: &Formula) -> bool {
    true
}

fn is_implication(f: &Formula) -> bool {
    matches!(f, Formula::Implies { negated: false, .. })
}

fn is_any_implication(f: &Formula) -> bool {
    matches!(f, Formula::Implies { .. })
}

fn is_conjunction(f: &Formula) -> bool {
    matches!(f, Formula::And { negated: false, .. })
}

fn is_disjunction(f: &Formula) -> bool {
    matches!(f, Formula::Or { negated: false, .. })
}

fn is_known_atom(f: &Formula) -> bool {
    matches!(f, Formula::Atom { truth, .. } if truth.is_known())
}

/// `A`, `A → B` ⊢ `B`
fn modus_ponens(fact: &Formula, implication: Option<&Formula>) -> Vec<Formula> {
    let Some(Formula::Implies {
        left,
        right,
        negated: false,
    }) = implication
    else {
        return vec![];
    };
    if fact.atom_name().is_some() && !fact.truth().is_known() {
        return vec![];
    }
    if left.matches(fact) {
        vec![(**right).clone().holding()]
    } else {
        vec![]
    }
}

/// `¬B`, `A → B` ⊢ `¬A`
fn modus_tollens(fact: &Formula, implication: Option<&Formula>) -> Vec<Formula> {
    let Some(Formula::Implies {
        left,
        right,
        negated: false,
    }) = implication
    else {
        return vec![];
    };
    let denied = match (fact, &**right) {
        (
            Formula::Atom { name, truth, .. },
            Formula::Atom {
                name: target,
                negated,
                ..
            },
        ) => name == target && truth.is_known() && *truth != Truth::from(!*negated),
        _ => fact.matches(&right.negated_clone()),
    };
    if denied {
        vec![left.negated_clone().holding()]
    } else {
        vec![]
    }
}

/// `A → B`, `B → C` ⊢ `A → C`, refusing the degenerate `X → ¬X`.
fn hypothetical_syllogism(first: &Formula, second: Option<&Formula>) -> Vec<Formula> {
    let (
        Formula::Implies {
            left: a,
            right: b,
            negated,
        },
        Some(Formula::Implies {
            left: b2,
            right: c,
            negated: negated2,
        }),
    ) = (first, second)
    else {
        return vec![];
    };
    if negated != negated2 || !b.matches(b2) || c.matches(&a.negated_clone()) {
        return vec![];
    }
    vec![Formula::binary(
        Connective::Implies,
        (**a).clone(),
        (**c).clone(),
        *negated,
    )]
}

/// `A → B` ⊢ `¬A ∨ B`, and `A ∨ B` ⊢ `¬A → B`, `¬B → A`
fn conditional_disjunction(f: &Formula, _: Option<&Formula>) -> Vec<Formula> {
    match f {
        Formula::Implies {
            left,
            right,
            negated: false,
        } => vec![Formula::or(left.negated_clone(), (**right).clone())],
        Formula::Or {
            left,
            right,
            negated: false,
        } => vec![
            Formula::implies(left.negated_clone(), (**right).clone()),
            Formula::implies(right.negated_clone(), (**left).clone()),
        ],
        _ => vec![],
    }
}

/// `A → B` ⊢ `¬B → ¬A`
fn contraposition(f: &Formula, _: Option<&Formula>) -> Vec<Formula> {
    match f {
        Formula::Implies {
            left,
            right,
            negated: false,
        } => vec![Formula::implies(right.negated_clone(), left.negated_clone())],
        _ => vec![],
    }
}

/// `(A ∧ B) → C` ⊢ `A → (B → C)`, `B → (A → C)`
fn exportation(f: &Formula, _: Option<&Formula>) -> Vec<Formula> {
    let Formula::Implies {
        left,
        right: c,
        negated: false,
    } = f
    else {
        return vec![];
    };
    let Formula::And {
        left: a,
        right: b,
        negated: false,
    } = &**left
    else {
        return vec![];
    };
    let (a, b, c) = (&**a, &**b, &**c);
    vec![
        Formula::implies(a.clone(), Formula::implies(b.clone(), c.clone())),
        Formula::implies(b.clone(), Formula::implies(a.clone(), c.clone())),
    ]
}

/// `A ∧ B` ⊢ `A`, `B`
fn conjunction_elimination(f: &Formula, _: Option<&Formula>) -> Vec<Formula> {
    match f {
        Formula::And {
            left,
            right,
            negated: false,
        } => vec![(**left).clone().holding(), (**right).clone().holding()],
        _ => vec![],
    }
}

/// `A`, `B` ⊢ `A ∧ B` for two different atoms
fn conjunction_introduction(first: &Formula, second: Option<&Formula>) -> Vec<Formula> {
    let Some(second) = second else {
        return vec![];
    };
    match (first.atom_name(), second.atom_name()) {
        (Some(a), Some(b)) if a != b => vec![Formula::and(first.clone(), second.clone())],
        _ => vec![],
    }
}

/// `¬(A ∧ B)` ⊢ `¬A ∨ ¬B` and `¬(A ∨ B)` ⊢ `¬A ∧ ¬B`, in both directions.
fn de_morgan(f: &Formula, _: Option<&Formula>) -> Vec<Formula> {
    let Some((connective, left, right, negated)) = f.as_binary() else {
        return vec![];
    };
    let dual = match connective {
        Connective::And => Connective::Or,
        Connective::Or => Connective::And,
        Connective::Implies | Connective::Iff => return vec![],
    };
    vec![Formula::binary(
        dual,
        left.negated_clone(),
        right.negated_clone(),
        !negated,
    )]
}

/// `(A ∧ B) ∨ C` ⊢ `(A ∨ C) ∧ (B ∨ C)`, and back again.
fn distribution(f: &Formula, _: Option<&Formula>) -> Vec<Formula> {
    match f {
        Formula::Or {
            left,
            right,
            negated: false,
        } => {
            let mut out = vec![];
            if let Formula::And {
                left: a,
                right: b,
                negated: false,
            } = &**left
            {
                out.push(Formula::and(
                    Formula::or((**a).clone(), (**right).clone()),
                    Formula::or((**b).clone(), (**right).clone()),
                ));
            }
            if let Formula::And {
                left: a,
                right: b,
                negated: false,
            } = &**right
            {
                out.push(Formula::and(
                    Formula::or((**left).clone(), (**a).clone()),
                    Formula::or((**left).clone(), (**b).clone()),
                ));
            }
            out
        }
        Formula::And {
            left,
            right,
            negated: false,
        } => {
            let (
                Formula::Or {
                    left: p,
                    right: q,
                    negated: false,
                },
                Formula::Or {
                    left: s,
                    right: t,
                    negated: false,
                },
            ) = (&**left, &**right)
            else {
                return vec![];
            };
            let mut out: Vec<Formula> = vec![];
            for (shared, x) in [(p, q), (q, p)] {
                for (shared2, y) in [(s, t), (t, s)] {
                    if shared.matches(shared2) {
                        let factored = Formula::or(
                            Formula::and((**x).clone(), (**y).clone()),
                            (**shared).clone(),
                        );
                        if !out.iter().any(|f| f.matches(&factored)) {
                            out.push(factored);
                        }
                    }
                }
            }
            out
        }
        _ => vec![],
    }
}

/// `A → C`, `¬A → C` ⊢ `C`
fn proof_by_cases(first: &Formula, second: Option<&Formula>) -> Vec<Formula> {
    let (
        Formula::Implies {
            left: a,
            right: c,
            negated: false,
        },
        Some(Formula::Implies {
            left: not_a,
            right: c2,
            negated: false,
        }),
    ) = (first, second)
    else {
        return vec![];
    };
    if c.matches(c2) && a.matches(&not_a.negated_clone()) {
        vec![(**c).clone().holding()]
    } else {
        vec![]
    }
}

/// `A ∨ A` ⊢ `A`
fn self_reference(f: &Formula, _: Option<&Formula>) -> Vec<Formula> {
    match f {
        Formula::Or {
            left,
            right,
            negated: false,
        } if left.matches(right) => vec![(**left).clone().holding()],
        _ => vec![],
    }
}

/// `A ↔ B` ⊢ `A → B`, `B → A`
fn biconditional_elimination(f: &Formula, _: Option<&Formula>) -> Vec<Formula> {
    match f {
        Formula::Iff {
            left,
            right,
            negated: false,
        } => vec![
            Formula::implies((**left).clone(), (**right).clone()),
            Formula::implies((**right).clone(), (**left).clone()),
        ],
        _ => vec![],
    }
}

/// `A → B`, `B → A` ⊢ `A ↔ B`
fn biconditional_introduction(first: &Formula, second: Option<&Formula>) -> Vec<Formula> {
    let (
        Formula::Implies {
            left: a,
            right: b,
            negated: false,
        },
        Some(Formula::Implies {
            left: b2,
            right: a2,
            negated: false,
        }),
    ) = (first, second)
    else {
        return vec![];
    };
    if a.matches(a2) && b.matches(b2) && !a.matches(b) {
        vec![Formula::iff((**a).clone(), (**b).clone())]
    } else {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_formula;

    fn rule(name: RuleName) -> &'static Rule {
        RULES.iter().find(|rule| rule.name == name).unwrap()
    }

    fn f(input: &str) -> Formula {
        parse_formula(input).unwrap().holding()
    }

    fn apply(name: RuleName, first: &str, second: Option<&str>) -> Vec<Formula> {
        let first = f(first);
        let second = second.map(f);
        rule(name).apply(&first, second.as_ref())
    }

    fn assert_yields(name: RuleName, first: &str, second: Option<&str>, expected: &[&str]) {
        let got = apply(name, first, second);
        let expected: Vec<Formula> = expected.iter().map(|e| f(e)).collect();
        assert_eq!(got, expected, "{name} on {first} / {second:?}");
    }

    #[test]
    fn catalog_is_complete() {
        assert_eq!(RULES.len(), 14);
        for (i, rule) in RULES.iter().enumerate() {
            assert!(
                RULES[i + 1..].iter().all(|other| other.name != rule.name),
                "{} listed twice",
                rule.name
            );
        }
        assert_eq!(rule(RuleName::ModusPonens).arity(), 2);
        assert_eq!(rule(RuleName::Contraposition).arity(), 1);
    }

    #[test]
    fn modus_ponens_and_tollens() {
        use RuleName::*;
        assert_yields(ModusPonens, "A", Some("A>B"), &["B"]);
        assert_eq!(apply(ModusPonens, "A>B", Some("A>B")), vec![]);
        assert_yields(ModusPonens, "A^B", Some("(A^B)>C'"), &["C'"]);
        assert_eq!(apply(ModusPonens, "A'", Some("A>B")), vec![]);
        assert_eq!(apply(ModusPonens, "A", Some("(A>B)'")), vec![]);
        let derived = apply(ModusPonens, "A", Some("A>B'"));
        assert_eq!(derived[0].truth(), Truth::False);

        assert_yields(ModusTollens, "B'", Some("A>B"), &["A'"]);
        assert_yields(ModusTollens, "B", Some("A'>B'"), &["A"]);
        assert_yields(ModusTollens, "(CvD)'", Some("A>(CvD)"), &["A'"]);
        assert_eq!(apply(ModusTollens, "B", Some("A>B")), vec![]);
    }

    #[test]
    fn implication_rewrites() {
        use RuleName::*;
        assert_yields(HypotheticalSyllogism, "A>B", Some("B>C"), &["A>C"]);
        assert_eq!(apply(HypotheticalSyllogism, "A>B", Some("B>A'")), vec![]);
        assert_eq!(apply(HypotheticalSyllogism, "A>B", Some("C>D")), vec![]);
        assert_yields(ConditionalDisjunction, "A>B", None, &["A'vB"]);
        assert_yields(ConditionalDisjunction, "AvB", None, &["A'>B", "B'>A"]);
        assert_eq!(apply(ConditionalDisjunction, "(AvB)'", None), vec![]);
        assert_yields(Contraposition, "A>B'", None, &["B>A'"]);
        assert_yields(Exportation, "(A^B)>C", None, &["A>(B>C)", "B>(A>C)"]);
        assert_eq!(apply(Exportation, "(A^B)'>C", None), vec![]);
        assert_yields(ProofByCases, "A>C", Some("A'>C"), &["C"]);
        assert_eq!(apply(ProofByCases, "A>C", Some("A>C")), vec![]);
        assert_yields(BiconditionalElimination, "A<>B", None, &["A>B", "B>A"]);
        assert_yields(BiconditionalIntroduction, "A>B", Some("B>A"), &["A<>B"]);
    }

    #[test]
    fn conjunctions_and_disjunctions() {
        use RuleName::*;
        let parts = apply(ConjunctionElimination, "A^B'", None);
        assert_eq!(parts, vec![f("A"), f("B'")]);
        assert_eq!(parts[1].truth(), Truth::False);
        assert_eq!(apply(ConjunctionElimination, "(A^B)'", None), vec![]);
        assert_yields(ConjunctionIntroduction, "A", Some("B'"), &["A^B'"]);
        assert_eq!(apply(ConjunctionIntroduction, "A", Some("A")), vec![]);

        assert_yields(DeMorgan, "(A^B)'", None, &["A'vB'"]);
        assert_yields(DeMorgan, "(AvB)'", None, &["A'^B'"]);
        assert_yields(DeMorgan, "A'vB'", None, &["(A^B)'"]);
        assert_yields(DeMorgan, "A^B", None, &["(A'vB')'"]);

        assert_yields(Distribution, "(A^B)vC", None, &["(AvC)^(BvC)"]);
        assert_yields(Distribution, "Cv(A^B)", None, &["(CvA)^(CvB)"]);
        assert_yields(Distribution, "(AvC)^(BvC)", None, &["(A^B)vC"]);
        assert_eq!(apply(Distribution, "(AvB)^(CvD)", None), vec![]);

        assert_yields(SelfReference, "AvA", None, &["A"]);
        assert_eq!(apply(SelfReference, "AvA'", None), vec![]);
    }
}
