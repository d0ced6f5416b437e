//! The formula model: a closed sum type over the five connectives.
//!
//! Every variant carries a `negated` flag meaning "this whole (sub)formula is
//! negated", which is distinct from negating one of its operands. Formulas are
//! values: rules never mutate a formula in place, they build new ones.

pub mod parse;

use std::fmt::{self, Display, Formatter};

pub use parse::{parse_formula, parse_hypotheses, ParseError, Span};
pub use symbol_table::GlobalSymbol as Symbol;

use crate::util::fx_hash;

/// The tri-state value of a propositional variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Truth {
    True,
    False,
    #[default]
    Unknown,
}

impl Truth {
    pub fn is_known(self) -> bool {
        self != Truth::Unknown
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Truth::True => Some(true),
            Truth::False => Some(false),
            Truth::Unknown => None,
        }
    }
}

impl From<bool> for Truth {
    fn from(value: bool) -> Self {
        if value {
            Truth::True
        } else {
            Truth::False
        }
    }
}

impl Display for Truth {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Truth::True => write!(f, "true"),
            Truth::False => write!(f, "false"),
            Truth::Unknown => write!(f, "unknown"),
        }
    }
}

/// The binary connectives, used when the variant itself does not matter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Connective {
    And,
    Or,
    Implies,
    Iff,
}

impl Connective {
    /// And and Or ignore operand order when compared.
    pub fn is_commutative(self) -> bool {
        matches!(self, Connective::And | Connective::Or)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Connective::And => "∧",
            Connective::Or => "∨",
            Connective::Implies => "→",
            Connective::Iff => "↔",
        }
    }
}

#[derive(Clone, Debug)]
pub enum Formula {
    Atom {
        name: Symbol,
        negated: bool,
        truth: Truth,
    },
    And {
        left: Box<Formula>,
        right: Box<Formula>,
        negated: bool,
    },
    Or {
        left: Box<Formula>,
        right: Box<Formula>,
        negated: bool,
    },
    Implies {
        left: Box<Formula>,
        right: Box<Formula>,
        negated: bool,
    },
    Iff {
        left: Box<Formula>,
        right: Box<Formula>,
        negated: bool,
    },
}

impl Formula {
    pub fn atom(name: impl Into<Symbol>) -> Self {
        Formula::Atom {
            name: name.into(),
            negated: false,
            truth: Truth::Unknown,
        }
    }

    pub fn and(left: Formula, right: Formula) -> Self {
        Formula::binary(Connective::And, left, right, false)
    }

    pub fn or(left: Formula, right: Formula) -> Self {
        Formula::binary(Connective::Or, left, right, false)
    }

    pub fn implies(left: Formula, right: Formula) -> Self {
        Formula::binary(Connective::Implies, left, right, false)
    }

    pub fn iff(left: Formula, right: Formula) -> Self {
        Formula::binary(Connective::Iff, left, right, false)
    }

    pub fn binary(connective: Connective, left: Formula, right: Formula, negated: bool) -> Self {
        let (left, right) = (Box::new(left), Box::new(right));
        match connective {
            Connective::And => Formula::And {
                left,
                right,
                negated,
            },
            Connective::Or => Formula::Or {
                left,
                right,
                negated,
            },
            Connective::Implies => Formula::Implies {
                left,
                right,
                negated,
            },
            Connective::Iff => Formula::Iff {
                left,
                right,
                negated,
            },
        }
    }

    /// Splits a compound formula into its connective, operands and negation flag.
    pub fn as_binary(&self) -> Option<(Connective, &Formula, &Formula, bool)> {
        match self {
            Formula::Atom { .. } => None,
            Formula::And {
                left,
                right,
                negated,
            } => Some((Connective::And, left, right, *negated)),
            Formula::Or {
                left,
                right,
                negated,
            } => Some((Connective::Or, left, right, *negated)),
            Formula::Implies {
                left,
                right,
                negated,
            } => Some((Connective::Implies, left, right, *negated)),
            Formula::Iff {
                left,
                right,
                negated,
            } => Some((Connective::Iff, left, right, *negated)),
        }
    }

    pub fn is_negated(&self) -> bool {
        match self {
            Formula::Atom { negated, .. }
            | Formula::And { negated, .. }
            | Formula::Or { negated, .. }
            | Formula::Implies { negated, .. }
            | Formula::Iff { negated, .. } => *negated,
        }
    }

    fn negated_mut(&mut self) -> &mut bool {
        match self {
            Formula::Atom { negated, .. }
            | Formula::And { negated, .. }
            | Formula::Or { negated, .. }
            | Formula::Implies { negated, .. }
            | Formula::Iff { negated, .. } => negated,
        }
    }

    /// Negates the whole formula. Negating twice gives back the original.
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        let negated = self.negated_mut();
        *negated = !*negated;
        self
    }

    /// A copy of this formula with its `negated` flag flipped.
    pub fn negated_clone(&self) -> Self {
        self.clone().not()
    }

    /// The truth of an atom, `Unknown` for compound formulas.
    pub fn truth(&self) -> Truth {
        match self {
            Formula::Atom { truth, .. } => *truth,
            _ => Truth::Unknown,
        }
    }

    pub fn with_truth(mut self, value: Truth) -> Self {
        if let Formula::Atom { truth, .. } = &mut self {
            *truth = value;
        }
        self
    }

    /// Pins down the truth of an atom that is known to hold as written:
    /// `A` makes A true and `A'` makes A false. Compound formulas are unchanged.
    pub fn holding(self) -> Self {
        match self {
            Formula::Atom { name, negated, .. } => Formula::Atom {
                name,
                negated,
                truth: Truth::from(!negated),
            },
            other => other,
        }
    }

    pub fn atom_name(&self) -> Option<Symbol> {
        match self {
            Formula::Atom { name, .. } => Some(*name),
            _ => None,
        }
    }

    /// Strict structural equality.
    ///
    /// Atoms need the same name and polarity, And/Or may have their operands
    /// swapped, Implies/Iff are ordered, and every compound compares its own
    /// negation flag. Truth values are ignored.
    pub fn matches(&self, other: &Formula) -> bool {
        match (self, other) {
            (
                Formula::Atom {
                    name: a, negated: n, ..
                },
                Formula::Atom {
                    name: b, negated: m, ..
                },
            ) => a == b && n == m,
            _ => match (self.as_binary(), other.as_binary()) {
                (Some((c1, l1, r1, n1)), Some((c2, l2, r2, n2))) if c1 == c2 && n1 == n2 => {
                    (l1.matches(l2) && r1.matches(r2))
                        || (c1.is_commutative() && l1.matches(r2) && r1.matches(l2))
                }
                _ => false,
            },
        }
    }

    /// The equality the knowledge base deduplicates with.
    ///
    /// Two atoms are equal when they share a name; callers compare polarity
    /// separately. Everything else is compared with [`Formula::matches`].
    pub fn equals(&self, other: &Formula) -> bool {
        match (self, other) {
            (Formula::Atom { name: a, .. }, Formula::Atom { name: b, .. }) => a == b,
            _ => self.matches(other),
        }
    }

    /// A hash consistent with [`Formula::equals`].
    pub(crate) fn dedup_key(&self) -> u64 {
        self.key(true)
    }

    fn key(&self, top: bool) -> u64 {
        match self {
            Formula::Atom { name, negated, .. } => {
                let polarity = if top { None } else { Some(*negated) };
                fx_hash(&(0u8, name, polarity))
            }
            _ => {
                let Some((connective, left, right, negated)) = self.as_binary() else {
                    unreachable!()
                };
                let (a, b) = (left.key(false), right.key(false));
                let (a, b) = if connective.is_commutative() && b < a {
                    (b, a)
                } else {
                    (a, b)
                };
                fx_hash(&(1u8, connective, negated, a, b))
            }
        }
    }

    /// Nesting depth; an atom has depth 0.
    pub fn depth(&self) -> usize {
        match self.as_binary() {
            None => 0,
            Some((_, left, right, _)) => 1 + left.depth().max(right.depth()),
        }
    }

    /// The distinct atom names in order of first appearance.
    pub fn atoms(&self) -> Vec<Symbol> {
        let mut out = vec![];
        self.collect_atoms(&mut out);
        out
    }

    pub(crate) fn collect_atoms(&self, out: &mut Vec<Symbol>) {
        match self {
            Formula::Atom { name, .. } => {
                if !out.contains(name) {
                    out.push(*name);
                }
            }
            _ => {
                if let Some((_, left, right, _)) = self.as_binary() {
                    left.collect_atoms(out);
                    right.collect_atoms(out);
                }
            }
        }
    }

    /// Classical evaluation under a valuation of the atoms.
    pub fn evaluate(&self, valuation: &impl Fn(Symbol) -> bool) -> bool {
        let value = match self {
            Formula::Atom { name, .. } => valuation(*name),
            Formula::And { left, right, .. } => left.evaluate(valuation) && right.evaluate(valuation),
            Formula::Or { left, right, .. } => left.evaluate(valuation) || right.evaluate(valuation),
            Formula::Implies { left, right, .. } => {
                !left.evaluate(valuation) || right.evaluate(valuation)
            }
            Formula::Iff { left, right, .. } => left.evaluate(valuation) == right.evaluate(valuation),
        };
        value != self.is_negated()
    }
}

impl PartialEq for Formula {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Eq for Formula {}

/// Symbolic rendering with `¬ ∧ ∨ → ↔`.
impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Atom { name, negated, .. } => {
                if *negated {
                    write!(f, "¬")?;
                }
                write!(f, "{name}")
            }
            _ => {
                let Some((connective, left, right, negated)) = self.as_binary() else {
                    unreachable!()
                };
                if negated {
                    write!(f, "¬(")?;
                }
                write!(
                    f,
                    "{} {} {}",
                    Operand(left),
                    connective.symbol(),
                    Operand(right)
                )?;
                if negated {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

/// Wraps compound operands in parentheses; negated compounds carry their own.
struct Operand<'a>(&'a Formula);

impl Display for Operand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Formula::Atom { .. } => write!(f, "{}", self.0),
            compound if compound.is_negated() => write!(f, "{compound}"),
            compound => write!(f, "({compound})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> Formula {
        Formula::atom("A")
    }

    fn b() -> Formula {
        Formula::atom("B")
    }

    #[test]
    fn commutative_connectives() {
        assert!(Formula::and(a(), b()).equals(&Formula::and(b(), a())));
        assert!(Formula::or(a(), b()).equals(&Formula::or(b(), a())));
        assert!(!Formula::implies(a(), b()).equals(&Formula::implies(b(), a())));
        assert!(!Formula::iff(a(), b()).equals(&Formula::iff(b(), a())));
        assert!(Formula::implies(a(), a()).equals(&Formula::implies(a(), a())));
    }

    #[test]
    fn negation_flags() {
        assert!(!Formula::and(a(), b()).equals(&Formula::and(a(), b()).not()));
        // operands are always compared with their polarity
        assert!(!Formula::or(a(), b()).equals(&Formula::or(a().not(), b())));
        // top-level atoms leave polarity to the caller
        assert!(a().equals(&a().not()));
        assert!(!a().matches(&a().not()));
        assert!(a().not().not().matches(&a()));
    }

    #[test]
    fn dedup_key_agrees_with_equals() {
        let pairs = [
            (Formula::and(a(), b().not()), Formula::and(b().not(), a())),
            (a(), a().not()),
            (
                Formula::or(Formula::implies(a(), b()), b()),
                Formula::or(b(), Formula::implies(a(), b())),
            ),
        ];
        for (x, y) in pairs {
            assert!(x.equals(&y));
            assert_eq!(x.dedup_key(), y.dedup_key());
        }
    }

    #[test]
    fn symbolic_display() {
        let f = Formula::implies(Formula::and(a(), b()), Formula::or(a(), b()).not());
        assert_eq!(f.to_string(), "(A ∧ B) → ¬(A ∨ B)");
        assert_eq!(a().not().to_string(), "¬A");
        assert_eq!(Formula::iff(a(), b()).to_string(), "A ↔ B");
    }

    #[test]
    fn holding_pins_truth() {
        assert_eq!(a().holding().truth(), Truth::True);
        assert_eq!(a().not().holding().truth(), Truth::False);
        assert_eq!(Formula::and(a(), b()).holding().truth(), Truth::Unknown);
        assert_eq!(Formula::and(a(), b()).depth(), 1);
    }
}
