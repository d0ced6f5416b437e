use std::fmt::{self, Display, Formatter};

use crate::ast::{Connective, Formula};

use super::ProofTrace;

/// How formulas are written in a rendered proof.
pub trait Notation {
    fn fmt_formula(&self, formula: &Formula, f: &mut Formatter<'_>) -> fmt::Result;
}

/// `not A`, `A and B`, `A implies B`.
#[derive(Clone, Copy, Debug, Default)]
pub struct English;

/// `¬A`, `A ∧ B`, `A → B`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Symbolic;

impl Notation for Symbolic {
    fn fmt_formula(&self, formula: &Formula, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{formula}")
    }
}

impl Notation for English {
    fn fmt_formula(&self, formula: &Formula, f: &mut Formatter<'_>) -> fmt::Result {
        let Some((connective, left, right, negated)) = formula.as_binary() else {
            return match formula {
                Formula::Atom {
                    name,
                    negated: true,
                    ..
                } => write!(f, "not {name}"),
                _ => write!(f, "{formula}"),
            };
        };
        if negated {
            write!(f, "not (")?;
        }
        let word = match connective {
            Connective::And => "and",
            Connective::Or => "or",
            Connective::Implies if matches!(right, Formula::Implies { negated: false, .. }) => {
                "implies that"
            }
            Connective::Implies => "implies",
            Connective::Iff => "if and only if",
        };
        self.fmt_operand(left, f)?;
        write!(f, " {word} ")?;
        self.fmt_operand(right, f)?;
        if negated {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl English {
    /// Compound operands get parentheses; negated ones already carry `not (...)`.
    fn fmt_operand(&self, operand: &Formula, f: &mut Formatter<'_>) -> fmt::Result {
        if operand.as_binary().is_some() && !operand.is_negated() {
            write!(f, "(")?;
            self.fmt_formula(operand, f)?;
            write!(f, ")")
        } else {
            self.fmt_formula(operand, f)
        }
    }
}

/// Formats a single formula in the given notation.
pub struct Written<'a, N>(pub &'a Formula, pub &'a N);

impl<N: Notation> Display for Written<'_, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.1.fmt_formula(self.0, f)
    }
}

struct Rendered<'a, N>(&'a ProofTrace, &'a N);

impl<N: Notation> Display for Rendered<'_, N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Rendered(trace, notation) = self;
        for step in &trace.assumptions {
            writeln!(
                f,
                "Because this conclusion only matters if {} is true, then we can assume that it is, \
                 and place it in our hypotheses. This also means our new conclusion is {}",
                Written(&step.assumed, *notation),
                Written(&step.goal, *notation),
            )?;
        }
        for line in &trace.lines {
            writeln!(
                f,
                "{}. {}, {}",
                line.index,
                Written(&line.formula, *notation),
                line.citation
            )?;
        }
        Ok(())
    }
}

/// Renders every line of `trace`; a pure function of the line list.
pub(super) fn render<N: Notation>(trace: &ProofTrace, notation: &N) -> String {
    Rendered(trace, notation).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_formula;

    fn english(input: &str) -> String {
        Written(&parse_formula(input).unwrap(), &English).to_string()
    }

    #[test]
    fn english_words() {
        assert_eq!(english("A'"), "not A");
        assert_eq!(english("A ^ B"), "A and B");
        assert_eq!(english("(A v B)'"), "not (A or B)");
        assert_eq!(english("A > B"), "A implies B");
        assert_eq!(english("A > (B > C)"), "A implies that (B implies C)");
        assert_eq!(english("(A ^ B) > C'"), "(A and B) implies not C");
        assert_eq!(english("A <> (B v C)'"), "A if and only if not (B or C)");
    }
}
