//! Parse connective strings such as `(A^B)>C'` into formulas.
//!
//! Postfix `'` is NOT, `^` is AND, `v` is OR, `>` is IMPLIES and `<>` is IFF.
//! Precedence from tightest: NOT, AND, OR, IMPLIES, IFF; the last two are
//! right associative. Atoms are single letters and whitespace is ignored.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use thiserror::Error;

use super::Formula;

/// Parses a single formula, such as a conclusion.
pub fn parse_formula(input: &str) -> Result<Formula, ParseError> {
    let ctx = Context::new(None, input);
    let (formula, rest) = iff(&ctx, true)?;
    rest.expect_end()?;
    Ok(formula)
}

/// Parses a hypothesis list.
///
/// Hypotheses are separated by top-level `^` (or `,`), so `A ^ A>B` is the
/// two hypotheses `A` and `A>B`. Parenthesize to state a conjunction as a
/// single hypothesis. Blank input is an empty list.
pub fn parse_hypotheses(input: &str) -> Result<Vec<Formula>, ParseError> {
    let ctx = Context::new(None, input);
    if ctx.is_at_end() {
        return Ok(vec![]);
    }
    let mut out = vec![];
    let mut ctx = ctx;
    loop {
        let (formula, next) = iff(&ctx, false)?;
        out.push(formula);
        match next.peek()? {
            None => return Ok(out),
            Some((Token::And | Token::Comma, _, after)) => ctx = after,
            Some((_, span, _)) => return Err(ParseError::TrailingInput(span)),
        }
    }
}

/// A [`Span`] contains the source text and a pair of byte offsets representing the start and the end.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Span(Arc<SrcFile>, usize, usize);

impl Span {
    pub fn string(&self) -> &str {
        &self.0.contents[self.1..self.2]
    }

    /// One-based column, counted in characters.
    pub fn column(&self) -> usize {
        self.0.contents[..self.1].chars().count() + 1
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let col = self.column();
        let quote = self.string();
        match (&self.0.name, quote.is_empty()) {
            (Some(name), false) => write!(f, "In column {col} of {name}: {quote}"),
            (Some(name), true) => write!(f, "At the end of {name}"),
            (None, false) => write!(f, "In column {col}: {quote}"),
            (None, true) => write!(f, "At the end of the input"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct SrcFile {
    name: Option<String>,
    contents: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token {
    Atom(char),
    /// Prefix `¬`.
    Not,
    /// Postfix `'`.
    Prime,
    And,
    Or,
    Implies,
    Iff,
    Open,
    Close,
    Comma,
}

/// Spellings accepted for each token, longest first so `<->` wins over `<>`.
const SPELLINGS: &[(&str, Token)] = &[
    ("<->", Token::Iff),
    ("<>", Token::Iff),
    ("->", Token::Implies),
    (">", Token::Implies),
    ("→", Token::Implies),
    ("↔", Token::Iff),
    ("^", Token::And),
    ("∧", Token::And),
    ("`", Token::And),
    ("v", Token::Or),
    ("V", Token::Or),
    ("∨", Token::Or),
    ("'", Token::Prime),
    ("′", Token::Prime),
    ("¬", Token::Not),
    ("(", Token::Open),
    ("[", Token::Open),
    (")", Token::Close),
    ("]", Token::Close),
    (",", Token::Comma),
];

#[derive(Clone, Debug)]
struct Context {
    source: Arc<SrcFile>,
    index: usize,
}

impl Context {
    fn new(name: Option<String>, contents: &str) -> Context {
        let mut next = Context {
            source: Arc::new(SrcFile {
                name,
                contents: contents.to_string(),
            }),
            index: 0,
        };
        next.advance_whitespace();
        next
    }

    fn rest(&self) -> &str {
        &self.source.contents[self.index..]
    }

    fn advance_whitespace(&mut self) {
        let rest = self.rest();
        self.index += rest.len() - rest.trim_start().len();
    }

    fn is_at_end(&self) -> bool {
        self.index == self.source.contents.len()
    }

    fn span(&self, start: usize, end: usize) -> Span {
        Span(self.source.clone(), start, end)
    }

    /// The next token, its span, and the context just past it.
    fn peek(&self) -> Result<Option<(Token, Span, Context)>, ParseError> {
        let rest = self.rest();
        let Some(c) = rest.chars().next() else {
            return Ok(None);
        };
        let (token, len) = match SPELLINGS.iter().find(|(text, _)| rest.starts_with(text)) {
            Some((text, token)) => (*token, text.len()),
            None if c.is_ascii_alphabetic() => (Token::Atom(c), c.len_utf8()),
            None => {
                let span = self.span(self.index, self.index + c.len_utf8());
                return Err(ParseError::UnexpectedChar(span, c));
            }
        };
        let span = self.span(self.index, self.index + len);
        let mut next = self.clone();
        next.index += len;
        next.advance_whitespace();
        Ok(Some((token, span, next)))
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        match self.peek()? {
            None => Ok(()),
            Some((_, span, _)) => Err(ParseError::TrailingInput(span)),
        }
    }

    fn end_span(&self) -> Span {
        self.span(self.index, self.index)
    }
}

type Res<T> = Result<(T, Context), ParseError>;

/// `conjunctions` is false only at the top level of a hypothesis list, where
/// `^` separates hypotheses instead of joining them.
fn iff(ctx: &Context, conjunctions: bool) -> Res<Formula> {
    let (left, next) = implies(ctx, conjunctions)?;
    match next.peek()? {
        Some((Token::Iff, _, after)) => {
            let (right, next) = iff(&after, conjunctions)?;
            Ok((Formula::iff(left, right), next))
        }
        _ => Ok((left, next)),
    }
}

fn implies(ctx: &Context, conjunctions: bool) -> Res<Formula> {
    let (left, next) = or(ctx, conjunctions)?;
    match next.peek()? {
        Some((Token::Implies, _, after)) => {
            let (right, next) = implies(&after, conjunctions)?;
            Ok((Formula::implies(left, right), next))
        }
        _ => Ok((left, next)),
    }
}

fn or(ctx: &Context, conjunctions: bool) -> Res<Formula> {
    let (mut acc, mut next) = and(ctx, conjunctions)?;
    while let Some((Token::Or, _, after)) = next.peek()? {
        let (right, rest) = and(&after, conjunctions)?;
        acc = Formula::or(acc, right);
        next = rest;
    }
    Ok((acc, next))
}

fn and(ctx: &Context, conjunctions: bool) -> Res<Formula> {
    let (mut acc, mut next) = postfix(ctx)?;
    if !conjunctions {
        return Ok((acc, next));
    }
    while let Some((Token::And, _, after)) = next.peek()? {
        let (right, rest) = postfix(&after)?;
        acc = Formula::and(acc, right);
        next = rest;
    }
    Ok((acc, next))
}

fn postfix(ctx: &Context) -> Res<Formula> {
    let (mut acc, mut next) = prefix(ctx)?;
    while let Some((Token::Prime, _, after)) = next.peek()? {
        acc = acc.not();
        next = after;
    }
    Ok((acc, next))
}

fn prefix(ctx: &Context) -> Res<Formula> {
    match ctx.peek()? {
        Some((Token::Not, _, after)) => {
            let (inner, next) = prefix(&after)?;
            Ok((inner.not(), next))
        }
        _ => primary(ctx),
    }
}

fn primary(ctx: &Context) -> Res<Formula> {
    match ctx.peek()? {
        Some((Token::Atom(c), _, next)) => {
            let mut buf = [0u8; 4];
            Ok((Formula::atom(&*c.encode_utf8(&mut buf)), next))
        }
        Some((Token::Open, open, after)) => {
            let (inner, next) = iff(&after, true)?;
            match next.peek()? {
                Some((Token::Close, _, rest)) => Ok((inner, rest)),
                Some((_, span, _)) => Err(ParseError::MissingClose(open, span.string().to_string())),
                None => Err(ParseError::MissingClose(open, "end of input".to_string())),
            }
        }
        Some((_, span, _)) => Err(ParseError::ExpectedFormula(span)),
        None => Err(ParseError::ExpectedFormula(ctx.end_span())),
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}\nexpected a letter, a negation or a parenthesized formula")]
    ExpectedFormula(Span),
    #[error("{0}\nunexpected character {1:?}")]
    UnexpectedChar(Span, char),
    #[error("{0}\nthis parenthesis is never closed, found {1}")]
    MissingClose(Span, String),
    #[error("{0}\nunexpected input after a complete formula")]
    TrailingInput(Span),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str) -> Formula {
        Formula::atom(name)
    }

    #[test]
    fn precedence() {
        let f = parse_formula("A ^ B v C > D").unwrap();
        let expected = Formula::implies(
            Formula::or(Formula::and(atom("A"), atom("B")), atom("C")),
            atom("D"),
        );
        assert_eq!(f, expected);

        let f = parse_formula("A > B > C").unwrap();
        assert_eq!(
            f,
            Formula::implies(atom("A"), Formula::implies(atom("B"), atom("C")))
        );

        let f = parse_formula("A <> B > C").unwrap();
        assert_eq!(
            f,
            Formula::iff(atom("A"), Formula::implies(atom("B"), atom("C")))
        );
    }

    #[test]
    fn negation() {
        assert_eq!(parse_formula("A'").unwrap(), atom("A").not());
        assert_eq!(parse_formula("A''").unwrap(), atom("A"));
        assert_eq!(
            parse_formula("(A v B)'").unwrap(),
            Formula::or(atom("A"), atom("B")).not()
        );
        assert_eq!(
            parse_formula("¬(A ∧ B)").unwrap(),
            Formula::and(atom("A"), atom("B")).not()
        );
        assert_eq!(
            parse_formula("A' ^ B").unwrap(),
            Formula::and(atom("A").not(), atom("B"))
        );
    }

    #[test]
    fn aliases() {
        let expected = Formula::implies(Formula::and(atom("A"), atom("B")), atom("C"));
        for input in ["(A^B)>C", "[A ∧ B] → C", "(A`B)->C", " ( A ^ B ) > C "] {
            assert_eq!(parse_formula(input).unwrap(), expected, "{input}");
        }
        assert_eq!(
            parse_formula("A <-> B′").unwrap(),
            Formula::iff(atom("A"), atom("B").not())
        );
        assert_eq!(
            parse_formula("A V B").unwrap(),
            Formula::or(atom("A"), atom("B"))
        );
    }

    #[test]
    fn hypothesis_lists() {
        let hyps = parse_hypotheses("A ^ A>B").unwrap();
        assert_eq!(hyps, vec![atom("A"), Formula::implies(atom("A"), atom("B"))]);

        let hyps = parse_hypotheses("(A^B), C>D^E").unwrap();
        assert_eq!(
            hyps,
            vec![
                Formula::and(atom("A"), atom("B")),
                Formula::implies(atom("C"), atom("D")),
                atom("E"),
            ]
        );

        assert!(parse_hypotheses("   ").unwrap().is_empty());
    }

    #[test]
    fn errors() {
        let err = parse_formula("(A ^ B").unwrap_err();
        assert!(matches!(err, ParseError::MissingClose(..)), "{err}");

        let err = parse_formula("A ^ 3").unwrap_err();
        let ParseError::UnexpectedChar(span, c) = err else {
            panic!("wrong error");
        };
        assert_eq!(c, '3');
        assert_eq!(span.column(), 5);

        assert!(matches!(
            parse_formula("A B").unwrap_err(),
            ParseError::TrailingInput(_)
        ));
        assert!(matches!(
            parse_formula("").unwrap_err(),
            ParseError::ExpectedFormula(_)
        ));
        assert!(matches!(
            parse_hypotheses("A ^").unwrap_err(),
            ParseError::ExpectedFormula(_)
        ));
    }
}
