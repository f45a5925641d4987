//! `-k` / `-m` selection expressions
//!
//! Both options take a boolean expression over bare words:
//!
//! ```text
//! expr   := or
//! or     := and ("or" and)*
//! and    := not ("and" not)*
//! not    := "not" not | atom
//! atom   := "(" expr ")" | word
//! ```
//!
//! For `-k` a word matches when it is a case-insensitive substring of the
//! node id or equals one of the case's markers. For `-m` a word matches
//! when it names one of the case's markers.

use crate::case::TestCase;
use crate::error::{E2eError, E2eResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Word(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn parse(input: &str) -> E2eResult<Self> {
        let tokens = tokenize(input);
        if tokens.is_empty() {
            return Err(E2eError::InvalidExpression(format!(
                "empty expression '{}'",
                input
            )));
        }

        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            input,
        };
        let expr = parser.or()?;
        if let Some(token) = parser.peek() {
            return Err(parser.error(&format!("unexpected '{}'", token.text())));
        }
        Ok(expr)
    }

    /// Evaluate with `word` deciding each bare word
    pub fn eval<F>(&self, word: &F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        match self {
            Expr::Word(w) => word(w),
            Expr::Not(inner) => !inner.eval(word),
            Expr::And(a, b) => a.eval(word) && b.eval(word),
            Expr::Or(a, b) => a.eval(word) || b.eval(word),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    And,
    Or,
    Not,
    Word(String),
}

impl Token {
    fn text(&self) -> &str {
        match self {
            Token::LParen => "(",
            Token::RParen => ")",
            Token::And => "and",
            Token::Or => "or",
            Token::Not => "not",
            Token::Word(w) => w,
        }
    }
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    let flush = |word: &mut String, tokens: &mut Vec<Token>| {
        if word.is_empty() {
            return;
        }
        let token = match word.as_str() {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            _ => Token::Word(word.clone()),
        };
        tokens.push(token);
        word.clear();
    };

    for c in input.chars() {
        match c {
            '(' | ')' => {
                flush(&mut word, &mut tokens);
                tokens.push(if c == '(' { Token::LParen } else { Token::RParen });
            }
            c if c.is_whitespace() => flush(&mut word, &mut tokens),
            c => word.push(c),
        }
    }
    flush(&mut word, &mut tokens);
    tokens
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    input: &'a str,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn error(&self, what: &str) -> E2eError {
        E2eError::InvalidExpression(format!("{} in '{}'", what, self.input))
    }

    fn or(&mut self) -> E2eResult<Expr> {
        let mut left = self.and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let right = self.and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and(&mut self) -> E2eResult<Expr> {
        let mut left = self.not()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let right = self.not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn not(&mut self) -> E2eResult<Expr> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            return Ok(Expr::Not(Box::new(self.not()?)));
        }
        self.atom()
    }

    fn atom(&mut self) -> E2eResult<Expr> {
        match self.next() {
            Some(Token::LParen) => {
                let expr = self.or()?;
                match self.next() {
                    Some(Token::RParen) => Ok(expr),
                    _ => Err(self.error("missing ')'")),
                }
            }
            Some(Token::Word(w)) => Ok(Expr::Word(w.clone())),
            Some(token) => Err(self.error(&format!("unexpected '{}'", token.text()))),
            None => Err(self.error("unexpected end of expression")),
        }
    }
}

/// Compiled `-k` and `-m` filters
#[derive(Debug, Clone, Default)]
pub struct Selection {
    keyword: Option<Expr>,
    marker: Option<Expr>,
}

impl Selection {
    pub fn new(keyword: Option<&str>, marker: Option<&str>) -> E2eResult<Self> {
        Ok(Self {
            keyword: keyword.map(Expr::parse).transpose()?,
            marker: marker.map(Expr::parse).transpose()?,
        })
    }

    /// Select everything
    pub fn all() -> Self {
        Self::default()
    }

    pub fn selects(&self, case: &TestCase) -> bool {
        let node_id = case.node_id().to_lowercase();
        let markers = case.all_markers();

        let keyword_ok = self.keyword.as_ref().map_or(true, |expr| {
            expr.eval(&|word: &str| {
                let word = word.to_lowercase();
                node_id.contains(&word) || markers.iter().any(|m| m.to_lowercase() == word)
            })
        });

        let marker_ok = self.marker.as_ref().map_or(true, |expr| {
            expr.eval(&|word: &str| markers.iter().any(|m| m == word))
        });

        keyword_ok && marker_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{CaseFuture, TestContext};
    use test_case::test_case;

    fn noop(_ctx: &mut TestContext) -> CaseFuture<'_> {
        Box::pin(async { Ok(()) })
    }

    fn bvt_001() -> TestCase {
        TestCase::new("boundary", "test_empty_email", noop).markers(&["boundary", "email"])
    }

    fn st_001() -> TestCase {
        TestCase::new("security", "test_sql_injection_basic", noop)
            .markers(&["security", "sql_injection"])
    }

    #[test]
    fn test_parse_precedence() {
        let expr = Expr::parse("a or b and not c").unwrap();
        assert_eq!(
            expr,
            Expr::Or(
                Box::new(Expr::Word("a".into())),
                Box::new(Expr::And(
                    Box::new(Expr::Word("b".into())),
                    Box::new(Expr::Not(Box::new(Expr::Word("c".into()))))
                ))
            )
        );
    }

    #[test]
    fn test_parse_parentheses() {
        let expr = Expr::parse("(a or b) and c").unwrap();
        assert!(matches!(expr, Expr::And(_, _)));
    }

    #[test_case(""; "empty")]
    #[test_case("a and"; "dangling and")]
    #[test_case("(a or b"; "unclosed paren")]
    #[test_case("a b"; "two words")]
    #[test_case(")"; "stray paren")]
    fn test_parse_errors(input: &str) {
        assert!(matches!(
            Expr::parse(input),
            Err(E2eError::InvalidExpression(_))
        ));
    }

    #[test_case(Some("email"), None, true, false; "keyword substring")]
    #[test_case(Some("EMPTY"), None, true, false; "keyword case insensitive")]
    #[test_case(Some("sql_injection"), None, false, true; "keyword matches marker")]
    #[test_case(Some("not email"), None, false, true; "keyword negation")]
    #[test_case(None, Some("boundary"), true, false; "marker")]
    #[test_case(None, Some("security and not xss"), false, true; "marker expression")]
    #[test_case(None, Some("sql"), false, false; "marker needs exact name")]
    #[test_case(Some("test"), Some("email or sql_injection"), true, true; "both filters")]
    fn test_selection(k: Option<&str>, m: Option<&str>, bvt: bool, st: bool) {
        let selection = Selection::new(k, m).unwrap();
        assert_eq!(selection.selects(&bvt_001()), bvt);
        assert_eq!(selection.selects(&st_001()), st);
    }

    #[test]
    fn test_select_all() {
        assert!(Selection::all().selects(&bvt_001()));
    }
}
