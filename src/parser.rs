//! Hand-written lexer and recursive-descent parser for the rule-file
//! grammar (see the crate's module-level docs for the EBNF).
//!
//! A small lexer/parser pair is shorter and easier to reason about than a
//! parser-combinator dependency for a grammar this size, so this module has
//! no crate dependencies beyond `std`.

use crate::error::ArgueError;
use crate::term::{DefeasibleRule, Literal, OrderingRule, Rule, StrictRule};

/// The result of parsing one non-blank, non-comment line of rule-file text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedItem {
    Rule(Rule),
    Ordering(OrderingRule),
    /// A bare literal with no arrow — legal per the grammar, but not
    /// insertable into a knowledge base as a rule.
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Minus,
    Comma,
    Colon,
    Arrow,    // -->
    FatArrow, // =>
    Eq,       // bare =
    LParen,
    RParen,
    Lt,
    Gt,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_cont(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn lex(line: &str) -> Result<Vec<Token>, ArgueError> {
    let content = line.split('#').next().unwrap_or("");
    let chars: Vec<char> = content.chars().collect();
    let mut i = 0;
    let mut tokens = Vec::new();

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if is_ident_start(c) {
            let start = i;
            while i < chars.len() && is_ident_cont(chars[i]) {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
            continue;
        }
        match c {
            '-' => {
                if chars.get(i + 1) == Some(&'-') && chars.get(i + 2) == Some(&'>') {
                    tokens.push(Token::Arrow);
                    i += 3;
                } else {
                    tokens.push(Token::Minus);
                    i += 1;
                }
            }
            '=' => {
                if chars.get(i + 1) == Some(&'>') {
                    tokens.push(Token::FatArrow);
                    i += 2;
                } else {
                    tokens.push(Token::Eq);
                    i += 1;
                }
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            ':' => {
                tokens.push(Token::Colon);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '<' => {
                tokens.push(Token::Lt);
                i += 1;
            }
            '>' => {
                tokens.push(Token::Gt);
                i += 1;
            }
            other => {
                return Err(ArgueError::ParseError {
                    message: format!("unexpected character '{other}'"),
                    line: None,
                });
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expect_ident(&mut self) -> Result<String, ArgueError> {
        match self.next() {
            Some(Token::Ident(s)) => Ok(s.clone()),
            other => Err(ArgueError::ParseError {
                message: format!("expected identifier, found {other:?}"),
                line: None,
            }),
        }
    }

    fn parse_literal(&mut self) -> Result<Literal, ArgueError> {
        let negated = if matches!(self.peek(), Some(Token::Minus)) {
            self.next();
            true
        } else {
            false
        };
        let name = self.expect_ident()?;
        Ok(Literal::new(name, negated))
    }

    fn parse_lits(&mut self) -> Result<Vec<Literal>, ArgueError> {
        let mut out = vec![self.parse_literal()?];
        while matches!(self.peek(), Some(Token::Comma)) {
            self.next();
            out.push(self.parse_literal()?);
        }
        Ok(out)
    }

    fn parse_names(&mut self) -> Result<Vec<String>, ArgueError> {
        let mut out = vec![self.expect_ident()?];
        while matches!(self.peek(), Some(Token::Comma)) {
            self.next();
            out.push(self.expect_ident()?);
        }
        Ok(out)
    }

    fn is_ordering(&self) -> bool {
        self.tokens.iter().any(|t| matches!(t, Token::Lt | Token::Gt))
            && !self.tokens.iter().any(|t| matches!(t, Token::Arrow | Token::FatArrow))
    }
}

/// Parse one logical line of rule-file text into a [`ParsedItem`].
///
/// `line_no` is attached to any [`ArgueError::ParseError`] produced, so
/// batch loading (see `kb::KnowledgeBase::load_file`) can report the
/// offending line.
pub fn parse_line(text: &str, line_no: Option<usize>) -> Result<ParsedItem, ArgueError> {
    let tokens = lex(text).map_err(|e| with_line(e, line_no))?;
    if tokens.is_empty() {
        return Err(ArgueError::ParseError {
            message: "empty line".into(),
            line: line_no,
        });
    }

    let mut p = Parser::new(&tokens);

    if p.is_ordering() {
        return parse_ordering(&mut p).map_err(|e| with_line(e, line_no));
    }

    // Optional `name:` prefix — a single Ident immediately followed by a
    // Colon, which is otherwise not legal at the start of a lits list.
    let name = if let (Some(Token::Ident(n)), Some(Token::Colon)) =
        (p.tokens.get(p.pos), p.tokens.get(p.pos + 1))
    {
        let n = n.clone();
        p.pos += 2;
        Some(n)
    } else {
        None
    };

    parse_rule_or_literal(&mut p, name).map_err(|e| with_line(e, line_no))
}

fn with_line(err: ArgueError, line_no: Option<usize>) -> ArgueError {
    match err {
        ArgueError::ParseError { message, line } => ArgueError::ParseError {
            message,
            line: line.or(line_no),
        },
        other => other,
    }
}

fn parse_ordering(p: &mut Parser) -> Result<ParsedItem, ArgueError> {
    let mut groups = vec![p.parse_names()?];
    let mut saw_gt = false;
    let mut saw_lt = false;
    loop {
        match p.peek() {
            Some(Token::Lt) => {
                saw_lt = true;
                p.next();
                groups.push(p.parse_names()?);
            }
            Some(Token::Gt) => {
                saw_gt = true;
                p.next();
                groups.push(p.parse_names()?);
            }
            None => break,
            other => {
                return Err(ArgueError::ParseError {
                    message: format!("expected '<' or '>' in ordering, found {other:?}"),
                    line: None,
                });
            }
        }
    }
    if saw_gt && saw_lt {
        return Err(ArgueError::ParseError {
            message: "ordering cannot mix '<' and '>'".into(),
            line: None,
        });
    }
    // `>` is semantically reversed `<`: A > B means A is more preferred,
    // i.e. the group order (least to most preferred) must be reversed.
    if saw_gt {
        groups.reverse();
    }
    Ok(ParsedItem::Ordering(OrderingRule { groups }))
}

fn parse_rule_or_literal(p: &mut Parser, name: Option<String>) -> Result<ParsedItem, ArgueError> {
    // Try to parse a lits list; if there is none (next token is directly an
    // arrow/eq, or we're at a lone literal with nothing following), fall
    // back accordingly.
    let save = p.pos;
    let lits = match p.peek() {
        Some(Token::Arrow) | Some(Token::Eq) | Some(Token::FatArrow) => Vec::new(),
        _ => match p.parse_lits() {
            Ok(lits) => lits,
            Err(_) => {
                p.pos = save;
                Vec::new()
            }
        },
    };

    match p.peek() {
        Some(Token::Arrow) => {
            p.next();
            let consequent = p.parse_literal()?;
            ensure_exhausted(p)?;
            Ok(ParsedItem::Rule(Rule::Strict(StrictRule::new(
                name, lits, consequent,
            ))))
        }
        Some(Token::Eq) => {
            p.next();
            let vulnerabilities = if matches!(p.peek(), Some(Token::LParen)) {
                p.next();
                let v = if matches!(p.peek(), Some(Token::RParen)) {
                    Vec::new()
                } else {
                    p.parse_lits()?
                };
                match p.next() {
                    Some(Token::RParen) => {}
                    other => {
                        return Err(ArgueError::ParseError {
                            message: format!("expected ')', found {other:?}"),
                            line: None,
                        });
                    }
                }
                v
            } else {
                Vec::new()
            };
            match p.next() {
                Some(Token::FatArrow) => {}
                other => {
                    return Err(ArgueError::ParseError {
                        message: format!("expected '=>', found {other:?}"),
                        line: None,
                    });
                }
            }
            let consequent = p.parse_literal()?;
            ensure_exhausted(p)?;
            Ok(ParsedItem::Rule(Rule::Defeasible(DefeasibleRule::new(
                name,
                lits,
                consequent,
                vulnerabilities,
            ))))
        }
        None if lits.len() == 1 && name.is_none() => {
            Ok(ParsedItem::Literal(lits.into_iter().next().unwrap()))
        }
        other => Err(ArgueError::ParseError {
            message: format!("expected '-->', '=', or end of line, found {other:?}"),
            line: None,
        }),
    }
}

fn ensure_exhausted(p: &Parser) -> Result<(), ArgueError> {
    if p.pos == p.tokens.len() {
        Ok(())
    } else {
        Err(ArgueError::ParseError {
            message: "trailing tokens after rule".into(),
            line: None,
        })
    }
}

/// Parse a standalone rule-or-ordering expression (no line-number context).
/// Convenience wrapper around [`parse_line`] for programmatic callers (not
/// driven by the batch file loader).
pub fn parse(text: &str) -> Result<ParsedItem, ArgueError> {
    parse_line(text, None)
}
