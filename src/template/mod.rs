//! URI Templates
//!
//! RFC 6570 templates, parsed once at declaration time and expanded against
//! named variables whenever a page URL is needed.
//!
//! Supported syntax:
//! - Literal text, emitted verbatim.
//! - `{var}` simple expansion, `{+var}` reserved, `{#var}` fragment.
//! - `{.var}` labels, `{/var}` path segments, `{;var}` path parameters.
//! - `{?var}` query and `{&var}` query continuation.
//! - Several comma-separated variables per expression, each with an
//!   optional `*` (explode) or `:n` (prefix) modifier.
//!
//! A variable that is not bound expands to nothing, including the operator
//! prefix, so `/users{/username}` is `/users` when `username` is absent.

mod expand;
pub mod value;

pub use value::{Bindings, BindingsError, Value};

use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Longest prefix modifier RFC 6570 allows.
const MAX_PREFIX: usize = 9999;

/// Template syntax errors. Offsets are byte positions in the source string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Unclosed expression starting at offset {position}")]
    UnclosedExpression { position: usize },

    #[error("Unmatched '}}' at offset {position}")]
    UnmatchedClose { position: usize },

    #[error("Unexpected '{{' inside expression at offset {position}")]
    UnexpectedOpen { position: usize },

    #[error("Empty variable name at offset {position}")]
    EmptyVariableName { position: usize },

    #[error("Invalid variable name {name:?} at offset {position}")]
    InvalidVariableName { name: String, position: usize },

    #[error("Unknown operator '{operator}' at offset {position}")]
    UnknownOperator { operator: char, position: usize },

    #[error("Invalid prefix length for {name:?} at offset {position}")]
    InvalidPrefix { name: String, position: usize },
}

/// Expression operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Simple,
    Reserved,
    Fragment,
    Label,
    Path,
    PathParam,
    Query,
    QueryContinuation,
}

impl Operator {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Reserved),
            '#' => Some(Operator::Fragment),
            '.' => Some(Operator::Label),
            '/' => Some(Operator::Path),
            ';' => Some(Operator::PathParam),
            '?' => Some(Operator::Query),
            '&' => Some(Operator::QueryContinuation),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Operator::Simple => None,
            Operator::Reserved => Some('+'),
            Operator::Fragment => Some('#'),
            Operator::Label => Some('.'),
            Operator::Path => Some('/'),
            Operator::PathParam => Some(';'),
            Operator::Query => Some('?'),
            Operator::QueryContinuation => Some('&'),
        }
    }

    /// Emitted before the first defined variable of an expression.
    fn first(&self) -> &'static str {
        match self {
            Operator::Simple | Operator::Reserved => "",
            Operator::Fragment => "#",
            Operator::Label => ".",
            Operator::Path => "/",
            Operator::PathParam => ";",
            Operator::Query => "?",
            Operator::QueryContinuation => "&",
        }
    }

    fn separator(&self) -> &'static str {
        match self {
            Operator::Simple | Operator::Reserved | Operator::Fragment => ",",
            Operator::Label => ".",
            Operator::Path => "/",
            Operator::PathParam => ";",
            Operator::Query | Operator::QueryContinuation => "&",
        }
    }

    /// Named operators emit `name=value` pairs.
    fn named(&self) -> bool {
        matches!(
            self,
            Operator::PathParam | Operator::Query | Operator::QueryContinuation
        )
    }

    /// Emitted after the name when a named variable has an empty value.
    fn if_empty(&self) -> &'static str {
        match self {
            Operator::Query | Operator::QueryContinuation => "=",
            _ => "",
        }
    }

    fn allows_reserved(&self) -> bool {
        matches!(self, Operator::Reserved | Operator::Fragment)
    }

    fn is_query(&self) -> bool {
        matches!(self, Operator::Query | Operator::QueryContinuation)
    }
}

/// Per-variable modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    None,
    /// `:n`, keep at most `n` characters of a scalar value.
    Prefix(usize),
    /// `*`, one token per list element or associative pair.
    Explode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSpec {
    pub name: String,
    pub modifier: Modifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub operator: Operator,
    pub variables: Vec<VarSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Expression(Expression),
}

/// A parsed URI template. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template string.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices();

        while let Some((position, c)) = chars.next() {
            match c {
                '{' => {
                    let body_start = position + 1;
                    let mut body_end = None;
                    for (i, inner) in chars.by_ref() {
                        match inner {
                            '}' => {
                                body_end = Some(i);
                                break;
                            }
                            '{' => return Err(TemplateError::UnexpectedOpen { position: i }),
                            _ => {}
                        }
                    }
                    let body_end =
                        body_end.ok_or(TemplateError::UnclosedExpression { position })?;

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    let expression = parse_expression(&source[body_start..body_end], body_start)?;
                    segments.push(Segment::Expression(expression));
                }
                '}' => return Err(TemplateError::UnmatchedClose { position }),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        debug!(template = source, segments = segments.len(), "Parsed URI template");
        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The original template string.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Distinct variable names, in order of first appearance.
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Expression(expression) = segment {
                for var in &expression.variables {
                    if !names.contains(&var.name.as_str()) {
                        names.push(&var.name);
                    }
                }
            }
        }
        names
    }

    /// Whether the template contains no expressions at all.
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::parse(s)
    }
}

/// Parse the text between `{` and `}`. `offset` is the byte position of the
/// first body character in the full template.
fn parse_expression(body: &str, offset: usize) -> Result<Expression, TemplateError> {
    let first = body
        .chars()
        .next()
        .ok_or(TemplateError::EmptyVariableName { position: offset })?;

    let (operator, list_start) = match Operator::from_char(first) {
        Some(operator) => (operator, first.len_utf8()),
        None if is_varchar_start(first) => (Operator::Simple, 0),
        None => {
            return Err(TemplateError::UnknownOperator {
                operator: first,
                position: offset,
            })
        }
    };

    let mut variables = Vec::new();
    let mut position = offset + list_start;
    for spec in body[list_start..].split(',') {
        variables.push(parse_varspec(spec, position)?);
        position += spec.len() + 1;
    }

    Ok(Expression {
        operator,
        variables,
    })
}

fn parse_varspec(spec: &str, position: usize) -> Result<VarSpec, TemplateError> {
    let (name, modifier) = if let Some(name) = spec.strip_suffix('*') {
        (name, Modifier::Explode)
    } else if let Some((name, digits)) = spec.split_once(':') {
        let length = digits
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=MAX_PREFIX).contains(n) && !digits.starts_with('+'))
            .ok_or_else(|| TemplateError::InvalidPrefix {
                name: name.to_string(),
                position,
            })?;
        (name, Modifier::Prefix(length))
    } else {
        (spec, Modifier::None)
    };

    if name.is_empty() {
        return Err(TemplateError::EmptyVariableName { position });
    }
    if !is_valid_varname(name) {
        return Err(TemplateError::InvalidVariableName {
            name: name.to_string(),
            position,
        });
    }

    Ok(VarSpec {
        name: name.to_string(),
        modifier,
    })
}

fn is_varchar_start(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '%'
}

/// `varname = varchar *( ["."] varchar )`, where varchar includes
/// percent-encoded triplets.
fn is_valid_varname(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.first() == Some(&b'.') || bytes.last() == Some(&b'.') {
        return false;
    }

    let mut i = 0;
    let mut previous_dot = false;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let valid = bytes.len() > i + 2
                    && bytes[i + 1].is_ascii_hexdigit()
                    && bytes[i + 2].is_ascii_hexdigit();
                if !valid {
                    return false;
                }
                i += 3;
                previous_dot = false;
                continue;
            }
            b'.' => {
                if previous_dot {
                    return false;
                }
                previous_dot = true;
            }
            b if b.is_ascii_alphanumeric() || b == b'_' => previous_dot = false,
            _ => return false,
        }
        i += 1;
    }
    true
}
