//! # Query
//!
//! A tiny filter language over model records:
//!
//! ```text
//! where cost > 500, title = 'cool product'
//! ```
//!
//! Clauses are separated by commas and ANDed together. Each clause is
//! `field op literal`, optionally prefixed with `where`. Operators are
//! `= == != > >= < <=`. Literals are quoted strings, numbers, `true`,
//! `false`, `null`, or bare words (compared as strings).

use crate::model::{Model, ModelError, Record};
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, space0, space1},
    combinator::{all_consuming, map, opt, value},
    multi::separated_list1,
    sequence::{delimited, terminated, tuple},
    IResult,
};
use serde_json::{Number, Value};
use std::cmp::Ordering;
use tracing::debug;

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum QueryError {
    #[error("Empty query")]
    Empty,

    /// Carries the unparsed remainder of the query.
    #[error("Invalid query near `{0}'")]
    Invalid(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub field: String,
    pub op: Operator,
    pub value: Value,
}

impl Clause {
    pub fn matches(&self, record: &Record) -> bool {
        let actual = record.get(&self.field).unwrap_or(&Value::Null);
        match self.op {
            Operator::Eq => loosely_equal(actual, &self.value),
            Operator::NotEq => !loosely_equal(actual, &self.value),
            Operator::Gt => compare(actual, &self.value) == Some(Ordering::Greater),
            Operator::Gte => matches!(
                compare(actual, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::Lt => compare(actual, &self.value) == Some(Ordering::Less),
            Operator::Lte => matches!(
                compare(actual, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}

fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    clauses: Vec<Clause>,
}

impl Query {
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(QueryError::Empty);
        }

        match all_consuming(clauses)(input) {
            Ok((_, clauses)) => {
                debug!(query = %input, clauses = clauses.len(), "Query parsed");
                Ok(Self { clauses })
            }
            Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
                Err(QueryError::Invalid(e.input.to_string()))
            }
            Err(nom::Err::Incomplete(_)) => Err(QueryError::Invalid(input.to_string())),
        }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }

    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }

    /// Fetches every record of `model` and keeps the matching ones.
    pub async fn run(&self, model: &dyn Model) -> Result<Vec<Record>, QueryError> {
        let records = model.all().await?;
        Ok(self.apply(records))
    }
}

fn clauses(input: &str) -> IResult<&str, Vec<Clause>> {
    separated_list1(delimited(space0, char(','), space0), clause)(input)
}

fn clause(input: &str) -> IResult<&str, Clause> {
    map(
        tuple((
            opt(terminated(tag_no_case("where"), space1)),
            field,
            delimited(space0, operator, space0),
            literal,
        )),
        |(_, field, op, value)| Clause {
            field: field.to_string(),
            op,
            value,
        },
    )(input)
}

fn field(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn operator(input: &str) -> IResult<&str, Operator> {
    alt((
        value(Operator::Gte, tag(">=")),
        value(Operator::Lte, tag("<=")),
        value(Operator::NotEq, tag("!=")),
        value(Operator::Eq, tag("==")),
        value(Operator::Eq, tag("=")),
        value(Operator::Gt, tag(">")),
        value(Operator::Lt, tag("<")),
    ))(input)
}

fn literal(input: &str) -> IResult<&str, Value> {
    alt((quoted('\''), quoted('"'), map(bare_word, classify)))(input)
}

fn quoted(quote: char) -> impl FnMut(&str) -> IResult<&str, Value> {
    move |input| {
        map(
            delimited(char(quote), take_while(move |c: char| c != quote), char(quote)),
            |s: &str| Value::String(s.to_string()),
        )(input)
    }
}

fn bare_word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != ',')(input)
}

fn classify(word: &str) -> Value {
    match word {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => word
            .parse::<Number>()
            .map(Value::Number)
            .unwrap_or_else(|_| Value::String(word.to_string())),
    }
}
