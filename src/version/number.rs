//! Version numbers.
//!
//! Numbers can be declared loosely (`1`, `1.5`, `"2.1"`) and are padded to
//! three components before being checked for SemVer compliance, so `1`,
//! `1.0` and `"1.0.0"` all name the same version.

use crate::error::DefinitionError;
use nom::{
    bytes::complete::take_while1,
    character::complete::{char, digit1},
    combinator::{all_consuming, opt, recognize},
    multi::separated_list1,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use serde::Serialize;
use std::fmt;

/// A version number as the caller wrote it.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for VersionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionInput::Integer(n) => write!(f, "{n}"),
            VersionInput::Float(n) => write!(f, "{n}"),
            VersionInput::Text(s) => f.write_str(s),
        }
    }
}

impl From<i32> for VersionInput {
    fn from(n: i32) -> Self {
        VersionInput::Integer(n.into())
    }
}

impl From<u32> for VersionInput {
    fn from(n: u32) -> Self {
        VersionInput::Integer(n.into())
    }
}

impl From<i64> for VersionInput {
    fn from(n: i64) -> Self {
        VersionInput::Integer(n)
    }
}

impl From<f64> for VersionInput {
    fn from(n: f64) -> Self {
        VersionInput::Float(n)
    }
}

impl From<&str> for VersionInput {
    fn from(s: &str) -> Self {
        VersionInput::Text(s.to_string())
    }
}

impl From<String> for VersionInput {
    fn from(s: String) -> Self {
        VersionInput::Text(s)
    }
}

impl From<&String> for VersionInput {
    fn from(s: &String) -> Self {
        VersionInput::Text(s.clone())
    }
}

impl From<&VersionNumber> for VersionInput {
    fn from(v: &VersionNumber) -> Self {
        VersionInput::Text(v.0.clone())
    }
}

/// A normalized `MAJOR.MINOR.PATCH[-PRE][+BUILD]` version number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VersionNumber(String);

impl VersionNumber {
    /// Pads and validates a version number. Normalizing an already
    /// normalized number returns it unchanged.
    pub fn parse(input: impl Into<VersionInput>) -> Result<Self, DefinitionError> {
        let raw = input.into().to_string();
        let padded = pad(&raw);
        if all_consuming(semver)(&padded).is_err() {
            return Err(DefinitionError::InvalidVersion(raw));
        }
        Ok(Self(padded))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn pad(raw: &str) -> String {
    let mut parts: Vec<&str> = raw.split('.').collect();
    while parts.len() < 3 {
        parts.push("0");
    }
    parts.join(".")
}

fn identifiers(input: &str) -> IResult<&str, &str> {
    recognize(separated_list1(
        char('.'),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-'),
    ))(input)
}

fn core(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        terminated(digit1, char('.')),
        terminated(digit1, char('.')),
        digit1,
    )))(input)
}

fn semver(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        core,
        opt(preceded(char('-'), identifiers)),
        opt(preceded(char('+'), identifiers)),
    )))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_padded() {
        assert_eq!(VersionNumber::parse(1).unwrap().as_str(), "1.0.0");
        assert_eq!(VersionNumber::parse(1.5).unwrap().as_str(), "1.5.0");
        assert_eq!(VersionNumber::parse("2.1").unwrap().as_str(), "2.1.0");
        assert_eq!(VersionNumber::parse("1.6.0-pre").unwrap().as_str(), "1.6.0-pre");
        assert_eq!(
            VersionNumber::parse("1.6.0-rc.1+build.5").unwrap().as_str(),
            "1.6.0-rc.1+build.5"
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for input in ["1", "1.5", "2.0.1", "3.0.0-beta"] {
            let once = VersionNumber::parse(input).unwrap();
            let twice = VersionNumber::parse(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        for input in ["a", "1.x", "1.2.3.4", "1..2", "-1", "1.0.0-"] {
            let err = VersionNumber::parse(input).unwrap_err();
            assert_eq!(err, DefinitionError::InvalidVersion(input.to_string()));
        }
    }
}
