//! # Polynomial term parser
//!
//! Turns a free-form polynomial string like `"3x^3 - 4x + 1/2"` into a list of
//! (coefficient, exponent) terms and then into a dense coefficient vector.
//!
//! Terms are extracted left to right by a single regular expression with two
//! alternatives tried in order at every match position:
//! 1. **x-term**: optional sign, optional number or fraction, literal `x`,
//!    optional `^` followed by an integer exponent
//! 2. **constant**: optional sign, integer or decimal number, optionally a fraction
//!
//! Characters that belong to neither alternative (`*`, brackets, letters other than `x`)
//! are skipped silently.
//!
//! ## Merging repeated exponents
//! When two terms share an exponent the later one overwrites the earlier one
//! (`"x^2+3x^2"` is `3x^2`). This policy is isolated in [`merge_terms`] and can be
//! switched to summation with [`TermMerge::Accumulate`].
//!
//! # Example
//! ```
//! use RustedPolyScope::symbolic::parse_poly::{parse_terms, merge_terms, dense_coefficients, TermMerge};
//! let terms = parse_terms("3x^3-4x^1+2").unwrap();
//! let merged = merge_terms(&terms, TermMerge::Overwrite);
//! assert_eq!(dense_coefficients(&merged), vec![2.0, -4.0, 0.0, 3.0]);
//! ```
use log::{debug, info};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use strum_macros::{Display, EnumIter, EnumString};

/// largest exponent the dense storage accepts
pub const MAX_EXPONENT: i32 = 10_000;

static TERM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<coef>[-+]?\s*[0-9]*\.?[0-9]*(?:/[0-9]+(?:\.[0-9]+)?)*)?x(?:\^(?P<exp>[-+]?[0-9]+))?|(?P<constant>[-+]?\s*[0-9]+(?:\.[0-9]+)?(?:/[0-9]+(?:\.[0-9]+)?)*)",
    )
    .expect("term pattern is a valid regex")
});

/// Error types for polynomial parsing
#[derive(Debug, Clone, PartialEq)]
pub enum PolyParseError {
    /// a term like `x^-2` cannot be stored in the exponent-indexed coefficient vector
    NegativeExponent { term: String, exponent: i32 },
    /// the exponent is larger than [`MAX_EXPONENT`]
    ExponentTooLarge { term: String, exponent: i32, max: i32 },
    /// malformed numeric literal inside a matched term
    NumericFormat { literal: String },
}

impl fmt::Display for PolyParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PolyParseError::NegativeExponent { term, exponent } => write!(
                f,
                "term '{}' has negative exponent {}, only non-negative exponents are supported",
                term, exponent
            ),
            PolyParseError::ExponentTooLarge {
                term,
                exponent,
                max,
            } => write!(
                f,
                "term '{}' has exponent {} which exceeds the maximum of {}",
                term, exponent, max
            ),
            PolyParseError::NumericFormat { literal } => {
                write!(f, "malformed numeric literal: '{}'", literal)
            }
        }
    }
}

impl std::error::Error for PolyParseError {}

/// How terms sharing an exponent are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TermMerge {
    /// the later term replaces the earlier one
    #[default]
    Overwrite,
    /// coefficients of equal exponents are summed
    Accumulate,
}

/// a single coefficient/exponent contribution read from the expression text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub coefficient: f64,
    pub exponent: i32,
}

impl Term {
    pub fn new(coefficient: f64, exponent: i32) -> Self {
        Self {
            coefficient,
            exponent,
        }
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// parses `a`, `a/b`, `a/b/c`... as a left-folded real division.
/// Division by zero is not intercepted and produces `inf` or `NaN`.
pub fn parse_fraction(literal: &str) -> Result<f64, PolyParseError> {
    let compact = strip_whitespace(literal);
    let malformed = || PolyParseError::NumericFormat {
        literal: literal.trim().to_string(),
    };
    let mut parts = compact.split('/');
    let numerator = parts
        .next()
        .ok_or_else(malformed)?
        .parse::<f64>()
        .map_err(|_| malformed())?;
    parts.try_fold(numerator, |acc, part| {
        part.parse::<f64>()
            .map(|denominator| acc / denominator)
            .map_err(|_| malformed())
    })
}

fn x_term_coefficient(caps: &Captures) -> Result<f64, PolyParseError> {
    let coef = caps
        .name("coef")
        .map(|m| strip_whitespace(m.as_str()))
        .unwrap_or_default();
    match coef.as_str() {
        "" | "+" => Ok(1.0),
        "-" => Ok(-1.0),
        _ => parse_fraction(&coef),
    }
}

fn x_term_exponent(caps: &Captures) -> Result<i32, PolyParseError> {
    match caps.name("exp") {
        None => Ok(1),
        Some(m) => m
            .as_str()
            .parse::<i32>()
            .map_err(|_| PolyParseError::NumericFormat {
                literal: m.as_str().to_string(),
            }),
    }
}

fn check_exponent(term: &str, exponent: i32) -> Result<(), PolyParseError> {
    if exponent < 0 {
        return Err(PolyParseError::NegativeExponent {
            term: term.to_string(),
            exponent,
        });
    }
    if exponent > MAX_EXPONENT {
        return Err(PolyParseError::ExponentTooLarge {
            term: term.to_string(),
            exponent,
            max: MAX_EXPONENT,
        });
    }
    Ok(())
}

/// Extracts all terms of a polynomial string, left to right.
///
/// Fails on the first term carrying a negative or oversized exponent or a
/// malformed number. Input without any recognisable term gives an empty vector.
pub fn parse_terms(text: &str) -> Result<Vec<Term>, PolyParseError> {
    let mut terms = Vec::new();
    for caps in TERM_PATTERN.captures_iter(text) {
        let matched = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let term = if let Some(constant) = caps.name("constant") {
            Term::new(parse_fraction(constant.as_str())?, 0)
        } else {
            let coefficient = x_term_coefficient(&caps)?;
            let exponent = x_term_exponent(&caps)?;
            check_exponent(matched, exponent)?;
            Term::new(coefficient, exponent)
        };
        debug!(
            "term '{}' -> coefficient {}, exponent {}",
            matched.trim(),
            term.coefficient,
            term.exponent
        );
        terms.push(term);
    }
    if terms.is_empty() {
        info!("no terms recognised in '{}', using the zero polynomial", text);
    }
    Ok(terms)
}

/// Combines terms into an exponent -> coefficient map according to `policy`.
/// Terms with negative exponents are ignored; [`parse_terms`] never produces them.
pub fn merge_terms(terms: &[Term], policy: TermMerge) -> BTreeMap<usize, f64> {
    let mut merged = BTreeMap::new();
    for term in terms {
        let Ok(exponent) = usize::try_from(term.exponent) else {
            continue;
        };
        match policy {
            TermMerge::Overwrite => {
                merged.insert(exponent, term.coefficient);
            }
            TermMerge::Accumulate => {
                *merged.entry(exponent).or_insert(0.0) += term.coefficient;
            }
        }
    }
    merged
}

/// Materialises the merged map into a dense vector where index `i` holds the
/// coefficient of `x^i`. Starts as `[0.0]` and grows to `exponent + 1` as needed.
pub fn dense_coefficients(merged: &BTreeMap<usize, f64>) -> Vec<f64> {
    let mut coefficients = vec![0.0];
    for (&exponent, &coefficient) in merged {
        if exponent >= coefficients.len() {
            coefficients.resize(exponent + 1, 0.0);
        }
        coefficients[exponent] = coefficient;
    }
    coefficients
}
