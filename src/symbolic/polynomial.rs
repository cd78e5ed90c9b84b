//! # Polynomial model
//!
//! Canonical dense storage of a univariate polynomial: index `i` of the coefficient
//! vector holds the coefficient of `x^i`. The vector always has at least one element,
//! exponents not mentioned in the source text hold `0.0`.
//!
//! The polynomial also remembers the text it was last produced from: the user input
//! after parsing, or the canonical string after differentiation.
//!
//! # Example
//! ```
//! use RustedPolyScope::symbolic::polynomial::Polynomial;
//! let p = Polynomial::parse("3x^3-4x^1+2").unwrap();
//! assert_eq!(p.degree(), 3);
//! assert_eq!(p.evaluate(1.0), (1.0, 1.0));
//! ```
use crate::symbolic::parse_poly::{
    PolyParseError, TermMerge, dense_coefficients, merge_terms, parse_terms,
};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
    source_text: String,
}

impl Polynomial {
    /// Parses a polynomial string using the default (overwrite) merge policy
    pub fn parse(text: &str) -> Result<Self, PolyParseError> {
        Self::parse_with(text, TermMerge::default())
    }

    /// Parses a polynomial string, combining repeated exponents according to `merge`
    pub fn parse_with(text: &str, merge: TermMerge) -> Result<Self, PolyParseError> {
        let terms = parse_terms(text)?;
        let merged = merge_terms(&terms, merge);
        Ok(Self {
            coefficients: dense_coefficients(&merged),
            source_text: text.to_string(),
        })
    }

    /// the zero polynomial `[0]` with an empty source text
    pub fn zero() -> Self {
        Self {
            coefficients: vec![0.0],
            source_text: String::new(),
        }
    }

    /// Builds a polynomial from ascending coefficients; the source text becomes
    /// the canonical string of those coefficients.
    pub fn from_coefficients(coefficients: Vec<f64>) -> Self {
        let coefficients = if coefficients.is_empty() {
            vec![0.0]
        } else {
            coefficients
        };
        let mut polynomial = Self {
            coefficients,
            source_text: String::new(),
        };
        polynomial.source_text = polynomial.canonical_string();
        polynomial
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// highest exponent with a non-zero coefficient, `0` for constants
    pub fn degree(&self) -> usize {
        self.coefficients
            .iter()
            .rposition(|&c| c != 0.0)
            .unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(|&c| c == 0.0)
    }

    /// Horner evaluation, returns the plotted point `(x, p(x))`
    pub fn evaluate(&self, x: f64) -> (f64, f64) {
        (x, self.value_at(x))
    }

    pub fn value_at(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }

    /// `(p(x), p'(x))` in a single Horner pass
    pub fn value_and_slope(&self, x: f64) -> (f64, f64) {
        let mut value = 0.0;
        let mut slope = 0.0;
        for &c in self.coefficients.iter().rev() {
            slope = slope * x + value;
            value = value * x + c;
        }
        (value, slope)
    }
}

impl Default for Polynomial {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.source_text)
    }
}

impl FromStr for Polynomial {
    type Err = PolyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::Rng;

    fn direct_sum(coefficients: &[f64], x: f64) -> f64 {
        coefficients
            .iter()
            .enumerate()
            .map(|(i, c)| c * x.powi(i as i32))
            .sum()
    }

    #[test]
    fn test_reference_expression() {
        let p = Polynomial::parse("3x^3-4x^1+2").unwrap();
        assert_eq!(p.coefficients(), &[2.0, -4.0, 0.0, 3.0]);
        assert_eq!(p.degree(), 3);
        assert_eq!(p.evaluate(0.0), (0.0, 2.0));
        assert_eq!(p.evaluate(1.0), (1.0, 1.0));
        assert_eq!(p.source_text(), "3x^3-4x^1+2");
        assert_eq!(p.to_string(), "3x^3-4x^1+2");
    }

    #[test]
    fn test_zero_polynomial() {
        let p = Polynomial::parse("no terms here").unwrap();
        assert_eq!(p.coefficients(), &[0.0]);
        assert_eq!(p.degree(), 0);
        assert!(p.is_zero());
        assert_eq!(p.value_at(12.5), 0.0);
        assert_eq!(Polynomial::default(), Polynomial::zero());
    }

    #[test]
    fn test_degree_ignores_zero_leading_coefficients() {
        let p = Polynomial::parse("0x^5+2x^2").unwrap();
        assert_eq!(p.coefficients().len(), 6);
        assert_eq!(p.degree(), 2);
        assert_eq!(Polynomial::parse("7").unwrap().degree(), 0);
    }

    #[test]
    fn test_from_coefficients() {
        let p = Polynomial::from_coefficients(vec![-1.0, 0.0, 2.0]);
        assert_eq!(p.source_text(), "2.00x^2-1.00");
        assert_eq!(p.value_at(2.0), 7.0);
        assert_eq!(Polynomial::from_coefficients(vec![]).coefficients(), &[0.0]);
    }

    #[test]
    fn test_from_str() {
        let p: Polynomial = "x^2-1".parse().unwrap();
        assert_eq!(p.value_at(3.0), 8.0);
        assert!("x^-1".parse::<Polynomial>().is_err());
    }

    #[test]
    fn test_value_and_slope() {
        // p = 3x^3 - 4x + 2, p' = 9x^2 - 4
        let p = Polynomial::parse("3x^3-4x+2").unwrap();
        for &x in &[-2.0, -0.5, 0.0, 1.0, 3.25] {
            let (value, slope) = p.value_and_slope(x);
            assert_relative_eq!(value, p.value_at(x), epsilon = 1e-12);
            assert_relative_eq!(slope, 9.0 * x * x - 4.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_horner_matches_direct_sum_for_random_polynomials() {
        let mut rng = rand::rng();
        for degree in 0..=10 {
            for _ in 0..20 {
                let coefficients: Vec<f64> = (0..=degree)
                    .map(|_| rng.random_range(-10.0..10.0))
                    .collect();
                let p = Polynomial::from_coefficients(coefficients.clone());
                for _ in 0..10 {
                    let x = rng.random_range(-2.0..2.0);
                    assert_relative_eq!(
                        p.value_at(x),
                        direct_sum(&coefficients, x),
                        epsilon = 1e-8,
                        max_relative = 1e-9
                    );
                }
            }
        }
    }

    #[test]
    fn test_horner_matches_direct_sum_for_parsed_expressions() {
        let mut rng = rand::rng();
        for degree in 0..=10 {
            let coefficients: Vec<i32> = (0..=degree).map(|_| rng.random_range(-9..=9)).collect();
            let expression: String = coefficients
                .iter()
                .enumerate()
                .rev()
                .map(|(exponent, c)| format!("{:+}x^{}", c, exponent))
                .collect();
            let p = Polynomial::parse(&expression).unwrap();
            let as_f64: Vec<f64> = coefficients.iter().map(|&c| c as f64).collect();
            assert_eq!(p.coefficients(), as_f64.as_slice(), "{}", expression);
            for &x in &[-1.5, -0.3, 0.0, 0.7, 1.9] {
                assert_relative_eq!(
                    p.value_at(x),
                    direct_sum(&as_f64, x),
                    epsilon = 1e-9,
                    max_relative = 1e-9
                );
            }
        }
    }
}
