//! # Polynomial differentiation
//!
//! Symbolic differentiation works directly on the coefficient vector:
//! `c'[i-1] = i * c[i]`, the former top coefficient becomes `0`. The vector length
//! is kept, so the degree drops by one (or stays `0` for constants).
//!
//! The result is a new [`Polynomial`] whose source text is the canonical string of
//! the derived coefficients, e.g. `"9.00x^2-4.00"`. That string parses back into the
//! same polynomial up to the two-decimal rounding of the coefficients.
use crate::symbolic::polynomial::Polynomial;

/// formats one non-zero term, `"<coef>x^<exp>"` or `"<coef>"` for the constant
fn format_term(coefficient: f64, exponent: usize) -> String {
    if exponent > 0 {
        format!("{:.2}x^{}", coefficient, exponent)
    } else {
        format!("{:.2}", coefficient)
    }
}

impl Polynomial {
    /// Returns the derivative; `self` is left untouched.
    pub fn derivative(&self) -> Polynomial {
        let mut coefficients = self.coefficients().to_vec();
        for i in 1..coefficients.len() {
            coefficients[i - 1] = i as f64 * coefficients[i];
        }
        if let Some(top) = coefficients.last_mut() {
            *top = 0.0;
        }
        Polynomial::from_coefficients(coefficients)
    }

    /// derivative of order `n`, `n = 0` returns a copy
    pub fn nth_derivative(&self, n: usize) -> Polynomial {
        (0..n).fold(self.clone(), |p, _| p.derivative())
    }

    /// Serialises the coefficients from the highest exponent down, skipping zeros.
    /// A `+` is inserted only before positive coefficients that follow another term.
    /// The zero polynomial gives an empty string.
    pub fn canonical_string(&self) -> String {
        let mut out = String::new();
        for (exponent, &coefficient) in self.coefficients().iter().enumerate().rev() {
            if coefficient == 0.0 {
                continue;
            }
            if coefficient > 0.0 && !out.is_empty() {
                out.push('+');
            }
            out.push_str(&format_term(coefficient, exponent));
        }
        out
    }
}
