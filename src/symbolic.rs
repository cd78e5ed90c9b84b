#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression like "3x^3-4x^1+2" into polynomial terms
///
///# Example
/// ```
/// use RustedPolyScope::symbolic::parse_poly::{parse_terms, Term};
/// let terms = parse_terms("3x^3-4x^1+2").unwrap();
/// assert_eq!(terms, vec![Term::new(3.0, 3), Term::new(-4.0, 1), Term::new(2.0, 0)]);
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_poly;
///____________________________________________________________________________________________________________________________
/// # Polynomial
/// a module
/// 1) turns a String expression into a dense coefficient vector
/// 2) evaluates the polynomial with Horner's scheme
/// 3) keeps the text it was built from for printing and control results
///# Example#
/// ```
/// use RustedPolyScope::symbolic::polynomial::Polynomial;
/// let p = Polynomial::parse("x^2-1").unwrap();
/// assert_eq!(p.degree(), 2);
/// assert_eq!(p.evaluate(3.0), (3.0, 8.0));
///  ```
pub mod polynomial;
/// analytical derivatives of polynomials and their canonical string form
pub mod polynomial_derivatives;
