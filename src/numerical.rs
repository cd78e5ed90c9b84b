/// # Scan for zero and extreme points
/// samples a function on a grid and reports where its value or its slope changes sign
/// ```
/// use RustedPolyScope::symbolic::polynomial::Polynomial;
/// use RustedPolyScope::numerical::poly_scan::{zero_points, ScanDomain};
/// let p = Polynomial::parse("x^2-4").unwrap();
/// let zeros = zero_points(&p, &ScanDomain::new(-10.0, 10.0, 0.01));
/// assert_eq!(zeros.len(), 2);
/// ```
pub mod poly_scan;
/// bisection and Newton-Raphson refinement of the brackets found by the scan
pub mod bracket_refine;
/// owner of the current function: evaluation, differentiation, cached zero/extreme points and reports
pub mod analyzer;
