//! # Bracket refinement
//!
//! Optional second pass over the brackets found by [`crate::numerical::poly_scan`]:
//! each sampled bracket is tightened by bisection or Newton-Raphson iterations.
//! The scan's detection is unchanged, only the reported location gets more precise.
//!
//! Extreme points are refined as zeros of the slope, using the analytical derivative
//! when the function provides it and a central difference otherwise.
use crate::numerical::poly_scan::{
    Bracket, ScalarFunction, ScanDomain, extreme_brackets, zero_brackets,
};
use log::{debug, info};
use strum_macros::{Display, EnumIter, EnumString};

/// Enum to represent the refinement methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Refinement {
    /// report the sampled estimate as is
    #[default]
    None,
    Bisection,
    Newton,
}

/// Configuration for refinement iterations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 100,
        }
    }
}

const MIN_SLOPE: f64 = 1e-15;
const DIFF_STEP: f64 = 1e-6;

/// derivative of the wrapped function, seen as a function of its own
struct Slope<'a, F: ScalarFunction + ?Sized>(&'a F);

impl<F: ScalarFunction + ?Sized> ScalarFunction for Slope<'_, F> {
    fn evaluate(&self, x: f64) -> f64 {
        self.0.derivative(x).unwrap_or_else(|| {
            (self.0.evaluate(x + DIFF_STEP) - self.0.evaluate(x - DIFF_STEP)) / (2.0 * DIFF_STEP)
        })
    }

    fn name(&self) -> &str {
        self.0.name()
    }
}

/// Bisection inside the bracket. Falls back to the estimate when the bracket
/// ends do not have opposite signs.
pub fn bisection<F: ScalarFunction + ?Sized>(
    function: &F,
    bracket: &Bracket,
    config: &RefineConfig,
) -> f64 {
    let (mut a, mut b) = (bracket.left, bracket.right);
    let mut fa = function.evaluate(a);
    let fb = function.evaluate(b);
    if fa == 0.0 {
        return a;
    }
    if fb == 0.0 {
        return b;
    }
    if fa * fb > 0.0 || !(fa * fb).is_finite() {
        debug!(
            "no sign change on [{}, {}] for '{}', keeping estimate",
            a,
            b,
            function.name()
        );
        return bracket.estimate;
    }
    for _ in 0..config.max_iterations {
        let c = 0.5 * (a + b);
        let fc = function.evaluate(c);
        if fc == 0.0 || 0.5 * (b - a) < config.tolerance {
            return c;
        }
        if fa * fc < 0.0 {
            b = c;
        } else {
            a = c;
            fa = fc;
        }
    }
    0.5 * (a + b)
}

/// Newton-Raphson started from the estimate. Leaving the bracket or hitting a
/// vanishing derivative hands the bracket over to [`bisection`].
pub fn newton<F: ScalarFunction + ?Sized>(
    function: &F,
    bracket: &Bracket,
    config: &RefineConfig,
) -> f64 {
    let mut x = bracket.estimate;
    for _ in 0..config.max_iterations {
        let fx = function.evaluate(x);
        if fx == 0.0 {
            return x;
        }
        let dfx = function.derivative(x).unwrap_or_else(|| {
            (function.evaluate(x + DIFF_STEP) - function.evaluate(x - DIFF_STEP))
                / (2.0 * DIFF_STEP)
        });
        if dfx.abs() < MIN_SLOPE || !dfx.is_finite() {
            debug!("derivative vanished at {} for '{}'", x, function.name());
            return bisection(function, bracket, config);
        }
        let x_new = x - fx / dfx;
        if !(bracket.left..=bracket.right).contains(&x_new) {
            debug!(
                "newton step {} left the bracket [{}, {}]",
                x_new, bracket.left, bracket.right
            );
            return bisection(function, bracket, config);
        }
        if (x_new - x).abs() < config.tolerance {
            return x_new;
        }
        x = x_new;
    }
    x
}

pub fn refine<F: ScalarFunction + ?Sized>(
    function: &F,
    bracket: &Bracket,
    method: Refinement,
    config: &RefineConfig,
) -> f64 {
    match method {
        Refinement::None => bracket.estimate,
        Refinement::Bisection => bisection(function, bracket, config),
        Refinement::Newton => newton(function, bracket, config),
    }
}

/// zero points with every bracket refined by `method`
pub fn refined_zero_points<F: ScalarFunction + ?Sized>(
    function: &F,
    domain: &ScanDomain,
    method: Refinement,
    config: &RefineConfig,
) -> Vec<f64> {
    let zeros: Vec<f64> = zero_brackets(function, domain)
        .iter()
        .map(|bracket| refine(function, bracket, method, config))
        .collect();
    info!(
        "{} zero points of '{}' ({} refinement)",
        zeros.len(),
        function.name(),
        method
    );
    zeros
}

/// extreme points with every bracket refined as a zero of the slope
pub fn refined_extreme_points<F: ScalarFunction + ?Sized>(
    function: &F,
    domain: &ScanDomain,
    method: Refinement,
    config: &RefineConfig,
) -> Vec<f64> {
    let slope = Slope(function);
    let extremes: Vec<f64> = extreme_brackets(function, domain)
        .iter()
        .map(|bracket| refine(&slope, bracket, method, config))
        .collect();
    info!(
        "{} extreme points of '{}' ({} refinement)",
        extremes.len(),
        function.name(),
        method
    );
    extremes
}
