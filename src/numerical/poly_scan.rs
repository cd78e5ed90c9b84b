//! # Zero and extreme point scanning
//!
//! Bracketing by sampling: a single forward scan evaluates the function at
//! `start, start + step, start + 2*step, ...` up to `end` and reports every
//! pair of neighbouring samples that satisfies the sign test. No refinement
//! is done here, the precision is bounded by `step`
//! (see [`crate::numerical::bracket_refine`] for bisection/Newton refinement of the brackets).
//!
//! - zero points: consecutive values with `y_prev * y <= 0`, reported at the midpoint
//!   of the two samples
//! - extreme points: consecutive forward-difference slopes with `s_prev * s <= 0`,
//!   reported at the sample shared by both slopes (one step behind the scan cursor)
//!
//! The test is applied to every pair, so a sample that is exactly zero is reported
//! by both pairs it belongs to, and a function that is identically zero (or a
//! constant, for extreme points) is reported at every pair.
//! [`collapse_adjacent_points`] folds such runs when a caller wants one point per run.
//!
//! # Example
//! ```
//! use RustedPolyScope::symbolic::polynomial::Polynomial;
//! use RustedPolyScope::numerical::poly_scan::{zero_points, ScanDomain};
//! let p = Polynomial::parse("x-1").unwrap();
//! let zeros = zero_points(&p, &ScanDomain::new(-10.0, 10.0, 0.01));
//! assert_eq!(zeros.len(), 1);
//! assert!((zeros[0] - 1.0).abs() < 0.01);
//! ```
use crate::symbolic::polynomial::Polynomial;
use log::{debug, warn};

/// Trait for a real function of one real variable that can be scanned
pub trait ScalarFunction {
    /// Evaluate the function at point x
    fn evaluate(&self, x: f64) -> f64;

    /// Analytical derivative at point x, if the function knows it
    fn derivative(&self, _x: f64) -> Option<f64> {
        None
    }

    /// Get function name for debugging/logging
    fn name(&self) -> &str {
        "unnamed_function"
    }
}

impl ScalarFunction for Polynomial {
    fn evaluate(&self, x: f64) -> f64 {
        self.value_at(x)
    }

    fn derivative(&self, x: f64) -> Option<f64> {
        Some(self.value_and_slope(x).1)
    }

    fn name(&self) -> &str {
        self.source_text()
    }
}

/// largest number of steps a single scan may take
pub const MAX_SCAN_STEPS: f64 = 1e9;

/// Sampling interval and step of a scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanDomain {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Default for ScanDomain {
    /// symmetric interval of magnitude 100 sampled every 0.01
    fn default() -> Self {
        Self {
            start: -100.0,
            end: 100.0,
            step: 0.01,
        }
    }
}

impl ScanDomain {
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    /// Finite bounds, `end >= start`, a positive step that still moves the cursor
    /// at both ends, and at most [`MAX_SCAN_STEPS`] steps.
    pub fn is_valid(&self) -> bool {
        if !(self.start.is_finite()
            && self.end.is_finite()
            && self.step.is_finite()
            && self.step > 0.0
            && self.end >= self.start)
        {
            return false;
        }
        let steps = (self.end - self.start) / self.step;
        steps.is_finite()
            && steps <= MAX_SCAN_STEPS
            && self.start + self.step > self.start
            && self.end + self.step > self.end
    }

    /// Sample abscissas in scan order; nothing for an invalid domain.
    /// The cursor advances by repeated addition of `step`.
    pub fn samples(&self) -> impl Iterator<Item = f64> {
        let (end, step) = (self.end, self.step);
        let first = if self.is_valid() {
            Some(self.start)
        } else {
            None
        };
        std::iter::successors(first, move |x| Some(x + step)).take_while(move |&x| x <= end)
    }

    /// number of samples the scan visits, `0` for an invalid domain
    pub fn sample_count(&self) -> usize {
        self.samples().count()
    }
}

/// A sampled interval known to contain a zero or an extremum, with the unrefined estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub left: f64,
    pub right: f64,
    pub estimate: f64,
}

fn check_domain<F: ScalarFunction + ?Sized>(function: &F, domain: &ScanDomain, what: &str) -> bool {
    if !domain.is_valid() {
        warn!(
            "invalid scan domain [{}, {}] step {} for {} of '{}', nothing reported",
            domain.start,
            domain.end,
            domain.step,
            what,
            function.name()
        );
        return false;
    }
    true
}

/// Brackets of all pairs of samples with `y_prev * y <= 0`, in ascending order
pub fn zero_brackets<F: ScalarFunction + ?Sized>(function: &F, domain: &ScanDomain) -> Vec<Bracket> {
    let mut brackets = Vec::new();
    if !check_domain(function, domain, "zero points") {
        return brackets;
    }
    let mut samples = domain.samples().map(|x| (x, function.evaluate(x)));
    let Some((mut x_prev, mut y_prev)) = samples.next() else {
        return brackets;
    };
    for (x, y) in samples {
        if y_prev * y <= 0.0 {
            let bracket = Bracket {
                left: x_prev,
                right: x,
                estimate: 0.5 * (x_prev + x),
            };
            debug!("zero bracket [{}, {}]", bracket.left, bracket.right);
            brackets.push(bracket);
        }
        x_prev = x;
        y_prev = y;
    }
    brackets
}

/// Brackets of all pairs of consecutive slopes with `s_prev * s <= 0`, in ascending order.
/// Each bracket spans the two slopes; `estimate` is the sample they share.
pub fn extreme_brackets<F: ScalarFunction + ?Sized>(
    function: &F,
    domain: &ScanDomain,
) -> Vec<Bracket> {
    let mut brackets = Vec::new();
    if !check_domain(function, domain, "extreme points") {
        return brackets;
    }
    let step = domain.step;
    let mut samples = domain.samples().map(|x| (x, function.evaluate(x)));
    let (Some((mut x_before, y_first)), Some((mut x_prev, mut y_prev))) =
        (samples.next(), samples.next())
    else {
        return brackets;
    };
    let mut slope_prev = (y_prev - y_first) / step;
    for (x, y) in samples {
        let slope = (y - y_prev) / step;
        if slope_prev * slope <= 0.0 {
            let bracket = Bracket {
                left: x_before,
                right: x,
                estimate: x_prev,
            };
            debug!(
                "extreme bracket [{}, {}] around {}",
                bracket.left, bracket.right, bracket.estimate
            );
            brackets.push(bracket);
        }
        x_before = x_prev;
        x_prev = x;
        y_prev = y;
        slope_prev = slope;
    }
    brackets
}

/// approximate zeros, precision about `step / 2`
pub fn zero_points<F: ScalarFunction + ?Sized>(function: &F, domain: &ScanDomain) -> Vec<f64> {
    zero_brackets(function, domain)
        .into_iter()
        .map(|b| b.estimate)
        .collect()
}

/// approximate extrema, precision about `step`
pub fn extreme_points<F: ScalarFunction + ?Sized>(function: &F, domain: &ScanDomain) -> Vec<f64> {
    extreme_brackets(function, domain)
        .into_iter()
        .map(|b| b.estimate)
        .collect()
}

/// zero points over the default domain `[-100, 100]`, step `0.01`
pub fn default_zero_points<F: ScalarFunction + ?Sized>(function: &F) -> Vec<f64> {
    zero_points(function, &ScanDomain::default())
}

/// extreme points over the default domain `[-100, 100]`, step `0.01`
pub fn default_extreme_points<F: ScalarFunction + ?Sized>(function: &F) -> Vec<f64> {
    extreme_points(function, &ScanDomain::default())
}

/// Replaces every run of ascending points whose neighbours are at most `gap` apart
/// by the mean of the run. Two midpoints around an exact zero sample become that
/// sample; an identically zero function collapses to the middle of the domain.
pub fn collapse_adjacent_points(points: &[f64], gap: f64) -> Vec<f64> {
    let limit = gap * (1.0 + 1e-6);
    let mut collapsed = Vec::new();
    let mut run: Vec<f64> = Vec::new();
    for &p in points {
        if let Some(&last) = run.last() {
            if p - last > limit {
                collapsed.push(run.iter().sum::<f64>() / run.len() as f64);
                run.clear();
            }
        }
        run.push(p);
    }
    if !run.is_empty() {
        collapsed.push(run.iter().sum::<f64>() / run.len() as f64);
    }
    collapsed
}
