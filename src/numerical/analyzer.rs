//! # Function analyzer
//!
//! Owns the current polynomial together with the scan settings and caches the zero
//! and extreme points computed for it. This is the surface a plotting front end talks
//! to: [`PlotFunction`] gives it evaluation, degree, differentiation, zero/extreme
//! points and the current function string.
//!
//! The analyzer is the single owner of its polynomial. Submitting a new expression
//! replaces the polynomial only when parsing succeeds, and both a new expression and
//! [`PlotFunction::derive`] drop the cached zero/extreme points.
//!
//! # Example
//! ```
//! use RustedPolyScope::numerical::analyzer::{FunctionAnalyzer, PlotFunction};
//! let mut analyzer = FunctionAnalyzer::new("x^2-1").unwrap();
//! assert_eq!(analyzer.zero_points().len(), 2);
//! assert_eq!(analyzer.derive(), "2.00x^1");
//! assert_eq!(analyzer.zero_points().len(), 1);
//! ```
use crate::Utils::task_parser::AnalysisTask;
use crate::numerical::bracket_refine::{
    RefineConfig, Refinement, refined_extreme_points, refined_zero_points,
};
use crate::numerical::poly_scan::{ScanDomain, collapse_adjacent_points};
use crate::symbolic::parse_poly::{PolyParseError, TermMerge};
use crate::symbolic::polynomial::Polynomial;
use log::{info, warn};
use std::fmt;
use tabled::{builder::Builder, settings::Style};

/// What a plotting surface needs from the function it draws
pub trait PlotFunction {
    /// `(x, y)` point of the curve
    fn evaluate(&self, x: f64) -> (f64, f64);
    fn degree(&self) -> usize;
    /// replaces the function by its derivative, returns the new function string
    fn derive(&mut self) -> String;
    fn zero_points(&mut self) -> Vec<f64>;
    fn extreme_points(&mut self) -> Vec<f64>;
    fn function_string(&self) -> &str;
}

pub struct FunctionAnalyzer {
    polynomial: Polynomial,
    domain: ScanDomain,
    refinement: Refinement,
    refine_config: RefineConfig,
    merge: TermMerge,
    collapse: bool,
    zero_cache: Option<Vec<f64>>,
    extreme_cache: Option<Vec<f64>>,
}

impl FunctionAnalyzer {
    pub fn new(expression: &str) -> Result<Self, PolyParseError> {
        Ok(Self::from_polynomial(Polynomial::parse(expression)?))
    }

    pub fn from_polynomial(polynomial: Polynomial) -> Self {
        Self {
            polynomial,
            domain: ScanDomain::default(),
            refinement: Refinement::default(),
            refine_config: RefineConfig::default(),
            merge: TermMerge::default(),
            collapse: false,
            zero_cache: None,
            extreme_cache: None,
        }
    }

    /// analyzer configured from a task document
    pub fn from_task(task: &AnalysisTask) -> Result<Self, PolyParseError> {
        let polynomial = Polynomial::parse_with(&task.expression, task.merge)?;
        Ok(Self::from_polynomial(polynomial)
            .with_merge(task.merge)
            .with_domain(task.domain)
            .with_refinement(task.refinement, task.refine_config)
            .with_collapse(task.collapse))
    }

    pub fn with_domain(mut self, domain: ScanDomain) -> Self {
        if !domain.is_valid() {
            warn!("scan domain {:?} is invalid, scans will report nothing", domain);
        }
        self.domain = domain;
        self.invalidate();
        self
    }

    pub fn with_refinement(mut self, method: Refinement, config: RefineConfig) -> Self {
        self.refinement = method;
        self.refine_config = config;
        self.invalidate();
        self
    }

    /// fold runs of points one step apart (exact zero samples, flat stretches)
    /// into their mean
    pub fn with_collapse(mut self, collapse: bool) -> Self {
        self.collapse = collapse;
        self.invalidate();
        self
    }

    /// merge policy used by later calls to [`FunctionAnalyzer::set_expression`]
    pub fn with_merge(mut self, merge: TermMerge) -> Self {
        self.merge = merge;
        self
    }

    pub fn polynomial(&self) -> &Polynomial {
        &self.polynomial
    }

    pub fn domain(&self) -> &ScanDomain {
        &self.domain
    }

    /// Parses `expression` and makes it the current function. On error the
    /// previous function and its cached points are kept.
    pub fn set_expression(&mut self, expression: &str) -> Result<(), PolyParseError> {
        let polynomial = Polynomial::parse_with(expression, self.merge)?;
        info!("new expression '{}', degree {}", expression, polynomial.degree());
        self.polynomial = polynomial;
        self.invalidate();
        Ok(())
    }

    pub fn invalidate(&mut self) {
        self.zero_cache = None;
        self.extreme_cache = None;
    }

    fn cached_zero_points(&mut self) -> &[f64] {
        let (polynomial, domain, method, config, collapse) = (
            &self.polynomial,
            &self.domain,
            self.refinement,
            &self.refine_config,
            self.collapse,
        );
        self.zero_cache.get_or_insert_with(|| {
            let zeros = refined_zero_points(polynomial, domain, method, config);
            if collapse {
                collapse_adjacent_points(&zeros, domain.step)
            } else {
                zeros
            }
        })
    }

    fn cached_extreme_points(&mut self) -> &[f64] {
        let (polynomial, domain, method, config, collapse) = (
            &self.polynomial,
            &self.domain,
            self.refinement,
            &self.refine_config,
            self.collapse,
        );
        self.extreme_cache.get_or_insert_with(|| {
            let extremes = refined_extreme_points(polynomial, domain, method, config);
            if collapse {
                collapse_adjacent_points(&extremes, domain.step)
            } else {
                extremes
            }
        })
    }

    /// snapshot of the current function and its points
    pub fn report(&mut self) -> AnalysisReport {
        let zero_points = self.cached_zero_points().to_vec();
        let extreme_points = self.cached_extreme_points().to_vec();
        AnalysisReport {
            function: self.polynomial.source_text().to_string(),
            degree: self.polynomial.degree(),
            zero_points,
            extreme_points,
        }
    }
}

impl PlotFunction for FunctionAnalyzer {
    fn evaluate(&self, x: f64) -> (f64, f64) {
        self.polynomial.evaluate(x)
    }

    fn degree(&self) -> usize {
        self.polynomial.degree()
    }

    fn derive(&mut self) -> String {
        let derived = self.polynomial.derivative();
        info!(
            "derivative of '{}' is '{}'",
            self.polynomial.source_text(),
            derived.source_text()
        );
        self.polynomial = derived;
        self.invalidate();
        self.polynomial.source_text().to_string()
    }

    fn zero_points(&mut self) -> Vec<f64> {
        self.cached_zero_points().to_vec()
    }

    fn extreme_points(&mut self) -> Vec<f64> {
        self.cached_extreme_points().to_vec()
    }

    fn function_string(&self) -> &str {
        self.polynomial.source_text()
    }
}

/// points formatted with two decimals, comma separated
pub fn format_points(points: &[f64]) -> String {
    points
        .iter()
        .map(|p| format!("{:.2}", p))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub function: String,
    pub degree: usize,
    pub zero_points: Vec<f64>,
    pub extreme_points: Vec<f64>,
}

impl AnalysisReport {
    /// lines of the information box drawn next to the graph
    pub fn overlay_lines(&self) -> Vec<String> {
        vec![
            format!("Function: {}", self.function),
            format!("Degree: {}", self.degree),
            format!("Zero Points: {}", format_points(&self.zero_points)),
            format!("Extreme Points: {}", format_points(&self.extreme_points)),
        ]
    }

    pub fn table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["function".to_string(), self.function.clone()]);
        builder.push_record(["degree".to_string(), self.degree.to_string()]);
        builder.push_record(["zero points".to_string(), format_points(&self.zero_points)]);
        builder.push_record([
            "extreme points".to_string(),
            format_points(&self.extreme_points),
        ]);
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plot_surface() {
        let mut analyzer = FunctionAnalyzer::new("3x^3-4x^1+2").unwrap();
        assert_eq!(analyzer.degree(), 3);
        assert_eq!(analyzer.evaluate(0.0), (0.0, 2.0));
        assert_eq!(analyzer.evaluate(1.0), (1.0, 1.0));
        assert_eq!(analyzer.function_string(), "3x^3-4x^1+2");
        assert_eq!(analyzer.zero_points().len(), 1);
        assert_eq!(analyzer.extreme_points().len(), 2);
    }

    #[test]
    fn test_derive_replaces_function_and_cache() {
        let mut analyzer = FunctionAnalyzer::new("x^3-3x").unwrap();
        assert_eq!(analyzer.zero_points().len(), 3);
        assert_eq!(analyzer.extreme_points().len(), 2);

        assert_eq!(analyzer.derive(), "3.00x^2-3.00");
        assert_eq!(analyzer.function_string(), "3.00x^2-3.00");
        assert_eq!(analyzer.degree(), 2);
        let zeros = analyzer.zero_points();
        assert_eq!(zeros.len(), 2);
        assert!((zeros[0] + 1.0).abs() < 0.01 && (zeros[1] - 1.0).abs() < 0.01);
        assert_eq!(analyzer.extreme_points().len(), 1);

        assert_eq!(analyzer.derive(), "6.00x^1");
        assert!(analyzer.extreme_points().is_empty());
        assert_eq!(analyzer.derive(), "6.00");
        assert!(analyzer.zero_points().is_empty());
        let pairs = ScanDomain::default().sample_count() - 1;
        // a flat function has a zero slope product at every pair of slopes
        assert_eq!(analyzer.extreme_points().len(), pairs - 1);
        assert_eq!(analyzer.derive(), "");
        assert_eq!(analyzer.derive(), "");
        assert!(analyzer.polynomial().is_zero());
        assert_eq!(analyzer.zero_points().len(), pairs);
        assert_eq!(analyzer.extreme_points().len(), pairs - 1);
    }

    #[test]
    fn test_collapse_folds_exact_zero_samples() {
        let domain = ScanDomain::new(-0.5, 0.5, 0.5);
        let mut plain = FunctionAnalyzer::new("x").unwrap().with_domain(domain);
        assert_eq!(plain.zero_points(), vec![-0.25, 0.25]);
        let mut collapsed = FunctionAnalyzer::new("x")
            .unwrap()
            .with_domain(domain)
            .with_collapse(true);
        assert_eq!(collapsed.zero_points(), vec![0.0]);

        let mut zero = FunctionAnalyzer::new("0").unwrap().with_collapse(true);
        let zeros = zero.zero_points();
        assert_eq!(zeros.len(), 1);
        assert!(zeros[0].abs() < 0.01);
        assert_eq!(zero.extreme_points().len(), 1);
    }

    #[test]
    fn test_collapse_after_refinement() {
        // both brackets around the exact zero sample refine onto it
        let mut analyzer = FunctionAnalyzer::new("x-1")
            .unwrap()
            .with_domain(ScanDomain::new(0.0, 2.0, 0.5))
            .with_refinement(Refinement::Bisection, RefineConfig::default());
        assert_eq!(analyzer.zero_points(), vec![1.0, 1.0]);
        let mut analyzer = FunctionAnalyzer::new("x-1")
            .unwrap()
            .with_domain(ScanDomain::new(0.0, 2.0, 0.5))
            .with_refinement(Refinement::Bisection, RefineConfig::default())
            .with_collapse(true);
        assert_eq!(analyzer.zero_points(), vec![1.0]);
    }

    #[test]
    fn test_failed_expression_keeps_previous_state() {
        let mut analyzer = FunctionAnalyzer::new("x^2-4").unwrap();
        let zeros = analyzer.zero_points();
        let err = analyzer.set_expression("x^2+x^-1").unwrap_err();
        assert!(matches!(err, PolyParseError::NegativeExponent { .. }));
        assert_eq!(analyzer.function_string(), "x^2-4");
        assert_eq!(analyzer.zero_points(), zeros);
        assert!(analyzer.set_expression("1/.x").is_err());
        assert_eq!(analyzer.function_string(), "x^2-4");
    }

    #[test]
    fn test_set_expression_invalidates_cache() {
        let mut analyzer = FunctionAnalyzer::new("x^2-4").unwrap();
        assert_eq!(analyzer.zero_points().len(), 2);
        analyzer.set_expression("x-3").unwrap();
        let zeros = analyzer.zero_points();
        assert_eq!(zeros.len(), 1);
        assert!((zeros[0] - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_merge_policy_applies_to_new_expressions() {
        let mut analyzer = FunctionAnalyzer::new("x")
            .unwrap()
            .with_merge(TermMerge::Accumulate);
        analyzer.set_expression("x^2+x^2-8").unwrap();
        assert_eq!(analyzer.polynomial().coefficients(), &[-8.0, 0.0, 2.0]);
    }

    #[test]
    fn test_refined_analyzer() {
        let mut analyzer = FunctionAnalyzer::new("x^2-2")
            .unwrap()
            .with_domain(ScanDomain::new(-5.0, 5.0, 0.1))
            .with_refinement(Refinement::Bisection, RefineConfig::default());
        let zeros = analyzer.zero_points();
        assert_eq!(zeros.len(), 2);
        assert_relative_eq!(zeros[1], 2f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_report_overlay() {
        let mut analyzer = FunctionAnalyzer::new("x^2-3")
            .unwrap()
            .with_domain(ScanDomain::new(-10.0, 10.0, 0.5));
        let report = analyzer.report();
        assert_eq!(report.degree, 2);
        let lines = report.overlay_lines();
        assert_eq!(lines[0], "Function: x^2-3");
        assert_eq!(lines[1], "Degree: 2");
        assert_eq!(lines[2], "Zero Points: -1.75, 1.75");
        assert_eq!(lines[3], "Extreme Points: 0.00");
        let table = report.table();
        assert!(table.contains("zero points"));
        assert!(table.contains("-1.75, 1.75"));
        assert_eq!(report.to_string(), table);
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(&[]), "");
        assert_eq!(format_points(&[1.0, -0.25, 2.5]), "1.00, -0.25, 2.50");
    }
}
