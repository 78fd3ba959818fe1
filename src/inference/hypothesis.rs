//! Linear hypotheses on regression coefficients: t-tests, Wald F-tests and
//! the overall F-test.
//!
//! A hypothesis is a set of restrictions `Rβ = q`. Restrictions are written
//! as text, one per comma, each a linear expression in coefficient names on
//! either side of `=`:
//!
//! ```text
//! gender_P = 0
//! edu_S2 = 0, edu_SMA = 0
//! edu_S2 - edu_SMA = 0
//! 2 * experience_years = 1
//! ```

use crate::core::{Decision, RegressionResult};
use crate::inference::CoefficientInference;
use crate::utils::qr_least_squares;
use faer::{Col, Mat};
use log::{info, warn};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};
use std::fmt;
use thiserror::Error;

/// Errors raised while building or evaluating a hypothesis.
#[derive(Debug, Error)]
pub enum HypothesisError {
    #[error("unknown coefficient '{0}'")]
    UnknownCoefficient(String),

    #[error("cannot parse restriction '{input}': {message}")]
    Parse { input: String, message: String },

    #[error("hypothesis has no restrictions")]
    EmptyHypothesis,

    #[error("a t-test needs exactly one restriction, got {0}")]
    NotSingleRestriction(usize),

    #[error("coefficient covariance is unavailable; fit with inference enabled")]
    InferenceUnavailable,

    #[error("restrictions are linearly dependent; R Cov R' is singular")]
    Singular,
}

/// One linear restriction `Σ c_j β_j = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Restriction {
    /// Coefficient weights by name, in order of first appearance.
    pub weights: Vec<(String, f64)>,
    /// Right-hand side.
    pub value: f64,
}

impl Restriction {
    /// The restriction `name = 0`.
    pub fn zero(name: impl Into<String>) -> Self {
        Self {
            weights: vec![(name.into(), 1.0)],
            value: 0.0,
        }
    }

    fn add_weight(&mut self, name: &str, weight: f64) {
        match self.weights.iter_mut().find(|(n, _)| n == name) {
            Some((_, w)) => *w += weight,
            None => self.weights.push((name.to_string(), weight)),
        }
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, (name, w)) in self.weights.iter().enumerate() {
            let sign = if *w < 0.0 { "-" } else { "+" };
            let magnitude = w.abs();
            if k == 0 {
                if *w < 0.0 {
                    f.write_str("-")?;
                }
            } else {
                write!(f, " {sign} ")?;
            }
            if (magnitude - 1.0).abs() > f64::EPSILON {
                write!(f, "{magnitude} * ")?;
            }
            f.write_str(name)?;
        }
        write!(f, " = {}", self.value)
    }
}

/// A set of linear restrictions tested jointly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearHypothesis {
    restrictions: Vec<Restriction>,
}

impl LinearHypothesis {
    /// Build from explicit restrictions.
    pub fn new(restrictions: Vec<Restriction>) -> Self {
        Self { restrictions }
    }

    /// `name = 0` for every name.
    pub fn all_zero<S: AsRef<str>>(names: &[S]) -> Self {
        Self::new(names.iter().map(|n| Restriction::zero(n.as_ref())).collect())
    }

    /// Parse comma-separated restrictions such as `"edu_S2 = 0, edu_SMA = 0"`.
    pub fn parse(text: &str) -> Result<Self, HypothesisError> {
        let restrictions = text
            .split(',')
            .map(parse_restriction)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(restrictions))
    }

    /// The restrictions, in order.
    pub fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    /// Number of restrictions J.
    pub fn len(&self) -> usize {
        self.restrictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restrictions.is_empty()
    }

    /// Restriction matrix R (J × p) and right-hand side q against `names`.
    pub fn matrices(&self, names: &[String]) -> Result<(Mat<f64>, Col<f64>), HypothesisError> {
        let mut r = Mat::zeros(self.len(), names.len());
        for (row, restriction) in self.restrictions.iter().enumerate() {
            for (name, w) in &restriction.weights {
                let j = names
                    .iter()
                    .position(|n| n == name)
                    .ok_or_else(|| HypothesisError::UnknownCoefficient(name.clone()))?;
                r[(row, j)] += w;
            }
        }
        let q = Col::from_fn(self.len(), |row| self.restrictions[row].value);
        Ok((r, q))
    }
}

impl fmt::Display for LinearHypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, restriction) in self.restrictions.iter().enumerate() {
            if k > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{restriction}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Name(String),
    Plus,
    Minus,
    Star,
}

fn parse_error(input: &str, message: impl Into<String>) -> HypothesisError {
    HypothesisError::Parse {
        input: input.trim().to_string(),
        message: message.into(),
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, HypothesisError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut text = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        text.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                // Optional exponent, only when digits follow: `1e-3`, `2.5E2`
                if matches!(chars.peek(), Some('e' | 'E')) {
                    let mut ahead = chars.clone();
                    let marker = ahead.next();
                    let sign = ahead.next_if(|&s| s == '+' || s == '-');
                    if ahead.peek().is_some_and(|d| d.is_ascii_digit()) {
                        text.extend(marker);
                        text.extend(sign);
                        while let Some(d) = ahead.next_if(|d| d.is_ascii_digit()) {
                            text.push(d);
                        }
                        chars = ahead;
                    }
                }
                let value = text
                    .parse::<f64>()
                    .map_err(|_| parse_error(input, format!("invalid number '{text}'")))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut text = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_alphanumeric() || d == '_' || d == '.' {
                        text.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Name(text));
            }
            other => return Err(parse_error(input, format!("unexpected character '{other}'"))),
        }
    }

    Ok(tokens)
}

/// Parse one side of a restriction into `(weights, constant)`.
fn parse_side(input: &str, side: &str) -> Result<(Vec<(String, f64)>, f64), HypothesisError> {
    let tokens = tokenize(side)?;
    if tokens.is_empty() {
        return Err(parse_error(input, "empty side of '='"));
    }

    let mut weights = Vec::new();
    let mut constant = 0.0;
    let mut pos = 0;
    let mut first = true;

    while pos < tokens.len() {
        let mut sign = 1.0;
        match tokens[pos] {
            Token::Plus => pos += 1,
            Token::Minus => {
                sign = -1.0;
                pos += 1;
            }
            _ if first => {}
            _ => return Err(parse_error(input, "expected '+' or '-' between terms")),
        }
        first = false;

        match (tokens.get(pos), tokens.get(pos + 1), tokens.get(pos + 2)) {
            (Some(Token::Number(c)), Some(Token::Star), Some(Token::Name(name))) => {
                weights.push((name.clone(), sign * c));
                pos += 3;
            }
            (Some(Token::Name(name)), _, _) => {
                weights.push((name.clone(), sign));
                pos += 1;
            }
            (Some(Token::Number(c)), next, _) if next != Some(&Token::Star) => {
                constant += sign * c;
                pos += 1;
            }
            _ => return Err(parse_error(input, "expected a term '[number *] name'")),
        }
    }

    Ok((weights, constant))
}

fn parse_restriction(input: &str) -> Result<Restriction, HypothesisError> {
    let sides: Vec<&str> = input.split('=').collect();
    if sides.len() != 2 {
        return Err(parse_error(input, "expected exactly one '='"));
    }

    let (lhs, lhs_const) = parse_side(input, sides[0])?;
    let (rhs, rhs_const) = parse_side(input, sides[1])?;

    let mut restriction = Restriction {
        weights: Vec::new(),
        value: rhs_const - lhs_const,
    };
    for (name, w) in lhs {
        restriction.add_weight(&name, w);
    }
    for (name, w) in rhs {
        restriction.add_weight(&name, -w);
    }

    if restriction.weights.is_empty() {
        return Err(parse_error(input, "restriction names no coefficient"));
    }
    Ok(restriction)
}

/// Result of a t-test on one linear restriction.
#[derive(Debug, Clone, PartialEq)]
pub struct TTestResult {
    /// The restriction tested, as text.
    pub restriction: String,
    /// Estimate of the restricted combination r'β.
    pub estimate: f64,
    /// Hypothesised value q.
    pub value: f64,
    pub std_error: f64,
    pub t_statistic: f64,
    pub df: usize,
    /// Two-sided p-value.
    pub p_value: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub confidence_level: f64,
    pub alpha: f64,
    pub decision: Decision,
}

/// Result of a Wald F-test on J linear restrictions.
#[derive(Debug, Clone, PartialEq)]
pub struct FTestResult {
    /// The restrictions tested, as text.
    pub restrictions: Vec<String>,
    pub f_statistic: f64,
    /// Numerator degrees of freedom J.
    pub df_num: usize,
    /// Denominator degrees of freedom n - p.
    pub df_denom: usize,
    pub p_value: f64,
    pub alpha: f64,
    pub decision: Decision,
}

/// The model's overall F-test.
#[derive(Debug, Clone, PartialEq)]
pub struct OverallFTest {
    pub f_statistic: f64,
    pub df_model: usize,
    pub df_resid: usize,
    pub p_value: f64,
    pub alpha: f64,
    pub decision: Decision,
}

/// A test that either ran or was skipped with a reason.
#[derive(Debug, Clone, PartialEq)]
pub enum HypothesisOutcome<T> {
    Tested(T),
    Skipped { reason: String },
}

impl<T> HypothesisOutcome<T> {
    /// A skipped test; the reason is logged at info level.
    pub fn skipped(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        info!("hypothesis test skipped: {reason}");
        HypothesisOutcome::Skipped { reason }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, HypothesisOutcome::Skipped { .. })
    }

    /// The test result, if the test ran.
    pub fn tested(&self) -> Option<&T> {
        match self {
            HypothesisOutcome::Tested(t) => Some(t),
            HypothesisOutcome::Skipped { .. } => None,
        }
    }
}

fn covariance(result: &RegressionResult) -> Result<&Mat<f64>, HypothesisError> {
    result
        .cov_params
        .as_ref()
        .ok_or(HypothesisError::InferenceUnavailable)
}

/// t-test of a single restriction r'β = q.
pub fn t_test(
    result: &RegressionResult,
    hypothesis: &LinearHypothesis,
    alpha: f64,
) -> Result<TTestResult, HypothesisError> {
    if hypothesis.len() != 1 {
        return Err(HypothesisError::NotSingleRestriction(hypothesis.len()));
    }
    let cov = covariance(result)?;
    let (r, q) = hypothesis.matrices(&result.names)?;
    let p = result.names.len();

    let estimate: f64 = (0..p).map(|j| r[(0, j)] * result.coefficients[j]).sum();
    let variance: f64 = (0..p)
        .flat_map(|i| (0..p).map(move |j| (i, j)))
        .map(|(i, j)| r[(0, i)] * cov[(i, j)] * r[(0, j)])
        .sum();
    let std_error = if variance >= 0.0 {
        variance.sqrt()
    } else {
        f64::NAN
    };

    let df = result.residual_df();
    let t_statistic = if std_error > 0.0 {
        (estimate - q[0]) / std_error
    } else {
        f64::NAN
    };
    let p_value = match StudentsT::new(0.0, 1.0, df as f64) {
        Ok(dist) if t_statistic.is_finite() => 2.0 * dist.sf(t_statistic.abs()),
        _ => f64::NAN,
    };
    let t_crit = CoefficientInference::t_critical(df as f64, result.confidence_level);

    Ok(TTestResult {
        restriction: hypothesis.to_string(),
        estimate,
        value: q[0],
        std_error,
        t_statistic,
        df,
        p_value,
        ci_lower: estimate - t_crit * std_error,
        ci_upper: estimate + t_crit * std_error,
        confidence_level: result.confidence_level,
        alpha,
        decision: Decision::for_significance(p_value, alpha),
    })
}

/// Wald F-test of Rβ = q.
///
/// F = (Rβ − q)'[R Cov R']⁻¹(Rβ − q) / J, referred to F(J, n − p).
pub fn f_test(
    result: &RegressionResult,
    hypothesis: &LinearHypothesis,
    alpha: f64,
) -> Result<FTestResult, HypothesisError> {
    if hypothesis.is_empty() {
        return Err(HypothesisError::EmptyHypothesis);
    }
    let cov = covariance(result)?;
    let (r, q) = hypothesis.matrices(&result.names)?;
    let j = hypothesis.len();

    let diff = &r * &result.coefficients - &q;
    let middle = &r * cov * r.transpose();

    // A restriction with no sampling variance (exact fit) has no Wald statistic
    let f_statistic = if (0..j).any(|k| !(middle[(k, k)] > 0.0)) {
        warn!("restriction variance is zero; F statistic is undefined");
        f64::NAN
    } else {
        let (solved, _) =
            qr_least_squares(&middle, &diff, 1e-12).ok_or(HypothesisError::Singular)?;
        let quad: f64 = (0..j).map(|k| diff[k] * solved[k]).sum();
        quad / j as f64
    };

    let df_denom = result.residual_df();
    let p_value = match FisherSnedecor::new(j as f64, df_denom as f64) {
        Ok(dist) if f_statistic.is_finite() => dist.sf(f_statistic),
        _ => f64::NAN,
    };

    Ok(FTestResult {
        restrictions: hypothesis
            .restrictions()
            .iter()
            .map(|r| r.to_string())
            .collect(),
        f_statistic,
        df_num: j,
        df_denom,
        p_value,
        alpha,
        decision: Decision::for_significance(p_value, alpha),
    })
}

/// The overall F-test stored on the fitted model.
pub fn overall_f_test(result: &RegressionResult, alpha: f64) -> OverallFTest {
    OverallFTest {
        f_statistic: result.f_statistic,
        df_model: result.model_df(),
        df_resid: result.residual_df(),
        p_value: result.f_pvalue,
        alpha,
        decision: Decision::for_significance(result.f_pvalue, alpha),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_joint_zero() {
        let h = LinearHypothesis::parse("edu_S2 = 0, edu_SMA = 0").unwrap();
        assert_eq!(h.len(), 2);
        assert_eq!(h.restrictions()[0], Restriction::zero("edu_S2"));
        assert_eq!(h.restrictions()[1], Restriction::zero("edu_SMA"));
    }

    #[test]
    fn test_parse_weights_and_constants() {
        let h = LinearHypothesis::parse("2 * x - 0.5*z + 1 = y").unwrap();
        let r = &h.restrictions()[0];
        assert_eq!(
            r.weights,
            vec![("x".into(), 2.0), ("z".into(), -0.5), ("y".into(), -1.0)]
        );
        assert_eq!(r.value, -1.0);
    }

    #[test]
    fn test_parse_scientific_notation() {
        let h = LinearHypothesis::parse("experience_years = 1e-3").unwrap();
        assert_eq!(h.restrictions()[0].weights, vec![("experience_years".into(), 1.0)]);
        assert_eq!(h.restrictions()[0].value, 1e-3);

        let h = LinearHypothesis::parse("2.5E2 * x = 1E+1").unwrap();
        assert_eq!(h.restrictions()[0].weights, vec![("x".into(), 250.0)]);
        assert_eq!(h.restrictions()[0].value, 10.0);

        // No digits after the marker: the `e` starts a name
        assert!(LinearHypothesis::parse("2e = 0").is_err());
    }

    #[test]
    fn test_parse_merges_repeated_names() {
        let h = LinearHypothesis::parse("a + a = 2").unwrap();
        assert_eq!(h.restrictions()[0].weights, vec![("a".into(), 2.0)]);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["a", "a = b = c", "= 0", "a b = 0", "a = 0,", "3 = 1", "a $ b = 0"] {
            assert!(
                matches!(LinearHypothesis::parse(bad), Err(HypothesisError::Parse { .. })),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn test_display_round_trips() {
        let h = LinearHypothesis::parse("edu_S2 - 2*edu_SMA = 0, gender_P = 1").unwrap();
        assert_eq!(h.to_string(), "edu_S2 - 2 * edu_SMA = 0, gender_P = 1");
        assert_eq!(LinearHypothesis::parse(&h.to_string()).unwrap(), h);
    }

    #[test]
    fn test_matrices() {
        let h = LinearHypothesis::parse("b - c = 1").unwrap();
        let (r, q) = h.matrices(&names(&["a", "b", "c"])).unwrap();
        assert_eq!((r[(0, 0)], r[(0, 1)], r[(0, 2)]), (0.0, 1.0, -1.0));
        assert_eq!(q[0], 1.0);

        let missing = LinearHypothesis::all_zero(&["d"]).matrices(&names(&["a"]));
        assert!(matches!(missing, Err(HypothesisError::UnknownCoefficient(n)) if n == "d"));
    }

    #[test]
    fn test_f_test_without_residual_variance_is_nan() {
        let mut result = RegressionResult::empty(names(&["const", "a", "b"]), 6);
        result.coefficients = Col::from_fn(3, |i| (i + 1) as f64);
        result.cov_params = Some(Mat::zeros(3, 3));

        let f = f_test(&result, &LinearHypothesis::all_zero(&["a", "b"]), 0.05).unwrap();
        assert!(f.f_statistic.is_nan());
        assert!(f.p_value.is_nan());
        assert_eq!(f.df_num, 2);
        assert_eq!(f.df_denom, 3);
        assert_eq!(f.decision, Decision::Undetermined);
    }

    #[test]
    fn test_f_test_redundant_restrictions_are_singular() {
        let mut result = RegressionResult::empty(names(&["const", "a"]), 6);
        result.coefficients = Col::from_fn(2, |i| (i + 1) as f64);
        result.cov_params = Some(Mat::from_fn(2, 2, |i, j| if i == j { 0.5 } else { 0.1 }));

        let h = LinearHypothesis::parse("a = 0, 2 * a = 0").unwrap();
        assert!(matches!(f_test(&result, &h, 0.05), Err(HypothesisError::Singular)));
    }

    #[test]
    fn test_skipped_outcome() {
        let outcome: HypothesisOutcome<TTestResult> = HypothesisOutcome::skipped("absent");
        assert!(outcome.is_skipped());
        assert!(outcome.tested().is_none());
    }
}
