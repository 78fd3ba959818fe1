//! Text-rendered visual diagnostics: residual histogram, normal QQ plot and
//! residuals against fitted values.

use super::DiagnosticError;
use faer::Col;
use statrs::distribution::{ContinuousCDF, Normal};

/// Number of histogram bins used in the reports.
pub const HISTOGRAM_BINS: usize = 8;

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` bin edges, ascending.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins over [min, max].
    ///
    /// The last bin is closed on the right. When every value is equal the
    /// range is widened to [v − 0.5, v + 0.5].
    pub fn new(values: &Col<f64>, bins: usize) -> Result<Self, DiagnosticError> {
        if values.nrows() == 0 || bins == 0 {
            return Err(DiagnosticError::TooFewObservations {
                needed: 1,
                got: values.nrows(),
            });
        }

        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins).map(|k| lo + width * k as f64).collect();

        let mut counts = vec![0; bins];
        for &v in values.iter() {
            let k = (((v - lo) / width) as usize).min(bins - 1);
            counts[k] += 1;
        }

        Ok(Self { edges, counts })
    }

    /// One line per bin: range and a bar of `#`, the tallest `width` wide.
    pub fn render(&self, width: usize) -> String {
        let max = self.counts.iter().copied().max().unwrap_or(0).max(1);
        let mut out = String::new();
        for (k, &count) in self.counts.iter().enumerate() {
            let bar = count * width / max;
            out.push_str(&format!(
                "[{:>9.3}, {:>9.3}) {:>4} | {}\n",
                self.edges[k],
                self.edges[k + 1],
                count,
                "#".repeat(bar)
            ));
        }
        out
    }
}

/// A point of a normal QQ plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QqPoint {
    /// Standard normal quantile Φ⁻¹(i / (n + 1)).
    pub theoretical: f64,
    /// i-th smallest standardised residual.
    pub sample: f64,
}

/// Normal QQ points for residuals.
///
/// Residuals are standardised by their mean and their standard deviation
/// with divisor n, sorted, and paired with Φ⁻¹(i / (n + 1)), i = 1..n.
pub fn qq_points(residuals: &Col<f64>) -> Result<Vec<QqPoint>, DiagnosticError> {
    let n = residuals.nrows();
    if n < 2 {
        return Err(DiagnosticError::TooFewObservations { needed: 2, got: n });
    }

    let mean = residuals.iter().sum::<f64>() / n as f64;
    let std = (residuals.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n as f64).sqrt();
    if std <= 0.0 {
        return Err(DiagnosticError::ZeroVariance);
    }

    let mut sample: Vec<f64> = residuals.iter().map(|e| (e - mean) / std).collect();
    sample.sort_by(f64::total_cmp);

    let normal = Normal::new(0.0, 1.0).map_err(|e| DiagnosticError::Distribution(e.to_string()))?;

    Ok(sample
        .into_iter()
        .enumerate()
        .map(|(i, s)| QqPoint {
            theoretical: normal.inverse_cdf((i + 1) as f64 / (n + 1) as f64),
            sample: s,
        })
        .collect())
}

/// `(fitted, residual)` pairs in observation order.
pub fn residuals_vs_fitted(fitted: &Col<f64>, residuals: &Col<f64>) -> Vec<(f64, f64)> {
    fitted
        .iter()
        .copied()
        .zip(residuals.iter().copied())
        .collect()
}

/// Reference line drawn behind a scatter plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceLine {
    /// y = x, drawn with `/`.
    Diagonal,
    /// y = 0, drawn with `-`.
    Zero,
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Render points on a `width` × `height` character grid with a reference line.
pub fn render_scatter(
    points: &[(f64, f64)],
    width: usize,
    height: usize,
    reference: ReferenceLine,
) -> String {
    if points.is_empty() || width < 2 || height < 2 {
        return String::new();
    }

    let (mut x_lo, mut x_hi) = bounds(points.iter().map(|p| p.0));
    let (mut y_lo, mut y_hi) = bounds(points.iter().map(|p| p.1));

    match reference {
        ReferenceLine::Diagonal => {
            let lo = x_lo.min(y_lo);
            let hi = x_hi.max(y_hi);
            (x_lo, x_hi, y_lo, y_hi) = (lo, hi, lo, hi);
        }
        ReferenceLine::Zero => {
            y_lo = y_lo.min(0.0);
            y_hi = y_hi.max(0.0);
        }
    }
    if x_hi <= x_lo {
        x_hi = x_lo + 1.0;
    }
    if y_hi <= y_lo {
        y_hi = y_lo + 1.0;
    }

    let col = |x: f64| (((x - x_lo) / (x_hi - x_lo)) * (width - 1) as f64).round() as usize;
    let row = |y: f64| {
        let r = (((y - y_lo) / (y_hi - y_lo)) * (height - 1) as f64).round() as usize;
        height - 1 - r.min(height - 1)
    };

    let mut grid = vec![vec![' '; width]; height];
    match reference {
        ReferenceLine::Diagonal => {
            for c in 0..width {
                let x = x_lo + (x_hi - x_lo) * c as f64 / (width - 1) as f64;
                grid[row(x)][c] = '/';
            }
        }
        ReferenceLine::Zero => {
            let r = row(0.0);
            for c in (0..width).step_by(2) {
                grid[r][c] = '-';
            }
        }
    }
    for &(x, y) in points {
        grid[row(y)][col(x).min(width - 1)] = '*';
    }

    let mut out = String::new();
    for (r, line) in grid.iter().enumerate() {
        let label = if r == 0 {
            format!("{y_hi:>8.2}")
        } else if r == height - 1 {
            format!("{y_lo:>8.2}")
        } else {
            " ".repeat(8)
        };
        out.push_str(&label);
        out.push_str(" |");
        out.extend(line.iter());
        out.push('\n');
    }
    out.push_str(&format!(
        "{} +{}\n{} {:<w$.2}{:>8.2}\n",
        " ".repeat(8),
        "-".repeat(width),
        " ".repeat(8),
        x_lo,
        x_hi,
        w = width.saturating_sub(8) + 1
    ));
    out
}
