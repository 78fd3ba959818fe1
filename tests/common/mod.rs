//! Common test utilities and data generators.

#![allow(dead_code)]

use dummy_regress::core::{AnalysisSchema, RegressionOptions};
use dummy_regress::data::{read_delimited, ObservationTable};
use dummy_regress::design::DesignMatrix;
use dummy_regress::PreparedModel;
use faer::{Col, Mat};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

pub const GENDERS: [&str; 2] = ["L", "P"];
pub const EDUCATION: [&str; 3] = ["SMA", "S1", "S2"];

/// Salary-shaped CSV text with `n` rows:
///
/// salary = 3 + 0.5 * experience + 0.4 * [P] + 2 * [S1] + 4.5 * [S2] + noise
///
/// Levels cycle so every level appears whenever `n >= 6`.
pub fn salary_csv(n: usize, noise_std: f64, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, noise_std.max(f64::MIN_POSITIVE)).unwrap();

    let mut text = String::from("employee_id,gender,education_level,experience_years,salary_million\n");
    for i in 0..n {
        let gender = GENDERS[i % 2];
        let education = EDUCATION[(i / 2) % 3];
        let experience: f64 = rng.gen_range(0..15) as f64;
        let mut salary = 3.0 + 0.5 * experience;
        if gender == "P" {
            salary += 0.4;
        }
        salary += match education {
            "S1" => 2.0,
            "S2" => 4.5,
            _ => 0.0,
        };
        if noise_std > 0.0 {
            salary += noise.sample(&mut rng);
        }
        text.push_str(&format!(
            "{},{gender},{education},{experience},{salary:.4}\n",
            i + 1
        ));
    }
    text
}

/// Parse CSV text into a raw table.
pub fn table_from_csv(text: &str) -> ObservationTable {
    read_delimited(text.as_bytes(), b',').expect("valid csv")
}

/// Salary table with `n` rows.
pub fn salary_table(n: usize, noise_std: f64, seed: u64) -> ObservationTable {
    table_from_csv(&salary_csv(n, noise_std, seed))
}

/// Fit `schema` on `table` with default options.
pub fn prepare(table: ObservationTable, schema: AnalysisSchema) -> PreparedModel {
    PreparedModel::from_table(table, schema, RegressionOptions::default()).expect("fit succeeds")
}

/// Fit the salary schema on a generated table.
pub fn salary_model(n: usize, noise_std: f64, seed: u64) -> PreparedModel {
    prepare(salary_table(n, noise_std, seed), AnalysisSchema::salary())
}

/// Design `[const | x1 .. xk]` with independent standard-normal columns, and
/// y = 1 + sum_j (j + 1) * x_j + noise.
pub fn generate_linear_data(
    n_samples: usize,
    n_features: usize,
    noise_std: f64,
    seed: u64,
) -> (DesignMatrix, Col<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();

    let draws: Vec<f64> = (0..n_samples * n_features)
        .map(|_| normal.sample(&mut rng))
        .collect();
    let noise: Vec<f64> = (0..n_samples).map(|_| normal.sample(&mut rng)).collect();

    let x = Mat::from_fn(n_samples, n_features, |i, j| draws[i * n_features + j]);
    let y = Col::from_fn(n_samples, |i| {
        let signal: f64 = (0..n_features).map(|j| (j + 1) as f64 * x[(i, j)]).sum();
        1.0 + signal + noise_std * noise[i]
    });

    let names = (0..n_features).map(|j| format!("x{}", j + 1)).collect();
    let design = DesignMatrix::with_intercept(names, x).unwrap();
    (design, y)
}

/// Design whose third column is exactly `x1 + 2 * x2`.
pub fn generate_collinear_design(n_samples: usize) -> DesignMatrix {
    let x = Mat::from_fn(n_samples, 3, |i, j| {
        let x1 = i as f64;
        let x2 = ((i * 7) % 5) as f64;
        match j {
            0 => x1,
            1 => x2,
            _ => x1 + 2.0 * x2,
        }
    });
    let names = vec!["x1".to_string(), "x2".to_string(), "x3".to_string()];
    DesignMatrix::with_intercept(names, x).unwrap()
}

/// Independent standard-normal draws.
pub fn normal_sample(n: usize, seed: u64) -> Col<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let draws: Vec<f64> = (0..n).map(|_| normal.sample(&mut rng)).collect();
    Col::from_fn(n, |i| draws[i])
}

/// Approximate equality check for floating point values.
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}
