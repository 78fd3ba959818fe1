//! Small matrix helpers shared by the solvers and diagnostics.

mod matrix;

pub use matrix::{
    column, detect_constant_columns, numerical_rank, qr_least_squares, select_columns,
    sum_of_squares,
};
