//! Per-segment min-max rescaling of score tables.
//!
//! Each segment's score table is rescaled into `[0, 1]` column by column,
//! using only that segment's own values: training and test segments are
//! scaled independently, so no test statistic leaks into training scaling
//! and vice versa. A constant column (max == min) maps every entry to a
//! fixed midpoint instead of dividing by zero.

/// Value assigned to every entry of a constant column.
pub const CONSTANT_COLUMN_MIDPOINT: f64 = 0.5;

/// Rescale one column into `[0, 1]` in place.
pub fn min_max_scale(column: &mut [f64]) {
    if column.is_empty() {
        return;
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in column.iter() {
        min = min.min(v);
        max = max.max(v);
    }
    if max > min {
        let range = max - min;
        for v in column.iter_mut() {
            *v = (*v - min) / range;
        }
    } else {
        for v in column.iter_mut() {
            *v = CONSTANT_COLUMN_MIDPOINT;
        }
    }
}

/// Rescale a column into `[0, 1]`, returning a new vector.
pub fn min_max_scaled(column: &[f64]) -> Vec<f64> {
    let mut scaled = column.to_vec();
    min_max_scale(&mut scaled);
    scaled
}
