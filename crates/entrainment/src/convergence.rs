//! Convergence

use crate::proximity::mean;

/// Pearson correlation between `-|a(t) - b(t)|` and `t`.
///
/// NaN when the gap is constant over the window (including `a == b`).
pub fn convergence(a: &[f64], b: &[f64], times: &[f64]) -> f64 {
    let gap: Vec<f64> = a.iter().zip(b).map(|(x, y)| -(x - y).abs()).collect();
    pearson(&gap, times)
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let (mx, my) = (mean(x), mean(y));
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let (dx, dy) = (xi - mx, yi - my);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    cov / (var_x * var_y).sqrt()
}
