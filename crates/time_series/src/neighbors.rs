//! Neighbour search backends
//!
//! Both backends return the unweighted mean of the `k` observations whose
//! midpoints are closest to the query time. Ties go to the smaller index.
//! Midpoints must be strictly ascending and `1 <= k <= midpoints.len()`.

use contracts::NeighborBackend;

/// k-NN means for every query, in the caller's order.
pub(crate) fn knn_means(
    backend: NeighborBackend,
    midpoints: &[f64],
    values: &[f64],
    k: usize,
    queries: &[f64],
) -> Vec<f64> {
    match backend {
        NeighborBackend::BruteForce => queries
            .iter()
            .map(|&x| brute_force_mean(midpoints, values, k, x))
            .collect(),
        NeighborBackend::Incremental => {
            let mut order: Vec<usize> = (0..queries.len()).collect();
            order.sort_by(|&a, &b| queries[a].total_cmp(&queries[b]));

            let mut window = NeighborWindow::new(midpoints, values, k);
            let mut out = vec![0.0; queries.len()];
            for idx in order {
                out[idx] = window.advance(queries[idx]);
            }
            out
        }
    }
}

/// Rank every observation by `(|m - x|, index)` and average the first `k`.
pub(crate) fn brute_force_mean(midpoints: &[f64], values: &[f64], k: usize, x: f64) -> f64 {
    let mut ranked: Vec<usize> = (0..midpoints.len()).collect();
    ranked.sort_by(|&a, &b| {
        (midpoints[a] - x)
            .abs()
            .total_cmp(&(midpoints[b] - x).abs())
            .then(a.cmp(&b))
    });
    ranked.iter().take(k).map(|&i| values[i]).sum::<f64>() / k as f64
}

/// Sliding window of `k` contiguous neighbours for ascending queries.
///
/// Holds `[left, left + k)` and its running sum. Queries must not decrease
/// between calls to [`NeighborWindow::advance`].
#[derive(Debug)]
pub(crate) struct NeighborWindow<'a> {
    midpoints: &'a [f64],
    values: &'a [f64],
    k: usize,
    left: usize,
    /// First index whose midpoint is `>= x`
    anchor: usize,
    sum: f64,
    primed: bool,
}

impl<'a> NeighborWindow<'a> {
    pub(crate) fn new(midpoints: &'a [f64], values: &'a [f64], k: usize) -> Self {
        debug_assert_eq!(midpoints.len(), values.len());
        debug_assert!(k >= 1 && k <= midpoints.len());
        Self {
            midpoints,
            values,
            k,
            left: 0,
            anchor: 0,
            sum: 0.0,
            primed: false,
        }
    }

    /// Move the window to `x` and return the neighbour mean.
    pub(crate) fn advance(&mut self, x: f64) -> f64 {
        let n = self.midpoints.len();
        while self.anchor < n && self.midpoints[self.anchor] < x {
            self.anchor += 1;
        }

        if !self.primed || self.anchor > self.left + self.k {
            self.rebuild(x);
            self.primed = true;
        } else {
            while self.left + self.k < n
                && self.distance(self.left + self.k, x) < self.distance(self.left, x)
            {
                self.sum += self.values[self.left + self.k] - self.values[self.left];
                self.left += 1;
            }
        }

        self.sum / self.k as f64
    }

    /// Grow outward from the anchor, absorbing the closer side first.
    fn rebuild(&mut self, x: f64) {
        let n = self.midpoints.len();
        let mut lo = self.anchor;
        let mut hi = self.anchor;
        while hi - lo < self.k {
            let take_left = match (lo > 0, hi < n) {
                (true, true) => self.distance(lo - 1, x) <= self.distance(hi, x),
                (true, false) => true,
                (false, _) => false,
            };
            if take_left {
                lo -= 1;
            } else {
                hi += 1;
            }
        }
        self.left = lo;
        self.sum = self.values[lo..hi].iter().sum();
    }

    #[inline]
    fn distance(&self, idx: usize, x: f64) -> f64 {
        (self.midpoints[idx] - x).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const MIDPOINTS: [f64; 6] = [2.0, 10.0, 20.0, 30.0, 38.0, 48.0];
    const VALUES: [f64; 6] = [100.0, 200.0, 300.0, 100.0, 200.0, 300.0];

    fn random_series(rng: &mut StdRng, n: usize) -> (Vec<f64>, Vec<f64>) {
        let mut t = 0.0;
        let mut midpoints = Vec::with_capacity(n);
        let mut values = Vec::with_capacity(n);
        for _ in 0..n {
            t += rng.random_range(0.05..3.0);
            midpoints.push(t);
            values.push(rng.random_range(50.0..400.0));
        }
        (midpoints, values)
    }

    #[test]
    fn test_brute_force_tie_goes_left() {
        // 6.0 is equidistant from 2.0 and 10.0
        let mean = brute_force_mean(&MIDPOINTS, &VALUES, 1, 6.0);
        assert_eq!(mean, 100.0);
        let mean = brute_force_mean(&MIDPOINTS, &VALUES, 1, 6.0001);
        assert_eq!(mean, 200.0);
    }

    #[test]
    fn test_window_boundaries_asymmetric() {
        let mut window = NeighborWindow::new(&MIDPOINTS, &VALUES, 3);
        // before the first midpoint: three leftmost observations
        assert!((window.advance(-5.0) - 200.0).abs() < 1e-9);
        // after the last midpoint: three rightmost observations
        assert!((window.advance(100.0) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_k_equals_n() {
        let mut window = NeighborWindow::new(&MIDPOINTS, &VALUES, 6);
        for x in [0.0, 20.0, 25.0, 60.0] {
            assert!((window.advance(x) - 200.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_incremental_matches_brute_force_on_grid() {
        let queries: Vec<f64> = (0..=5000).map(|i| i as f64 * 0.01).collect();
        for k in 1..=MIDPOINTS.len() {
            let fast = knn_means(NeighborBackend::Incremental, &MIDPOINTS, &VALUES, k, &queries);
            let slow = knn_means(NeighborBackend::BruteForce, &MIDPOINTS, &VALUES, k, &queries);
            for (i, (a, b)) in fast.iter().zip(&slow).enumerate() {
                assert!((a - b).abs() < 1e-9, "k={k} query={} {a} != {b}", queries[i]);
            }
        }
    }

    #[test]
    fn test_incremental_matches_brute_force_random() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let n = rng.random_range(1..40);
            let (midpoints, values) = random_series(&mut rng, n);
            let k = rng.random_range(1..=n);
            let span = midpoints[n - 1] + 5.0;

            let mut queries: Vec<f64> = (0..200).map(|_| rng.random_range(-5.0..span)).collect();
            // exact midpoints and halfway points exercise ties
            queries.extend(midpoints.iter().copied());
            queries.extend(midpoints.windows(2).map(|w| (w[0] + w[1]) / 2.0));

            let fast = knn_means(NeighborBackend::Incremental, &midpoints, &values, k, &queries);
            let slow = knn_means(NeighborBackend::BruteForce, &midpoints, &values, k, &queries);
            for (i, (a, b)) in fast.iter().zip(&slow).enumerate() {
                assert!(
                    (a - b).abs() < 1e-6,
                    "n={n} k={k} query={} incremental={a} brute={b}",
                    queries[i]
                );
            }
        }
    }

    #[test]
    fn test_unsorted_queries_scattered_back() {
        let queries = [48.0, 2.0, 30.0, -1.0];
        let fast = knn_means(NeighborBackend::Incremental, &MIDPOINTS, &VALUES, 1, &queries);
        assert_eq!(fast, vec![300.0, 100.0, 100.0, 100.0]);
    }
}
