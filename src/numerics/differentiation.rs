//! Finite-difference derivatives of sampled series.

use ndarray::prelude::*;

/// Derivative `dy/dt` of a sampled series.
///
/// Central differences in the interior, one-sided differences at the
/// boundaries. `y` and `t` must have the same length of at least two.
pub fn gradient(y: &Array1<f64>, t: &Array1<f64>) -> Array1<f64> {
    let n = y.len();
    assert!(
        n == t.len() && n >= 2,
        "gradient requires two equally long series"
    );
    let mut dy = Array1::zeros(n);
    dy[0] = (y[1] - y[0]) / (t[1] - t[0]);
    for i in 1..n - 1 {
        dy[i] = (y[i + 1] - y[i - 1]) / (t[i + 1] - t[i - 1]);
    }
    dy[n - 1] = (y[n - 1] - y[n - 2]) / (t[n - 1] - t[n - 2]);
    dy
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gradient_of_a_line_is_its_slope() {
        let t = Array::linspace(0.0, 1.0, 11);
        let y = t.mapv(|x| 3.0 * x - 2.0);
        for d in gradient(&y, &t).iter() {
            assert_relative_eq!(*d, 3.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn gradient_of_a_parabola_is_exact_in_the_interior() {
        // Central differences are exact for quadratics on a uniform grid.
        let t = Array::linspace(0.0, 2.0, 21);
        let y = t.mapv(|x| x * x);
        let dy = gradient(&y, &t);
        for (d, &x) in dy.iter().zip(t.iter()).skip(1).take(19) {
            assert_relative_eq!(*d, 2.0 * x, epsilon = 1e-12);
        }
    }
}
