//! Solvers for systems of ordinary differential equations (ODE)

use ndarray::*;

/// Default absolute tolerance of the adaptive integrator.
pub const DEFAULT_ABS_TOL: f64 = 1e-9;
/// Default relative tolerance of the adaptive integrator.
pub const DEFAULT_REL_TOL: f64 = 1e-7;

// Step-size controller limits.
const SAFETY_FACTOR: f64 = 0.9;
const MIN_SCALE: f64 = 0.1;
const MAX_SCALE: f64 = 10.0;
const MAX_REJECTED_STEPS: usize = 100;

/// Integrates a system of ODEs over a single time step using 4th order Runge-Kutta
///
/// `x` is the initial condition stored in a 1D-ndarray form, `c` is a Vec<f64> with constant values of the problem
///
/// # Examples
///
/// A single step of an exponential decay with rate `c[0]`:
/// ```
/// use cycle_simulator::ode_solvers::rk4_step;
/// use ndarray::array;
///
/// let decay = |_t: &f64, x: &ndarray::Array1<f64>, c: &Vec<f64>| -> ndarray::Array1<f64> {
///     array![-c[0] * x[0]]
/// };
/// let next = rk4_step(decay, &array![1.0], &vec![1.0], &0.0, 1e-3);
/// assert!((next[0] - (-1e-3f64).exp()).abs() < 1e-12);
/// ```
pub fn rk4_step<F>(f: F, x: &Array1<f64>, c: &Vec<f64>, t: &f64, step: f64) -> Array1<f64>
where
    F: Fn(&f64, &Array1<f64>, &Vec<f64>) -> Array1<f64>,
{
    let tmp = step / 2.0;
    let tmp_2 = tmp + t;
    let t_end = t + step;
    let k1 = f(&t, x, c);
    let k2 = f(&tmp_2, &(x + &(&k1 * tmp)), c);
    let k3 = f(&tmp_2, &(x + &(&k2 * tmp)), c);
    let k4 = f(&t_end, &(x + &(&k3 * step)), c);
    x + &((step / 6.0) * (k1 + 2.0 * k2 + 2.0 * k3 + k4))
}

/// Single Runge-Kutta-Fehlberg 4(5) step.
///
/// Returns the propagated 4th order solution together with the embedded
/// local error estimate (the difference to the 5th order solution).
pub fn rkf45_step<F>(
    f: &F,
    x: &Array1<f64>,
    c: &Vec<f64>,
    t: &f64,
    step: f64,
) -> (Array1<f64>, Array1<f64>)
where
    F: Fn(&f64, &Array1<f64>, &Vec<f64>) -> Array1<f64>,
{
    // Fehlberg's Butcher tableau, NASA TR R-315.
    let k1 = f(t, x, c);
    let k2 = f(&(t + step / 4.0), &(x + &(&k1 * (step / 4.0))), c);
    let k3 = f(
        &(t + 3.0 * step / 8.0),
        &(x + &(&k1 * (3.0 * step / 32.0)) + &(&k2 * (9.0 * step / 32.0))),
        c,
    );
    let k4 = f(
        &(t + 12.0 * step / 13.0),
        &(x + &(&k1 * (1932.0 * step / 2197.0)) - &(&k2 * (7200.0 * step / 2197.0))
            + &(&k3 * (7296.0 * step / 2197.0))),
        c,
    );
    let k5 = f(
        &(t + step),
        &(x + &(&k1 * (439.0 * step / 216.0)) - &(&k2 * (8.0 * step))
            + &(&k3 * (3680.0 * step / 513.0))
            - &(&k4 * (845.0 * step / 4104.0))),
        c,
    );
    let k6 = f(
        &(t + step / 2.0),
        &(x - &(&k1 * (8.0 * step / 27.0)) + &(&k2 * (2.0 * step))
            - &(&k3 * (3544.0 * step / 2565.0))
            + &(&k4 * (1859.0 * step / 4104.0))
            - &(&k5 * (11.0 * step / 40.0))),
        c,
    );

    let next = x + &((&k1 * (25.0 / 216.0) + &k3 * (1408.0 / 2565.0) + &k4 * (2197.0 / 4104.0)
        - &k5 * (1.0 / 5.0))
        * step);
    let error = (&k1 * (1.0 / 360.0) - &k3 * (128.0 / 4275.0) - &k4 * (2197.0 / 75240.0)
        + &k5 * (1.0 / 50.0)
        + &k6 * (2.0 / 55.0))
        * step;
    (next, error)
}

/// Integrates a system of ODEs with the adaptive Runge-Kutta-Fehlberg 4(5)
/// scheme, sampling the solution at every point of `t_eval`.
///
/// The step size adapts so the local error stays within
/// `tol_abs + tol_rel*|x|` per component (max-norm). Returns one row per
/// sample point; the first row is the initial condition `ini`.
///
/// Fails when `t_eval` has fewer than two strictly increasing points or
/// when the controller cannot reach the tolerance without the step size
/// underflowing.
pub fn rkf45_integrate<F>(
    f: F,
    ini: &Array1<f64>,
    c: &Vec<f64>,
    t_eval: &Array1<f64>,
    tol_abs: f64,
    tol_rel: f64,
) -> Result<Array2<f64>, String>
where
    F: Fn(&f64, &Array1<f64>, &Vec<f64>) -> Array1<f64>,
{
    if t_eval.len() < 2 {
        return Err("at least two sample points are required".to_string());
    }
    let span = t_eval[t_eval.len() - 1] - t_eval[0];
    if span <= 0.0 {
        return Err("sample points must be strictly increasing".to_string());
    }
    let min_step = span * 1e-14;

    let mut solution = Array2::zeros((t_eval.len(), ini.len()));
    solution.row_mut(0).assign(ini);

    let mut x = ini.clone();
    let mut t = t_eval[0];
    let mut step = span / 100.0;

    for (sample, &target) in t_eval.iter().enumerate().skip(1) {
        if target <= t {
            return Err("sample points must be strictly increasing".to_string());
        }
        let mut rejected = 0;
        while t < target {
            let trial = step.min(target - t);
            let (next, error) = rkf45_step(&f, &x, c, &t, trial);

            // Max-norm of the error against the per-component tolerance.
            let mut error_norm: f64 = 0.0;
            for (err, xi) in error.iter().zip(x.iter()) {
                let scale = tol_abs + tol_rel * xi.abs();
                error_norm = error_norm.max((err / scale).abs());
            }
            error_norm = error_norm.max(1e-16);
            let scale = (SAFETY_FACTOR / error_norm.powf(0.2))
                .max(MIN_SCALE)
                .min(MAX_SCALE);

            if error_norm <= 1.0 {
                x = next;
                t += trial;
                // Snap to the sample point once the remainder is below
                // the resolvable step size.
                if target - t < min_step {
                    t = target;
                }
                rejected = 0;
                step = trial * scale;
            } else {
                rejected += 1;
                step = trial * scale;
                if rejected > MAX_REJECTED_STEPS || step < min_step {
                    return Err(format!("step size underflow near t = {}", t));
                }
            }
        }
        solution.row_mut(sample).assign(&x);
    }
    Ok(solution)
}
