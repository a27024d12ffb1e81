use crate::error::{SimResult, SimulationError};
use crate::numerics::differentiation;
use crate::numerics::ode_solvers as ode;
use ndarray::*;

/// Time window of the transient solution [s].
pub const DEFAULT_TIME_SPAN: (f64, f64) = (0.0, 5.0);
/// Number of evenly spaced sample points over the time window.
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// Circuit parameters and the sinusoidal forcing voltage
/// `v_in(t) = Vm*sin(omega*t + phi)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientInput {
    pub resistance: f64,       // [ohm]
    pub inductance: f64,       // [H]
    pub capacitance: f64,      // [F]
    pub source_amplitude: f64, // Vm [V]
    pub source_frequency: f64, // omega [rad/s]
    pub source_phase: f64,     // phi [rad]
    pub time_span: (f64, f64), // [s]
    pub sample_count: usize,
}

impl TransientInput {
    /// Circuit with the default time window and sampling.
    pub fn new(
        resistance: f64,
        inductance: f64,
        capacitance: f64,
        source_amplitude: f64,
        source_frequency: f64,
        source_phase: f64,
    ) -> TransientInput {
        TransientInput {
            resistance,
            inductance,
            capacitance,
            source_amplitude,
            source_frequency,
            source_phase,
            time_span: DEFAULT_TIME_SPAN,
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

/// Time series of the transient solution, index-aligned by sample.
///
/// Produced once per solve call and not mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientResult {
    pub time: Array1<f64>,              // [s]
    pub inductor_current: Array1<f64>,  // i1 [A]
    pub capacitor_voltage: Array1<f64>, // vc [V]
    pub capacitor_current: Array1<f64>, // i2 = C*dvc/dt [A]
}

/// Solves the transient response of the series RLC circuit from a zero
/// initial condition.
///
/// The coupled first-order system in `(i1, vc)` is
///
/// ```text
/// di1/dt = (v_in(t) - R*i1 - vc) / L
/// dvc/dt = i1 / C
/// ```
///
/// integrated with the adaptive Runge-Kutta-Fehlberg scheme and sampled
/// at `sample_count` evenly spaced points. The capacitor current is
/// derived from the sampled voltage by numerical differentiation.
pub fn solve_transient(input: &TransientInput) -> SimResult<TransientResult> {
    validate(input)?;

    let resistance = input.resistance;
    let inductance = input.inductance;
    let capacitance = input.capacitance;
    let amplitude = input.source_amplitude;
    let omega = input.source_frequency;
    let phase = input.source_phase;

    // x[0] = inductor current, x[1] = capacitor voltage
    let circuit_equations = move |t: &f64, x: &Array1<f64>, _: &Vec<f64>| -> Array1<f64> {
        let v_in = amplitude * (omega * t + phase).sin();
        array![
            (v_in - resistance * x[0] - x[1]) / inductance,
            x[0] / capacitance
        ]
    };

    let time = Array::linspace(input.time_span.0, input.time_span.1, input.sample_count);
    let solution = ode::rkf45_integrate(
        circuit_equations,
        &array![0.0, 0.0],
        &Vec::new(),
        &time,
        ode::DEFAULT_ABS_TOL,
        ode::DEFAULT_REL_TOL,
    )
    .map_err(|what| SimulationError::IntegrationFailure { what })?;

    let inductor_current = solution.column(0).to_owned();
    let capacitor_voltage = solution.column(1).to_owned();
    let capacitor_current = differentiation::gradient(&capacitor_voltage, &time) * capacitance;

    Ok(TransientResult {
        time,
        inductor_current,
        capacitor_voltage,
        capacitor_current,
    })
}

fn validate(input: &TransientInput) -> SimResult<()> {
    if !input.inductance.is_finite() || input.inductance == 0.0 {
        return Err(SimulationError::invalid("inductance cannot be zero"));
    }
    if !input.capacitance.is_finite() || input.capacitance == 0.0 {
        return Err(SimulationError::invalid("capacitance cannot be zero"));
    }
    for &(value, name) in &[
        (input.resistance, "resistance"),
        (input.source_amplitude, "source amplitude"),
        (input.source_frequency, "source frequency"),
        (input.source_phase, "source phase"),
    ] {
        if !value.is_finite() {
            return Err(SimulationError::invalid(format!("{} must be finite", name)));
        }
    }
    let (start, end) = input.time_span;
    if !start.is_finite() || !end.is_finite() || end <= start {
        return Err(SimulationError::invalid(
            "time span must be a finite increasing interval",
        ));
    }
    if input.sample_count < 2 {
        return Err(SimulationError::invalid(
            "at least two sample points are required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use crate::numerics::ode_solvers as ode;
    use approx::assert_abs_diff_eq;

    fn reference_input() -> TransientInput {
        TransientInput::new(10.0, 20.0, 0.05, 20.0, 20.0, 0.0)
    }

    #[test]
    fn series_are_index_aligned() {
        let result = solve_transient(&reference_input()).unwrap();
        assert_eq!(result.time.len(), DEFAULT_SAMPLE_COUNT);
        assert_eq!(result.inductor_current.len(), DEFAULT_SAMPLE_COUNT);
        assert_eq!(result.capacitor_voltage.len(), DEFAULT_SAMPLE_COUNT);
        assert_eq!(result.capacitor_current.len(), DEFAULT_SAMPLE_COUNT);
        assert_eq!(result.time[0], 0.0);
        assert_abs_diff_eq!(
            result.time[DEFAULT_SAMPLE_COUNT - 1],
            5.0,
            epsilon = 1e-12
        );
        // Zero initial condition.
        assert_eq!(result.inductor_current[0], 0.0);
        assert_eq!(result.capacitor_voltage[0], 0.0);
    }

    #[test]
    fn zero_forcing_gives_the_zero_solution() {
        let input = TransientInput::new(10.0, 20.0, 0.05, 0.0, 0.0, 0.0);
        let result = solve_transient(&input).unwrap();
        for i in 0..result.time.len() {
            assert_eq!(result.inductor_current[i], 0.0);
            assert_eq!(result.capacitor_voltage[i], 0.0);
            assert_eq!(result.capacitor_current[i], 0.0);
        }
    }

    #[test]
    fn capacitor_current_matches_the_voltage_derivative() {
        let input = reference_input();
        let result = solve_transient(&input).unwrap();
        let t = &result.time;
        let vc = &result.capacitor_voltage;
        let n = t.len();
        // Independent central differences, one-sided at the ends.
        for i in 0..n {
            let dvc = if i == 0 {
                (vc[1] - vc[0]) / (t[1] - t[0])
            } else if i == n - 1 {
                (vc[n - 1] - vc[n - 2]) / (t[n - 1] - t[n - 2])
            } else {
                (vc[i + 1] - vc[i - 1]) / (t[i + 1] - t[i - 1])
            };
            assert_abs_diff_eq!(
                result.capacitor_current[i],
                input.capacitance * dvc,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn matches_a_dense_fixed_step_reference() {
        // Cross-check the adaptive result against the fixed-step RK4
        // solver on a much finer grid.
        let input = reference_input();
        let result = solve_transient(&input).unwrap();

        let equations = |t: &f64, x: &Array1<f64>, _: &Vec<f64>| -> Array1<f64> {
            let v_in = input.source_amplitude
                * (input.source_frequency * t + input.source_phase).sin();
            array![
                (v_in - input.resistance * x[0] - x[1]) / input.inductance,
                x[0] / input.capacitance
            ]
        };
        let steps = 50_000;
        let dt = 5.0 / steps as f64;
        let mut x = array![0.0, 0.0];
        for i in 0..steps {
            x = ode::rk4_step(&equations, &x, &Vec::new(), &(i as f64 * dt), dt);
        }
        let last = result.time.len() - 1;
        assert_abs_diff_eq!(result.inductor_current[last], x[0], epsilon = 1e-5);
        assert_abs_diff_eq!(result.capacitor_voltage[last], x[1], epsilon = 1e-5);
    }

    #[test]
    fn repeated_solves_are_bit_identical() {
        let first = solve_transient(&reference_input()).unwrap();
        let second = solve_transient(&reference_input()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_non_physical_parameters() {
        let invalid = |input: &TransientInput| {
            matches!(
                solve_transient(input),
                Err(SimulationError::InvalidParameter { .. })
            )
        };
        let mut input = reference_input();
        input.inductance = 0.0;
        assert!(invalid(&input));

        let mut input = reference_input();
        input.capacitance = 0.0;
        assert!(invalid(&input));

        let mut input = reference_input();
        input.resistance = f64::NAN;
        assert!(invalid(&input));

        let mut input = reference_input();
        input.sample_count = 1;
        assert!(invalid(&input));

        let mut input = reference_input();
        input.time_span = (5.0, 0.0);
        assert!(invalid(&input));
    }
}
