use crate::error::{SimResult, SimulationError};
use crate::gas::ideal_gas::{GasProperties, GasState, IdealGas, StateSpec};

/// Heat added during the Otto constant-volume leg when none is given [kJ/kg].
///
/// The value is a deliberate simplification of the model, not a physical
/// constant; `run_otto_with_heat` takes it as a parameter instead.
pub const DEFAULT_HEAT_ADDITION: f64 = 1000.0;

/// A single thermodynamic process between two cycle states.
///
/// Every leg is a closed-form relation: it fixes two of the state
/// variables of the next state and lets the ideal-gas law close the
/// triple, so no numerical integration is involved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleLeg {
    /// Isentropic compression by `ratio`: `T2 = T1*ratio^(gamma-1)`,
    /// `v2 = v1/ratio`.
    IsentropicCompression { ratio: f64 },
    /// Isentropic expansion by `ratio`: `T2 = T1/ratio^(gamma-1)`,
    /// `v2 = v1*ratio`.
    IsentropicExpansion { ratio: f64 },
    /// Heat addition at constant volume: `T2 = T1 + heat/cv` [kJ/kg].
    ConstantVolumeHeatAddition { heat: f64 },
    /// Expansion at constant pressure up to the cutoff ratio:
    /// `v2 = v1*cutoff`.
    ConstantPressureExpansion { cutoff: f64 },
}

impl CycleLeg {
    /// The two state variables defining the state after this leg.
    pub fn step(&self, gas: &GasProperties, state: &GasState) -> StateSpec {
        match *self {
            CycleLeg::IsentropicCompression { ratio } => StateSpec::TV {
                temperature: state.T() * ratio.powf(gas.gamma() - 1.0),
                volume: state.v() / ratio,
            },
            CycleLeg::IsentropicExpansion { ratio } => StateSpec::TV {
                temperature: state.T() / ratio.powf(gas.gamma() - 1.0),
                volume: state.v() * ratio,
            },
            CycleLeg::ConstantVolumeHeatAddition { heat } => StateSpec::TV {
                temperature: state.T() + heat / gas.cv(),
                volume: state.v(),
            },
            CycleLeg::ConstantPressureExpansion { cutoff } => StateSpec::PV {
                pressure: state.P(),
                volume: state.v() * cutoff,
            },
        }
    }

    /// Heat transferred to the gas along this leg [kJ/kg]. Isentropic
    /// legs exchange none.
    fn heat_transfer(&self, gas: &GasProperties, before: &GasState, after: &GasState) -> f64 {
        match *self {
            CycleLeg::IsentropicCompression { .. } | CycleLeg::IsentropicExpansion { .. } => 0.0,
            CycleLeg::ConstantVolumeHeatAddition { .. } => gas.cv() * (after.T() - before.T()),
            CycleLeg::ConstantPressureExpansion { .. } => gas.cp() * (after.T() - before.T()),
        }
    }
}

/// States 1..4 of the cycle plus its derived performance metrics.
///
/// Created fresh per `run_otto`/`run_diesel` call and never mutated
/// afterwards. `states` reads as a pressure-specific-volume point
/// sequence for a P-v diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleResult {
    pub states: [GasState; 4],
    pub heat_in: f64,    // [kJ/kg]
    pub heat_out: f64,   // [kJ/kg]
    pub net_work: f64,   // [kJ/kg]
    pub efficiency: f64, // [-]
}

impl std::fmt::Display for CycleResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "state\tT [K]\tP [kPa]\tv [m³/kg]")?;
        for (i, state) in self.states.iter().enumerate() {
            writeln!(
                f,
                "{}\t{:.2}\t{:.2}\t{:.5}",
                i + 1,
                state.T(),
                state.P(),
                state.v()
            )?;
        }
        write!(
            f,
            "heat in: {:.2} [kJ/kg]
heat out: {:.2} [kJ/kg]
net work: {:.2} [kJ/kg]
efficiency: {:.4}",
            self.heat_in, self.heat_out, self.net_work, self.efficiency
        )
    }
}

/// Drives an ideal gas through the ordered legs of an Otto or Diesel
/// cycle and derives the performance metrics.
///
/// The model holds only the gas properties; the gas state lives inside
/// each call, so repeated calls are independent of each other.
#[derive(Debug, Clone)]
pub struct CycleModel {
    gas: GasProperties,
}

impl CycleModel {
    /// Cycle model working on standard air.
    pub fn new() -> CycleModel {
        CycleModel {
            gas: GasProperties::air(),
        }
    }

    /// Cycle model working on the given gas.
    pub fn with_gas(gas: GasProperties) -> CycleModel {
        CycleModel { gas }
    }

    /// Otto cycle with the default constant-volume heat addition.
    ///
    /// `ini_temp` [K] and `ini_press` [kPa] fix state 1,
    /// `compression_ratio` drives the two isentropic legs.
    /// # Examples
    /// ```
    /// use cycle_simulator::CycleModel;
    ///
    /// let result = CycleModel::new().run_otto(300.0, 100.0, 8.0).unwrap();
    /// assert!((result.efficiency - 0.5647).abs() < 1e-3);
    /// ```
    pub fn run_otto(
        &self,
        ini_temp: f64,
        ini_press: f64,
        compression_ratio: f64,
    ) -> SimResult<CycleResult> {
        self.run_otto_with_heat(ini_temp, ini_press, compression_ratio, DEFAULT_HEAT_ADDITION)
    }

    /// Otto cycle with an explicit constant-volume heat addition [kJ/kg].
    pub fn run_otto_with_heat(
        &self,
        ini_temp: f64,
        ini_press: f64,
        compression_ratio: f64,
        heat_addition: f64,
    ) -> SimResult<CycleResult> {
        validate_initial_state(ini_temp, ini_press)?;
        validate_ratio(compression_ratio, "compression ratio")?;
        if !heat_addition.is_finite() || heat_addition < 0.0 {
            return Err(SimulationError::invalid(
                "heat addition cannot be negative",
            ));
        }
        Ok(self.run(
            ini_temp,
            ini_press,
            [
                CycleLeg::IsentropicCompression {
                    ratio: compression_ratio,
                },
                CycleLeg::ConstantVolumeHeatAddition {
                    heat: heat_addition,
                },
                CycleLeg::IsentropicExpansion {
                    ratio: compression_ratio,
                },
            ],
        ))
    }

    /// Diesel cycle: constant-pressure heat addition up to `cutoff_ratio`,
    /// then isentropic expansion over the remaining ratio `r/rc`.
    pub fn run_diesel(
        &self,
        ini_temp: f64,
        ini_press: f64,
        compression_ratio: f64,
        cutoff_ratio: f64,
    ) -> SimResult<CycleResult> {
        validate_initial_state(ini_temp, ini_press)?;
        validate_ratio(compression_ratio, "compression ratio")?;
        validate_ratio(cutoff_ratio, "cutoff ratio")?;
        if cutoff_ratio > compression_ratio {
            return Err(SimulationError::invalid(
                "cutoff ratio cannot exceed the compression ratio",
            ));
        }
        Ok(self.run(
            ini_temp,
            ini_press,
            [
                CycleLeg::IsentropicCompression {
                    ratio: compression_ratio,
                },
                CycleLeg::ConstantPressureExpansion {
                    cutoff: cutoff_ratio,
                },
                CycleLeg::IsentropicExpansion {
                    ratio: compression_ratio / cutoff_ratio,
                },
            ],
        ))
    }

    /// Runs the three legs from state 1 and derives the metrics. The
    /// implicit fourth leg closing the cycle rejects heat at constant
    /// volume: `Q_out = cv*(T4 - T1)`.
    fn run(&self, ini_temp: f64, ini_press: f64, legs: [CycleLeg; 3]) -> CycleResult {
        let mut air = IdealGas::new(self.gas);
        air.set_state(StateSpec::TP {
            temperature: ini_temp,
            pressure: ini_press,
        });

        let mut states = [*air.state(); 4];
        let mut heat_in = 0.0;
        for (i, leg) in legs.iter().enumerate() {
            let next = leg.step(air.properties(), air.state());
            air.set_state(next);
            states[i + 1] = *air.state();
            heat_in += leg.heat_transfer(&self.gas, &states[i], &states[i + 1]);
        }

        let heat_out = self.gas.cv() * (states[3].T() - states[0].T());
        let net_work = heat_in - heat_out;
        // The degenerate zero-heat cycle produces no work.
        let efficiency = if heat_in == 0.0 {
            0.0
        } else {
            net_work / heat_in
        };
        CycleResult {
            states,
            heat_in,
            heat_out,
            net_work,
            efficiency,
        }
    }
}

impl Default for CycleModel {
    fn default() -> CycleModel {
        CycleModel::new()
    }
}

fn validate_initial_state(ini_temp: f64, ini_press: f64) -> SimResult<()> {
    if !ini_temp.is_finite() || ini_temp <= 0.0 {
        return Err(SimulationError::invalid(
            "initial temperature must be positive",
        ));
    }
    if !ini_press.is_finite() || ini_press <= 0.0 {
        return Err(SimulationError::invalid(
            "initial pressure must be positive",
        ));
    }
    Ok(())
}

fn validate_ratio(ratio: f64, name: &str) -> SimResult<()> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(SimulationError::invalid(format!(
            "{} must be positive",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn otto_efficiency_matches_the_closed_form() {
        // eta = 1 - r^(1-gamma) for any valid r > 1.
        let model = CycleModel::new();
        let gamma = GasProperties::air().gamma();
        for &r in &[2.0, 4.5, 8.0, 12.0, 20.0] {
            let result = model.run_otto(300.0, 100.0, r).unwrap();
            assert_relative_eq!(
                result.efficiency,
                1.0 - r.powf(1.0 - gamma),
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn otto_textbook_example() {
        let result = CycleModel::new().run_otto(300.0, 100.0, 8.0).unwrap();
        assert_relative_eq!(result.efficiency, 0.5647, max_relative = 1e-3);
        assert_relative_eq!(result.heat_in, DEFAULT_HEAT_ADDITION, max_relative = 1e-9);
        assert_relative_eq!(
            result.net_work,
            result.heat_in - result.heat_out,
            max_relative = 1e-12
        );
    }

    #[test]
    fn every_recorded_state_satisfies_the_gas_law() {
        let gas = GasProperties::air();
        let model = CycleModel::new();
        let otto = model.run_otto(300.0, 100.0, 8.0).unwrap();
        let diesel = model.run_diesel(300.0, 100.0, 18.0, 2.0).unwrap();
        for state in otto.states.iter().chain(diesel.states.iter()) {
            assert_relative_eq!(
                state.P() * state.v(),
                gas.R() * state.T(),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn diesel_efficiency_matches_the_closed_form() {
        // eta = 1 - r^(1-gamma) * (rc^gamma - 1)/(gamma*(rc - 1))
        let gamma = GasProperties::air().gamma();
        let (r, rc) = (18.0, 2.0);
        let result = CycleModel::new().run_diesel(300.0, 100.0, r, rc).unwrap();
        let expected =
            1.0 - r.powf(1.0 - gamma) * (rc.powf(gamma) - 1.0) / (gamma * (rc - 1.0));
        assert_relative_eq!(result.efficiency, expected, max_relative = 1e-9);
    }

    #[test]
    fn diesel_with_unit_cutoff_adds_no_heat() {
        // rc = 1 shrinks the heat-addition leg to nothing: state 3 equals
        // state 2, the expansion undoes the compression and the metrics
        // collapse to zero.
        let result = CycleModel::new().run_diesel(300.0, 100.0, 8.0, 1.0).unwrap();
        assert_eq!(result.states[1].v(), result.states[2].v());
        assert_abs_diff_eq!(result.states[2].T(), result.states[1].T(), epsilon = 1e-9);
        assert_abs_diff_eq!(result.heat_in, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.net_work, 0.0, epsilon = 1e-9);
        assert_relative_eq!(result.states[3].T(), 300.0, max_relative = 1e-12);
    }

    #[test]
    fn diesel_approaches_otto_as_the_cutoff_shrinks() {
        let gamma = GasProperties::air().gamma();
        let r = 8.0;
        let result = CycleModel::new()
            .run_diesel(300.0, 100.0, r, 1.0 + 1e-6)
            .unwrap();
        assert_relative_eq!(
            result.efficiency,
            1.0 - r.powf(1.0 - gamma),
            max_relative = 1e-4
        );
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let model = CycleModel::new();
        let first = model.run_otto(300.0, 100.0, 8.0).unwrap();
        let second = model.run_otto(300.0, 100.0, 8.0).unwrap();
        assert_eq!(first, second);

        let first = model.run_diesel(290.0, 95.0, 16.0, 2.5).unwrap();
        let second = model.run_diesel(290.0, 95.0, 16.0, 2.5).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_non_physical_parameters() {
        let model = CycleModel::new();
        let invalid = |r: SimResult<CycleResult>| {
            matches!(r, Err(SimulationError::InvalidParameter { .. }))
        };
        assert!(invalid(model.run_otto(300.0, 100.0, 0.0)));
        assert!(invalid(model.run_otto(300.0, 100.0, -8.0)));
        assert!(invalid(model.run_otto(-300.0, 100.0, 8.0)));
        assert!(invalid(model.run_otto(300.0, 0.0, 8.0)));
        assert!(invalid(model.run_otto_with_heat(300.0, 100.0, 8.0, -1.0)));
        assert!(invalid(model.run_diesel(300.0, 100.0, 8.0, 0.0)));
        assert!(invalid(model.run_diesel(300.0, 100.0, 8.0, 9.0)));
        assert!(invalid(model.run_diesel(300.0, 100.0, f64::NAN, 2.0)));
    }

    #[test]
    fn custom_gas_changes_the_specific_heats_but_not_the_identity() {
        // Monatomic gas, gamma = 5/3: the Otto identity holds for any gas.
        let gas = GasProperties::new(2.0769, 5.0 / 3.0).unwrap(); // helium
        let model = CycleModel::with_gas(gas);
        let result = model.run_otto(300.0, 100.0, 8.0).unwrap();
        assert_relative_eq!(
            result.efficiency,
            1.0 - 8.0f64.powf(1.0 - 5.0 / 3.0),
            max_relative = 1e-9
        );
    }
}
