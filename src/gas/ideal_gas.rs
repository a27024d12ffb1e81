#![allow(non_snake_case)]

use crate::error::{SimResult, SimulationError};

/// Reference temperature of the gas model [K].
pub const REFERENCE_TEMPERATURE: f64 = 273.15;
/// Reference pressure of the gas model [kPa].
pub const REFERENCE_PRESSURE: f64 = 101.325;

/// Immutable thermodynamic properties of an ideal gas.
///
/// The specific heats are derived from the gas constant and the
/// specific-heat ratio: `cp = gamma*R/(gamma - 1)` and `cv = R/(gamma - 1)`.
/// Units are kJ/(kg.K) throughout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasProperties {
    gas_const: f64, // [kJ/(kg.K)]
    gamma: f64,     // cp/cv
    cp: f64,        // [kJ/(kg.K)]
    cv: f64,        // [kJ/(kg.K)]
}

impl GasProperties {
    /// Creates gas properties from the specific gas constant and the
    /// specific-heat ratio. `gas_const` must be positive and `gamma`
    /// greater than one.
    pub fn new(gas_const: f64, gamma: f64) -> SimResult<GasProperties> {
        if !gas_const.is_finite() || gas_const <= 0.0 {
            return Err(SimulationError::invalid("gas constant must be positive"));
        }
        if !gamma.is_finite() || gamma <= 1.0 {
            return Err(SimulationError::invalid(
                "specific-heat ratio must be greater than one",
            ));
        }
        Ok(GasProperties {
            gas_const,
            gamma,
            cp: gamma * gas_const / (gamma - 1.0),
            cv: gas_const / (gamma - 1.0),
        })
    }

    /// Standard air: R = 0.287 kJ/(kg.K), gamma = 1.4.
    pub fn air() -> GasProperties {
        GasProperties {
            gas_const: 0.287,
            gamma: 1.4,
            cp: 1.4 * 0.287 / 0.4,
            cv: 0.287 / 0.4,
        }
    }

    pub fn R(&self) -> f64 {
        self.gas_const
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn cp(&self) -> f64 {
        self.cp
    }

    pub fn cv(&self) -> f64 {
        self.cv
    }
}

/// Thermodynamic state of the gas.
///
/// Always satisfies `P*v = R*T`: a state can only be built from a
/// [`StateSpec`], which fixes two of the variables and derives the third
/// from the ideal-gas law. The fields are not publicly mutable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasState {
    temperature: f64, // [K]
    pressure: f64,    // [kPa]
    volume: f64,      // specific volume [m³/kg]
}

impl GasState {
    /// Derives the full state from two of the three variables.
    pub fn from_spec(properties: &GasProperties, spec: StateSpec) -> GasState {
        let R = properties.R();
        match spec {
            StateSpec::TP {
                temperature,
                pressure,
            } => GasState {
                temperature,
                pressure,
                volume: R * temperature / pressure,
            },
            StateSpec::TV {
                temperature,
                volume,
            } => GasState {
                temperature,
                pressure: R * temperature / volume,
                volume,
            },
            StateSpec::PV { pressure, volume } => GasState {
                temperature: pressure * volume / R,
                pressure,
                volume,
            },
        }
    }

    pub fn T(&self) -> f64 {
        self.temperature
    }

    pub fn P(&self) -> f64 {
        self.pressure
    }

    pub fn v(&self) -> f64 {
        self.volume
    }
}

/// Two of the three state variables; the third comes from `P*v = R*T`.
///
/// Making the combinations explicit keeps the contract exhaustive: there
/// is no way to hand the model fewer than two variables or a conflicting
/// triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateSpec {
    TP { temperature: f64, pressure: f64 },
    TV { temperature: f64, volume: f64 },
    PV { pressure: f64, volume: f64 },
}

/// An ideal gas with a current thermodynamic state.
#[derive(Debug, Clone)]
pub struct IdealGas {
    properties: GasProperties,
    state: GasState,
}

impl IdealGas {
    /// Creates the gas at the reference state (273.15 K, 101.325 kPa).
    pub fn new(properties: GasProperties) -> IdealGas {
        let state = GasState::from_spec(
            &properties,
            StateSpec::TP {
                temperature: REFERENCE_TEMPERATURE,
                pressure: REFERENCE_PRESSURE,
            },
        );
        IdealGas { properties, state }
    }

    /// Standard air at the reference state.
    pub fn air() -> IdealGas {
        IdealGas::new(GasProperties::air())
    }

    /// Puts the gas back at the reference state.
    pub fn reset(&mut self) {
        self.state = GasState::from_spec(
            &self.properties,
            StateSpec::TP {
                temperature: REFERENCE_TEMPERATURE,
                pressure: REFERENCE_PRESSURE,
            },
        );
    }

    /// Sets two state variables and derives the third.
    /// # Examples
    /// ```
    /// use cycle_simulator::{IdealGas, StateSpec};
    ///
    /// let mut gas = IdealGas::air();
    /// gas.set_state(StateSpec::TP { temperature: 300.0, pressure: 100.0 });
    /// assert_eq!(300.0, gas.state().T());
    /// assert_eq!(100.0, gas.state().P());
    /// ```
    pub fn set_state(&mut self, spec: StateSpec) {
        self.state = GasState::from_spec(&self.properties, spec);
    }

    pub fn state(&self) -> &GasState {
        &self.state
    }

    pub fn properties(&self) -> &GasProperties {
        &self.properties
    }
}
