//! # cycle_simulator
//!
//! The `cycle_simulator` crate provides an easy way to simulate ideal-gas
//! power cycles (Otto and Diesel) and the transient response of a series
//! RLC circuit.
//!
//! The cycle engine drives an ideal gas through the closed-form process
//! legs of the chosen cycle and reports the four corner states together
//! with heat input, net work and thermal efficiency. The transient solver
//! integrates the circuit's second-order system with an adaptive
//! Runge-Kutta scheme and reports the inductor current, capacitor voltage
//! and capacitor current as index-aligned time series.
//!
//! ```
//! use cycle_simulator::CycleModel;
//!
//! let model = CycleModel::new();
//! let result = model.run_otto(300.0, 100.0, 8.0).unwrap();
//! println!("{}", result);
//! ```

mod cycle;
mod error;
mod gas;
mod input;
mod numerics;
mod transient;

// Re-exporting
pub use crate::cycle::cycle_model::{CycleLeg, CycleModel, CycleResult, DEFAULT_HEAT_ADDITION};
pub use crate::error::{SimResult, SimulationError};
pub use crate::gas::ideal_gas::{GasProperties, GasState, IdealGas, StateSpec};
pub use crate::input::json_reader;
pub use crate::numerics::ode_solvers;
pub use crate::transient::rlc::{solve_transient, TransientInput, TransientResult};
