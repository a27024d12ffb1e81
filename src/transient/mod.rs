//! Transient response of the series RLC circuit
pub mod rlc;
