//! Ideal-gas power cycles (Otto and Diesel)
pub mod cycle_model;
