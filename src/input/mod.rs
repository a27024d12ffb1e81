//! Simulation case files
pub mod json_reader;
