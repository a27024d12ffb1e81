use serde::{Deserialize, Serialize};

/// A simulation case read from a JSON file. Either section may be
/// omitted to run only the other one.
#[derive(Serialize, Deserialize, Debug)]
pub struct JsonCase {
    pub cycle: Option<JsonCycle>,
    pub transient: Option<JsonTransient>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct JsonCycle {
    pub cycle_type: String,     // "otto" | "diesel"
    pub ini_temperature: f64,   // [K]
    pub ini_pressure: f64,      // [kPa]
    pub compression_ratio: f64, // [-]
    pub cutoff_ratio: Option<f64>,
    pub heat_addition: Option<f64>, // [kJ/kg]
}

#[derive(Serialize, Deserialize, Debug)]
pub struct JsonTransient {
    pub resistance: f64,       // [ohm]
    pub inductance: f64,       // [H]
    pub capacitance: f64,      // [F]
    pub source_amplitude: f64, // [V]
    pub source_frequency: f64, // [rad/s]
    pub source_phase: f64,     // [rad]
}

/// Reads a simulation case from `file`.
pub fn read_case(file: &str) -> Result<JsonCase, String> {
    let content = std::fs::read_to_string(file)
        .map_err(|err| format!("unable to open '{}': {}", file, err))?;
    serde_json::from_str(&content).map_err(|err| format!("unable to parse '{}': {}", file, err))
}
