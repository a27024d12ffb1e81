//! Contains the **IdealGas** model and its thermodynamic state relations
pub mod ideal_gas;
