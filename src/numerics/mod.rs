//! Numerical routines shared by the simulation models
pub mod differentiation;
pub mod ode_solvers;
