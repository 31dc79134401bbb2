//! Model fitting infrastructure

pub mod fitter;

pub use fitter::ModelFitter;
