//! Model fitting
//!
//! Fits a measurement series against the canonical growth models with a
//! one-parameter least-squares scale and picks the model with the lowest
//! normalized error (1 - R²).
//!
//! # Example
//!
//! ```rust,ignore
//! use complexity_engine::features::model_fitting::ModelFitter;
//!
//! let fit = ModelFitter::default().fit(&measurements)?;
//! println!("{} ({}%)", fit.model, fit.confidence);
//! ```

pub mod domain;
pub mod infrastructure;

pub use domain::{ComplexityModel, FitResult, ModelScore, MODEL_BASIS};
pub use infrastructure::ModelFitter;
