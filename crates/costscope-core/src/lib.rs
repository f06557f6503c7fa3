pub mod budget;
pub mod cocomo;
pub mod config;
pub mod error;
pub mod financial;
pub mod function_point;
pub mod model;
pub mod monte_carlo;
pub mod orchestrator;
pub mod risk;
pub mod scenario;
pub mod sensitivity;
pub mod types;
pub mod validation;

pub use config::Config;
pub use error::{ConfigError, EngineError, ModelError, NumericError, ValidationFailure};
pub use model::{EstimationModel, EstimationModels};
pub use orchestrator::{EstimationOrchestrator, EstimationReport};
pub use validation::RawRequest;
pub use types::*;
