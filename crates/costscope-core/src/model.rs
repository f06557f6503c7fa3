use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ModelError;
use crate::types::{EstimationModelResult, ProjectSpec};
use crate::{cocomo, function_point};

/// The estimation models the engine can run. Each variant is a pure
/// function of the project spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EstimationModel {
    Cocomo,
    FunctionPoint,
}

impl EstimationModel {
    pub const ALL: [EstimationModel; 2] = [EstimationModel::Cocomo, EstimationModel::FunctionPoint];

    pub fn estimate(&self, spec: &ProjectSpec) -> EstimationModelResult {
        match self {
            EstimationModel::Cocomo => cocomo::estimate(spec),
            EstimationModel::FunctionPoint => function_point::estimate(spec),
        }
    }
}

impl fmt::Display for EstimationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimationModel::Cocomo => write!(f, "cocomo"),
            EstimationModel::FunctionPoint => write!(f, "functionPoint"),
        }
    }
}

impl std::str::FromStr for EstimationModel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "cocomo" => Ok(EstimationModel::Cocomo),
            "functionpoint" | "fp" => Ok(EstimationModel::FunctionPoint),
            _ => Err(ModelError::UnknownModel(s.to_string())),
        }
    }
}

/// Results of both models, surfaced separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationModels {
    pub cocomo: EstimationModelResult,
    pub function_point: EstimationModelResult,
    pub function_points: u64,
}

impl EstimationModels {
    pub fn compute(spec: &ProjectSpec) -> Self {
        Self {
            cocomo: EstimationModel::Cocomo.estimate(spec),
            function_point: EstimationModel::FunctionPoint.estimate(spec),
            function_points: function_point::function_points(spec),
        }
    }

    pub fn get(&self, model: EstimationModel) -> &EstimationModelResult {
        match model {
            EstimationModel::Cocomo => &self.cocomo,
            EstimationModel::FunctionPoint => &self.function_point,
        }
    }
}
