//! Hyperparameters governing tree shape, field state and removal.

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::identifier::MAX_IDENTIFIER_LENGTH;

/// Inclusive identifier length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

impl LengthRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

/// Complete parameter set for one generator session.
///
/// All probabilities live in `[0, 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperParameters {
    /// Base of the branching decay: a child of a depth-`d` form is a form with probability `alpha^d`.
    pub alpha: f64,
    /// Probability that a field carries state.
    pub beta: f64,
    /// Probability that a state is an array.
    pub gamma: f64,
    /// Probability that a state has a default value.
    pub delta: f64,
    /// Probability that a non-forced value is expression-form.
    pub epsilon: f64,
    /// Removal decay: a node at depth `d` is removed with probability `1 - zeta^d`.
    pub zeta: f64,
    /// No form is generated at this depth. Written as `0` when unlimited.
    #[serde(with = "depth_limit")]
    pub max_depth: Option<u32>,
    pub min_children: u32,
    pub max_children: u32,
    pub array_min: u32,
    pub array_max: u32,
    pub form_id_length: LengthRange,
    pub field_id_length: LengthRange,
}

/// `max_depth` on the wire: `0` stands for no limit.
pub mod depth_limit {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn from_raw(raw: u32) -> Option<u32> {
        (raw != 0).then_some(raw)
    }

    pub fn serialize<S: Serializer>(limit: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(limit.unwrap_or(0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        Option::<u32>::deserialize(deserializer).map(|raw| raw.and_then(from_raw))
    }
}

impl Default for HyperParameters {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            beta: 0.0,
            gamma: 0.0,
            delta: 0.0,
            epsilon: 0.0,
            zeta: 0.5,
            max_depth: None,
            min_children: 0,
            max_children: 2,
            array_min: 0,
            array_max: 3,
            form_id_length: LengthRange::new(3, 10),
            field_id_length: LengthRange::new(3, 12),
        }
    }
}

impl HyperParameters {
    /// The stock parameter set used for dataset generation.
    pub fn standard() -> Self {
        Self {
            alpha: 0.3,
            beta: 0.7,
            gamma: 0.2,
            delta: 0.4,
            epsilon: 0.5,
            max_depth: Some(4),
            max_children: 6,
            ..Self::default()
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_zeta(mut self, zeta: f64) -> Self {
        self.zeta = zeta;
        self
    }

    pub fn with_max_depth(mut self, depth: Option<u32>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_children(mut self, min: u32, max: u32) -> Self {
        self.min_children = min;
        self.max_children = max;
        self
    }

    pub fn with_array_length(mut self, min: u32, max: u32) -> Self {
        self.array_min = min;
        self.array_max = max;
        self
    }

    /// Reject out-of-range values before any sampling happens.
    pub fn validate(&self) -> DomainResult<()> {
        for (name, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
            ("delta", self.delta),
            ("epsilon", self.epsilon),
            ("zeta", self.zeta),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(invalid(name, format!("{value} is not in [0, 1)")));
            }
        }

        if self.max_children < 1 {
            return Err(invalid("max_children", "must be at least 1".to_string()));
        }
        if self.min_children > self.max_children {
            return Err(invalid(
                "min_children",
                format!("{} exceeds max_children {}", self.min_children, self.max_children),
            ));
        }
        if self.array_min > self.array_max {
            return Err(invalid(
                "array_min",
                format!("{} exceeds array_max {}", self.array_min, self.array_max),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(invalid("max_depth", "must be at least 1".to_string()));
        }

        for (name, range) in [
            ("form_id_length", self.form_id_length),
            ("field_id_length", self.field_id_length),
        ] {
            if range.max < range.min || range.max == 0 || range.min > MAX_IDENTIFIER_LENGTH {
                return Err(invalid(
                    name,
                    format!("invalid bounds {}..={}", range.min, range.max),
                ));
            }
        }

        Ok(())
    }

    /// Probability that a child slot of a form at `depth` holds a form.
    pub fn branching_probability(&self, depth: u32) -> f64 {
        if self.max_depth == Some(depth + 1) {
            return 0.0;
        }
        self.alpha.powi(depth as i32)
    }

    /// Probability that a node at `depth` is picked during a removal pass.
    pub fn removal_probability(&self, depth: u32) -> f64 {
        1.0 - self.zeta.powi(depth as i32)
    }
}

fn invalid(name: &'static str, reason: String) -> DomainError {
    DomainError::InvalidHyperParameter { name, reason }
}
