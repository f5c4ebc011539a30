//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/formgen/formgen.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `FORMGEN_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::hyperparams::depth_limit;
use crate::domain::{
    is_valid_identifier, CatalogKind, Component, ComponentCatalog, DomainError, HyperParameters,
    LengthRange,
};

/// Unified configuration for formgen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Seed for the random source (default: seeded from the OS)
    pub seed: Option<u64>,
    /// Number of records produced by `generate`
    pub count: usize,
    /// Forget allocated identifiers before every record
    pub reset_between_records: bool,
    pub hyperparameters: HyperParameters,
    pub catalog: ComponentCatalog,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            count: 1,
            reset_between_records: false,
            hyperparameters: HyperParameters::standard(),
            catalog: ComponentCatalog::default(),
        }
    }
}

/// Raw hyperparameters for intermediate parsing (`None` = inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawHyperParameters {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    pub delta: Option<f64>,
    pub epsilon: Option<f64>,
    pub zeta: Option<f64>,
    /// `0` lifts the depth limit
    pub max_depth: Option<u32>,
    pub min_children: Option<u32>,
    pub max_children: Option<u32>,
    pub array_min: Option<u32>,
    pub array_max: Option<u32>,
    pub form_id_length: Option<LengthRange>,
    pub field_id_length: Option<LengthRange>,
}

/// Raw catalog: a specified list replaces the inherited one.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawCatalog {
    pub forms: Option<Vec<Component>>,
    pub fields: Option<Vec<Component>>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub seed: Option<u64>,
    pub count: Option<usize>,
    pub reset_between_records: Option<bool>,
    pub hyperparameters: RawHyperParameters,
    pub catalog: RawCatalog,
}

impl HyperParameters {
    fn merge_with(&self, overlay: &RawHyperParameters) -> Self {
        Self {
            alpha: overlay.alpha.unwrap_or(self.alpha),
            beta: overlay.beta.unwrap_or(self.beta),
            gamma: overlay.gamma.unwrap_or(self.gamma),
            delta: overlay.delta.unwrap_or(self.delta),
            epsilon: overlay.epsilon.unwrap_or(self.epsilon),
            zeta: overlay.zeta.unwrap_or(self.zeta),
            max_depth: overlay
                .max_depth
                .map_or(self.max_depth, depth_limit::from_raw),
            min_children: overlay.min_children.unwrap_or(self.min_children),
            max_children: overlay.max_children.unwrap_or(self.max_children),
            array_min: overlay.array_min.unwrap_or(self.array_min),
            array_max: overlay.array_max.unwrap_or(self.array_max),
            form_id_length: overlay.form_id_length.unwrap_or(self.form_id_length),
            field_id_length: overlay.field_id_length.unwrap_or(self.field_id_length),
        }
    }
}

/// Get the XDG config directory for formgen.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "formgen").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("formgen.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value; catalog lists are replaced whole.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            seed: overlay.seed.or(self.seed),
            count: overlay.count.unwrap_or(self.count),
            reset_between_records: overlay
                .reset_between_records
                .unwrap_or(self.reset_between_records),
            hyperparameters: self.hyperparameters.merge_with(&overlay.hyperparameters),
            catalog: ComponentCatalog {
                forms: overlay
                    .catalog
                    .forms
                    .clone()
                    .unwrap_or_else(|| self.catalog.forms.clone()),
                fields: overlay
                    .catalog
                    .fields
                    .clone()
                    .unwrap_or_else(|| self.catalog.fields.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    ///
    /// The result is validated before it is returned.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            debug!("load: explicit config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        let env = Config::builder()
            .add_source(
                Environment::with_prefix("FORMGEN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;
        current = Self::apply_env_overrides(current, &env)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply FORMGEN_* environment variables as explicit overrides.
    ///
    /// Only scalar settings can be overridden this way.
    fn apply_env_overrides(mut settings: Self, env: &Config) -> Result<Self, ApplicationError> {
        if let Some(val) = env_value(env, "seed")? {
            settings.seed = Some(val);
        }
        if let Some(val) = env_value(env, "count")? {
            settings.count = val;
        }
        if let Some(val) = env_value(env, "reset_between_records")? {
            settings.reset_between_records = val;
        }

        let params = &mut settings.hyperparameters;
        for (key, slot) in [
            ("hyperparameters.alpha", &mut params.alpha),
            ("hyperparameters.beta", &mut params.beta),
            ("hyperparameters.gamma", &mut params.gamma),
            ("hyperparameters.delta", &mut params.delta),
            ("hyperparameters.epsilon", &mut params.epsilon),
            ("hyperparameters.zeta", &mut params.zeta),
        ] {
            if let Some(val) = env_value(env, key)? {
                *slot = val;
            }
        }
        for (key, slot) in [
            ("hyperparameters.min_children", &mut params.min_children),
            ("hyperparameters.max_children", &mut params.max_children),
            ("hyperparameters.array_min", &mut params.array_min),
            ("hyperparameters.array_max", &mut params.array_max),
        ] {
            if let Some(val) = env_value(env, key)? {
                *slot = val;
            }
        }
        if let Some(val) = env_value(env, "hyperparameters.max_depth")? {
            params.max_depth = depth_limit::from_raw(val);
        }

        Ok(settings)
    }

    /// Check hyperparameters and catalogs before any generation starts.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.hyperparameters.validate()?;

        if self.count == 0 {
            return Err(ApplicationError::Config {
                message: "count must be at least 1".to_string(),
            });
        }

        for kind in [CatalogKind::Form, CatalogKind::Field] {
            let components = self.catalog.components(kind);
            if components.is_empty() {
                return Err(DomainError::EmptyCatalog(kind).into());
            }
            for component in components {
                if !is_valid_identifier(&component.name) {
                    return Err(ApplicationError::Config {
                        message: format!("invalid {kind} component name: {:?}", component.name),
                    });
                }
                if let Some(bad) = component
                    .properties
                    .iter()
                    .find(|p| !is_valid_identifier(&p.key))
                {
                    return Err(ApplicationError::Config {
                        message: format!(
                            "invalid property key {:?} on component {}",
                            bad.key, component.name
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# formgen configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/formgen/formgen.toml
#   File:   formgen --config <file>
#   Env:    FORMGEN_* environment variables, e.g. FORMGEN_HYPERPARAMETERS__ALPHA=0.4
#
# Catalog lists replace inherited lists entirely.

# Fixed seed for reproducible output (omit for OS randomness)
# seed = 42

# Records written by `formgen generate`
# count = 1

# Forget allocated identifiers before every record
# reset_between_records = false

[hyperparameters]
# Branching decay: a child of a depth-d form is a form with probability alpha^d
# alpha = 0.3
# Probability that a field carries state
# beta = 0.7
# Probability that a state is an array
# gamma = 0.2
# Probability that a state has a default value
# delta = 0.4
# Probability that a non-forced value is an expression
# epsilon = 0.5
# Removal decay: a node at depth d is removed with probability 1 - zeta^d
# zeta = 0.5
# No forms at this depth (0 = unlimited)
# max_depth = 4
# min_children = 0
# max_children = 6
# array_min = 0
# array_max = 3
# form_id_length = { min = 3, max = 10 }
# field_id_length = { min = 3, max = 12 }

# [[catalog.forms]]
# name = "formContainer"
#
# [[catalog.fields]]
# name = "myTextBox"
# properties = ["textColor", "textSize"]
"#
        .to_string()
    }
}

fn env_value<T: DeserializeOwned>(env: &Config, key: &str) -> Result<Option<T>, ApplicationError> {
    match env.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
