//! Component catalogs: read-only views over the available form and field components.

use std::fmt;

use rand::{seq::IndexedRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Declarable property of a component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyKey {
    pub key: String,
}

impl From<&str> for PropertyKey {
    fn from(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }
}

/// Named component template with a fixed, ordered set of property keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyKey>,
}

impl Component {
    pub fn new(name: &str, properties: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            properties: properties.iter().map(|p| PropertyKey::from(*p)).collect(),
        }
    }
}

/// Which of the two catalogs a component comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Form,
    Field,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Form => write!(f, "form"),
            CatalogKind::Field => write!(f, "field"),
        }
    }
}

/// The two disjoint component catalogs supplied by the caller.
///
/// Catalogs are assumed to be validated upstream; the only check performed
/// here is that a catalog is non-empty at the moment a component is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentCatalog {
    pub forms: Vec<Component>,
    pub fields: Vec<Component>,
}

impl Default for ComponentCatalog {
    fn default() -> Self {
        Self {
            forms: vec![
                Component::new("userDetailsContainer", &[]),
                Component::new("formContainer", &[]),
                Component::new("someOtherContainer", &[]),
                Component::new("OtherContainer2", &[]),
            ],
            fields: vec![
                Component::new(
                    "myTextBox",
                    &["textColor", "textSize", "textWeight", "borderColor"],
                ),
                Component::new("myCheckbox", &["size"]),
                Component::new("otherTextBox", &[]),
                Component::new("counter", &["style"]),
            ],
        }
    }
}

impl ComponentCatalog {
    pub fn new(forms: Vec<Component>, fields: Vec<Component>) -> Self {
        Self { forms, fields }
    }

    pub fn components(&self, kind: CatalogKind) -> &[Component] {
        match kind {
            CatalogKind::Form => &self.forms,
            CatalogKind::Field => &self.fields,
        }
    }

    /// Draw a component uniformly from the given catalog.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        kind: CatalogKind,
        random: &mut R,
    ) -> DomainResult<&Component> {
        self.components(kind)
            .choose(random)
            .ok_or(DomainError::EmptyCatalog(kind))
    }

    pub fn find(&self, kind: CatalogKind, name: &str) -> Option<&Component> {
        self.components(kind).iter().find(|c| c.name == name)
    }
}
