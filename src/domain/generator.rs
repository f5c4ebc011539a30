//! Stochastic form-tree generator.
//!
//! One `FormGenerator` is one session: it owns the random source and the set
//! of identifiers handed out so far. Trees are built eagerly, depth-first, and
//! only read afterwards (apart from the explicit removal in `removal.rs`).

use generational_arena::Index;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument, trace};

use crate::domain::arena::{FormTree, NodeKind};
use crate::domain::catalog::{CatalogKind, ComponentCatalog};
use crate::domain::entities::{ComponentUsage, DataType, FieldState, NodeData};
use crate::domain::error::DomainResult;
use crate::domain::hyperparams::HyperParameters;
use crate::domain::identifier::IdentifierAllocator;
use crate::domain::sampler::ValueSampler;

#[derive(Debug)]
pub struct FormGenerator<R: Rng> {
    pub(crate) random: R,
    pub(crate) params: HyperParameters,
    ids: IdentifierAllocator,
    catalog: ComponentCatalog,
    sampler: ValueSampler,
}

impl FormGenerator<StdRng> {
    /// Deterministic session seeded from `seed`.
    pub fn from_seed(
        seed: u64,
        params: HyperParameters,
        catalog: ComponentCatalog,
    ) -> DomainResult<Self> {
        Self::new(StdRng::seed_from_u64(seed), params, catalog)
    }
}

impl<R: Rng> FormGenerator<R> {
    /// Start a session. Parameters are validated before anything is sampled.
    pub fn new(random: R, params: HyperParameters, catalog: ComponentCatalog) -> DomainResult<Self> {
        params.validate()?;
        let sampler = ValueSampler::new(params.epsilon);
        Ok(Self {
            random,
            params,
            ids: IdentifierAllocator::new(),
            catalog,
            sampler,
        })
    }

    pub fn params(&self) -> &HyperParameters {
        &self.params
    }

    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    pub fn identifiers(&self) -> &IdentifierAllocator {
        &self.ids
    }

    /// Forget all identifiers allocated in this session.
    pub fn clear(&mut self) {
        debug!("clear: dropping {} identifiers", self.ids.len());
        self.ids.clear();
    }

    /// Build a complete random form tree.
    ///
    /// The root is a form at depth 0 with at least one child. Children of a
    /// form are created together when the form is reached, so randomness is
    /// consumed in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn generate_form(&mut self) -> DomainResult<FormTree> {
        let mut tree = FormTree::new();
        let root = self.create_node(&mut tree, None, 0, true)?;

        let mut stack = vec![root];
        while let Some(form_idx) = stack.pop() {
            let depth = tree
                .get_node(form_idx)
                .map(|node| node.data.depth)
                .unwrap_or_default();

            let min = if form_idx == root {
                self.params.min_children.max(1)
            } else {
                self.params.min_children
            };
            let count = self.random.random_range(min..=self.params.max_children.max(min));
            let branching = self.params.branching_probability(depth);
            trace!("generate_form: depth {depth}, {count} children, p(form)={branching}");

            let mut forms = Vec::new();
            for _ in 0..count {
                let is_form = self.random.random_bool(branching);
                let child = self.create_node(&mut tree, Some(form_idx), depth + 1, is_form)?;
                if is_form {
                    forms.push(child);
                }
            }
            // Reverse push for left-to-right expansion
            stack.extend(forms.into_iter().rev());
        }

        debug!(
            "generate_form: {} nodes, height {}",
            tree.len(),
            tree.height()
        );
        Ok(tree)
    }

    fn create_node(
        &mut self,
        tree: &mut FormTree,
        parent: Option<Index>,
        depth: u32,
        is_form: bool,
    ) -> DomainResult<Index> {
        let (kind, bounds) = if is_form {
            (CatalogKind::Form, self.params.form_id_length)
        } else {
            (CatalogKind::Field, self.params.field_id_length)
        };

        let id = self.ids.allocate(&mut self.random, bounds.min, bounds.max)?;
        let component = self.catalog.choose(kind, &mut self.random)?;
        let assignments = self
            .sampler
            .sample_property_assignments(&mut self.random, component);
        let usage = ComponentUsage {
            component: component.name.clone(),
            assignments,
        };

        let node_kind = if is_form {
            NodeKind::Form {
                children: Vec::new(),
            }
        } else {
            NodeKind::Field {
                state: self.sample_state(),
            }
        };

        tree.insert_node(NodeData { id, depth, usage }, node_kind, parent)
    }

    fn sample_state(&mut self) -> Option<FieldState> {
        if !self.random.random_bool(self.params.beta) {
            return None;
        }

        let data_type = DataType::ALL[self.random.random_range(0..DataType::ALL.len())];
        let is_array = self.random.random_bool(self.params.gamma);
        let array_length = if is_array {
            self.random
                .random_range(self.params.array_min..=self.params.array_max) as usize
        } else {
            0
        };

        let default_value = if self.random.random_bool(self.params.delta) {
            let force_expression = is_array
                || data_type != DataType::String
                || self.random.random_bool(self.params.epsilon);
            Some(self.sampler.sample_field_value(
                &mut self.random,
                data_type,
                is_array,
                force_expression,
                array_length,
            ))
        } else {
            None
        };

        Some(FieldState {
            data_type,
            is_array,
            default_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;

    fn standard(seed: u64) -> FormGenerator<StdRng> {
        FormGenerator::from_seed(seed, HyperParameters::standard(), ComponentCatalog::default())
            .unwrap()
    }

    #[test]
    fn given_invalid_parameters_when_creating_generator_then_fails_before_sampling() {
        let params = HyperParameters::standard().with_children(0, 0);
        let result = FormGenerator::from_seed(1, params, ComponentCatalog::default());
        assert!(matches!(
            result,
            Err(DomainError::InvalidHyperParameter {
                name: "max_children",
                ..
            })
        ));
    }

    #[test]
    fn given_same_seed_when_generating_then_trees_are_identical() {
        let first = standard(99).generate_form().unwrap();
        let second = standard(99).generate_form().unwrap();
        assert_eq!(first.ids(), second.ids());
    }

    #[test]
    fn given_generator_when_generating_then_root_is_form_with_children() {
        let mut generator = standard(3);
        for _ in 0..50 {
            let tree = generator.generate_form().unwrap();
            let root = tree.root_node().unwrap();
            assert!(root.is_form());
            assert_eq!(root.data.depth, 0);
            assert!(!root.children().is_empty());
        }
    }

    #[test]
    fn given_zero_alpha_when_generating_then_tree_has_at_most_three_levels() {
        let params = HyperParameters::standard().with_alpha(0.0);
        let mut generator =
            FormGenerator::from_seed(5, params, ComponentCatalog::default()).unwrap();

        let tree = generator.generate_form().unwrap();

        // alpha^0 = 1: root children are forms, everything below is a field
        assert!(tree.height() <= 3);
    }

    #[test]
    fn given_empty_field_catalog_when_generating_then_errors() {
        let catalog = ComponentCatalog::new(ComponentCatalog::default().forms, vec![]);
        let params = HyperParameters::standard().with_max_depth(Some(1));
        let mut generator = FormGenerator::from_seed(1, params, catalog).unwrap();

        assert_eq!(
            generator.generate_form().unwrap_err(),
            DomainError::EmptyCatalog(CatalogKind::Field)
        );
    }

    #[test]
    fn given_generated_states_when_checking_then_all_consistent() {
        let mut generator = standard(31);
        for _ in 0..30 {
            let tree = generator.generate_form().unwrap();
            for (_, node) in tree.iter() {
                if let NodeKind::Field { state: Some(state) } = &node.kind {
                    assert!(state.is_consistent(), "{state:?}");
                    if let Some(value) = &state.default_value {
                        if state.is_array {
                            assert!(value.text.starts_with('['));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn given_session_when_clearing_then_identifiers_reset() {
        let mut generator = standard(8);
        let tree = generator.generate_form().unwrap();
        assert_eq!(generator.identifiers().len(), tree.len());

        generator.clear();

        assert!(generator.identifiers().is_empty());
    }
}
