//! Structural properties of generated form trees across many seeds.

use std::collections::HashSet;

use rstest::rstest;

use formgen::util::testing;

use formgen::domain::{
    ComponentCatalog, DataType, FormGenerator, FormTree, HyperParameters, NodeKind,
};

fn generate(seed: u64, params: HyperParameters) -> (FormTree, usize) {
    let mut generator =
        FormGenerator::from_seed(seed, params, ComponentCatalog::default()).unwrap();
    let tree = generator.generate_form().unwrap();
    let allocated = generator.identifiers().len();
    (tree, allocated)
}

// ============================================================
// Identifier uniqueness
// ============================================================

#[rstest]
fn given_any_seed_when_generating_then_ids_unique_and_all_allocated(
    #[values(1, 2, 3, 5, 8, 13, 21, 34)] seed: u64,
) {
    testing::init_test_setup();
    let (tree, allocated) = generate(seed, HyperParameters::standard());

    let ids: HashSet<&str> = tree.ids().into_iter().collect();
    assert_eq!(ids.len(), tree.len(), "duplicate id in tree");
    assert_eq!(allocated, tree.len());
}

#[test]
fn given_one_session_when_generating_many_trees_then_ids_unique_across_trees() {
    let mut generator =
        FormGenerator::from_seed(77, HyperParameters::standard(), ComponentCatalog::default())
            .unwrap();
    let mut seen = HashSet::new();
    let mut total = 0;

    for _ in 0..20 {
        let tree = generator.generate_form().unwrap();
        total += tree.len();
        for id in tree.ids() {
            assert!(seen.insert(id.to_string()), "id {id} reused");
        }
    }

    assert_eq!(generator.identifiers().len(), total);
}

// ============================================================
// Depth invariants
// ============================================================

#[rstest]
fn given_depth_limit_when_generating_then_depths_consistent_and_no_form_at_limit(
    #[values(4, 9, 16, 25, 36)] seed: u64,
    #[values(1, 2, 4)] max_depth: u32,
) {
    let params = HyperParameters::standard()
        .with_alpha(0.9)
        .with_max_depth(Some(max_depth));
    let (tree, _) = generate(seed, params);

    let root = tree.root_node().unwrap();
    assert_eq!(root.data.depth, 0);

    for (idx, node) in tree.iter() {
        for &child in tree.children(idx) {
            let child_node = tree.get_node(child).unwrap();
            assert_eq!(child_node.data.depth, node.data.depth + 1);
            assert_eq!(child_node.parent, Some(idx));
        }
        if node.is_form() && node.data.depth > 0 {
            assert!(
                node.data.depth < max_depth,
                "form {} at depth {} with limit {}",
                node.data.id,
                node.data.depth,
                max_depth
            );
        }
    }
}

#[rstest]
fn given_zero_minimum_when_generating_then_root_still_has_a_child(
    #[values(0, 1, 2, 3, 4, 5, 6, 7, 8, 9)] seed: u64,
) {
    let params = HyperParameters::standard().with_children(0, 1);
    let (tree, _) = generate(seed, params);

    assert!(!tree.root_node().unwrap().children().is_empty());
}

// ============================================================
// Field state
// ============================================================

#[test]
fn given_certain_state_when_generating_then_every_field_has_state() {
    let params = HyperParameters::standard().with_beta(0.999_999);
    let mut generator =
        FormGenerator::from_seed(2024, params, ComponentCatalog::default()).unwrap();

    let mut fields = 0;
    let mut stateful = 0;
    for _ in 0..10 {
        let tree = generator.generate_form().unwrap();
        for (_, node) in tree.iter() {
            if let NodeKind::Field { state } = &node.kind {
                fields += 1;
                if state.is_some() {
                    stateful += 1;
                }
            }
        }
    }

    assert!(fields > 0);
    assert_eq!(fields, stateful);
}

#[test]
fn given_array_bounds_when_generating_then_array_defaults_respect_them() {
    let params = HyperParameters {
        beta: 0.99,
        gamma: 0.99,
        delta: 0.99,
        array_min: 2,
        array_max: 3,
        ..HyperParameters::standard()
    };
    let mut generator =
        FormGenerator::from_seed(5, params, ComponentCatalog::default()).unwrap();

    for _ in 0..10 {
        let tree = generator.generate_form().unwrap();
        for (_, node) in tree.iter() {
            if let NodeKind::Field {
                state: Some(state), ..
            } = &node.kind
            {
                if let (true, Some(value)) = (state.is_array, &state.default_value) {
                    let elements: Vec<serde_json::Value> =
                        serde_json::from_str(&value.text).unwrap();
                    assert!((2..=3).contains(&elements.len()));
                    assert!(value.is_expression);
                }
            }
        }
    }
}

#[rstest]
#[case::never_expression(0.0, false)]
#[case::almost_always_expression(0.999_999, true)]
fn given_epsilon_when_generating_then_scalar_string_defaults_follow_it(
    #[case] epsilon: f64,
    #[case] expect_expression: bool,
) {
    let params = HyperParameters {
        beta: 0.999_999,
        gamma: 0.0,
        delta: 0.999_999,
        epsilon,
        ..HyperParameters::standard()
    };
    let mut generator =
        FormGenerator::from_seed(11, params, ComponentCatalog::default()).unwrap();

    let mut strings = 0;
    for _ in 0..20 {
        let tree = generator.generate_form().unwrap();
        for (_, node) in tree.iter() {
            let NodeKind::Field { state: Some(state) } = &node.kind else {
                continue;
            };
            let Some(value) = &state.default_value else {
                continue;
            };
            assert!(!state.is_array);
            if state.data_type != DataType::String {
                assert!(value.is_expression);
                continue;
            }
            strings += 1;
            assert_eq!(value.is_expression, expect_expression, "{value:?}");
            if expect_expression {
                let text = value.text.as_str();
                let quoted = text.len() >= 2
                    && ['\'', '"']
                        .iter()
                        .any(|&q| text.starts_with(q) && text.ends_with(q));
                assert!(quoted, "unquoted expression {:?}", value.text);
            }
        }
    }

    assert!(strings > 0);
}

#[test]
fn given_catalog_when_generating_then_usages_reference_catalog_components() {
    let catalog = ComponentCatalog::default();
    let (tree, _) = generate(64, HyperParameters::standard());

    for (_, node) in tree.iter() {
        let pool = if node.is_form() {
            &catalog.forms
        } else {
            &catalog.fields
        };
        let component = pool
            .iter()
            .find(|c| c.name == node.data.usage.component)
            .expect("component from the matching catalog");
        for assignment in &node.data.usage.assignments {
            assert!(component.properties.iter().any(|p| p.key == assignment.key));
        }
    }
}
