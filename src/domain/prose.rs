//! English descriptions of nodes and removal contexts.

use itertools::Itertools;

use crate::domain::arena::FormTree;
use crate::domain::entities::{NodeRole, NodeSummary, RemovalContext, ValueExpression};

/// One sentence describing the root node of `tree` (its subtree is not described).
pub fn to_prose(tree: &FormTree) -> String {
    match tree.root_node() {
        Some(node) => describe_node(&node.summary()),
        None => String::new(),
    }
}

/// Full sentence for a single node, including properties and state.
pub fn describe_node(node: &NodeSummary) -> String {
    let mut sentence = capitalize(&reference(node));

    let assignments = &node.data.usage.assignments;
    if !assignments.is_empty() {
        let props = assignments
            .iter()
            .map(|a| format!("{} set to {}", a.key, describe_value(&a.value)))
            .collect::<Vec<_>>();
        sentence.push_str(" with properties ");
        sentence.push_str(&join_and(&props));
    }

    if let NodeRole::Field { state } = &node.role {
        match state {
            Some(state) => {
                sentence.push_str(&format!(
                    ", holding a {}{} state",
                    state.data_type,
                    if state.is_array { "[]" } else { "" }
                ));
                if let Some(value) = &state.default_value {
                    sentence.push_str(" with default value ");
                    sentence.push_str(&describe_value(value));
                }
            }
            None => sentence.push_str(", without state"),
        }
    }

    sentence.push('.');
    sentence
}

/// Up to two sentences: the parent, then the immediate siblings.
///
/// A sentence is omitted when its relation is absent, so a root yields none
/// and an only child yields just the parent sentence.
pub fn describe_removal_context(context: &RemovalContext) -> Vec<String> {
    let mut sentences = Vec::with_capacity(2);

    if let Some(parent) = &context.parent {
        sentences.push(format!("It was a child of {}.", reference(parent)));
    }

    match (&context.preceding_sibling, &context.following_sibling) {
        (Some(before), Some(after)) => sentences.push(format!(
            "It was located between {} and {}.",
            reference(before),
            reference(after)
        )),
        (Some(before), None) => {
            sentences.push(format!("It was located after {}.", reference(before)))
        }
        (None, Some(after)) => {
            sentences.push(format!("It was located before {}.", reference(after)))
        }
        (None, None) => {}
    }

    sentences
}

/// Context sentences as a `* ` bullet list, one per line.
pub fn context_bullets(context: &RemovalContext) -> String {
    describe_removal_context(context)
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| format!("* {s}"))
        .join("\n")
}

fn reference(node: &NodeSummary) -> String {
    let kind = if node.is_form() { "form" } else { "field" };
    format!(
        "a {kind} whose id is '{}', using component '{}'",
        node.data.id, node.data.usage.component
    )
}

fn describe_value(value: &ValueExpression) -> String {
    if value.is_expression {
        format!("the expression `{}`", value.text)
    } else {
        format!("\"{}\"", value.text)
    }
}

fn join_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
