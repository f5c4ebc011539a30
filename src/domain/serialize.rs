//! Rendering of form trees into the brace-delimited form language.

use std::collections::HashMap;

use generational_arena::Index;

use crate::domain::arena::{FormTree, NodeKind, TreeNode};
use crate::domain::entities::{ComponentUsage, FieldState, ValueExpression};
use crate::domain::traversal::traverse_dfs;

/// Render `tree` as form-language text.
///
/// Composition is post-order: every child is rendered before its parent,
/// which then wraps the concatenated child text. Indentation is one tab per
/// stored depth, so a detached subtree keeps its original indentation.
pub fn to_text(tree: &FormTree) -> String {
    let Some(root) = tree.root() else {
        return String::new();
    };

    let mut rendered: HashMap<Index, String> = HashMap::with_capacity(tree.len());
    traverse_dfs(
        root,
        |idx| tree.children(idx).to_vec(),
        |_| {},
        |idx| {
            let Some(node) = tree.get_node(idx) else {
                return;
            };
            let body: String = node
                .children()
                .iter()
                .filter_map(|child| rendered.remove(child))
                .collect();
            rendered.insert(idx, render_node(node, &body));
        },
    );

    rendered.remove(&root).unwrap_or_default()
}

fn render_node(node: &TreeNode, children: &str) -> String {
    let indent = "\t".repeat(node.data.depth as usize);
    let comp = render_usage(&node.data.usage);

    match &node.kind {
        NodeKind::Form { .. } => format!(
            "{indent}form {id} {{\n{indent}\t{comp}\n{indent}\t\n{children}{indent}}}\n",
            id = node.data.id
        ),
        NodeKind::Field { state } => {
            let state_line = state
                .as_ref()
                .map(|s| format!("{indent}\t{}\n", render_state(s)))
                .unwrap_or_default();
            format!(
                "{indent}field {id} {{\n{state_line}{indent}\t{comp}\n{indent}\t\n{indent}}}\n",
                id = node.data.id
            )
        }
    }
}

fn render_usage(usage: &ComponentUsage) -> String {
    let props: Vec<String> = usage
        .assignments
        .iter()
        .map(|a| format!("{}={}", a.key, render_value(&a.value)))
        .collect();
    format!("comp {} {}", usage.component, props.join(" "))
}

fn render_state(state: &FieldState) -> String {
    let mut line = format!(
        "state {}{}",
        state.data_type,
        if state.is_array { "[]" } else { "" }
    );
    if let Some(value) = &state.default_value {
        line.push_str(" default ");
        line.push_str(&render_value(value));
    }
    line
}

fn render_value(value: &ValueExpression) -> String {
    if value.is_expression {
        format!("\"{}\" as expression", escape(&value.text))
    } else {
        format!("\"{}\"", escape(&value.text))
    }
}

/// Escape backslash, double quote, tab and newline for a quoted string.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}
