//! Function documentation under the pointer.

use std::fmt::Write as _;

use serde::Serialize;

use crate::completion::{FunctionDescription, FunctionRegistry};
use crate::syntax::{Bias, NodeKind, SyntaxTree};

const LOG_TARGET: &str = "exprbridge::hover";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverInfo {
    /// Anchor range: exactly the resolved function-name node.
    pub start: usize,
    pub end: usize,
    pub name: String,
    pub markdown: String,
}

/// Resolve `pos` to a documented function name.
pub fn hover(
    tree: &SyntaxTree,
    text: &str,
    registry: &FunctionRegistry,
    pos: usize,
    bias: Bias,
) -> Option<HoverInfo> {
    let node = tree.resolve_inner(pos, bias);
    if node.kind != NodeKind::FunctionName {
        return None;
    }
    let name = text.get(node.start..node.end)?.to_uppercase();
    let Some(description) = registry.get(&name) else {
        log::debug!(target: LOG_TARGET, "No documentation for {}", name);
        return None;
    };

    Some(HoverInfo {
        start: node.start,
        end: node.end,
        name: description.name.clone(),
        markdown: render_markdown(description),
    })
}

pub fn render_markdown(description: &FunctionDescription) -> String {
    let mut out = format!("**{}**", description.name);
    if !description.syntax.is_empty() {
        let _ = write!(out, " `{}`", description.syntax);
    }
    if !description.description.is_empty() {
        let _ = write!(out, "\n\n{}", description.description);
    }
    if !description.examples.is_empty() {
        out.push_str("\n\n**Examples**\n");
        for example in &description.examples {
            let _ = write!(out, "\n- `{}`", example);
        }
    }
    out
}
