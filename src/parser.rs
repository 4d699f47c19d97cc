use crate::error::ParseError;
use crate::tree::LabelNode;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

/// Hard ceiling on item indentation. Depth is raw leading-space count, so
/// this also bounds tree depth and with it every recursive pass downstream.
pub const MAX_ITEM_INDENT: usize = 1024;

static ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^( *)-\s*(.*)$").unwrap());

/// Parse node held in a flat arena while the tree is under construction.
/// The parent index exists solely for the parser's upward walk and is
/// discarded when the arena is materialized into owned `LabelNode`s.
struct ArenaNode {
    label: String,
    depth: i32,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Turns an indentation-structured outline into a tree.
///
/// Returns the synthetic root (depth -1). Its first child, if any, is the
/// document root and carries `is_root = true`; further top-level items stay
/// as additional children of the synthetic root.
///
/// Per physical line, after dropping blank lines:
/// - `<spaces>- rest` starts a new item at depth `spaces`;
/// - anything else continues the pending item's label on a new line.
///
/// Depth is the raw leading-space count. Two items are siblings only when
/// their counts match exactly; inconsistent indentation nests accordingly
/// rather than being normalized.
#[instrument(level = "debug", skip_all)]
pub fn parse_outline(text: &str) -> Result<LabelNode, ParseError> {
    let mut arena = vec![ArenaNode {
        label: String::new(),
        depth: -1,
        parent: None,
        children: Vec::new(),
    }];

    let mut current_parent = 0usize;
    let mut current_parent_depth = -1i32;
    let mut pending: Option<(String, i32)> = None;

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let Some(caps) = ITEM_RE.captures(line) else {
            // Continuation line: extends the pending label. With no item
            // read yet there is nothing to attach it to, so it is dropped.
            if let Some((label, _)) = pending.as_mut() {
                label.push('\n');
                label.push_str(line);
            }
            continue;
        };

        let indent = caps.get(1).map(|m| m.as_str().len()).unwrap_or(0);
        if indent > MAX_ITEM_INDENT {
            return Err(ParseError::IndentTooDeep {
                line: idx + 1,
                indent,
                max: MAX_ITEM_INDENT,
            });
        }

        // Materialize the previous item; it becomes the active parent for
        // any deeper items that follow.
        if let Some((label, depth)) = pending.take() {
            current_parent = push_node(&mut arena, label, depth, current_parent);
            current_parent_depth = depth;
        }

        let depth = indent as i32;
        let label = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        pending = Some((label.to_string(), depth));

        // Walk up to the nearest ancestor strictly shallower than the new
        // item: an item at equal or lesser depth is a sibling somewhere up
        // the chain, not a child.
        while depth <= current_parent_depth {
            current_parent = arena[current_parent].parent.unwrap_or(current_parent);
            current_parent_depth = arena[current_parent].depth;
        }
    }

    if let Some((label, depth)) = pending {
        push_node(&mut arena, label, depth, current_parent);
    }

    debug!(items = arena.len() - 1, "parsed outline");

    let mut root = materialize(&mut arena, 0);
    if let Some(first) = root.children.first_mut() {
        first.is_root = true;
    }
    Ok(root)
}

fn push_node(arena: &mut Vec<ArenaNode>, label: String, depth: i32, parent: usize) -> usize {
    let idx = arena.len();
    arena.push(ArenaNode {
        label,
        depth,
        parent: Some(parent),
        children: Vec::new(),
    });
    arena[parent].children.push(idx);
    idx
}

/// Converts the arena into the owned tree. Recursion depth is bounded by
/// `MAX_ITEM_INDENT`, enforced above.
fn materialize(arena: &mut [ArenaNode], idx: usize) -> LabelNode {
    let label = std::mem::take(&mut arena[idx].label);
    let child_indices = std::mem::take(&mut arena[idx].children);
    let mut node = LabelNode::new(label, arena[idx].depth);
    for child in child_indices {
        node.add_child(materialize(arena, child));
    }
    node
}
