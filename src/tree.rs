/// A node of the parsed outline tree.
///
/// Ownership is strictly parent-to-child: a node owns its `children`, the
/// root is owned by the caller. The parser tracks parent links internally
/// (as arena indices) for its upward walk; they are never part of the
/// finished tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelNode {
    /// Node text; may contain embedded newlines for multi-line labels.
    pub label: String,
    /// Nesting level inferred from leading spaces. The synthetic root
    /// sits at -1 so every parsed item is strictly deeper than it.
    pub depth: i32,
    /// True for exactly one node per parsed document: the first top-level
    /// item beneath the synthetic root.
    pub is_root: bool,
    /// Insertion order is rendering order (top to bottom).
    pub children: Vec<LabelNode>,
}

impl LabelNode {
    pub fn new(label: impl Into<String>, depth: i32) -> Self {
        Self {
            label: label.into(),
            depth,
            is_root: false,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The label split into physical lines. Always yields at least one
    /// line; an empty label renders as a single empty line.
    pub fn lines(&self) -> Vec<&str> {
        self.label.split('\n').collect()
    }

    pub fn add_child(&mut self, child: LabelNode) {
        self.children.push(child);
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Number of levels in this subtree, counting `self` as one.
    /// Iterative, so it is safe to call on arbitrarily deep trees.
    pub fn nesting_depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            for child in &node.children {
                stack.push((child, level + 1));
            }
        }
        deepest
    }
}
