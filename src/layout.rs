use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::palette::BranchPalette;
use crate::text_metrics::MeasureText;
use crate::tree::LabelNode;
use serde::Serialize;
use tracing::{debug, instrument};

/// Trees deeper than this are rejected up front instead of risking stack
/// exhaustion in the recursive pass.
pub const MAX_NESTING: usize = 1024;

/// Fixed inset between a node's left edge and its label.
const LABEL_INSET: f32 = 10.0;
/// Color used when a subtree is laid out directly, outside any root.
const DEFAULT_BRANCH_COLOR: &str = "blue";
const LABEL_COLOR: &str = "#000000";
const ROOT_BOX_FILL: &str = "#ffffff";
const ROOT_BOX_RADIUS: f32 = 5.0;
const ROOT_BOX_LINE_WIDTH: f32 = 3.0;

/// One drawing primitive on a surface. Layout emits these as pure data;
/// turning them into pixels or markup is the render phase's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawOp {
    /// A single label line; `y` is the text baseline.
    Text {
        x: f32,
        y: f32,
        text: String,
        color: String,
    },
    /// Cubic curve from a parent anchor to a child anchor, continued by a
    /// horizontal segment of length `tail` underlining the child label.
    Connector {
        from: (f32, f32),
        ctrl_a: (f32, f32),
        ctrl_b: (f32, f32),
        to: (f32, f32),
        tail: f32,
        color: String,
        line_width: f32,
    },
    RoundRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: String,
        stroke: String,
        stroke_width: f32,
    },
}

impl DrawOp {
    fn translated(&self, dx: f32, dy: f32) -> DrawOp {
        match self {
            DrawOp::Text { x, y, text, color } => DrawOp::Text {
                x: x + dx,
                y: y + dy,
                text: text.clone(),
                color: color.clone(),
            },
            DrawOp::Connector {
                from,
                ctrl_a,
                ctrl_b,
                to,
                tail,
                color,
                line_width,
            } => DrawOp::Connector {
                from: (from.0 + dx, from.1 + dy),
                ctrl_a: (ctrl_a.0 + dx, ctrl_a.1 + dy),
                ctrl_b: (ctrl_b.0 + dx, ctrl_b.1 + dy),
                to: (to.0 + dx, to.1 + dy),
                tail: *tail,
                color: color.clone(),
                line_width: *line_width,
            },
            DrawOp::RoundRect {
                x,
                y,
                width,
                height,
                radius,
                fill,
                stroke,
                stroke_width,
            } => DrawOp::RoundRect {
                x: x + dx,
                y: y + dy,
                width: *width,
                height: *height,
                radius: *radius,
                fill: fill.clone(),
                stroke: stroke.clone(),
                stroke_width: *stroke_width,
            },
        }
    }
}

/// A sized drawable region: an op list in local coordinates. Surfaces
/// compose bottom-up, the way the original drew child canvases onto their
/// parent; `blit` is the `drawImage` analog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
    ops: Vec<DrawOp>,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn draw_text(&mut self, x: f32, y: f32, text: &str, color: &str) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            color: color.to_string(),
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_connector(
        &mut self,
        from: (f32, f32),
        ctrl_a: (f32, f32),
        ctrl_b: (f32, f32),
        to: (f32, f32),
        tail: f32,
        color: &str,
        line_width: f32,
    ) {
        self.ops.push(DrawOp::Connector {
            from,
            ctrl_a,
            ctrl_b,
            to,
            tail,
            color: color.to_string(),
            line_width,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_round_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: &str,
        stroke: &str,
        stroke_width: f32,
    ) {
        self.ops.push(DrawOp::RoundRect {
            x,
            y,
            width,
            height,
            radius,
            fill: fill.to_string(),
            stroke: stroke.to_string(),
            stroke_width,
        });
    }

    /// Copies another surface onto this one at `(x, y)`.
    pub fn blit(&mut self, child: &Surface, x: f32, y: f32) {
        for op in &child.ops {
            self.ops.push(op.translated(x, y));
        }
    }
}

/// Measured geometry of one laid-out node. Recomputed in full on every
/// pass; nothing is cached between calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutResult {
    /// Ceiled width of the widest label line.
    pub content_width: f32,
    /// Full height of the node's surface, children included.
    pub content_height: f32,
    /// Where an incoming connector terminates, in surface coordinates.
    pub anchor: (f32, f32),
}

/// Lays out a tree bottom-up and returns the composed surface along with
/// the root's layout result. Pure: identical inputs produce bit-identical
/// output, so there is nothing to gain from retrying a failed pass.
#[instrument(level = "debug", skip_all)]
pub fn layout_tree(
    node: &LabelNode,
    config: &LayoutConfig,
    metrics: &dyn MeasureText,
    palette: &dyn BranchPalette,
) -> Result<(Surface, LayoutResult), LayoutError> {
    config.validate()?;
    let depth = node.nesting_depth();
    if depth > MAX_NESTING {
        return Err(LayoutError::NestingTooDeep {
            depth,
            max: MAX_NESTING,
        });
    }
    debug!(nodes = node.node_count(), depth, "laying out outline tree");
    layout_node(node, config, metrics, palette, DEFAULT_BRANCH_COLOR)
}

fn layout_node(
    node: &LabelNode,
    config: &LayoutConfig,
    metrics: &dyn MeasureText,
    palette: &dyn BranchPalette,
    branch_color: &str,
) -> Result<(Surface, LayoutResult), LayoutError> {
    let lines = node.lines();
    let label_width = measure_label(&lines, config, metrics)?;

    // Label block, the separation under it, and the connector stroke.
    let text_height = config.font_size * lines.len() as f32;
    let composed_height = text_height + config.label_padding_bottom + config.connector_line_width;

    if node.is_leaf() {
        return Ok(layout_leaf(&lines, label_width, config));
    }

    // Children first; the parent's size depends on theirs.
    let mut children = Vec::with_capacity(node.children.len());
    for (index, child) in node.children.iter().enumerate() {
        // The document root hands each direct child its own branch color;
        // below that the color is inherited unchanged.
        let color = if node.is_root {
            palette.branch_color(index, config.use_grayscale)
        } else {
            branch_color.to_string()
        };
        let (surface, result) = layout_node(child, config, metrics, palette, &color)?;
        children.push((surface, result, color));
    }

    // Stack children with no gap; each top offset is the running sum of
    // the heights before it.
    let mut child_tops = Vec::with_capacity(children.len());
    let mut children_height = 0.0f32;
    for (surface, _, _) in &children {
        child_tops.push(children_height);
        children_height += surface.height;
    }

    let anchor_x = if node.is_root { LABEL_INSET } else { 0.0 };

    // Sparse children: the node's own content sets the height and the
    // label sits low instead of centering. Otherwise the children set the
    // height and the anchor splits it.
    let (height, anchor_y) = if children_height < composed_height + config.node_margin_top * 2.0 {
        let height = composed_height + config.node_margin_top * 2.0;
        (height, height / 2.0 + composed_height / 2.0)
    } else {
        let height = children_height.max(composed_height * 2.0);
        (height, height / 2.0)
    };

    let left_margin = LABEL_INSET + label_width + config.connector_width;
    let widest_child = children
        .iter()
        .map(|(surface, _, _)| surface.width)
        .fold(0.0f32, f32::max);
    let mut surface = Surface::new(left_margin + widest_child, height);

    let reach = config.connector_steepness * config.connector_width;
    for (index, (child_surface, child_result, color)) in children.iter().enumerate() {
        surface.blit(child_surface, left_margin, child_tops[index]);

        let from = (
            anchor_x + label_width + config.label_padding_right,
            anchor_y,
        );
        let to = (left_margin, child_tops[index] + child_result.anchor.1);
        surface.draw_connector(
            from,
            (from.0 + reach, from.1),
            (to.0 - reach, to.1),
            to,
            child_result.content_width + config.label_padding_right,
            color,
            config.connector_line_width,
        );
    }

    let line_count = lines.len();
    if node.is_root {
        // The root label sits in a containing box, centered in the full
        // node height rather than hanging off the anchor.
        surface.draw_round_rect(
            2.0,
            height / 2.0 - line_count as f32 * config.font_size,
            label_width + 18.0,
            config.font_size * (line_count as f32 + 1.5),
            ROOT_BOX_RADIUS,
            ROOT_BOX_FILL,
            LABEL_COLOR,
            ROOT_BOX_LINE_WIDTH,
        );
        for (i, line) in lines.iter().enumerate() {
            let y = height / 2.0 + config.font_size / 2.0
                - config.font_size * (line_count - i - 1) as f32;
            surface.draw_text(LABEL_INSET, y, line, LABEL_COLOR);
        }
    } else {
        // Label lines stack upward from the anchor.
        for (i, line) in lines.iter().enumerate() {
            let y = anchor_y
                - config.label_padding_bottom
                - config.font_size * (line_count - i - 1) as f32;
            surface.draw_text(LABEL_INSET, y, line, LABEL_COLOR);
        }
    }

    let result = LayoutResult {
        content_width: label_width,
        content_height: height,
        anchor: (anchor_x, anchor_y),
    };
    Ok((surface, result))
}

fn layout_leaf(lines: &[&str], label_width: f32, config: &LayoutConfig) -> (Surface, LayoutResult) {
    let height = config.node_margin_top
        + config.font_size * (lines.len() as f32 + 1.0)
        + config.node_margin_bottom;
    let mut surface = Surface::new(label_width + config.label_padding_right * 2.0, height);
    for (i, line) in lines.iter().enumerate() {
        surface.draw_text(
            0.0,
            config.font_size * (i as f32 + 1.0) + config.node_margin_top,
            line,
            LABEL_COLOR,
        );
    }
    // The connector lands at the underline of the label block.
    let anchor = (
        0.0,
        lines.len() as f32 * config.font_size + config.label_padding_bottom + config.node_margin_top,
    );
    let result = LayoutResult {
        content_width: label_width,
        content_height: height,
        anchor,
    };
    (surface, result)
}

fn measure_label(
    lines: &[&str],
    config: &LayoutConfig,
    metrics: &dyn MeasureText,
) -> Result<f32, LayoutError> {
    let mut widest = 0.0f32;
    for line in lines {
        widest = widest.max(metrics.text_width(line, config.font_size, &config.font_family)?);
    }
    Ok(widest.ceil())
}
