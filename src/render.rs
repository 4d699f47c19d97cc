use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::{DrawOp, Surface};
use anyhow::Result;
use std::path::Path;

/// Serializes a composed surface to an SVG document. The host region is
/// sized to the surface plus the configured margin and the surface copied
/// in at that offset, the way the original resized its page canvas.
pub fn render_svg(surface: &Surface, layout: &LayoutConfig, render: &RenderConfig) -> String {
    let width = surface.width + render.margin;
    let height = surface.height + render.margin;
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        render.background
    ));

    let dx = render.margin;
    let dy = render.margin;
    for op in surface.ops() {
        match op {
            DrawOp::Connector {
                from,
                ctrl_a,
                ctrl_b,
                to,
                tail,
                color,
                line_width,
            } => {
                let d = format!(
                    "M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2} L {:.2} {:.2}",
                    from.0 + dx,
                    from.1 + dy,
                    ctrl_a.0 + dx,
                    ctrl_a.1 + dy,
                    ctrl_b.0 + dx,
                    ctrl_b.1 + dy,
                    to.0 + dx,
                    to.1 + dy,
                    to.0 + tail + dx,
                    to.1 + dy
                );
                svg.push_str(&format!(
                    "<path d=\"{d}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{line_width}\" stroke-linecap=\"round\"/>",
                ));
            }
            DrawOp::RoundRect {
                x,
                y,
                width,
                height,
                radius,
                fill,
                stroke,
                stroke_width,
            } => {
                svg.push_str(&format!(
                    "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{radius}\" ry=\"{radius}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
                    x + dx,
                    y + dy,
                    width,
                    height
                ));
            }
            DrawOp::Text { x, y, text, color } => {
                svg.push_str(&format!(
                    "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{color}\">{}</text>",
                    x + dx,
                    y + dy,
                    escape_xml(&layout.font_family),
                    layout.font_size,
                    escape_xml(text)
                ));
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, layout: &LayoutConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = layout
        .font_family
        .split(',')
        .next()
        .map(|name| name.trim().trim_matches('"').trim_matches('\'').to_string())
        .unwrap_or_else(|| "sans-serif".to_string());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::layout::layout_tree;
    use crate::palette::SectionPalette;
    use crate::text_metrics::CharWidthMetrics;
    use crate::tree::LabelNode;

    fn render_tree(root: &LabelNode) -> String {
        let config = Config::default();
        let (surface, _) = layout_tree(
            root,
            &config.layout,
            &CharWidthMetrics::default(),
            &SectionPalette::default(),
        )
        .unwrap();
        render_svg(&surface, &config.layout, &config.render)
    }

    #[test]
    fn render_svg_basic() {
        let mut root = LabelNode::new("Root", 0);
        root.is_root = true;
        root.add_child(LabelNode::new("Alpha", 2));
        let svg = render_tree(&root);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Alpha"));
        assert!(svg.contains("<path"));
        assert!(svg.contains("stroke-linecap=\"round\""));
    }

    #[test]
    fn labels_are_xml_escaped() {
        let node = LabelNode::new("a < b & c", 0);
        let svg = render_tree(&node);
        assert!(svg.contains("a &lt; b &amp; c"));
        assert!(!svg.contains("a < b & c"));
    }

    #[test]
    fn canvas_is_surface_plus_margin() {
        let config = Config::default();
        let node = LabelNode::new("x", 0);
        let (surface, _) = layout_tree(
            &node,
            &config.layout,
            &CharWidthMetrics::default(),
            &SectionPalette::default(),
        )
        .unwrap();
        let svg = render_svg(&surface, &config.layout, &config.render);
        let expected = format!("width=\"{}\"", surface.width + config.render.margin);
        assert!(svg.contains(&expected));
    }
}
