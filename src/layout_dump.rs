use crate::layout::{DrawOp, Surface};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// JSON-serializable snapshot of a computed surface, for debugging layout
/// changes without eyeballing rendered output.
#[derive(Debug, Serialize)]
pub struct SurfaceDump<'a> {
    pub width: f32,
    pub height: f32,
    pub op_count: usize,
    pub ops: &'a [DrawOp],
}

impl<'a> SurfaceDump<'a> {
    pub fn from_surface(surface: &'a Surface) -> Self {
        Self {
            width: surface.width,
            height: surface.height,
            op_count: surface.ops().len(),
            ops: surface.ops(),
        }
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::layout_tree;
    use crate::palette::SectionPalette;
    use crate::text_metrics::CharWidthMetrics;
    use crate::tree::LabelNode;

    #[test]
    fn dump_serializes_every_op() {
        let mut root = LabelNode::new("r", 0);
        root.add_child(LabelNode::new("c", 2));
        let (surface, _) = layout_tree(
            &root,
            &LayoutConfig::default(),
            &CharWidthMetrics::default(),
            &SectionPalette::default(),
        )
        .unwrap();
        let dump = SurfaceDump::from_surface(&surface);
        let json = serde_json::to_string(&dump).unwrap();
        assert!(json.contains("\"op_count\""));
        assert!(json.contains("\"Connector\""));
    }
}
