#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod layout_dump;
pub mod palette;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod tree;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use error::{LayoutError, ParseError};
pub use layout::{DrawOp, LayoutResult, MAX_NESTING, Surface, layout_tree};
pub use palette::{BranchPalette, SectionPalette};
pub use parser::parse_outline;
pub use render::render_svg;
pub use text_metrics::{CharWidthMetrics, MeasureText, SystemFontMetrics};
pub use tree::LabelNode;
