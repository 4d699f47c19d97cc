use thiserror::Error;

/// Failures while turning outline text into a tree.
///
/// The line grammar accepts almost any text, so today the only way a
/// parse can fail is by tripping the nesting bound; the typed result
/// exists so that future failures have somewhere to surface.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("item on line {line} is indented {indent} spaces; the maximum supported indent is {max}")]
    IndentTooDeep {
        line: usize,
        indent: usize,
        max: usize,
    },
}

/// Failures while computing or measuring a diagram layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("font size must be positive, got {0}")]
    InvalidFontSize(f32),

    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidGeometry { field: &'static str, value: f32 },

    #[error("text filter '{pattern}' is not a valid pattern")]
    InvalidTextFilter {
        pattern: String,
        source: regex::Error,
    },

    #[error("no font matching '{0}' is available for text measurement")]
    FontUnavailable(String),

    #[error("outline nesting depth {depth} exceeds the supported maximum {max}")]
    NestingTooDeep { depth: usize, max: usize },
}
