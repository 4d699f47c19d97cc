/// Branch stroke colors, one hue per root-level subtree, cycled modulo the
/// table length. Hue order is shuffled so neighboring branches contrast.
const BRANCH_COLORS: [&str; 12] = [
    "hsl(210, 70%, 45%)",
    "hsl(0, 70%, 48%)",
    "hsl(120, 55%, 38%)",
    "hsl(270, 60%, 50%)",
    "hsl(30, 85%, 45%)",
    "hsl(180, 65%, 36%)",
    "hsl(330, 65%, 48%)",
    "hsl(90, 55%, 40%)",
    "hsl(240, 60%, 52%)",
    "hsl(60, 70%, 38%)",
    "hsl(300, 55%, 45%)",
    "hsl(150, 60%, 38%)",
];

/// Desaturated table used when grayscale output is requested: a lightness
/// ladder instead of hues, so adjacent branches stay distinguishable.
const BRANCH_GRAYS: [&str; 8] = [
    "hsl(0, 0%, 20%)",
    "hsl(0, 0%, 45%)",
    "hsl(0, 0%, 32%)",
    "hsl(0, 0%, 58%)",
    "hsl(0, 0%, 26%)",
    "hsl(0, 0%, 51%)",
    "hsl(0, 0%, 38%)",
    "hsl(0, 0%, 64%)",
];

const FALLBACK_COLOR: &str = "#333333";

/// Source of branch colors, deterministic by child index so repeated
/// layout passes over the same tree are bit-identical.
pub trait BranchPalette {
    fn branch_color(&self, index: usize, grayscale: bool) -> String;
}

#[derive(Debug, Clone)]
pub struct SectionPalette {
    colors: Vec<String>,
    grays: Vec<String>,
}

impl Default for SectionPalette {
    fn default() -> Self {
        Self {
            colors: BRANCH_COLORS.iter().map(|c| c.to_string()).collect(),
            grays: BRANCH_GRAYS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl SectionPalette {
    pub fn new(colors: Vec<String>, grays: Vec<String>) -> Self {
        Self { colors, grays }
    }
}

impl BranchPalette for SectionPalette {
    fn branch_color(&self, index: usize, grayscale: bool) -> String {
        let table = if grayscale { &self.grays } else { &self.colors };
        if table.is_empty() {
            return FALLBACK_COLOR.to_string();
        }
        table[index % table.len()].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_by_index() {
        let palette = SectionPalette::default();
        assert_eq!(
            palette.branch_color(3, false),
            palette.branch_color(3, false)
        );
        assert_ne!(
            palette.branch_color(0, false),
            palette.branch_color(1, false)
        );
    }

    #[test]
    fn wraps_modulo_table_length() {
        let palette = SectionPalette::default();
        assert_eq!(
            palette.branch_color(0, false),
            palette.branch_color(BRANCH_COLORS.len(), false)
        );
    }

    #[test]
    fn grayscale_selects_the_gray_table() {
        let palette = SectionPalette::default();
        let gray = palette.branch_color(0, true);
        assert!(gray.contains("0%"), "expected a desaturated color: {gray}");
    }

    #[test]
    fn empty_tables_fall_back() {
        let palette = SectionPalette::new(Vec::new(), Vec::new());
        assert_eq!(palette.branch_color(7, false), FALLBACK_COLOR);
        assert_eq!(palette.branch_color(7, true), FALLBACK_COLOR);
    }
}
