//! Pipeline configuration (§6 "Configuration").
//!
//! Shaped like the teacher's builder-style options type
//! (`PutOptions`/`PutOptionsBuilder`): public fields with sane defaults, a
//! `Default` impl, and `with_*` builder methods for the tunables callers
//! actually adjust in practice.

/// MDL cost-function weights `(α, β, γ)` — spec.md §4.2 step 4.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MdlWeights {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for MdlWeights {
    fn default() -> Self {
        Self {
            alpha: 0.4,
            beta: 0.3,
            gamma: 0.3,
        }
    }
}

/// Tunables recognized by the grid-analysis pipeline (§6 configuration
/// table). File-level options (CSV encoding, output paths, log level) live
/// with the external collaborators and are not modeled here.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub min_block_height: usize,
    pub min_block_width: usize,
    pub hole_tolerance_rows: usize,
    pub hole_tolerance_cols: usize,
    pub density_threshold: f64,
    pub rectangularity_threshold: f64,
    pub mdl_weights: MdlWeights,
    pub merge_gain_threshold: f64,
    pub max_header_rows: usize,
    pub header_style_weight: f64,
    pub keep_leaf_only: bool,
    pub duplicate_col_suffix: String,
    pub include_hidden: bool,
    pub allow_mid_headers: bool,
    pub unit_line_patterns: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_block_height: 2,
            min_block_width: 2,
            hole_tolerance_rows: 0,
            hole_tolerance_cols: 0,
            density_threshold: 0.5,
            rectangularity_threshold: 0.6,
            mdl_weights: MdlWeights::default(),
            merge_gain_threshold: 0.5,
            max_header_rows: 3,
            header_style_weight: 0.3,
            keep_leaf_only: false,
            duplicate_col_suffix: "_{n}".to_string(),
            include_hidden: false,
            allow_mid_headers: true,
            unit_line_patterns: vec![
                r"^\s*单位[:：]\s*.*$".to_string(),
                r"^\s*\(单位.*\)\s*$".to_string(),
            ],
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn with_min_block_size(mut self, height: usize, width: usize) -> Self {
        self.min_block_height = height;
        self.min_block_width = width;
        self
    }

    #[must_use]
    pub fn with_hole_tolerance(mut self, rows: usize, cols: usize) -> Self {
        self.hole_tolerance_rows = rows;
        self.hole_tolerance_cols = cols;
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, density: f64, rectangularity: f64) -> Self {
        self.density_threshold = density;
        self.rectangularity_threshold = rectangularity;
        self
    }

    #[must_use]
    pub fn with_mdl_weights(mut self, weights: MdlWeights) -> Self {
        self.mdl_weights = weights;
        self
    }

    #[must_use]
    pub fn with_merge_gain_threshold(mut self, threshold: f64) -> Self {
        self.merge_gain_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_max_header_rows(mut self, n: usize) -> Self {
        self.max_header_rows = n;
        self
    }

    #[must_use]
    pub fn with_header_style_weight(mut self, weight: f64) -> Self {
        self.header_style_weight = weight;
        self
    }

    #[must_use]
    pub fn with_keep_leaf_only(mut self, keep_leaf_only: bool) -> Self {
        self.keep_leaf_only = keep_leaf_only;
        self
    }

    #[must_use]
    pub fn with_duplicate_col_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.duplicate_col_suffix = suffix.into();
        self
    }

    #[must_use]
    pub fn with_include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    #[must_use]
    pub fn with_allow_mid_headers(mut self, allow: bool) -> Self {
        self.allow_mid_headers = allow;
        self
    }

    #[must_use]
    pub fn with_unit_line_patterns(mut self, patterns: Vec<String>) -> Self {
        self.unit_line_patterns = patterns;
        self
    }
}
