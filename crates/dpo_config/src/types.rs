//! Configuration types deserialized from `dpo.toml`.

use dpo_diagnostics::Severity;
use serde::Deserialize;

/// Default command script: the same recipe the placer runs when none is given.
pub const DEFAULT_SCRIPT: &str = "mis -p 10 -t 0.005; gs -p 10 -t 0.005; vs -p 10 -t 0.005; \
     ro -p 10 -t 0.005; default -p 5 -f 20 -gen rng:disp:gs:vs -obj hpwl -t 0.005";

/// The top-level configuration parsed from `dpo.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DpoConfig {
    /// Input and output design files.
    pub design: DesignConfig,
    /// Optimizer settings.
    #[serde(default)]
    pub optimize: OptimizeConfig,
    /// Reporting settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Design file locations, relative to the directory holding `dpo.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DesignConfig {
    /// Path to the JSON design to optimize.
    pub input: String,
    /// Where to write the optimized design. Omitted means no write-back.
    #[serde(default)]
    pub output: Option<String>,
}

/// Settings that drive the optimizer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OptimizeConfig {
    /// The `;`-separated command script.
    pub script: String,
    /// Seed for the single RNG shared by all commands.
    pub seed: u64,
    /// Nets with more pins than this are ignored by incremental evaluation.
    pub skip_nets_larger_than: usize,
    /// Horizontal displacement limit from the original position, in sites.
    pub max_displacement_x: i64,
    /// Vertical displacement limit from the original position, in rows.
    pub max_displacement_y: i64,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            script: DEFAULT_SCRIPT.to_string(),
            seed: 10,
            skip_nets_larger_than: 100,
            max_displacement_x: 500,
            max_displacement_y: 100,
        }
    }
}

/// How diagnostics and results are reported.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format for the final report.
    pub format: ReportFormat,
    /// Minimum severity that is printed.
    pub verbosity: Severity,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            verbosity: Severity::Info,
        }
    }
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable terminal output.
    #[default]
    Text,
    /// Machine-readable JSON output.
    Json,
}
