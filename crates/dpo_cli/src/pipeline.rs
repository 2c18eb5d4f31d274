//! Shared pipeline helpers for CLI commands.
//!
//! Resolves the configuration and design paths, builds the placement
//! context and renders diagnostics. Used by `improve`, `check` and `hpwl`.

use std::path::{Path, PathBuf};

use dpo_config::{DpoConfig, OptimizeConfig, CONFIG_FILE_NAME};
use dpo_diagnostics::{DiagnosticRenderer, DiagnosticSink, Severity, TerminalRenderer};
use dpo_place::{Design, PlacementContext, PlacementParams};

use crate::{GlobalArgs, ReportFormat};

/// Everything a command needs, merged from flags and `dpo.toml`.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Design to read.
    pub design: PathBuf,
    /// Where to write the optimized design, if anywhere.
    pub output: Option<PathBuf>,
    /// Command script.
    pub script: String,
    /// Optimizer limits.
    pub params: PlacementParams,
    /// Report format.
    pub format: ReportFormat,
    /// Lowest severity printed.
    pub threshold: Severity,
}

/// Finds the configuration file: `--config` (a file, or a directory holding
/// `dpo.toml`), else `dpo.toml` in the current directory if it exists.
pub fn locate_config(global: &GlobalArgs) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    if let Some(ref config) = global.config {
        let p = PathBuf::from(config);
        return Ok(Some(if p.is_dir() { p.join(CONFIG_FILE_NAME) } else { p }));
    }
    let p = std::env::current_dir()?.join(CONFIG_FILE_NAME);
    Ok(p.is_file().then_some(p))
}

/// Merges command-line values over the configuration file.
///
/// A design given on the command line is relative to the current directory;
/// paths from `dpo.toml` are relative to the directory holding it.
pub fn resolve_settings(
    design: Option<&str>,
    global: &GlobalArgs,
) -> Result<Settings, Box<dyn std::error::Error>> {
    let config = match locate_config(global)? {
        Some(path) => {
            let dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            Some((dir, dpo_config::load_config_file(&path)?))
        }
        None => None,
    };

    let design = match (design, &config) {
        (Some(d), _) => PathBuf::from(d),
        (None, Some((dir, cfg))) => dir.join(&cfg.design.input),
        (None, None) => {
            return Err(format!(
                "no design given and no {CONFIG_FILE_NAME} found in the current directory"
            )
            .into())
        }
    };

    let defaults = OptimizeConfig::default();
    let (opt, output, format, verbosity) = match &config {
        Some((dir, DpoConfig { design: files, optimize, report })) => (
            optimize,
            files.output.as_ref().map(|o| dir.join(o)),
            ReportFormat::from(report.format),
            report.verbosity,
        ),
        None => (&defaults, None, ReportFormat::Text, Severity::Info),
    };

    let threshold = if global.quiet {
        Severity::Error
    } else if global.verbose {
        Severity::Debug
    } else {
        verbosity
    };

    Ok(Settings {
        design,
        output,
        script: opt.script.clone(),
        params: PlacementParams {
            seed: opt.seed,
            skip_nets_larger_than: opt.skip_nets_larger_than,
            max_displacement_sites: opt.max_displacement_x,
            max_displacement_rows: opt.max_displacement_y,
        },
        format,
        threshold,
    })
}

/// Loads the design and builds segments over it.
pub fn build_context(
    settings: &Settings,
    sink: &DiagnosticSink,
) -> Result<PlacementContext, Box<dyn std::error::Error>> {
    let design = Design::load(&settings.design)?;
    Ok(PlacementContext::new(
        design.architecture,
        design.network,
        settings.params,
        sink,
    ))
}

/// Prints every diagnostic in the sink to stderr and returns the error count.
pub fn render_diagnostics(sink: &DiagnosticSink, color: bool) -> usize {
    let renderer = TerminalRenderer::new(color);
    let diagnostics = sink.take_all();
    for diag in &diagnostics {
        eprint!("{}", renderer.render(diag));
    }
    diagnostics
        .iter()
        .filter(|d| d.severity.is_error())
        .count()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use dpo_arch::{Architecture, Orientation, Rect, Row};
    use dpo_network::{Network, Node};

    pub(crate) fn global(config: Option<&Path>) -> GlobalArgs {
        GlobalArgs {
            quiet: false,
            verbose: false,
            color: false,
            config: config.map(|p| p.display().to_string()),
        }
    }

    /// Two connected cells far apart in one row, b on the wrong side of a.
    pub(crate) fn write_design(path: &Path) {
        let rows = vec![Row {
            bottom: 0,
            height: 10,
            site_width: 1,
            min_x: 0,
            num_sites: 100,
            orient: Orientation::N,
        }];
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 10, 10).at(0, 0));
        let b = nw.add_node(Node::new("b", 10, 10).at(60, 0));
        let p = nw.add_node(
            Node::new("p", 2, 2)
                .at(98, 0)
                .with_kind(dpo_network::NodeKind::Terminal),
        );
        let e = nw.add_edge("n1");
        nw.add_pin(a, e, 5, 5);
        nw.add_pin(p, e, 0, 5);
        let e = nw.add_edge("n2");
        nw.add_pin(b, e, 5, 5);
        nw.add_pin(a, e, 5, 5);
        Design {
            architecture: Architecture::new(Rect::new(0, 0, 100, 10), rows),
            network: nw,
        }
        .save(path)
        .unwrap();
    }

    #[test]
    fn explicit_design_without_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none");
        std::fs::create_dir(&missing).unwrap();
        let g = global(Some(&missing));
        // a directory without dpo.toml is an error once it is read
        assert!(resolve_settings(Some("top.json"), &g).is_err());

        let mut g = global(None);
        g.verbose = true;
        assert!(locate_config(&g).unwrap().is_none());
        let s = resolve_settings(Some("top.json"), &g).unwrap();
        assert_eq!(s.design, PathBuf::from("top.json"));
        assert_eq!(s.params, PlacementParams::default());
        assert_eq!(s.threshold, Severity::Debug);
        assert_eq!(s.script, dpo_config::DEFAULT_SCRIPT);
    }

    #[test]
    fn config_paths_are_relative_to_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("dpo.toml"),
            "[design]\ninput = \"top.json\"\noutput = \"out.json\"\n\
             [optimize]\nscript = \"gs\"\nseed = 3\n[report]\nformat = \"json\"\n",
        )
        .unwrap();
        let mut g = global(Some(dir.path()));
        g.quiet = true;
        let s = resolve_settings(None, &g).unwrap();
        assert_eq!(s.design, dir.path().join("top.json"));
        assert_eq!(s.output, Some(dir.path().join("out.json")));
        assert_eq!(s.script, "gs");
        assert_eq!(s.params.seed, 3);
        assert_eq!(s.format, ReportFormat::Json);
        assert_eq!(s.threshold, Severity::Error);

        let s = resolve_settings(Some("other.json"), &g).unwrap();
        assert_eq!(s.design, PathBuf::from("other.json"));
    }

    #[test]
    fn context_builds_from_saved_design() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.json");
        write_design(&path);
        let settings = Settings {
            design: path,
            output: None,
            script: String::new(),
            params: PlacementParams::default(),
            format: ReportFormat::Text,
            threshold: Severity::Info,
        };
        let sink = DiagnosticSink::new();
        let ctx = build_context(&settings, &sink).unwrap();
        assert_eq!(ctx.single_height_cells().len(), 2);
        assert_eq!(render_diagnostics(&sink, false), 0);
    }
}
