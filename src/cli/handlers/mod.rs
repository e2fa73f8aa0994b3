mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::output_io;
use crate::io::workspace_io::{self, SetupError};
use crate::model::workspace::{Workspace, label_for};
use crate::ops::check;
use crate::ops::report;
use crate::model::region::Region;
use crate::ops::run::{self, ExtractionResult, Progress, RunOptions};
use crate::ops::template::Template;

type CmdResult = Result<i32, Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run one command. Returns the process exit code.
pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let base = base_dir(cli.dir.as_deref())?;

    match cli.command {
        Commands::Init(args) => cmd_init(args, &base),
        Commands::Run(args) => {
            let ws = load_workspace(&base, cli.config.as_deref())?;
            cmd_run(&ws, &base, args, json)
        }
        Commands::Check(args) => {
            let ws = load_workspace(&base, cli.config.as_deref())?;
            cmd_check(&ws, &base, args, json)
        }
        Commands::Report => {
            let ws = load_workspace(&base, cli.config.as_deref())?;
            cmd_report(&ws, json)
        }
        Commands::Shift(args) => {
            let ws = load_workspace(&base, cli.config.as_deref())?;
            cmd_shift(&ws, args, json)
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The -C directory, or the working directory.
fn base_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(d) => Ok(std::fs::canonicalize(d)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", d, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

fn load_workspace(base: &Path, config: Option<&Path>) -> Result<Workspace, SetupError> {
    match config {
        Some(file) => workspace_io::load_workspace_file(&base.join(file)),
        None => workspace_io::load_workspace(base),
    }
}

/// A command-line path override, relative to `base`, or the configured path.
fn resolve(base: &Path, over: Option<&Path>, configured: PathBuf) -> PathBuf {
    match over {
        Some(p) => base.join(p),
        None => configured,
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Progress lines for `carve run` in text mode.
struct RunProgress<'a> {
    enabled: bool,
    output_dir: &'a Path,
    extension: &'a str,
    dry_run: bool,
}

impl Progress for RunProgress<'_> {
    fn region_started(&mut self, region: &Region) {
        if self.enabled {
            println!("\nExtracting {}...", region.name);
        }
    }

    fn region_finished(&mut self, region: &Region, result: &ExtractionResult) {
        if self.enabled {
            let file = output_io::output_file(self.output_dir, region, self.extension);
            println!("{}", format_progress(result, &label_for(&file), self.dry_run));
        }
    }
}

/// `--backup DIR`, bare `--backup`, or `backup_dir` from carve.toml.
fn backup_dir(
    ws: &Workspace,
    base: &Path,
    flag: Option<&Option<PathBuf>>,
    output_dir: &Path,
) -> Option<PathBuf> {
    match flag {
        Some(Some(dir)) => Some(base.join(dir)),
        Some(None) => Some(
            ws.backup_path()
                .unwrap_or_else(|| output_io::default_backup_dir(output_dir)),
        ),
        None => ws.backup_path(),
    }
}

fn cmd_run(ws: &Workspace, base: &Path, args: RunArgs, json: bool) -> CmdResult {
    let source = resolve(base, args.source.as_deref(), ws.source_path());
    let output_dir = resolve(base, args.out.as_deref(), ws.output_path());
    let config = &ws.config;

    let document = workspace_io::load_document(&source)?;
    let template = Template::new(&config.template, &label_for(&source));
    let options = RunOptions {
        dry_run: args.dry_run,
        backup_dir: backup_dir(ws, base, args.backup.as_ref(), &output_dir),
    };

    if !json {
        println!(
            "Splitting {} ({} lines) into {}",
            source.display(),
            report::format_count(document.len()),
            output_dir.display()
        );
        if args.dry_run {
            println!("(dry run: nothing will be written)");
        }
    }

    let mut progress = RunProgress {
        enabled: !json,
        output_dir: &output_dir,
        extension: &config.extension,
        dry_run: args.dry_run,
    };
    let run_report = run::run_all_with(
        &document,
        &config.regions,
        &output_dir,
        &config.extension,
        &template,
        &options,
        &mut progress,
    )?;

    if json {
        let out = run_to_json(&run_report, &source, &output_dir, args.dry_run);
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let named: Vec<(String, &ExtractionResult)> = config
            .regions
            .iter()
            .zip(&run_report.results)
            .map(|(region, result)| {
                let file = output_io::output_file(&output_dir, region, &config.extension);
                (label_for(&file), result)
            })
            .collect();
        println!("\nValidation:");
        print!("{}", format_validation(&named));

        let table = report::LineTable {
            rows: run_report
                .results
                .iter()
                .map(|r| report::LineRow {
                    name: r.name.clone(),
                    key: r.key.clone(),
                    lines: r.line_count,
                })
                .collect(),
            total: run_report.total_lines,
        };
        println!("\nReport:");
        print!("{}", format_line_table(&table));
        if let Some(line) = options
            .backup_dir
            .as_deref()
            .and_then(|dir| format_backup(&run_report, dir))
        {
            println!("\n{}", line);
        }
        println!("\n{}", format_summary(&run_report));
        println!("Checks above are heuristics only; run your compiler on the output.");
    }

    let failed = run_report.failed > 0 || (args.strict && run_report.with_issues > 0);
    Ok(if failed { 1 } else { 0 })
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

fn cmd_check(ws: &Workspace, base: &Path, args: CheckArgs, json: bool) -> CmdResult {
    let source = resolve(base, args.source.as_deref(), ws.source_path());
    let document = workspace_io::load_document(&source)?;
    let result = check::check_regions(&document, &ws.config.regions);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if !result.errors.is_empty() {
            println!("Errors:");
            for err in &result.errors {
                println!("{}", format_check_error(err));
            }
        }
        if !result.warnings.is_empty() {
            if !result.errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for warn in &result.warnings {
                println!("{}", format_check_warning(warn));
            }
        }
        if result.errors.is_empty() && result.warnings.is_empty() {
            println!(
                "{} regions OK against {} ({} lines)",
                ws.config.regions.len(),
                source.display(),
                report::format_count(document.len())
            );
        }
    }

    Ok(if result.valid { 0 } else { 1 })
}

// ---------------------------------------------------------------------------
// report
// ---------------------------------------------------------------------------

fn cmd_report(ws: &Workspace, json: bool) -> CmdResult {
    let table = report::line_table(&ws.config.regions);
    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        print!("{}", format_line_table(&table));
        println!("\n{} regions", table.rows.len());
    }
    Ok(0)
}

// ---------------------------------------------------------------------------
// shift
// ---------------------------------------------------------------------------

fn cmd_shift(ws: &Workspace, args: ShiftArgs, json: bool) -> CmdResult {
    let (_config, mut doc) = config_io::read_config(&ws.config_file)?;
    let moved = config_io::shift_regions(&mut doc, args.at, args.by)?;
    if moved > 0 {
        config_io::write_config(&ws.config_file, &doc)?;
    }
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "config": ws.config_file.display().to_string(),
                "at": args.at,
                "by": args.by,
                "moved": moved,
            }))?
        );
    } else {
        println!(
            "Moved {} boundaries at or after line {} by {} in {}",
            moved,
            args.at,
            args.by,
            ws.config_file.display()
        );
    }
    Ok(0)
}
