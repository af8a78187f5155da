use crate::config::layout::{Layout, PuzzleId};
use crate::config::manifest::{ProjectConfig, DEFAULT_MANIFEST_NAME};
use crate::config::types::Part;
use crate::core::supervisor::Orchestrator;
use crate::core::types::{CommandSpec, OrchestratorConfig};
use crate::exec::{TestRunner, TestTarget};
use crate::fixtures;
use crate::judge;
use crate::verdict::{ConsoleReporter, SilentReporter, TestReporter};
use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project root holding `presents/` and `solutions/`
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    /// Project manifest (defaults to `<root>/pixi.toml`)
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

/// Puzzle and language selection shared by `solve` and `test`.
#[derive(Args, Debug)]
struct PuzzleArgs {
    /// Day of the event
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=25))]
    day: u32,
    /// Event year (defaults to the current year)
    #[arg(short, long)]
    year: Option<i32>,
    /// Language backends to run (python, go, cpp, rust)
    #[arg(short, long = "lang", required = true, num_args = 1..)]
    langs: Vec<String>,
    /// Run only this part (1 or 2); both when omitted
    #[arg(short, long)]
    part: Option<Part>,
}

impl PuzzleArgs {
    fn puzzle(&self) -> PuzzleId {
        let year = self.year.unwrap_or_else(|| chrono::Local::now().year());
        PuzzleId::new(year, self.day)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run solutions on the day's puzzle input
    Solve {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Input file (defaults to the day's input.txt)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Check solutions against the day's fixtures
    Test {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Do not echo solver output
        #[arg(long)]
        quiet: bool,
        /// Print the report as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Check if all language toolchains are installed
    CheckDeps {
        /// Verbose output showing detailed version information
        #[arg(long)]
        verbose: bool,
    },
}

pub fn run() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let layout = Layout::new(&cli.root);
    let manifest = cli
        .manifest
        .clone()
        .unwrap_or_else(|| layout.root().join(DEFAULT_MANIFEST_NAME));
    let project = ProjectConfig::load(&manifest)
        .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;

    match cli.command {
        Commands::Solve { puzzle, input } => solve(&layout, &project, &puzzle, input),
        Commands::Test {
            puzzle,
            quiet,
            json,
        } => test(&layout, &project, &puzzle, quiet, json),
        Commands::CheckDeps { verbose } => check_language_dependencies(&layout, &project, verbose),
    }
}

fn solve(
    layout: &Layout,
    project: &ProjectConfig,
    args: &PuzzleArgs,
    input: Option<PathBuf>,
) -> Result<()> {
    let puzzle = args.puzzle();
    let input = input.unwrap_or_else(|| layout.daily_input(puzzle));
    let orchestrator = Orchestrator::default();
    let mut failed = Vec::new();

    for lang in &args.langs {
        let outcome = judge::daily_entrypoint(lang, layout, puzzle)
            .and_then(|entry| judge::resolve(lang, &entry, layout, project))
            .and_then(|backend| orchestrator.run(&backend, &input, args.part));

        match outcome {
            Ok(results) => {
                for result in results {
                    println!("✅ {lang}: Part {} solution: {}", result.part, result.answer);
                }
            }
            Err(e) => {
                eprintln!("❌ {lang}: {e}");
                failed.push(lang.as_str());
            }
        }
    }

    if !failed.is_empty() {
        eprintln!("Failed: {}", failed.join(", "));
        std::process::exit(1);
    }
    Ok(())
}

fn test(
    layout: &Layout,
    project: &ProjectConfig,
    args: &PuzzleArgs,
    quiet: bool,
    json: bool,
) -> Result<()> {
    let puzzle = args.puzzle();
    let fixture_dir = layout.daily_present_root(puzzle);
    let fixtures = fixtures::collect(&fixture_dir)
        .with_context(|| format!("Failed to collect fixtures from {}", fixture_dir.display()))?;

    let targets = args
        .langs
        .iter()
        .map(|lang| {
            let entry = judge::daily_entrypoint(lang, layout, puzzle).unwrap_or_default();
            TestTarget::new(lang.clone(), entry)
        })
        .collect::<Vec<_>>();

    let orchestrator = Orchestrator::new(OrchestratorConfig {
        echo: !(quiet || json),
        ..OrchestratorConfig::default()
    });
    let runner = TestRunner::new(layout, project, orchestrator);

    let mut console = ConsoleReporter::new(!quiet);
    let mut silent = SilentReporter;
    let reporter: &mut dyn TestReporter = if json { &mut silent } else { &mut console };
    let report = runner.run_tests(&targets, &fixtures, args.part, reporter);

    if json {
        println!("{}", report.to_json()?);
    }
    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Check if every registered backend's toolchain is installed
fn check_language_dependencies(layout: &Layout, project: &ProjectConfig, verbose: bool) -> Result<()> {
    println!("🔍 Checking language dependencies...");
    println!();

    let mut missing_languages = Vec::new();

    for backend in judge::all_backends() {
        let argv = project.wrap(
            backend.id(),
            vec![backend.toolchain().to_string(), "--version".to_string()],
        );
        let spec = CommandSpec::new(argv, layout.root());

        let probe = spec.to_command().and_then(|mut command| Ok(command.output()?));
        match probe {
            Ok(output) if output.status.success() => {
                println!("✅ {} - OK", backend.id());
                if verbose {
                    let version_info = if !output.stdout.is_empty() {
                        String::from_utf8_lossy(&output.stdout)
                    } else {
                        String::from_utf8_lossy(&output.stderr)
                    }
                    .lines()
                    .next()
                    .unwrap_or("")
                    .to_string();
                    println!("  {} -> {}", spec, version_info.trim());
                }
            }
            Ok(_) => {
                println!("❌ {} - FAILED", backend.id());
                if verbose {
                    println!("  {} -> non-zero exit", spec);
                }
                missing_languages.push(backend.id());
            }
            Err(e) => {
                println!("❌ {} - MISSING", backend.id());
                if verbose {
                    println!("  {} -> {}", spec, e);
                }
                missing_languages.push(backend.id());
            }
        }
    }

    println!();

    if missing_languages.is_empty() {
        println!("🎉 All language toolchains are installed!");
        Ok(())
    } else {
        println!(
            "❌ Missing language toolchains: {}",
            missing_languages.join(", ")
        );
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_test_command() {
        let cli = Cli::try_parse_from([
            "puzzlebox", "--root", "/advent", "test", "-d", "6", "-y", "2023", "-l", "python",
            "cpp", "-p", "2", "--json",
        ])
        .unwrap();

        assert_eq!(cli.root, PathBuf::from("/advent"));
        match cli.command {
            Commands::Test { puzzle, json, quiet } => {
                assert_eq!(puzzle.puzzle(), PuzzleId::new(2023, 6));
                assert_eq!(puzzle.langs, vec!["python", "cpp"]);
                assert_eq!(puzzle.part, Some(Part::Two));
                assert!(json);
                assert!(!quiet);
            }
            _ => panic!("expected test subcommand"),
        }
    }

    #[test]
    fn test_rejects_bad_day_and_part() {
        assert!(Cli::try_parse_from(["puzzlebox", "solve", "-d", "26", "-l", "go"]).is_err());
        assert!(Cli::try_parse_from(["puzzlebox", "solve", "-d", "1", "-l", "go", "-p", "3"]).is_err());
        assert!(Cli::try_parse_from(["puzzlebox", "solve", "-d", "1"]).is_err());
    }
}
