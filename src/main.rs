use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use miette::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

mod config;
mod coverage;
mod discovery;
mod graph;
mod model;
mod parser;
mod reduce;
mod report;
mod resolve;
mod solver;

use config::Config;
use coverage::{MissingTestScan, TargetSet};
use discovery::{FileFinder, SourceFile};
use graph::GraphBuilder;
use parser::{parse_files, JavaParser, ParsedUnit};
use reduce::{SourceRewriter, TestReducer};
use solver::{ArchiveSolver, SourceSolver, TypeSolver};

/// collabcov - Collaboration-graph extraction and test curation for Java
#[derive(Parser, Debug)]
#[command(name = "collabcov")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable parallel processing for faster analysis
    #[arg(long, global = true)]
    parallel: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the class collaboration graph of a Java source tree
    ExtractGraph {
        /// Output path for the graph JSON document
        output: PathBuf,

        /// Root of the Java source tree to analyze
        source_dir: PathBuf,

        /// Classpath archive (jar) used for type resolution
        jar_path: PathBuf,
    },

    /// Report the target methods no test ever calls
    FindMissingTests {
        /// Graph or clusters document holding the target methods
        clusters: PathBuf,

        /// Root of the test source tree
        test_dir: PathBuf,

        /// Classpath archive (jar) used for type resolution
        jar_path: PathBuf,

        /// Root of the Java source tree
        src_dir: PathBuf,

        /// Output path for the untested-methods JSON report
        output: PathBuf,
    },

    /// Remove covered test methods from a copy of the test tree
    ReduceTests {
        /// Graph or clusters document holding the relevant methods
        clusters: PathBuf,

        /// Root of the test source tree
        test_dir: PathBuf,

        /// Output directory for the reduced test tree
        output_dir: PathBuf,

        /// Classpath archive (jar) used for type resolution
        jar_path: PathBuf,

        /// Root of the Java source tree
        src_dir: PathBuf,

        /// Skip the confirmation prompt when clearing the output directory
        #[arg(long)]
        yes: bool,

        /// Print removal decisions without copying or rewriting anything
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    info!("collabcov v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config(&cli)?;

    match &cli.command {
        Command::ExtractGraph {
            output,
            source_dir,
            jar_path,
        } => cmd_extract_graph(&config, &cli, output, source_dir, jar_path),
        Command::FindMissingTests {
            clusters,
            test_dir,
            jar_path,
            src_dir,
            output,
        } => cmd_find_missing_tests(&config, &cli, clusters, test_dir, jar_path, src_dir, output),
        Command::ReduceTests {
            clusters,
            test_dir,
            output_dir,
            jar_path,
            src_dir,
            yes,
            dry_run,
        } => cmd_reduce_tests(
            &config, &cli, clusters, test_dir, output_dir, jar_path, src_dir, *yes, *dry_run,
        ),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    if let Some(config_path) = &cli.config {
        Config::from_file(config_path)
    } else {
        // Try to load from default locations
        Config::from_default_locations(Path::new("."))
    }
}

fn ensure_dir(path: &Path, what: &str) -> Result<()> {
    if !path.is_dir() {
        return Err(miette::miette!("{} not found: {}", what, path.display()));
    }
    Ok(())
}

/// Parse discovered files into units, with a progress bar in sequential mode.
fn parse_with_progress(files: &[SourceFile], cli: &Cli) -> Vec<ParsedUnit> {
    if cli.parallel {
        if !cli.quiet {
            println!(
                "{}",
                format!("⚡ Parallel mode: parsing {} files...", files.len()).cyan()
            );
        }
        return parse_files(files, true);
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );

    info!("Parsing files...");
    let parser = JavaParser::new();
    let mut units = Vec::new();
    for file in files {
        match file.read_contents() {
            Ok(contents) => match parser.parse(&file.path, &contents) {
                Ok(unit) => units.push(unit),
                Err(err) => warn!("Skipping unparseable file {}: {}", file.path.display(), err),
            },
            Err(err) => warn!("Skipping unreadable file {}: {}", file.path.display(), err),
        }
        pb.inc(1);
    }
    pb.finish_with_message("Parsing complete");

    units
}

/// Assemble the combined solver: project sources, the positional archive and
/// any configured extras. The positional archive must load; extras only warn.
fn build_solver(config: &Config, units: &[ParsedUnit], jar_path: &Path) -> Result<TypeSolver> {
    let mut archives = ArchiveSolver::new();
    let added = archives.load(jar_path)?;
    info!("Classpath archive: {} classes from {}", added, jar_path.display());

    for extra in &config.extra_archives {
        match archives.load(extra) {
            Ok(added) => info!("Extra archive: {} classes from {}", added, extra.display()),
            Err(err) => eprintln!(
                "{}: Failed to load archive {}: {}",
                "Warning".yellow(),
                extra.display(),
                err
            ),
        }
    }

    let solver = TypeSolver::new(SourceSolver::from_units(units), archives);
    info!(
        "Solver ready: {} source types, {} archive classes",
        solver.source_type_count(),
        solver.archive_class_count()
    );
    Ok(solver)
}

fn cmd_extract_graph(
    config: &Config,
    cli: &Cli,
    output: &Path,
    source_dir: &Path,
    jar_path: &Path,
) -> Result<()> {
    let start_time = Instant::now();

    ensure_dir(source_dir, "Source directory")?;

    // Step 1: Discover source files
    info!("Discovering Java files...");
    let finder = FileFinder::new(config);
    let files = finder.find_java_files(source_dir)?;
    info!("Found {} Java files", files.len());

    if files.is_empty() && !cli.quiet {
        println!("{}", "No Java files found.".yellow());
    }

    // Step 2: Parse
    let units = parse_with_progress(&files, cli);

    // Step 3: Assemble the solver
    let solver = build_solver(config, &units, jar_path)?;

    // Step 4: Build the graph
    info!("Building collaboration graph...");
    let mut builder = GraphBuilder::new(&solver);
    for unit in &units {
        builder.register_unit(unit);
    }
    if cli.parallel {
        builder.scan_units_parallel(&units);
    } else {
        builder.scan_units(&units);
    }
    let (graph, stats) = builder.build();

    // Step 5: Write the document
    report::write_graph(&graph.to_document(), output)?;
    println!("Graph written to: {}", output.display());

    report::print_graph_summary(&stats);

    if !cli.quiet {
        println!(
            "{}",
            format!(
                "⏱  Analyzed {} files in {:.2}s",
                files.len(),
                start_time.elapsed().as_secs_f64()
            )
            .dimmed()
        );
    }

    Ok(())
}

fn cmd_find_missing_tests(
    config: &Config,
    cli: &Cli,
    clusters: &Path,
    test_dir: &Path,
    jar_path: &Path,
    src_dir: &Path,
    output: &Path,
) -> Result<()> {
    let start_time = Instant::now();

    ensure_dir(test_dir, "Test directory")?;
    ensure_dir(src_dir, "Source directory")?;

    // Step 1: Load the target set
    let targets = TargetSet::load(clusters)?;
    info!(
        "Loaded {} target methods from {}",
        targets.len(),
        clusters.display()
    );

    // Step 2: Parse the source tree
    info!("Discovering Java files...");
    let finder = FileFinder::new(config);
    let model_files = finder.find_java_files(src_dir)?;
    info!("Found {} Java files", model_files.len());
    let units = parse_with_progress(&model_files, cli);

    // Step 3: Assemble the solver
    let solver = build_solver(config, &units, jar_path)?;

    // Step 4: Scan the test tree
    let test_files = finder.find_java_files(test_dir)?;
    info!("Scanning {} test files...", test_files.len());
    let scan = MissingTestScan::new(&solver, targets);
    let outcome = scan.run(&test_files, cli.parallel);

    // Step 5: Write the report
    report::write_missing_tests(&outcome.missing, output)?;
    println!("Report written to: {}", output.display());

    report::print_missing_summary(&outcome);

    if !cli.quiet {
        println!(
            "{}",
            format!(
                "⏱  Scanned {} test files in {:.2}s",
                test_files.len(),
                start_time.elapsed().as_secs_f64()
            )
            .dimmed()
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_reduce_tests(
    config: &Config,
    cli: &Cli,
    clusters: &Path,
    test_dir: &Path,
    output_dir: &Path,
    jar_path: &Path,
    src_dir: &Path,
    yes: bool,
    dry_run: bool,
) -> Result<()> {
    let start_time = Instant::now();

    ensure_dir(test_dir, "Test directory")?;
    ensure_dir(src_dir, "Source directory")?;

    // Step 1: Load the target set and the test-method pattern
    let targets = TargetSet::load(clusters)?;
    info!(
        "Loaded {} target methods from {}",
        targets.len(),
        clusters.display()
    );
    let pattern = config.test_pattern()?;

    // Step 2: Parse the source tree
    info!("Discovering Java files...");
    let finder = FileFinder::new(config);
    let model_files = finder.find_java_files(src_dir)?;
    info!("Found {} Java files", model_files.len());
    let units = parse_with_progress(&model_files, cli);

    // Step 3: Assemble the solver
    let solver = build_solver(config, &units, jar_path)?;

    // Step 4: Prepare the working copy (dry runs scan the original in place)
    let scan_root = if dry_run {
        test_dir.to_path_buf()
    } else {
        let rewriter = SourceRewriter::new();
        if !rewriter.prepare_working_copy(test_dir, output_dir, yes)? {
            return Ok(());
        }
        info!("Working copy prepared at {}", output_dir.display());
        output_dir.to_path_buf()
    };

    // Step 5: Decide and apply removals
    let test_files = finder.find_java_files(&scan_root)?;
    info!("Examining {} test files...", test_files.len());
    let reducer = TestReducer::new(&solver, targets, pattern);
    let stats = reducer.run(&test_files, cli.parallel, dry_run)?;

    report::print_reduce_summary(&stats);

    if !cli.quiet {
        println!(
            "{}",
            format!(
                "⏱  Examined {} test files in {:.2}s",
                test_files.len(),
                start_time.elapsed().as_secs_f64()
            )
            .dimmed()
        );
    }

    Ok(())
}
