// Copyright 2026 Cornell University
// released under MIT License

use anyhow::{anyhow, Context};
use clap::{ColorChoice, Parser, Subcommand};
use clap_verbosity_flag::{log::LevelFilter, Verbosity, WarnLevel};
use fifobench::designs::{Design, Variant};
use fifobench::diagnostic::DiagnosticHandler;
use fifobench::response::ResponseFormat;
use fifobench::scoreboard::{load_traces, verify_traces, LoadedTraces, DEFAULT_DEPTH};
use fifobench::stimulus::{write_stimulus, Scenario, StimulusGenerator};
use fifobench::summary::{
    format_comparison_table, format_design_summary, DesignResult, SimStatus,
};
use fifobench::toolchain::{self, XsimEnv};
use fifobench::{ScoreboardConfig, Verdict};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Args for the FIFO verification CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, disable_version_flag = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Users can specify `-v` or `--verbose` to toggle logging
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,

    /// Pass in `--color never` to suppress colored diagnostics.
    /// (By default, diagnostics are displayed w/ ANSI colors.)
    #[arg(long, value_name = "COLOR_CHOICE", default_value = "auto", global = true)]
    color: ColorChoice,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a stimulus trace for one scenario
    Generate {
        #[arg(short, long, value_enum)]
        scenario: Scenario,

        /// FIFO depth
        #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
        depth: usize,

        /// Seed for the random burst payload (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Where to write the stimulus trace
        #[arg(short, long, value_name = "STIMULUS_FILE", default_value = toolchain::STIMULUS_FILE)]
        output: PathBuf,
    },

    /// Check a response trace against the golden FIFO model
    Verify {
        /// Stimulus trace that was applied to the DUT
        #[arg(short, long, value_name = "STIMULUS_FILE", default_value = toolchain::STIMULUS_FILE)]
        stimulus: PathBuf,

        /// Response trace recorded from the DUT
        #[arg(short, long, value_name = "RESPONSE_FILE", default_value = toolchain::RESPONSE_FILE)]
        response: PathBuf,

        /// FIFO depth of the DUT
        #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
        depth: usize,

        /// Layout of the response trace
        #[arg(short, long, value_enum, default_value_t = ResponseFormat::FlowControlled)]
        format: ResponseFormat,
    },

    /// Generate, simulate and verify each design, then compare them
    Run {
        /// Designs to run (both if omitted)
        #[arg(long = "design", value_enum)]
        designs: Vec<Variant>,

        #[arg(short, long, value_enum, default_value_t = Scenario::SimultaneousBurst)]
        scenario: Scenario,

        #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
        depth: usize,

        #[arg(long)]
        seed: Option<u64>,

        /// Directory in which the simulator runs and the traces live
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        work_dir: PathBuf,

        /// Directory containing `fifo_sync.sv` and `fifo_async.sv`
        #[arg(long, value_name = "DIR", default_value = "../rtl")]
        rtl_dir: PathBuf,

        /// Directory containing the unified testbench
        #[arg(long, value_name = "DIR", default_value = "../tb")]
        tb_dir: PathBuf,

        /// Directory containing `xvlog`, `xelab` and `xsim`
        #[arg(long, value_name = "DIR", env = "XILINX_BIN")]
        tool_dir: Option<PathBuf>,
    },

    /// Delete simulator logs and scratch directories
    Clean {
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        work_dir: PathBuf,

        /// Also delete the stimulus and response traces
        #[arg(long)]
        traces: bool,
    },
}

fn generate_stimulus(
    scenario: Scenario,
    depth: usize,
    seed: Option<u64>,
    output: &Path,
) -> anyhow::Result<usize> {
    let mut generator = match seed {
        Some(seed) => StimulusGenerator::with_seed(depth, seed),
        None => StimulusGenerator::new(depth),
    };
    let records = scenario.generate(&mut generator);
    let file = File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    write_stimulus(&mut BufWriter::new(file), &records)
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(records.len())
}

/// Verifies loaded traces and renders any skipped lines and the first
/// mismatch as diagnostics
fn check(traces: &LoadedTraces, depth: usize, handler: &mut DiagnosticHandler) -> Verdict {
    let stim_id = handler.add_file(
        traces.stimulus_path.display().to_string(),
        traces.stimulus_text.clone(),
    );
    let resp_id = handler.add_file(
        traces.response_path.display().to_string(),
        traces.response_text.clone(),
    );
    for (path, err) in traces.malformed() {
        let file_id = if path == traces.stimulus_path {
            stim_id
        } else {
            resp_id
        };
        handler.emit_malformed(file_id, err);
    }

    let verdict = verify_traces(&traces.stimulus, &traces.responses, depth);
    if let Some(mismatch) = &verdict.mismatch {
        handler.emit_mismatch(resp_id, mismatch);
    }
    verdict
}

fn run_design(
    env: &XsimEnv,
    design: &Design,
    scenario: Scenario,
    config: &ScoreboardConfig,
    seed: Option<u64>,
    handler: &mut DiagnosticHandler,
) -> DesignResult {
    println!("\n--- Simulating {} ---", design.name);

    if let Err(e) = toolchain::clean_artifacts(env.working_dir()) {
        log::warn!("failed to clean up old logs: {}", e);
    }
    let generated = generate_stimulus(scenario, config.depth, seed, &env.stimulus_path());
    if let Err(e) = generated {
        eprintln!("{:#}", e);
        return DesignResult::errored(&design.name);
    }

    let response_path = match toolchain::run_simulation(env, design) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("!!! Simulation Failed for {} !!!\n{}", design.name, e);
            if let Some(tail) = toolchain::tail_log(env.working_dir().join("xelab.log"), 20) {
                eprintln!("\n--- TAIL of xelab.log ---\n{}\n", tail);
            }
            return DesignResult::errored(&design.name);
        }
    };

    match load_traces(env.stimulus_path(), response_path, config.format) {
        Ok(traces) => {
            let verdict = check(&traces, config.depth, handler);
            DesignResult::verified(&design.name, &verdict)
        }
        Err(e) => {
            eprintln!("{}", e);
            DesignResult::errored(&design.name)
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Parse CLI args
    let cli = Cli::parse();

    // Set up logger to use the log-level specified via the `-v` flag
    // For concision, we disable timestamps in the log
    let mut logger = env_logger::Builder::new();
    logger
        .format_timestamp(None)
        .filter_level(cli.verbosity.log_level_filter());
    if cli.color == ColorChoice::Never {
        logger.write_style(env_logger::WriteStyle::Never);
    }
    logger.init();

    // Skipped trace lines are only reported with `--verbose`
    // (the --verbose flag triggers `LevelFilter::Info`)
    let emit_warnings = cli.verbosity.log_level_filter() >= LevelFilter::Info;
    let handler = &mut DiagnosticHandler::new(cli.color, emit_warnings);

    match cli.command {
        Command::Generate {
            scenario,
            depth,
            seed,
            output,
        } => {
            let cycles = generate_stimulus(scenario, depth, seed, &output)?;
            println!(
                "Generated {} cycles of {} stimulus in {}",
                cycles,
                scenario,
                output.display()
            );
            Ok(())
        }
        Command::Verify {
            stimulus,
            response,
            depth,
            format,
        } => {
            let traces = load_traces(&stimulus, &response, format)?;
            let verdict = check(&traces, depth, handler);
            println!("{}", verdict);
            if verdict.passed {
                Ok(())
            } else {
                let reason = verdict.mismatch.map(|m| m.to_string()).unwrap_or_default();
                Err(anyhow!("verification failed: {}", reason))
            }
        }
        Command::Run {
            designs,
            scenario,
            depth,
            seed,
            work_dir,
            rtl_dir,
            tb_dir,
            tool_dir,
        } => {
            let variants = if designs.is_empty() {
                vec![Variant::Sync, Variant::Async]
            } else {
                designs
            };
            let env = XsimEnv::new(work_dir).with_tool_dir(tool_dir);
            let config = ScoreboardConfig {
                depth,
                ..Default::default()
            };

            println!("=== STARTING FIFO COMPARISON SUITE ===");
            let mut results = vec![];
            for variant in variants {
                let design = Design::for_variant(variant, &rtl_dir, &tb_dir);
                let result = run_design(&env, &design, scenario, &config, seed, handler);
                println!("\n{}\n", format_design_summary(&result));
                results.push(result);
            }
            println!("{}", format_comparison_table(&results));

            if results.iter().all(|r| r.status == SimStatus::Pass) {
                Ok(())
            } else {
                Err(anyhow!("one or more designs did not pass"))
            }
        }
        Command::Clean { work_dir, traces } => {
            let mut removed = toolchain::clean_artifacts(&work_dir)
                .with_context(|| format!("failed to clean {}", work_dir.display()))?;
            if traces {
                removed.extend(toolchain::clean_traces(&work_dir)?);
            }
            for path in &removed {
                println!("Deleted: {}", path.display());
            }
            println!("Cleanup complete, {} item(s) removed", removed.len());
            Ok(())
        }
    }
}
