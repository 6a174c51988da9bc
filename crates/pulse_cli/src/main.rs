//! `pulse`: drive the FIFO and comparator cycle models from bench files.
//!
//! Subcommands:
//! - `init` scaffolds a project with `pulse.toml` and two smoke benches,
//! - `run` executes one bench and reports expectation failures,
//! - `test` runs every bench under `benches/`,
//! - `check` loads and resolves every bench without simulating.

#![warn(missing_docs)]

mod check;
mod init;
mod pipeline;
mod run;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(name = "pulse", version, about = "Cycle-accurate FIFO and comparator models")]
pub struct Cli {
    /// Only print errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print per-tick port tables after each bench.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this `pulse.toml` instead of searching upward from the cwd.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scaffold a project, in `./<name>` or the current directory.
    Init {
        /// Directory to create.
        name: Option<String>,
    },
    /// Run one bench by name or path.
    Run(RunArgs),
    /// Run every bench in the project.
    Test(TestArgs),
    /// Validate configuration and benches.
    Check,
}

/// `pulse run` options.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Bench name under `benches/`, or a path to a bench file.
    pub bench: String,

    /// Write the waveform here instead of `out/<bench>.vcd`.
    #[arg(long)]
    pub vcd: Option<String>,

    /// Skip the waveform.
    #[arg(long)]
    pub no_waveform: bool,

    /// How to print the result.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// `pulse test` options.
#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Run only the bench with this exact name.
    pub name: Option<String>,

    /// Run only benches whose name contains this substring.
    #[arg(long)]
    pub filter: Option<String>,

    /// Skip waveforms for every bench.
    #[arg(long)]
    pub no_waveform: bool,
}

/// Output style for `pulse run`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Summary line plus one line per failure.
    Text,
    /// A single JSON object on stdout.
    Json,
}

/// Flags shared by every subcommand.
pub struct GlobalArgs {
    /// Only print errors.
    pub quiet: bool,
    /// Print per-tick tables.
    pub verbose: bool,
    /// Explicit config file.
    pub config: Option<String>,
}

impl Cli {
    /// Separates the shared flags from the subcommand.
    fn split(self) -> (GlobalArgs, Command) {
        let global = GlobalArgs {
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config,
        };
        (global, self.command)
    }
}

fn main() {
    let (global, command) = Cli::parse().split();

    let outcome = match &command {
        Command::Init { name } => init::run(name.clone(), &global),
        Command::Run(args) => run::run(args, &global),
        Command::Test(args) => test::run(args, &global),
        Command::Check => check::run(&global),
    };

    let code = outcome.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        1
    });
    process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> (GlobalArgs, Command) {
        Cli::parse_from(std::iter::once("pulse").chain(args.iter().copied())).split()
    }

    #[test]
    fn init_name_is_optional() {
        assert!(matches!(parse(&["init"]).1, Command::Init { name: None }));
        let (_, cmd) = parse(&["init", "lab"]);
        assert!(matches!(cmd, Command::Init { name: Some(n) } if n == "lab"));
    }

    #[test]
    fn global_flags_work_on_either_side_of_the_subcommand() {
        let (global, cmd) = parse(&["--quiet", "check"]);
        assert!(global.quiet && !global.verbose);
        assert!(matches!(cmd, Command::Check));

        let (global, _) = parse(&["test", "-v", "--config", "/tmp/pulse.toml"]);
        assert!(global.verbose);
        assert_eq!(global.config.as_deref(), Some("/tmp/pulse.toml"));
    }

    #[test]
    fn run_defaults() {
        let Command::Run(args) = parse(&["run", "fifo_smoke"]).1 else {
            panic!("expected run");
        };
        assert_eq!(args.bench, "fifo_smoke");
        assert_eq!(args.vcd, None);
        assert!(!args.no_waveform);
        assert_eq!(args.format, ReportFormat::Text);
    }

    #[test]
    fn run_options() {
        let Command::Run(args) = parse(&[
            "run",
            "benches/x.toml",
            "--vcd",
            "out/a.vcd",
            "-f",
            "json",
            "--no-waveform",
        ])
        .1
        else {
            panic!("expected run");
        };
        assert_eq!(args.vcd.as_deref(), Some("out/a.vcd"));
        assert_eq!(args.format, ReportFormat::Json);
        assert!(args.no_waveform);
    }

    #[test]
    fn test_selection() {
        let Command::Test(args) = parse(&["test"]).1 else {
            panic!("expected test");
        };
        assert!(args.name.is_none() && args.filter.is_none() && !args.no_waveform);

        let Command::Test(args) = parse(&["test", "fifo_smoke", "--filter", "fifo"]).1 else {
            panic!("expected test");
        };
        assert_eq!(args.name.as_deref(), Some("fifo_smoke"));
        assert_eq!(args.filter.as_deref(), Some("fifo"));
    }
}
