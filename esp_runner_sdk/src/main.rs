//! # ESP Runner CLI
//!
//! `esp-runner exec <refs...>` compiles rule files and runs them against a
//! target. Exit status: 0 when nothing failed, 1 when a check failed or
//! errored, 2 on configuration or compilation errors.

use clap::{Parser, Subcommand};
use esp_runner_base::config::env_vars;
use esp_runner_base::execution::ExecutionEngine;
use esp_runner_base::{Runner, RunnerConfig, RunnerError, TargetConfig};
use esp_runner_sdk::{create_resource_registry, create_runner};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURES: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "esp-runner", author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and run rule files against a target
    Exec {
        /// Rule files or directories
        #[arg(required = true)]
        references: Vec<String>,

        /// Target URI, e.g. local:// or ssh://admin@host:22
        #[arg(short, long)]
        target: Option<String>,

        /// Profile id attached to compiled rules
        #[arg(long)]
        id: Option<String>,

        /// Run every command through sudo
        #[arg(long)]
        sudo: bool,

        /// Password passed to sudo on standard input
        #[arg(long)]
        sudo_password: Option<String>,

        /// Extra sudo options, e.g. "-H"
        #[arg(long, allow_hyphen_values = true)]
        sudo_options: Option<String>,

        /// Account the session is logged in as (root disables sudo).
        /// Use --sudo-options "-u postgres" to run commands as another user
        #[arg(long)]
        user: Option<String>,

        /// Output format: progress, documentation or json
        #[arg(short, long)]
        format: Option<String>,

        /// Runner configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Keep compiling after a rule file fails and run what compiled
        #[arg(long)]
        keep_going: bool,
    },

    /// List registered resource types
    Resources,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Resources => list_resources(),
        Commands::Exec {
            references,
            target,
            id,
            sudo,
            sudo_password,
            sudo_options,
            user,
            format,
            config,
            keep_going,
        } => {
            let config = match build_config(ExecOptions {
                target,
                id,
                sudo,
                sudo_password,
                sudo_options,
                user,
                format,
                config,
                keep_going,
            }) {
                Ok(config) => config,
                Err(e) => return fail(&e),
            };
            exec(config, &references)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        std::env::var(env_vars::LOG_LEVEL)
            .ok()
            .and_then(|level| LevelFilter::from_str(&level).ok())
            .unwrap_or(LevelFilter::Warn)
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .init();
}

struct ExecOptions {
    target: Option<String>,
    id: Option<String>,
    sudo: bool,
    sudo_password: Option<String>,
    sudo_options: Option<String>,
    user: Option<String>,
    format: Option<String>,
    config: Option<PathBuf>,
    keep_going: bool,
}

/// File, then environment, then command line
fn build_config(options: ExecOptions) -> Result<RunnerConfig, RunnerError> {
    let mut config = match &options.config {
        Some(path) => RunnerConfig::from_file(path)?,
        None => RunnerConfig::new(),
    }
    .with_env_overrides();

    if let Some(uri) = &options.target {
        config.target = TargetConfig::from_uri(uri)?;
    }
    if let Some(id) = options.id {
        config.profile_id = Some(id);
    }
    if options.sudo {
        config.escalation.sudo = true;
    }
    if let Some(password) = options.sudo_password {
        config.escalation.sudo_password = Some(password);
    }
    if let Some(sudo_options) = options.sudo_options {
        config.escalation.sudo_options = Some(sudo_options);
    }
    if let Some(user) = options.user {
        config.escalation.user = Some(user);
    }
    if let Some(format) = options.format {
        config.format = format;
    }
    if options.keep_going {
        config.fail_fast = false;
    }
    Ok(config)
}

fn exec(config: RunnerConfig, references: &[String]) -> ExitCode {
    let keep_going = !config.fail_fast;
    let mut engine = ExecutionEngine::stdout(config.output_format());

    let mut runner = match create_runner(config) {
        Ok(runner) => runner,
        Err(e) => return fail(&e.into()),
    };

    ExitCode::from(compile_and_run(&mut runner, references, keep_going, &mut engine))
}

/// Add `references` and run them, returning the exit status.
///
/// With `keep_going`, a partial compilation is reported and the groups that
/// did compile still run; the exit status is then [`EXIT_ERROR`] whatever
/// the checks did.
fn compile_and_run(
    runner: &mut Runner,
    references: &[String],
    keep_going: bool,
    engine: &mut ExecutionEngine,
) -> u8 {
    let mut compile_failed = false;
    if let Err(e) = runner.add_tests(references) {
        eprintln!("Error: {}", e.user_message());
        match e {
            RunnerError::PartialCompilation { .. } if keep_going => compile_failed = true,
            _ => return EXIT_ERROR,
        }
    }

    let results = runner.run_with(engine);
    if compile_failed {
        EXIT_ERROR
    } else if results.passed() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURES
    }
}

fn list_resources() -> ExitCode {
    match create_resource_registry() {
        Ok(registry) => {
            for (type_id, summary) in registry.summaries() {
                println!("{:<10} {}", type_id, summary);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn fail(error: &RunnerError) -> ExitCode {
    eprintln!("Error: {}", error.user_message());
    ExitCode::from(EXIT_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use esp_runner_base::backend::{CommandOutput, MockBackend, MockTransport};
    use esp_runner_base::results::OutcomeStatus;
    use esp_runner_base::{RunnerState, StaticResolver};
    use esp_runner_sdk::runner_builder;

    const PASSING: &str = r#"
[[rule]]
id = "good-01"

[[rule.check]]
resource = "command"
args = ["echo ok"]

[[rule.check.expect]]
property = "exit_status"
matcher = "eq"
value = 0
"#;

    const FAILING: &str = r#"
[[rule]]
id = "bad-01"

[[rule.check]]
resource = "command"
args = ["echo ok"]

[[rule.check.expect]]
property = "exit_status"
matcher = "eq"
value = 1
"#;

    const BROKEN: &str = "not = [valid";

    fn runner(fail_fast: bool, units: &[(&str, &str)]) -> Runner {
        let config = RunnerConfig::new()
            .with_target(TargetConfig::default().with_backend("mock"))
            .with_fail_fast(fail_fast);
        let backend = MockBackend::new().with_command("echo ok", CommandOutput::success("ok\n"));
        let resolver = units
            .iter()
            .fold(StaticResolver::new(), |resolver, (reference, content)| {
                resolver.with_content(*reference, *content)
            });

        runner_builder(config)
            .unwrap()
            .with_transport(MockTransport::new(backend))
            .with_resolver(resolver)
            .build()
            .unwrap()
    }

    fn references(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_keep_going_runs_compiled_units_and_exits_with_error() {
        let mut runner = runner(false, &[("a_good", PASSING), ("b_bad", BROKEN)]);
        let status = compile_and_run(
            &mut runner,
            &references(&["a_good", "b_bad"]),
            true,
            &mut ExecutionEngine::silent(),
        );

        assert_eq!(status, EXIT_ERROR);
        assert_eq!(runner.state(), RunnerState::Executed);
        assert_eq!(runner.registry().ids(), vec!["good-01"]);
    }

    #[test]
    fn test_fail_fast_stops_before_running() {
        let mut runner = runner(true, &[("a_good", PASSING), ("b_bad", BROKEN)]);
        let status = compile_and_run(
            &mut runner,
            &references(&["a_good", "b_bad"]),
            false,
            &mut ExecutionEngine::silent(),
        );

        assert_eq!(status, EXIT_ERROR);
        assert_ne!(runner.state(), RunnerState::Executed);
    }

    #[test]
    fn test_exit_status_follows_check_results() {
        let mut passing = runner(true, &[("a_good", PASSING)]);
        let status = compile_and_run(&mut passing, &references(&["a_good"]), false, &mut ExecutionEngine::silent());
        assert_eq!(status, EXIT_SUCCESS);

        let mut failing = runner(true, &[("a_good", PASSING), ("c_fail", FAILING)]);
        let mut engine = ExecutionEngine::silent();
        let status = compile_and_run(&mut failing, &references(&["a_good", "c_fail"]), true, &mut engine);
        assert_eq!(status, EXIT_FAILURES);
        assert_eq!(failing.registry().len(), 2);
    }

    #[test]
    fn test_keep_going_outcomes_cover_compiled_rule() {
        let mut runner = runner(false, &[("a_good", PASSING), ("b_bad", BROKEN)]);
        runner.add_tests(&references(&["a_good", "b_bad"])).unwrap_err();
        let results = runner.run_with(&mut ExecutionEngine::silent());
        assert_eq!(results.groups.len(), 1);
        assert_eq!(results.groups[0].id.as_deref(), Some("good-01"));
        assert_eq!(results.groups[0].status, OutcomeStatus::Passed);
    }

    #[test]
    fn test_user_flag_describes_login_account() {
        use clap::CommandFactory;

        let cli = Cli::command();
        let exec = cli.find_subcommand("exec").unwrap();
        let user = exec.get_arguments().find(|arg| arg.get_id() == "user").unwrap();
        let help = user.get_help().unwrap().to_string();
        assert!(help.contains("logged in as"));
        assert!(help.contains("root disables sudo"));
    }
}
