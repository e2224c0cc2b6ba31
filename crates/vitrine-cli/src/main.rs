//! Vitrine CLI: run storefront and back-office scenarios
//!
//! ## Usage
//!
//! ```bash
//! vitrine run                              # Both suites, headless
//! vitrine run --suite admin --jobs 4       # Back-office only, four sessions
//! vitrine run --filter login --report r.json
//! vitrine list --suite user
//! vitrine config --config vitrine.yaml     # Effective configuration
//! ```

use clap::Parser;
use std::process::ExitCode;
use vitrine_cli::{
    init_logging, resolve_test_config, select_scenarios, verdict, write_report, Cli, CliConfig,
    CliResult, Commands, ConfigArgs, ListArgs, Printer, RunArgs, SuiteRunner, EXIT_OK,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli);
    let use_color = config.color.should_color();
    console::set_colors_enabled(use_color);
    init_logging(config.log_format, config.verbosity, use_color);

    let printer = Printer::new(use_color, config.verbosity.is_quiet());
    match cli.command {
        Commands::Run(args) => run_suites(&printer, &args),
        Commands::List(args) => {
            list_scenarios(&printer, &args);
            Ok(())
        }
        Commands::Config(args) => show_config(&printer, &args),
    }
}

fn run_suites(printer: &Printer, args: &RunArgs) -> CliResult<()> {
    let config = resolve_test_config(&args.source)?;
    printer.header(&format!("vitrine {} @ {}", args.suite.label(), config.base_url));

    let report = SuiteRunner::from_args(args, config)?.run()?;
    printer.report(&report);
    write_report(&report, args.report.as_deref())?;
    verdict(&report)
}

fn list_scenarios(printer: &Printer, args: &ListArgs) {
    printer.listing(&select_scenarios(args.suite, args.filter.as_deref()));
}

fn show_config(printer: &Printer, args: &ConfigArgs) -> CliResult<()> {
    let config = resolve_test_config(&args.source)?;
    printer.raw(&config.to_yaml()?);
    Ok(())
}
