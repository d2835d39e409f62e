use icsmend::cli::{self, CliArgs};
use icsmend::config::Config;
use icsmend::context::StandardContext;
use icsmend::repair::Repairer;
use icsmend::report::LogReporter;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CliArgs::parse(env::args().skip(1));

    if args.help {
        cli::print_help("icsmend");
        return ExitCode::SUCCESS;
    }

    if !args.unknown.is_empty() {
        eprintln!("Unrecognized arguments: {}", args.unknown.join(" "));
        eprintln!("Try 'icsmend --help'.");
        return ExitCode::FAILURE;
    }

    let Some(target) = args.target else {
        cli::print_help("icsmend");
        return ExitCode::FAILURE;
    };

    // The logger must exist before the config loads so config warnings are
    // not dropped; the effective level is only known afterwards, so init
    // wide open and narrow via the global filter.
    let _ = TermLogger::init(
        LevelFilter::Debug,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    log::set_max_level(LevelFilter::Info);

    let ctx = StandardContext::new(args.root);
    let config = Config::load_or_default(&ctx);
    if config.verbose {
        log::set_max_level(LevelFilter::Debug);
    }

    if !target.exists() {
        log::error!("The specified path does not exist: {}", target.display());
        return ExitCode::FAILURE;
    }

    let mut reporter = LogReporter;
    let mut repairer = Repairer::new(config, &mut reporter);
    match repairer.repair_path(&target) {
        Ok(summary) => {
            if summary.failed == 0 {
                ExitCode::SUCCESS
            } else {
                log::error!(
                    "{} of {} file(s) could not be repaired",
                    summary.failed,
                    summary.attempted
                );
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
