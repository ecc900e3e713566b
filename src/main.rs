use std::process::ExitCode;

use clap::Parser;

use mount::cli::{self, Cli};
use mount::logger::Logger;
use mount::loop_device::SysLoopControl;
use mount::mounter::SysMounter;
use mount::orchestrator::Orchestrator;
use mount::registry::FilesystemRegistry;

fn init_logging(verbose: bool) {
    let filter = cli::default_log_filter(verbose);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn main() -> ExitCode {
    let appname = "mount";
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.is_bare() {
        if let Err(err) = cli::print_mounts() {
            eprintln!("{appname}: {err:#}");
            return ExitCode::from(cli::EXIT_FAILURE);
        }
        return ExitCode::from(cli::EXIT_SUCCESS);
    }

    let Some(request) = cli.request() else {
        eprintln!("{}", cli::usage());
        return ExitCode::from(cli::EXIT_FAILURE);
    };

    let logger = Logger::new(appname.to_string(), cli.notify);
    let orchestrator = Orchestrator::new(
        SysMounter,
        SysLoopControl,
        FilesystemRegistry::default(),
        logger,
        cli.loop_cleanup(),
    );
    let result = orchestrator.run(request);
    if let Err(err) = &result {
        eprintln!("{appname}: {}", cli::describe(err));
        if let Some(hint) = orchestrator.failure_hint(err) {
            eprintln!("{hint}");
        }
    }
    ExitCode::from(cli::exit_status(&result))
}
