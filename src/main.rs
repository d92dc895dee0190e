use clap::Parser;
use cotreport::cli::{init_logging, run, Cli};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());
    run(cli)
}
