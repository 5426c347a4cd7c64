mod cli;

use clap::Parser;

fn main() -> Result<(), cli::CliError> {
    // stdout carries exported markup; diagnostics go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = cli::Cli::parse();
    cli::run(args)
}
