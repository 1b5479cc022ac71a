use clap::Parser;
use import_statistics::cli::{args::Args, commands};
use std::io;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help
    if args.command.is_none() {
        if let Err(error) = commands::show_help(&mut io::stdout()) {
            eprintln!("Failed to print help: {}", error);
            process::exit(1);
        }
        process::exit(0);
    }

    match commands::run(args) {
        Ok(_summary) => {
            // Summary has already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
