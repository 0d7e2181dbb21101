//! C-- front end CLI
//!
//! Usage: cmc <input.c> [--dump-tokens] [--dump-ast] [--dump-symtab] [--stats]

use clap::Parser;
use cminus::Driver;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "cmc")]
#[command(version = "0.1.0")]
#[command(about = "C-- front end - checks declarations and types, builds syntax trees", long_about = None)]
struct Args {
    /// Input C-- file (.c or .cm)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Print tokens for debugging
    #[arg(long, default_value_t = false)]
    dump_tokens: bool,

    /// Print the syntax tree of every function
    #[arg(long, default_value_t = false)]
    dump_ast: bool,

    /// Print the local and global symbol tables
    #[arg(long, default_value_t = false)]
    dump_symtab: bool,

    /// Print node counts per function
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut driver = match Driver::from_path(&args.input) {
        Ok(driver) => driver,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    driver.set_dump_tokens(args.dump_tokens);
    driver.set_dump_ast(args.dump_ast);
    driver.set_dump_symtab(args.dump_symtab);
    driver.set_stats(args.stats);

    match driver.compile() {
        Ok(summary) => {
            if let Some(globals) = &summary.global_symbols {
                eprintln!("=== globals ===");
                eprint!("{}", globals);
            }
            if let Some(stats) = &summary.stats {
                print!("{}", stats);
            }

            println!(
                "{}: {} ({} function{})",
                "checked".green().bold(),
                args.input.display(),
                summary.functions,
                if summary.functions == 1 { "" } else { "s" }
            );
            ExitCode::SUCCESS
        }
        Err(diagnostics) => {
            for diag in &diagnostics {
                eprintln!("{}", diag);
            }

            let count = diagnostics.len();
            eprintln!(
                "\n{} generated",
                format!("{} error{}", count, if count == 1 { "" } else { "s" })
                    .red()
                    .bold()
            );

            ExitCode::FAILURE
        }
    }
}
