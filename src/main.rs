// ABOUTME: CLI entry point: unit test runner, one-shot eval, and REPL

use clap::Parser;
use mini_lisp_core::config::{VERSION, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use mini_lisp_core::doctests::run_doctests;
use mini_lisp_core::eval::{eval_src, make_core_env};
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use std::process::ExitCode;

/// mini-lisp-core driver: `unit` runs the embedded doctest suite, `eval`
/// evaluates one source string, `repl` starts an interactive session.
#[derive(Parser, Debug)]
#[command(name = "mini-lisp-core")]
#[command(version = VERSION)]
#[command(about = "A small Lisp interpreter core")]
struct CliArgs {
    /// Command to run: "unit", "eval", or "repl".
    command: Option<String>,

    /// Source text to evaluate, for the "eval" command.
    source: Option<String>,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let command = match args.command {
        Some(c) => c,
        None => {
            eprintln!("missing command");
            return ExitCode::FAILURE;
        }
    };

    match command.as_str() {
        "unit" => run_unit(),
        "eval" => run_eval(args.source),
        "repl" => run_repl(),
        other => {
            eprintln!("unrecognized command: {}", other);
            ExitCode::FAILURE
        }
    }
}

fn run_unit() -> ExitCode {
    let report = run_doctests();
    if report.success() {
        println!("{}/{} doctests passed", report.total, report.total);
        ExitCode::SUCCESS
    } else {
        for failure in &report.failures {
            eprintln!("FAIL: {}", failure);
        }
        eprintln!(
            "{}/{} doctests passed",
            report.total - report.failures.len(),
            report.total
        );
        ExitCode::FAILURE
    }
}

fn run_eval(source: Option<String>) -> ExitCode {
    let Some(source) = source else {
        eprintln!("eval requires a source argument");
        return ExitCode::FAILURE;
    };
    let env = make_core_env();
    match eval_src(&source, &env) {
        Ok(rendered) => {
            println!("{}", rendered);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_repl() -> ExitCode {
    let env = make_core_env();
    let config = Config::builder().auto_add_history(true).build();
    let mut rl = match DefaultEditor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to initialize REPL: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let history_file = ".mini_lisp_history";
    let _ = rl.load_history(history_file);

    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_SUBTITLE);

    loop {
        let readline = rl.readline("lisp> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                if matches!(line.trim(), "(quit)" | "(exit)") {
                    break;
                }
                match eval_src(&line, &env) {
                    Ok(rendered) => println!("=> {}", rendered),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
    ExitCode::SUCCESS
}
