use std::{
    env,
    io::{self, BufRead, Write},
    path::Path,
    process::ExitCode,
};

use owl::{Engine, LoadError, ReplOutcome, ReplSession, StdPrint};

const PROMPT: &str = ">> ";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => repl(),
        2 => run_dir(&args[1]),
        _ => {
            eprintln!("usage: owl [directory]");
            ExitCode::SUCCESS
        }
    }
}

fn repl() -> ExitCode {
    let mut session = ReplSession::new();
    let mut print = StdPrint;
    let stdin = io::stdin();

    loop {
        print!("{PROMPT}");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return ExitCode::SUCCESS,
            Ok(_) => {}
        }

        match session.eval(&line, &mut print) {
            ReplOutcome::Return(value) => println!("{value}"),
            ReplOutcome::Ran => {}
            ReplOutcome::Parse(errors) => {
                for err in errors {
                    println!("{err}");
                }
            }
            ReplOutcome::Fault(err) => println!("Error: {err}"),
        }
    }
}

/// Runs `<dir>/main.hoot`. Parse errors print as `line:col: message`;
/// evaluation failures go to stderr. The exit code is always 0.
fn run_dir(dir: &str) -> ExitCode {
    let path = Path::new(dir).join("main.hoot");

    let engine = match Engine::load_path(&path) {
        Ok(engine) => engine,
        Err(LoadError::Io(_)) => {
            println!("Failed to locate program");
            return ExitCode::SUCCESS;
        }
        Err(LoadError::Parse(errors)) => {
            for err in errors {
                println!("{err}");
            }
            return ExitCode::SUCCESS;
        }
    };

    if let Err(err) = engine.run() {
        eprintln!("{err}");
    }
    ExitCode::SUCCESS
}
