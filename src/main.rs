use std::io::{self, BufRead, Read, Write};
use std::process::exit;

use clap::{CommandFactory, Parser as CliParser};
use log::error;

use remark::ast::Statement;
use remark::interpreter::Interpreter;
use remark::lexer::Lexer;
use remark::parser::Parser;

#[derive(CliParser, Debug)]
#[command(version, about)]
struct Cli {
    /// Source file to evaluate; `-` reads the program from stdin.
    file: Option<std::path::PathBuf>,

    /// Start an interactive session.
    #[arg(long)]
    repl: bool,

    /// Print the parsed AST instead of evaluating it.
    #[arg(long)]
    dump_ast: bool,

    /// Log debug traces of resolution and calls.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Cli::parse();

    let level = if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    simple_logger::init_with_level(level).unwrap();

    if args.repl {
        repl();
        return;
    }

    let Some(file) = args.file else {
        Cli::command().print_help().unwrap();
        return;
    };

    let source = if file.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .expect("Could not read program from stdin");
        buffer
    } else {
        std::fs::read_to_string(&file).expect(&format!(
            "Could not read file: '{}'",
            file.to_string_lossy()
        ))
    };

    let statements = match parse_source(&source) {
        Ok(statements) => statements,
        Err(message) => {
            error!("{message}");
            exit(1);
        }
    };

    if args.dump_ast {
        for statement in &statements {
            print!("{}", statement.dump(0));
        }
        return;
    }

    let mut interpreter = Interpreter::new();
    interpreter.run(&statements);
}

fn parse_source(source: &str) -> Result<Vec<Statement>, String> {
    let tokens = Lexer::new(source)
        .lex()
        .map_err(|error| format!("Lex error: {error}"))?;
    Parser::new(tokens)
        .parse_toplevel()
        .map_err(|error| format!("Parse error: {error}"))
}

/// Interactive loop: one top-level unit per line, errors drop the line and
/// keep the session alive.
fn repl() {
    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                error!("Failed to read from stdin: {err}");
                break;
            }
        }

        match parse_source(&line) {
            Ok(statements) => {
                interpreter.run(&statements);
            }
            Err(message) => error!("{message}"),
        }
    }
}
