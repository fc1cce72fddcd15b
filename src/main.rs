#![allow(dead_code)]

use std::env;
use std::fs;
use std::process;

use rustyline::DefaultEditor;

// Declaring crate-level modules
mod chunk;
mod compiler;
mod lexer;
mod objects;
mod table;
mod virtual_machine;

#[cfg(test)]
mod tests;

// Using crate-level sub-modules
use virtual_machine::InterpretResult;
use virtual_machine::VirtualMachine;

/// The main function
fn main() {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => repl(),
        2 => run_file(&args[1]),
        _ => {
            eprintln!("Usage: simpl [path]");
            process::exit(exitcode::USAGE);
        }
    }
}

/// Runs an interactive session. A single virtual machine lives for the
/// whole session, so globals defined on one line are visible on the
/// next.
fn repl() {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("Could not start the interactive session: {}", err);
            process::exit(exitcode::IOERR);
        }
    };

    let mut vm = VirtualMachine::new();

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                vm.interpret(&line);
            }
            // EOF (or any other readline failure) ends the session.
            Err(_) => break,
        }
    }
}

/// Reads and interprets a source file, then exits the interpreter with
/// the appropriate code.
fn run_file(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            eprintln!("Could not read file \"{}\": {}", path, err);
            process::exit(exitcode::IOERR);
        }
    };

    // Creates a fresh virtual machine for the file's program
    let mut vm = VirtualMachine::new();

    // Exit the interpreter with the appropriate code
    match vm.interpret(&source) {
        InterpretResult::CompileError => process::exit(exitcode::DATAERR),
        InterpretResult::RuntimeError => process::exit(exitcode::SOFTWARE),
        InterpretResult::Ok => (),
    }
}
