//! End-to-end tests that drive the `simpl` binary on real script files
//! and check its stdout, stderr, and exit codes.

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn run_script(source: &str) -> Output {
    let mut file = NamedTempFile::new().expect("could not create a script file");
    file.write_all(source.as_bytes()).expect("could not write the script");

    Command::new(env!("CARGO_BIN_EXE_simpl"))
        .arg(file.path())
        .output()
        .expect("could not run the interpreter")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn prints_arithmetic_with_precedence() {
    let output = run_script("print 1 + 2 * 3;");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "7\n");
    assert_eq!(stderr_of(&output), "");
}

#[test]
fn concatenates_strings() {
    let output = run_script("var a = \"hi\"; var b = \" there\"; print a + b;");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "hi there\n");
}

#[test]
fn concatenation_is_left_to_right() {
    let output = run_script("print \"a\" + \"b\" + \"c\";");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "abc\n");
}

#[test]
fn shadowing_prints_inner_then_outer() {
    let output = run_script("{ var x = 10; { var x = x + 1; print x; } print x; }");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "11\n10\n");
}

#[test]
fn while_loop_counts() {
    let output = run_script("var i = 0; while (i < 3) { print i; i = i + 1; }");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "0\n1\n2\n");
}

#[test]
fn for_loop_counts() {
    let output = run_script("for (var i = 0; i < 3; i = i + 1) print i;");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "0\n1\n2\n");
}

#[test]
fn interned_strings_compare_equal() {
    let output = run_script("print \"a\" == \"a\";");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "true\n");
}

#[test]
fn literals_print_canonically() {
    let output = run_script("print nil; print true; print false; print 1.5;");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "nil\ntrue\nfalse\n1.5\n");
}

#[test]
fn printing_an_expression_matches_printing_a_variable() {
    let direct = run_script("print (1 + 2 * 3);");
    let through_var = run_script("var x = 1 + 2 * 3; print x;");

    assert_eq!(direct.status.code(), Some(0));
    assert_eq!(through_var.status.code(), Some(0));
    assert_eq!(stdout_of(&direct), stdout_of(&through_var));
}

#[test]
fn short_circuits_skip_side_effects() {
    let output = run_script("var x = 0; false and (x = 1); print x;");

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "0\n");
}

#[test]
fn undefined_assignment_is_a_runtime_error() {
    let output = run_script("x = 1;");

    assert_eq!(output.status.code(), Some(70));
    assert_eq!(stdout_of(&output), "");

    let stderr = stderr_of(&output);
    assert!(stderr.contains("Undefined variable 'x'."));
    assert!(stderr.contains("[line 1] in script"));
}

#[test]
fn mixed_addition_is_a_runtime_error() {
    let output = run_script("print 1 + \"a\";");

    assert_eq!(output.status.code(), Some(70));
    assert!(stderr_of(&output).contains("Operands must be two numbers or two strings."));
}

#[test]
fn runtime_errors_report_the_failing_line() {
    let output = run_script("var ok = 1;\nprint ok;\nprint missing;");

    assert_eq!(output.status.code(), Some(70));
    assert_eq!(stdout_of(&output), "1\n");

    let stderr = stderr_of(&output);
    assert!(stderr.contains("Undefined variable 'missing'."));
    assert!(stderr.contains("[line 3] in script"));
}

#[test]
fn missing_semicolon_is_a_compile_error() {
    let output = run_script("print 1");

    assert_eq!(output.status.code(), Some(65));
    assert_eq!(stdout_of(&output), "");
    assert!(stderr_of(&output).contains("[line 1] Error at end: Expect ';' after value."));
}

#[test]
fn compile_errors_name_the_offending_lexeme() {
    let output = run_script("1 = 2;");

    assert_eq!(output.status.code(), Some(65));
    assert!(stderr_of(&output).contains("[line 1] Error at '=': Invalid assignment target."));
}

#[test]
fn usage_error_for_extra_arguments() {
    let output = Command::new(env!("CARGO_BIN_EXE_simpl"))
        .args(["one.simpl", "two.simpl"])
        .output()
        .expect("could not run the interpreter");

    assert_eq!(output.status.code(), Some(64));
    assert_eq!(stderr_of(&output), "Usage: simpl [path]\n");
}

#[test]
fn unreadable_files_report_an_io_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_simpl"))
        .arg("definitely/not/a/real/path.simpl")
        .output()
        .expect("could not run the interpreter");

    assert_eq!(output.status.code(), Some(74));
    assert!(stderr_of(&output).contains("Could not read file"));
}
