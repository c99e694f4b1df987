#![allow(dead_code)]

use std::io::Cursor;

use civet::interpreter::CivetError;
use civet::runtime;

/// Run a C source text and return everything written to the output stream
/// (GET prompts and PRINT emissions). Panics on any failure.
pub fn run_c_source(src: &str) -> String {
    run_c_source_with_input(src, "")
}

/// Same, with bytes made available to `GET` on the input stream.
pub fn run_c_source_with_input(src: &str, input: &str) -> String {
    let mut output = Vec::new();
    runtime::run_source(src, Cursor::new(input.to_string()), &mut output)
        .unwrap_or_else(|err| panic!("program failed: {err}\nsource:\n{src}"));
    String::from_utf8_lossy(&output).to_string()
}

/// Run a source text that is expected to fail and return the front-door
/// error carrying its stable code.
pub fn run_c_source_expect_err(src: &str) -> CivetError {
    let mut output = Vec::new();
    match runtime::run_source(src, Cursor::new(""), &mut output) {
        Ok(()) => panic!("expected the program to fail\nsource:\n{src}"),
        Err(err) => err,
    }
}
