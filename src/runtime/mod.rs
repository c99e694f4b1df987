//==============================================
// File: runtime.rs
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: One-call pipeline over the Civet front-end and evaluator
// Objective: Tokenize, parse, resolve, and evaluate C source with caller
//            supplied I/O streams so binaries and tests share one path
//==============================================

use std::io::{BufRead, Write};

use crate::ast::TranslationUnit;
use crate::interpreter::{CivetError, Interpreter};
use crate::parser::Parser;
use crate::resolver::resolve_unit;
use crate::tokenizer::Tokenizer;

/// Run the front-end alone: tokenize, parse, and resolve one source text.
pub fn load_source(source: &str) -> Result<TranslationUnit, CivetError> {
    let tokens = Tokenizer::new(source).tokenize()?;
    let mut unit = Parser::new(tokens).parse()?;
    resolve_unit(&mut unit)?;
    Ok(unit)
}

/// Evaluate an already-resolved unit with the given streams. `GET` reads
/// from `input`; prompts and `PRINT` go to `output`.
pub fn run_unit<R: BufRead, W: Write>(
    unit: &TranslationUnit,
    input: R,
    output: W,
) -> Result<(), CivetError> {
    let mut interpreter = Interpreter::new(unit, input, output)?;
    interpreter.run()?;
    Ok(())
}

/// Run a source text end to end.
pub fn run_source<R: BufRead, W: Write>(
    source: &str,
    input: R,
    output: W,
) -> Result<(), CivetError> {
    let unit = load_source(source)?;
    run_unit(&unit, input, output)
}

//==============================================
// End of file
//==============================================
