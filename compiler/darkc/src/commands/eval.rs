//! `darkc eval`: run a serialized program and print its result.

use std::sync::Arc;

use dark_eval::{analyse_expr, execute_expr, ExecutionConfig, ExecutionState, InMemoryTraceStore};
use dark_value::Dval;

use super::EvalOptions;
use crate::program::Program;
use crate::CliError;

pub fn run_eval(options: &EvalOptions) -> Result<String, CliError> {
    let mut program = Program::load(&options.path)?;
    let result = evaluate(&mut program, options)?;
    Ok(options.format.render(&result))
}

/// Evaluate a loaded program under `options`.
pub fn evaluate(program: &mut Program, options: &EvalOptions) -> Result<Dval, CliError> {
    let symtable = program.symtable()?;
    let mut config = ExecutionConfig::new()
        .with_hash_version(options.hash_version)
        .with_tlid(program.tlid);
    if options.preview {
        config = config.with_preview();
    }
    let state = ExecutionState::new(Arc::new(program.registry()), config)
        .with_user_types(program.user_types())
        .with_tracing(Arc::new(InMemoryTraceStore::new()));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(CliError::Runtime)?;

    let result = if options.preview {
        let analysis = runtime.block_on(analyse_expr(&state, &symtable, &program.expr));
        tracing::debug!(live_values = analysis.live_values.len(), "preview finished");
        analysis.result
    } else {
        runtime.block_on(execute_expr(&state, &symtable, &program.expr))
    };
    Ok(result)
}
