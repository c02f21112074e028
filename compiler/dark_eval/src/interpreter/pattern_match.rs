//! Matching values against `match` patterns.

use dark_ir::{Id, Pattern};
use dark_value::{Dval, Symtable};

use crate::{errors, ExecutionState};

/// Outcome of checking one pattern.
///
/// Bindings and traces are collected even when the pattern fails, so a
/// case that was not taken can still be previewed.
pub(super) struct Checked {
    pub(super) matched: bool,
    bindings: Vec<(String, Dval)>,
    traces: Vec<(Id, Dval)>,
}

impl Checked {
    pub(super) fn extend(&self, st: &Symtable) -> Symtable {
        let mut st = st.clone();
        for (name, dv) in &self.bindings {
            st.insert(name.clone(), dv.clone());
        }
        st
    }

    pub(super) fn trace(&self, state: &ExecutionState, on_execution_path: bool) {
        for (id, dv) in &self.traces {
            state.tracing().trace_dval(on_execution_path, *id, dv);
        }
    }
}

pub(super) fn check(state: &ExecutionState, dv: &Dval, pattern: &Pattern) -> Checked {
    let mut checked = Checked {
        matched: false,
        bindings: Vec::new(),
        traces: Vec::new(),
    };
    let matched = check_into(state, dv, pattern, &mut checked);
    checked.matched = matched;
    checked
}

fn check_into(state: &ExecutionState, dv: &Dval, pattern: &Pattern, out: &mut Checked) -> bool {
    match pattern {
        Pattern::Integer(id, n) => literal(dv, *id, Dval::Int(n.clone()), out),
        Pattern::Bool(id, b) => literal(dv, *id, Dval::Bool(*b), out),
        Pattern::String(id, s) => literal(dv, *id, Dval::str(s), out),
        Pattern::Float(id, f) => literal(dv, *id, Dval::Float(*f), out),
        Pattern::Null(id) => literal(dv, *id, Dval::Null, out),
        Pattern::Character(id, c) => match Dval::char(c) {
            Ok(expected) => literal(dv, *id, expected, out),
            Err(err) => {
                out.traces
                    .push((*id, errors::invalid_character(state.source(*id), &err)));
                false
            }
        },
        Pattern::Variable(id, name) => {
            out.traces.push((*id, dv.clone()));
            // Fake values never bind.
            if dv.is_fake() {
                false
            } else {
                out.bindings.push((name.clone(), dv.clone()));
                true
            }
        }
        Pattern::Blank(id) => {
            out.traces.push((*id, Dval::Incomplete(state.source(*id))));
            false
        }
        Pattern::Constructor(id, name, args) => {
            check_constructor(state, dv, *id, name, args, out)
        }
    }
}

fn literal(dv: &Dval, id: Id, expected: Dval, out: &mut Checked) -> bool {
    let matched = *dv == expected;
    out.traces.push((id, expected));
    matched
}

fn check_constructor(
    state: &ExecutionState,
    dv: &Dval,
    id: Id,
    name: &str,
    args: &[Pattern],
    out: &mut Checked,
) -> bool {
    let inner = match (name, args, dv) {
        ("Nothing", [], _) => {
            out.traces.push((id, Dval::OptionNothing));
            return *dv == Dval::OptionNothing;
        }
        ("Just", [arg], Dval::OptionJust(inner))
        | ("Ok", [arg], Dval::ResultOk(inner))
        | ("Error", [arg], Dval::ResultError(inner)) => Some((arg, &**inner)),
        ("Just" | "Ok" | "Error", [arg], _) => {
            // Still walk the sub-pattern so its ids get a trace.
            let incomplete = Dval::Incomplete(state.source(id));
            check_into(state, &incomplete, arg, out);
            out.traces.push((id, incomplete));
            return false;
        }
        ("Nothing" | "Just" | "Ok" | "Error", _, _) => None,
        (other, _, _) => {
            out.traces
                .push((id, errors::invalid_constructor(state.source(id), other)));
            return false;
        }
    };
    match inner {
        Some((arg, inner)) => {
            out.traces.push((id, dv.clone()));
            check_into(state, inner, arg, out)
        }
        None => {
            out.traces.push((id, Dval::Incomplete(state.source(id))));
            false
        }
    }
}
