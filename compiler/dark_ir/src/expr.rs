//! Expression and pattern trees.
//!
//! Every node carries the `Id` the editor assigned to it. Children are boxed;
//! lambda bodies are `Arc`-shared so closures can hold on to them without
//! copying the tree.

use std::sync::Arc;

use num_bigint::BigInt;

use crate::{FQFnName, Id};

/// Whether an application is a step of a pipeline.
///
/// `a |> f b` is represented as `Apply(f, [a, b], InPipe(pipe_id), _)`. The
/// pipe id is only used to attach a live value to the pipe step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IsInPipe {
    InPipe(Id),
    NotInPipe,
}

impl IsInPipe {
    #[inline]
    pub fn is_in_pipe(self) -> bool {
        matches!(self, IsInPipe::InPipe(_))
    }
}

/// Whether a failed `Option`/`Result` returned by a call is routed onto the
/// error rail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SendToRail {
    Rail,
    NoRail,
}

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    Integer(
        Id,
        #[cfg_attr(feature = "serde", serde(with = "crate::serde_bigint"))] BigInt,
    ),
    Float(Id, f64),
    String(Id, String),
    Bool(Id, bool),
    Null(Id),
    /// A single extended grapheme cluster.
    Character(Id, String),
    /// An unfilled hole.
    Blank(Id),
    /// `let name = rhs in body`. An empty name binds nothing.
    Let(Id, String, Box<Expr>, Box<Expr>),
    If(Id, Box<Expr>, Box<Expr>, Box<Expr>),
    Lambda(Id, Vec<(Id, String)>, Arc<Expr>),
    FieldAccess(Id, Box<Expr>, String),
    Variable(Id, String),
    Apply(Id, Box<Expr>, Vec<Expr>, IsInPipe, SendToRail),
    /// A reference to a named function, used as the callee of `Apply`.
    FnValue(Id, FQFnName),
    List(Id, Vec<Expr>),
    /// Record literal. Entries with an empty key are skipped.
    Record(Id, Vec<(String, Expr)>),
    /// `Just x`, `Nothing`, `Ok x`, `Error x`.
    Constructor(Id, String, Vec<Expr>),
    Match(Id, Box<Expr>, Vec<(Pattern, Expr)>),
    /// `FeatureFlag(cond, old, new)`: `new` runs only when `cond` is `true`.
    FeatureFlag(Id, Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// The id of this node.
    pub fn id(&self) -> Id {
        match self {
            Expr::Integer(id, _)
            | Expr::Float(id, _)
            | Expr::String(id, _)
            | Expr::Bool(id, _)
            | Expr::Null(id)
            | Expr::Character(id, _)
            | Expr::Blank(id)
            | Expr::Let(id, _, _, _)
            | Expr::If(id, _, _, _)
            | Expr::Lambda(id, _, _)
            | Expr::FieldAccess(id, _, _)
            | Expr::Variable(id, _)
            | Expr::Apply(id, _, _, _, _)
            | Expr::FnValue(id, _)
            | Expr::List(id, _)
            | Expr::Record(id, _)
            | Expr::Constructor(id, _, _)
            | Expr::Match(id, _, _)
            | Expr::FeatureFlag(id, _, _, _) => *id,
        }
    }

    /// Short name of the node kind, for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Integer(..) => "Integer",
            Expr::Float(..) => "Float",
            Expr::String(..) => "String",
            Expr::Bool(..) => "Bool",
            Expr::Null(..) => "Null",
            Expr::Character(..) => "Character",
            Expr::Blank(..) => "Blank",
            Expr::Let(..) => "Let",
            Expr::If(..) => "If",
            Expr::Lambda(..) => "Lambda",
            Expr::FieldAccess(..) => "FieldAccess",
            Expr::Variable(..) => "Variable",
            Expr::Apply(..) => "Apply",
            Expr::FnValue(..) => "FnValue",
            Expr::List(..) => "List",
            Expr::Record(..) => "Record",
            Expr::Constructor(..) => "Constructor",
            Expr::Match(..) => "Match",
            Expr::FeatureFlag(..) => "FeatureFlag",
        }
    }
}

/// Pattern in a `match` arm.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pattern {
    Variable(Id, String),
    Constructor(Id, String, Vec<Pattern>),
    Integer(
        Id,
        #[cfg_attr(feature = "serde", serde(with = "crate::serde_bigint"))] BigInt,
    ),
    Bool(Id, bool),
    Character(Id, String),
    String(Id, String),
    Float(Id, f64),
    Null(Id),
    Blank(Id),
}

impl Pattern {
    pub fn id(&self) -> Id {
        match self {
            Pattern::Variable(id, _)
            | Pattern::Constructor(id, _, _)
            | Pattern::Integer(id, _)
            | Pattern::Bool(id, _)
            | Pattern::Character(id, _)
            | Pattern::String(id, _)
            | Pattern::Float(id, _)
            | Pattern::Null(id)
            | Pattern::Blank(id) => *id,
        }
    }
}
