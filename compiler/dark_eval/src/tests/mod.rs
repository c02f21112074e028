//! Evaluation tests, grouped by the part of the interpreter they exercise.
//!
//! `helpers` builds expression trees and test states so the suites can
//! stay focused on behavior.

mod helpers;

mod dispatch_tests;
mod match_tests;
mod stdlib_tests;
