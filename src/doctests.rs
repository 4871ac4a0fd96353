// ABOUTME: Embedded documentation-test harness run by the `unit` CLI command

use crate::env::make_env;
use crate::eval::{eval_src, make_core_env};
use crate::value::Expr;

/// One scenario transcribed from the interpreter's documented behavior:
/// evaluating `source` against either the empty environment or the core
/// environment must render as `expected`.
struct Case {
    name: &'static str,
    source: &'static str,
    expected: &'static str,
    core_env: bool,
}

const CASES: &[Case] = &[
    Case {
        name: "nil self-evaluates",
        source: "nil",
        expected: "nil",
        core_env: false,
    },
    Case {
        name: "quote returns its argument unevaluated",
        source: "'foo",
        expected: "foo",
        core_env: false,
    },
    Case {
        name: "if picks the then branch on a truthy test",
        source: "(if 't 'a 'b)",
        expected: "a",
        core_env: false,
    },
    Case {
        name: "if picks the else branch on a nil test",
        source: "(if nil 'a 'b)",
        expected: "b",
        core_env: false,
    },
    Case {
        name: "if with no else branch is nil on a nil test",
        source: "(if nil 'a)",
        expected: "nil",
        core_env: false,
    },
    Case {
        name: "cons of two quoted symbols prints dotted",
        source: "(cons 'a 'b)",
        expected: "(a . b)",
        core_env: true,
    },
    Case {
        name: "cons onto nil prints as a one-element list",
        source: "(cons 'a nil)",
        expected: "(a)",
        core_env: true,
    },
    Case {
        name: "eq is true for identically-named symbols",
        source: "(eq 'a 'a)",
        expected: "t",
        core_env: true,
    },
    Case {
        name: "eq is false across distinct names",
        source: "(eq 'a 'b)",
        expected: "nil",
        core_env: true,
    },
    Case {
        name: "car undoes cons on the head",
        source: "(car (cons 'a 'b))",
        expected: "a",
        core_env: true,
    },
    Case {
        name: "cdr undoes cons on the tail",
        source: "(cdr (cons 'a 'b))",
        expected: "b",
        core_env: true,
    },
];

/// Result of running every embedded doctest case.
pub struct DoctestReport {
    pub total: usize,
    pub failures: Vec<String>,
}

impl DoctestReport {
    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs every embedded scenario, comparing `eval_src`'s rendered result
/// against the transcribed expectation. Never panics: a case that errors is
/// recorded as a failure, not propagated.
pub fn run_doctests() -> DoctestReport {
    let mut failures = Vec::new();
    for case in CASES {
        let env = if case.core_env {
            make_core_env()
        } else {
            make_env(Expr::Nil)
        };
        match eval_src(case.source, &env) {
            Ok(actual) if actual == case.expected => {}
            Ok(actual) => failures.push(format!(
                "{}: {:?} => {:?}, expected {:?}",
                case.name, case.source, actual, case.expected
            )),
            Err(e) => failures.push(format!(
                "{}: {:?} errored: {}",
                case.name, case.source, e
            )),
        }
    }
    DoctestReport {
        total: CASES.len(),
        failures,
    }
}
