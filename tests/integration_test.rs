// ABOUTME: End-to-end tests exercising the reader/evaluator/printer pipeline

use mini_lisp_core::env::make_env;
use mini_lisp_core::eval::{eval_src, make_core_env};
use mini_lisp_core::printer::repr_expr;
use mini_lisp_core::reader::{read_one_from_string, ReaderOpts};
use mini_lisp_core::value::Expr;

fn empty_env() -> Expr {
    make_env(Expr::Nil)
}

#[test]
fn nil_evaluates_to_nil() {
    assert_eq!(eval_src("nil", &empty_env()).unwrap(), "nil");
}

#[test]
fn quote_sugar_round_trips_through_eval() {
    assert_eq!(eval_src("'foo", &empty_env()).unwrap(), "foo");
}

#[test]
fn if_three_arm_dispatch() {
    let env = empty_env();
    assert_eq!(eval_src("(if 't 'a 'b)", &env).unwrap(), "a");
    assert_eq!(eval_src("(if nil 'a 'b)", &env).unwrap(), "b");
    assert_eq!(eval_src("(if nil 'a)", &env).unwrap(), "nil");
}

#[test]
fn cons_prints_dotted_unless_tail_is_nil() {
    let env = make_core_env();
    assert_eq!(eval_src("(cons 'a 'b)", &env).unwrap(), "(a . b)");
    assert_eq!(eval_src("(cons 'a nil)", &env).unwrap(), "(a)");
}

#[test]
fn eq_compares_symbols_by_name() {
    let env = make_core_env();
    assert_eq!(eval_src("(eq 'a 'a)", &env).unwrap(), "t");
    assert_eq!(eval_src("(eq 'a 'b)", &env).unwrap(), "nil");
}

#[test]
fn car_and_cdr_undo_cons() {
    let env = make_core_env();
    assert_eq!(eval_src("(car (cons 'a 'b))", &env).unwrap(), "a");
    assert_eq!(eval_src("(cdr (cons 'a 'b))", &env).unwrap(), "b");
}

#[test]
fn t_is_bound_to_itself_in_core_env() {
    let env = make_core_env();
    assert_eq!(eval_src("t", &env).unwrap(), "t");
}

#[test]
fn reader_round_trips_nested_forms() {
    for src in [
        "(defun add (a b) (+ a b))",
        "(foo . bar)",
        "(foo)",
        "'foo",
    ] {
        let exp = read_one_from_string(src, ReaderOpts::default()).unwrap();
        let expected = if src == "'foo" {
            "(quote foo)".to_string()
        } else {
            src.to_string()
        };
        assert_eq!(repr_expr(&exp).unwrap(), expected);
    }
}

#[test]
fn reader_collapses_dotted_nil_tail() {
    let exp = read_one_from_string("(foo . nil)", ReaderOpts::default()).unwrap();
    assert_eq!(repr_expr(&exp).unwrap(), "(foo)");
}

#[test]
fn empty_input_is_unexpected_char() {
    assert!(read_one_from_string("", ReaderOpts::default()).is_err());
}

#[test]
fn unbalanced_open_paren_is_unexpected_eof() {
    assert!(read_one_from_string("(foo", ReaderOpts::default()).is_err());
}

#[test]
fn car_on_nil_is_not_a_pair() {
    use mini_lisp_core::value::car;
    assert!(car(&Expr::Nil).is_err());
}

#[test]
fn user_defined_closure_via_core_builtins() {
    // No `lambda`/`defun` special form exists in this core; closures are
    // built directly rather than parsed from source, so this exercises
    // cons/car/cdr composition instead of function definition syntax.
    let env = make_core_env();
    let result = eval_src("(cons (car (cons 'x 'y)) (cdr (cons 'x 'y)))", &env).unwrap();
    assert_eq!(result, "(x . y)");
}

#[test]
fn unbound_variable_propagates_as_error() {
    let env = make_core_env();
    assert!(eval_src("this-is-not-defined", &env).is_err());
}
