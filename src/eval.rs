// ABOUTME: Tree-walking evaluator: special forms, builtin application, closure application

use crate::env::{env_def, env_dbind, env_get, make_env};
use crate::error::LispError;
use crate::list::{list_to_vec, nreverse, ListIter};
use crate::printer::repr_expr;
use crate::reader::{read_one_from_string, ReaderOpts};
use crate::value::{
    cadddr, caddr, cadr, car, cdddr, cdr, cons, eq, intern, is_gensym, is_nil, is_pair, is_symbol,
    make_bool, Builtin, Closure, Expr,
};
use std::cell::Cell;
use std::rc::Rc;

thread_local! {
    static EVAL_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Ordinary stack recursion has no tail-call elimination; deep recursion
/// should surface as `StackOverflow` rather than let the host call stack
/// actually overflow and abort the process. This tracks eval's own
/// recursion depth per-thread and fails cleanly once it's exceeded.
const MAX_EVAL_DEPTH: usize = 8_000;

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Result<Self, LispError> {
        EVAL_DEPTH.with(|depth| {
            let current = depth.get();
            if current >= MAX_EVAL_DEPTH {
                return Err(LispError::StackOverflow);
            }
            depth.set(current + 1);
            Ok(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        EVAL_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Constructs a user-defined function closing over `env`.
///
/// `Closure` is a first-class `Expr` variant rather than a pair-encoded
/// `(tag . payload)` list tagged with a sentinel gensym, so `eval_cons` can
/// recognize a callable by matching the variant directly instead of by
/// comparing against a runtime tag.
pub fn make_function(env: Expr, params: Expr, body: Expr) -> Expr {
    Expr::Closure(Rc::new(Closure { env, params, body }))
}

fn is_named_op(exp: &Expr, name: &str) -> bool {
    match car(exp) {
        Ok(head) => eq(&head, &intern(name)),
        Err(_) => false,
    }
}

/// Evaluates `exp` in `env`.
pub fn eval(exp: &Expr, env: &Expr) -> Result<Expr, LispError> {
    let _guard = DepthGuard::enter()?;

    if is_nil(exp) {
        return Ok(Expr::Nil);
    }
    if is_symbol(exp) || is_gensym(exp) {
        return env_get(env, exp);
    }
    if is_named_op(exp, "quote") {
        return cadr(exp);
    }
    if is_named_op(exp, "lit") {
        return Ok(exp.clone());
    }
    if is_named_op(exp, "if") {
        return eval_if(exp, env);
    }
    if is_pair(exp) {
        return eval_cons(exp, env);
    }
    Err(LispError::CannotEval(exp.clone()))
}

fn eval_cons(exp: &Expr, env: &Expr) -> Result<Expr, LispError> {
    let head = car(exp)?;
    let args = cdr(exp)?;
    match &head {
        Expr::Builtin(b) => {
            let vals = eval_list(&args, env)?;
            let vals = list_to_vec(vals)?;
            (b.func)(&vals)
        }
        Expr::Closure(closure) => {
            let vals = eval_list(&args, env)?;
            let call_env = make_call_env(&closure.env, closure.params.clone(), vals)?;
            eval_body(&closure.body, &call_env)
        }
        _ => {
            // Neither a builtin nor a closure yet: evaluate `head` (e.g. it
            // names a symbol bound to a callable) and retry application with
            // the evaluated head. `args` is *not* re-evaluated — only the
            // head is.
            let evaluated_head = eval(&head, env)?;
            eval(&cons(evaluated_head, args), env)
        }
    }
}

fn make_call_env(fenv: &Expr, vars: Expr, vals: Expr) -> Result<Expr, LispError> {
    let call_env = make_env(fenv.clone());
    env_dbind(&call_env, vars, vals)?;
    Ok(call_env)
}

/// Evaluates each element of the list `exps` in `env`, left to right, and
/// returns them as a new list in the same order.
fn eval_list(exps: &Expr, env: &Expr) -> Result<Expr, LispError> {
    let mut ret = Expr::Nil;
    for item in ListIter::new(exps.clone()) {
        let item = item?;
        ret = cons(eval(&item, env)?, ret);
    }
    nreverse(ret)
}

/// Evaluates each statement in `body`, in order, returning the last value.
fn eval_body(body: &Expr, env: &Expr) -> Result<Expr, LispError> {
    let mut ret = Expr::Nil;
    for stmt in ListIter::new(body.clone()) {
        ret = eval(&stmt?, env)?;
    }
    Ok(ret)
}

fn eval_if(exp: &Expr, env: &Expr) -> Result<Expr, LispError> {
    let test = cadr(exp)?;
    let then_branch = caddr(exp)?;
    if !is_nil(&eval(&test, env)?) {
        return eval(&then_branch, env);
    }
    if !is_nil(&cdddr(exp)?) {
        return eval(&cadddr(exp)?, env);
    }
    Ok(Expr::Nil)
}

/// Fills a missing positional argument with Nil and ignores extras, rather
/// than indexing out of bounds — a wrong-arity call degrades to operating
/// on Nil instead of panicking.
fn arg(args: &[Expr], i: usize) -> Expr {
    args.get(i).cloned().unwrap_or(Expr::Nil)
}

fn builtin_eq(args: &[Expr]) -> Result<Expr, LispError> {
    Ok(make_bool(eq(&arg(args, 0), &arg(args, 1))))
}

fn builtin_cons(args: &[Expr]) -> Result<Expr, LispError> {
    Ok(cons(arg(args, 0), arg(args, 1)))
}

fn builtin_car(args: &[Expr]) -> Result<Expr, LispError> {
    car(&arg(args, 0))
}

fn builtin_cdr(args: &[Expr]) -> Result<Expr, LispError> {
    cdr(&arg(args, 0))
}

/// Constructs the initial environment: `t` bound to itself, and the `eq`,
/// `cons`, `car`, `cdr` builtins.
pub fn make_core_env() -> Expr {
    let env = make_env(Expr::Nil);
    env_def(&env, intern("t"), intern("t")).expect("defining into a fresh frame cannot fail");
    env_def(
        &env,
        intern("eq"),
        Expr::Builtin(Builtin {
            name: "eq",
            func: builtin_eq,
        }),
    )
    .expect("defining into a fresh frame cannot fail");
    env_def(
        &env,
        intern("cons"),
        Expr::Builtin(Builtin {
            name: "cons",
            func: builtin_cons,
        }),
    )
    .expect("defining into a fresh frame cannot fail");
    env_def(
        &env,
        intern("car"),
        Expr::Builtin(Builtin {
            name: "car",
            func: builtin_car,
        }),
    )
    .expect("defining into a fresh frame cannot fail");
    env_def(
        &env,
        intern("cdr"),
        Expr::Builtin(Builtin {
            name: "cdr",
            func: builtin_cdr,
        }),
    )
    .expect("defining into a fresh frame cannot fail");
    env
}

/// `repr_expr(eval(read_one_from_string(src), env))` — the core's end-to-end
/// operation.
pub fn eval_src(src: &str, env: &Expr) -> Result<String, LispError> {
    let exp = read_one_from_string(src, ReaderOpts::default())?;
    let result = eval(&exp, env)?;
    repr_expr(&result)
}
