// ABOUTME: Lexically chained frames of (variable, value) association lists

use crate::error::LispError;
use crate::value::{car, cdr, cons, eq, is_nil, is_pair, set_car, set_cdr, Expr};

/// An environment is a chain of frames. Each frame is a pair whose car is a
/// parallel `(vars . vals)` pair (two equal-length lists sharing structure by
/// position) and whose cdr is the enclosing environment (or Nil at the root).
/// Frames are pair-encoded rather than backed by a per-scope map so that
/// environments and expressions share the same cons-cell graph — a closure
/// capturing an environment is just capturing an `Expr`.
pub fn make_env(outer: Expr) -> Expr {
    cons(cons(Expr::Nil, Expr::Nil), outer)
}

fn env_outer(env: &Expr) -> Result<Expr, LispError> {
    cdr(env)
}

/// Prepends `var`/`val` to the top frame's vars/vals. Duplicates are allowed;
/// lookups read the first (most recently pushed) match.
pub fn env_push(env: &Expr, var: Expr, val: Expr) -> Result<(), LispError> {
    let pair = car(env)?;
    let new_vars = cons(var, car(&pair)?);
    set_car(&pair, new_vars)?;
    let new_vals = cons(val, cdr(&pair)?);
    set_cdr(&pair, new_vals)?;
    Ok(())
}

/// Walks the top frame's vars/vals for the first `eq` match, returning the
/// vals cell at that position (whose car is the current value) — or Nil if
/// `var` isn't bound locally.
pub fn env_find_local(env: &Expr, var: &Expr) -> Result<Expr, LispError> {
    let pair = car(env)?;
    let mut vars = car(&pair)?;
    let mut vals = cdr(&pair)?;
    while !is_nil(&vars) {
        if eq(&car(&vars)?, var) {
            return Ok(vals);
        }
        vars = cdr(&vars)?;
        vals = cdr(&vals)?;
    }
    Ok(Expr::Nil)
}

/// Walks frames outward, returning the first non-Nil local find, or Nil if
/// `var` is unbound anywhere in the chain.
pub fn env_find_global(env: &Expr, var: &Expr) -> Result<Expr, LispError> {
    let mut cur = env.clone();
    while !is_nil(&cur) {
        let found = env_find_local(&cur, var)?;
        if is_nil(&found) {
            cur = env_outer(&cur)?;
        } else {
            return Ok(found);
        }
    }
    Ok(Expr::Nil)
}

/// Defines `var` in the top frame: overwrites if already local, else pushes.
pub fn env_def(env: &Expr, var: Expr, val: Expr) -> Result<(), LispError> {
    let vals = env_find_local(env, &var)?;
    if is_nil(&vals) {
        env_push(env, var, val)
    } else {
        set_car(&vals, val)
    }
}

/// Removes the first local match from the top frame by rewiring around it.
/// Fails with `CannotRemove` if `var` has no local binding.
pub fn env_del(env: &Expr, var: &Expr) -> Result<(), LispError> {
    let pair = car(env)?;
    let mut vars = car(&pair)?;
    let mut vals = cdr(&pair)?;
    let mut prev_vars = Expr::Nil;
    let mut prev_vals = Expr::Nil;
    while !is_nil(&vars) {
        if eq(&car(&vars)?, var) {
            if is_nil(&prev_vars) {
                set_car(&pair, cdr(&vars)?)?;
                set_cdr(&pair, cdr(&vals)?)?;
            } else {
                set_cdr(&prev_vars, cdr(&vars)?)?;
                set_cdr(&prev_vals, cdr(&vals)?)?;
            }
            return Ok(());
        }
        prev_vars = vars.clone();
        prev_vals = vals.clone();
        vars = cdr(&vars)?;
        vals = cdr(&vals)?;
    }
    Err(LispError::CannotRemove(var.clone()))
}

/// Locates `var` globally and overwrites its value. Fails with `Unbound` if
/// there is no global binding.
pub fn env_set(env: &Expr, var: &Expr, val: Expr) -> Result<(), LispError> {
    let vals = env_find_global(env, var)?;
    if is_nil(&vals) {
        Err(LispError::Unbound(var.clone()))
    } else {
        set_car(&vals, val)
    }
}

/// Locates `var` globally and returns its value. Fails with `Unbound` if
/// there is no global binding.
pub fn env_get(env: &Expr, var: &Expr) -> Result<Expr, LispError> {
    let found = env_find_global(env, var)?;
    if is_nil(&found) {
        Err(LispError::Unbound(var.clone()))
    } else {
        car(&found)
    }
}

/// Destructuring bind: when `vars` is a proper list, zips position-wise with
/// `vals`, recursively binding each pair (so a parameter that is itself a list
/// pattern destructures the corresponding argument). When `vars` ends in a
/// non-Nil, non-pair tail, that name is bound to the remaining vals — rest
/// parameter semantics.
pub fn env_dbind(env: &Expr, vars: Expr, vals: Expr) -> Result<(), LispError> {
    if is_nil(&vars) {
        return Ok(());
    }
    let mut vars = vars;
    let mut vals = vals;
    while is_pair(&vars) {
        let var = car(&vars)?;
        let val = car(&vals)?;
        env_dbind(env, var, val)?;
        vars = cdr(&vars)?;
        vals = cdr(&vals)?;
    }
    if !is_nil(&vars) {
        env_def(env, vars, vals)?;
    }
    Ok(())
}
