// ABOUTME: Structural list helpers: construction, destructive reversal, iteration

use crate::error::LispError;
use crate::value::{car, cdr, cons, is_nil, is_pair, set_cdr, Expr};

/// Builds a right-folded proper list: `(a . (b . (c . ... . nil)))`.
pub fn make_list(items: &[Expr]) -> Expr {
    let mut ret = Expr::Nil;
    for item in items.iter().rev() {
        ret = cons(item.clone(), ret);
    }
    ret
}

/// Destructively reverses a proper list in place, rewiring the cdr chain, and
/// returns the new head.
///
/// Restricted to proper lists: a non-nil terminator reports `NotAPair`
/// rather than attempting to reshuffle an improper tail into the result.
pub fn nreverse(list: Expr) -> Result<Expr, LispError> {
    let mut prev = Expr::Nil;
    let mut expr = list;
    while is_pair(&expr) {
        let next = cdr(&expr)?;
        set_cdr(&expr, prev)?;
        prev = expr;
        expr = next;
    }
    if !is_nil(&expr) {
        return Err(LispError::NotAPair(expr));
    }
    Ok(prev)
}

/// Forward iterator over a list's elements (its successive cars), terminating
/// when the cursor is Nil. Iterating an improper list yields `NotAPair` once
/// the cursor reaches the non-nil, non-pair terminator.
pub struct ListIter {
    cursor: Expr,
}

impl ListIter {
    pub fn new(list: Expr) -> Self {
        ListIter { cursor: list }
    }
}

impl Iterator for ListIter {
    type Item = Result<Expr, LispError>;

    fn next(&mut self) -> Option<Self::Item> {
        if is_nil(&self.cursor) {
            return None;
        }
        match car(&self.cursor) {
            Ok(head) => {
                self.cursor = cdr(&self.cursor).expect("car succeeded so cdr must too");
                Some(Ok(head))
            }
            Err(e) => {
                // Stop after reporting the error so a caller collecting into a
                // Result<Vec<_>, _> sees exactly one failure, not an infinite stream.
                self.cursor = Expr::Nil;
                Some(Err(e))
            }
        }
    }
}

/// Collects a proper list into a `Vec`, failing on the first improper tail.
pub fn list_to_vec(list: Expr) -> Result<Vec<Expr>, LispError> {
    ListIter::new(list).collect()
}
