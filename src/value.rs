// ABOUTME: Value types representing Lisp expressions and their identity semantics

use crate::error::LispError;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Native function pointer backing a `Builtin`. Builtins receive already-evaluated,
/// positional arguments; no keyword semantics.
pub type BuiltinFn = fn(&[Expr]) -> Result<Expr, LispError>;

/// A callable backed by a host-language function.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        // fn pointers compare by address, so this is identity, matching `eq`'s
        // treatment of every other callable-ish variant.
        std::ptr::eq(self.func as *const (), other.func as *const ())
    }
}

/// A user-defined function: a captured environment, a parameter structure
/// (possibly an improper list for a rest parameter), and a body sequence.
pub struct Closure {
    pub env: Expr,
    pub params: Expr,
    pub body: Expr,
}

/// One cons cell: two mutable expression slots, conventionally named head/tail.
pub type PairCell = RefCell<(Expr, Expr)>;

/// A Lisp expression. Pairs are shared, interior-mutable cells (`Rc<RefCell<..>>`)
/// so that `set_car`/`set_cdr`, environments, and closures can all reference and
/// mutate the same graph — including cyclically.
#[derive(Clone)]
pub enum Expr {
    /// The singleton empty list. The symbol named `"nil"` is aliased to this value.
    Nil,
    /// An interned-by-name identifier. Equality is by name, not by allocation.
    Symbol(Rc<str>),
    /// A unique identity with a monotonically increasing id. Equality is by id.
    Gensym(u64),
    /// A signed decimal integer.
    Int(i64),
    /// An ordered pair of two mutable expression slots.
    Pair(Rc<PairCell>),
    /// A verbatim line of source text, produced only when the reader preserves comments.
    Comment(Rc<str>),
    /// A callable backed by a host function.
    Builtin(Builtin),
    /// A user-defined function capturing its definition-time environment.
    Closure(Rc<Closure>),
}

static GENSYM_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Interns `name`. `"nil"` always returns the Nil singleton; any other name
/// returns a freshly allocated Symbol (names are not uniqued beyond that alias).
pub fn intern(name: &str) -> Expr {
    if name == "nil" {
        Expr::Nil
    } else {
        Expr::Symbol(Rc::from(name))
    }
}

/// Allocates a new Gensym with the next process-wide id.
pub fn gensym() -> Expr {
    Expr::Gensym(GENSYM_COUNTER.fetch_add(1, Ordering::SeqCst))
}

pub fn cons(a: Expr, b: Expr) -> Expr {
    Expr::Pair(Rc::new(RefCell::new((a, b))))
}

pub fn is_nil(exp: &Expr) -> bool {
    matches!(exp, Expr::Nil)
}

pub fn is_symbol(exp: &Expr) -> bool {
    matches!(exp, Expr::Symbol(_))
}

pub fn is_gensym(exp: &Expr) -> bool {
    matches!(exp, Expr::Gensym(_))
}

pub fn is_int(exp: &Expr) -> bool {
    matches!(exp, Expr::Int(_))
}

pub fn is_pair(exp: &Expr) -> bool {
    matches!(exp, Expr::Pair(_))
}

pub fn is_comment(exp: &Expr) -> bool {
    matches!(exp, Expr::Comment(_))
}

pub fn is_builtin(exp: &Expr) -> bool {
    matches!(exp, Expr::Builtin(_))
}

pub fn is_closure(exp: &Expr) -> bool {
    matches!(exp, Expr::Closure(_))
}

pub fn car(exp: &Expr) -> Result<Expr, LispError> {
    match exp {
        Expr::Pair(cell) => Ok(cell.borrow().0.clone()),
        _ => Err(LispError::NotAPair(exp.clone())),
    }
}

pub fn cdr(exp: &Expr) -> Result<Expr, LispError> {
    match exp {
        Expr::Pair(cell) => Ok(cell.borrow().1.clone()),
        _ => Err(LispError::NotAPair(exp.clone())),
    }
}

pub fn set_car(exp: &Expr, val: Expr) -> Result<(), LispError> {
    match exp {
        Expr::Pair(cell) => {
            cell.borrow_mut().0 = val;
            Ok(())
        }
        _ => Err(LispError::NotAPair(exp.clone())),
    }
}

pub fn set_cdr(exp: &Expr, val: Expr) -> Result<(), LispError> {
    match exp {
        Expr::Pair(cell) => {
            cell.borrow_mut().1 = val;
            Ok(())
        }
        _ => Err(LispError::NotAPair(exp.clone())),
    }
}

pub fn caar(exp: &Expr) -> Result<Expr, LispError> {
    car(&car(exp)?)
}
pub fn cadr(exp: &Expr) -> Result<Expr, LispError> {
    car(&cdr(exp)?)
}
pub fn cdar(exp: &Expr) -> Result<Expr, LispError> {
    cdr(&car(exp)?)
}
pub fn cddr(exp: &Expr) -> Result<Expr, LispError> {
    cdr(&cdr(exp)?)
}
pub fn caadr(exp: &Expr) -> Result<Expr, LispError> {
    car(&car(&cdr(exp)?)?)
}
pub fn caddr(exp: &Expr) -> Result<Expr, LispError> {
    car(&cdr(&cdr(exp)?)?)
}
pub fn cdddr(exp: &Expr) -> Result<Expr, LispError> {
    cdr(&cdr(&cdr(exp)?)?)
}
pub fn cadddr(exp: &Expr) -> Result<Expr, LispError> {
    car(&cdr(&cdr(&cdr(exp)?)?)?)
}
pub fn cddddr(exp: &Expr) -> Result<Expr, LispError> {
    cdr(&cdr(&cdr(&cdr(exp)?)?)?)
}

/// The symbol `t` when `x` is true, Nil otherwise.
pub fn make_bool(x: bool) -> Expr {
    if x {
        intern("t")
    } else {
        Expr::Nil
    }
}

/// Fine-grained identity: same-variant values compare by their intrinsic data
/// (name for symbols, id for gensyms, value for integers, pointer identity for
/// pairs/closures/builtins); cross-variant comparisons are always false.
pub fn eq(a: &Expr, b: &Expr) -> bool {
    match (a, b) {
        (Expr::Nil, Expr::Nil) => true,
        (Expr::Symbol(x), Expr::Symbol(y)) => x == y,
        (Expr::Gensym(x), Expr::Gensym(y)) => x == y,
        (Expr::Int(x), Expr::Int(y)) => x == y,
        (Expr::Pair(x), Expr::Pair(y)) => Rc::ptr_eq(x, y),
        (Expr::Comment(x), Expr::Comment(y)) => x == y,
        (Expr::Builtin(x), Expr::Builtin(y)) => x == y,
        (Expr::Closure(x), Expr::Closure(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

/// Currently defined identically to `eq` rather than a structural comparison.
pub fn equal(a: &Expr, b: &Expr) -> bool {
    eq(a, b)
}

pub fn type_name(exp: &Expr) -> &'static str {
    match exp {
        Expr::Nil => "nil",
        Expr::Symbol(_) => "symbol",
        Expr::Gensym(_) => "gensym",
        Expr::Int(_) => "integer",
        Expr::Pair(_) => "pair",
        Expr::Comment(_) => "comment",
        Expr::Builtin(_) => "builtin",
        Expr::Closure(_) => "closure",
    }
}

/// Lenient rendering used only to build error messages and debug output. Unlike
/// `repr_expr` (which errors on variants outside its dispatch table) this never
/// fails, so constructing a `LispError` can't itself raise one.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Nil => write!(f, "nil"),
            Expr::Symbol(s) => write!(f, "{}", s),
            Expr::Gensym(id) => write!(f, "#:G{}", id),
            Expr::Int(n) => write!(f, "{}", n),
            Expr::Pair(cell) => {
                let (a, b) = &*cell.borrow();
                write!(f, "({} . {})", a, b)
            }
            Expr::Comment(text) => write!(f, "#<comment {:?}>", text),
            Expr::Builtin(b) => write!(f, "#<builtin {}>", b.name),
            Expr::Closure(_) => write!(f, "#<closure>"),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Shallow on purpose: pairs can be cyclic (set-car/set-cdr are part of
        // the contract), so a deep derive here could loop forever.
        match self {
            Expr::Pair(_) => write!(f, "Pair(..)"),
            other => write!(f, "{}", other),
        }
    }
}
