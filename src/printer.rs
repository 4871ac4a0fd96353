// ABOUTME: Renders expressions into their canonical textual form

use crate::error::LispError;
use crate::stream::OutputStream;
use crate::value::{car, cdr, is_nil, is_pair, Expr};

/// Printer configuration. `pretty` is reserved for a future multi-line
/// rendering mode and has no effect in this core.
pub struct PrinterOpts {
    pub out: OutputStream,
    #[allow(dead_code)]
    pub pretty: bool,
}

impl PrinterOpts {
    pub fn new(out: OutputStream) -> Self {
        PrinterOpts { out, pretty: false }
    }
}

/// Renders `exp` into its canonical textual form. The output is valid reader
/// input for the same expression, except for gensyms, closures, and builtins,
/// which print but do not re-read.
pub fn repr_expr(exp: &Expr) -> Result<String, LispError> {
    let mut opts = PrinterOpts::new(OutputStream::buffer());
    render_expr(exp, &mut opts)?;
    Ok(opts.out.into_string())
}

/// Dispatches by variant and writes the rendering into `opts.out`. Does not
/// cycle-detect: a cyclic pair graph makes this (and `repr_expr`) not
/// terminate. A visited-set check is the natural extension; not implemented
/// here.
pub fn render_expr(exp: &Expr, opts: &mut PrinterOpts) -> Result<(), LispError> {
    match exp {
        Expr::Nil => {
            opts.out.put_string("nil");
            Ok(())
        }
        Expr::Symbol(name) => {
            opts.out.put_string(name);
            Ok(())
        }
        Expr::Gensym(id) => {
            opts.out.put_string("#:G");
            opts.out.put_int(*id as i64);
            Ok(())
        }
        Expr::Int(n) => {
            opts.out.put_int(*n);
            Ok(())
        }
        Expr::Pair(_) => render_list(exp, opts),
        _ => Err(LispError::CannotPrint(exp.clone())),
    }
}

fn render_list(exp: &Expr, opts: &mut PrinterOpts) -> Result<(), LispError> {
    opts.out.put_string("(");
    render_expr(&car(exp)?, opts)?;
    let mut tmp = cdr(exp)?;
    while !is_nil(&tmp) {
        if is_pair(&tmp) {
            opts.out.put_string(" ");
            render_expr(&car(&tmp)?, opts)?;
            tmp = cdr(&tmp)?;
        } else {
            opts.out.put_string(" . ");
            render_expr(&tmp, opts)?;
            break;
        }
    }
    opts.out.put_string(")");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{cons, intern};

    #[test]
    fn nil_prints_as_nil() {
        assert_eq!(repr_expr(&Expr::Nil).unwrap(), "nil");
    }

    #[test]
    fn symbol_prints_as_its_name() {
        assert_eq!(repr_expr(&intern("foo")).unwrap(), "foo");
    }

    #[test]
    fn integer_prints_as_decimal() {
        assert_eq!(repr_expr(&Expr::Int(42)).unwrap(), "42");
        assert_eq!(repr_expr(&Expr::Int(-7)).unwrap(), "-7");
    }

    #[test]
    fn gensym_prints_with_tag() {
        assert_eq!(repr_expr(&Expr::Gensym(3)).unwrap(), "#:G3");
    }

    #[test]
    fn proper_list_prints_without_dot() {
        let list = cons(intern("foo"), Expr::Nil);
        assert_eq!(repr_expr(&list).unwrap(), "(foo)");
    }

    #[test]
    fn dotted_pair_prints_with_dot() {
        let pair = cons(intern("foo"), intern("bar"));
        assert_eq!(repr_expr(&pair).unwrap(), "(foo . bar)");
    }

    #[test]
    fn multi_element_list() {
        let list = cons(Expr::Int(1), cons(Expr::Int(2), cons(Expr::Int(3), Expr::Nil)));
        assert_eq!(repr_expr(&list).unwrap(), "(1 2 3)");
    }

    #[test]
    fn nested_list() {
        let inner = cons(intern("a"), cons(intern("b"), Expr::Nil));
        let outer = cons(inner, cons(intern("c"), Expr::Nil));
        assert_eq!(repr_expr(&outer).unwrap(), "((a b) c)");
    }

    #[test]
    fn comment_cannot_print() {
        let c = Expr::Comment(std::rc::Rc::from("; hi"));
        assert!(matches!(repr_expr(&c), Err(LispError::CannotPrint(_))));
    }
}
