// ABOUTME: Parses a character stream into a single expression

use crate::error::LispError;
use crate::stream::{InputStream, EOF};
use crate::value::{cons, eq, intern, is_nil, set_cdr, Expr};

/// Reader configuration.
///
/// `read_comments`: when true, comments are returned as `Comment` expressions
/// rather than skipped as whitespace. `read_quote`: when true, a leading `'`
/// before an expression is rewritten as `(quote <expr>)`; when false, `'` is
/// not a recognized lexeme and triggers `UnexpectedChar`.
#[derive(Clone, Copy, Debug)]
pub struct ReaderOpts {
    pub read_comments: bool,
    pub read_quote: bool,
}

impl Default for ReaderOpts {
    fn default() -> Self {
        ReaderOpts {
            read_comments: false,
            read_quote: true,
        }
    }
}

/// Parses exactly one top-level expression from `src`; trailing input is ignored.
pub fn read_one_from_string(src: &str, opts: ReaderOpts) -> Result<Expr, LispError> {
    let mut stream = InputStream::new(src);
    parse_expr(&mut stream, opts)
}

fn parse_expr(stream: &mut InputStream, opts: ReaderOpts) -> Result<Expr, LispError> {
    skip_junk(stream, opts);

    if opts.read_comments && stream.peek() == ';' {
        let mut lexeme = String::new();
        while stream.peek() != EOF && stream.peek() != '\n' {
            lexeme.push(stream.consume());
        }
        if stream.peek() != EOF {
            stream.advance();
        }
        return Ok(Expr::Comment(std::rc::Rc::from(lexeme.as_str())));
    }

    if stream.peek() == '(' {
        return parse_list(stream, opts);
    }

    if opts.read_quote && stream.peek() == '\'' {
        stream.advance();
        let quoted = parse_expr(stream, opts)?;
        return Ok(cons(intern("quote"), cons(quoted, Expr::Nil)));
    }

    if is_symbol_start(stream.peek()) {
        let mut lexeme = String::new();
        while is_symbol_part(stream.peek()) {
            lexeme.push(stream.consume());
        }
        return Ok(if is_integer_lexeme(&lexeme) {
            match lexeme.parse() {
                Ok(n) => Expr::Int(n),
                // Matches the digit grammar but overflows i64 (e.g. 20+
                // digits): fall back to a symbol rather than panicking.
                Err(_) => intern(&lexeme),
            }
        } else {
            intern(&lexeme)
        });
    }

    Err(LispError::UnexpectedChar(stream.peek()))
}

fn parse_list(stream: &mut InputStream, opts: ReaderOpts) -> Result<Expr, LispError> {
    debug_assert_eq!(stream.peek(), '(');
    stream.advance();

    let mut head = Expr::Nil;
    let mut tail = Expr::Nil;
    let dot = intern(".");

    loop {
        skip_junk(stream, opts);
        if stream.peek() == EOF {
            return Err(LispError::UnexpectedEof);
        }
        if stream.peek() == ')' {
            break;
        }

        let exp = parse_expr(stream, opts)?;

        if eq(&exp, &dot) {
            let tail_expr = parse_expr(stream, opts)?;
            set_cdr(&tail, tail_expr)?;
            skip_junk(stream, opts);
            break;
        }

        let next = cons(exp, Expr::Nil);
        if is_nil(&tail) {
            head = next.clone();
            tail = next;
        } else {
            set_cdr(&tail, next.clone())?;
            tail = next;
        }
    }

    if stream.peek() != ')' {
        return Err(LispError::MissingCloseParen);
    }
    stream.advance();
    Ok(head)
}

fn skip_junk(stream: &mut InputStream, opts: ReaderOpts) {
    loop {
        let skipped_ws = skip_ws(stream);
        let skipped_comment = !opts.read_comments && skip_comment(stream);
        if !skipped_ws && !skipped_comment {
            break;
        }
    }
}

fn skip_ws(stream: &mut InputStream) -> bool {
    if !is_ws(stream.peek()) {
        return false;
    }
    while is_ws(stream.peek()) {
        stream.advance();
    }
    true
}

fn skip_comment(stream: &mut InputStream) -> bool {
    if !is_comment_start(stream.peek()) {
        return false;
    }
    stream.advance();
    while is_comment_part(stream.peek()) {
        stream.advance();
    }
    true
}

fn is_ws(ch: char) -> bool {
    ch == ' ' || ch == '\n' || ch == '\t'
}

fn is_comment_start(ch: char) -> bool {
    ch == ';'
}

fn is_comment_part(ch: char) -> bool {
    ch != EOF && ch != '\n'
}

fn is_symbol_start(ch: char) -> bool {
    ch != EOF && !is_ws(ch) && !matches!(ch, '"' | '(' | ')' | ';' | '\'')
}

fn is_symbol_part(ch: char) -> bool {
    is_symbol_start(ch)
}

fn is_integer_lexeme(lexeme: &str) -> bool {
    let digits = lexeme.strip_prefix('-').unwrap_or(lexeme);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::repr_expr;
    use crate::value::{car, cdr, is_nil};

    fn read(src: &str) -> Expr {
        read_one_from_string(src, ReaderOpts::default()).unwrap()
    }

    #[test]
    fn reads_nil() {
        assert!(is_nil(&read("nil")));
    }

    #[test]
    fn reads_symbol() {
        assert_eq!(repr_expr(&read("foo")).unwrap(), "foo");
    }

    #[test]
    fn reads_negative_and_positive_integers() {
        assert!(matches!(read("42"), Expr::Int(42)));
        assert!(matches!(read("-7"), Expr::Int(-7)));
    }

    #[test]
    fn bare_minus_is_a_symbol_not_a_number() {
        assert_eq!(repr_expr(&read("-")).unwrap(), "-");
    }

    #[test]
    fn digit_lexeme_overflowing_i64_reads_as_symbol_not_a_panic() {
        let too_big = "9223372036854775808"; // i64::MAX + 1
        assert_eq!(repr_expr(&read(too_big)).unwrap(), too_big);
        let too_negative = "-99999999999999999999";
        assert_eq!(repr_expr(&read(too_negative)).unwrap(), too_negative);
    }

    #[test]
    fn reads_proper_list() {
        let exp = read("(foo)");
        assert_eq!(repr_expr(&exp).unwrap(), "(foo)");
    }

    #[test]
    fn reads_dotted_pair() {
        let exp = read("(foo . bar)");
        assert_eq!(repr_expr(&exp).unwrap(), "(foo . bar)");
    }

    #[test]
    fn dotted_nil_tail_collapses_to_proper_list() {
        let exp = read("(foo . nil)");
        assert_eq!(repr_expr(&exp).unwrap(), "(foo)");
    }

    #[test]
    fn reads_nested_defun_like_form() {
        let exp = read("(defun add (a b) (+ a b))");
        assert_eq!(repr_expr(&exp).unwrap(), "(defun add (a b) (+ a b))");
    }

    #[test]
    fn quote_sugar_expands_to_quote_form() {
        let exp = read("'foo");
        assert_eq!(repr_expr(&exp).unwrap(), "(quote foo)");
    }

    #[test]
    fn nested_quote_sugar() {
        let exp = read("''foo");
        assert_eq!(repr_expr(&exp).unwrap(), "(quote (quote foo))");
    }

    #[test]
    fn quote_disabled_is_unexpected_char() {
        let opts = ReaderOpts {
            read_comments: false,
            read_quote: false,
        };
        assert!(matches!(
            read_one_from_string("'foo", opts),
            Err(LispError::UnexpectedChar('\''))
        ));
    }

    #[test]
    fn comments_skipped_by_default() {
        let exp = read_one_from_string("; a comment\n42", ReaderOpts::default()).unwrap();
        assert!(matches!(exp, Expr::Int(42)));
    }

    #[test]
    fn comments_preserved_when_requested() {
        let opts = ReaderOpts {
            read_comments: true,
            read_quote: true,
        };
        let exp = read_one_from_string("; a comment\n", opts).unwrap();
        assert!(matches!(exp, Expr::Comment(_)));
    }

    #[test]
    fn empty_input_is_unexpected_char() {
        assert!(matches!(
            read_one_from_string("", ReaderOpts::default()),
            Err(LispError::UnexpectedChar(EOF))
        ));
    }

    #[test]
    fn unbalanced_open_paren_is_unexpected_eof() {
        assert!(matches!(
            read_one_from_string("(foo", ReaderOpts::default()),
            Err(LispError::UnexpectedEof)
        ));
    }

    #[test]
    fn unmatched_close_paren_is_unexpected_char() {
        assert!(matches!(
            read_one_from_string(")", ReaderOpts::default()),
            Err(LispError::UnexpectedChar(')'))
        ));
    }

    #[test]
    fn trailing_input_after_one_expression_is_ignored() {
        let exp = read("foo bar");
        assert_eq!(repr_expr(&exp).unwrap(), "foo");
    }

    #[test]
    fn dotted_tail_not_followed_by_close_paren_errors() {
        let exp = read_one_from_string("(foo . bar baz)", ReaderOpts::default());
        assert!(matches!(exp, Err(LispError::MissingCloseParen)));
    }

    #[test]
    fn list_sharing_structure_round_trips() {
        let exp = read("(a (b c) d)");
        let inner = cdr(&car(&cdr(&exp).unwrap()).unwrap()).unwrap();
        assert_eq!(repr_expr(&inner).unwrap(), "(c)");
    }
}
