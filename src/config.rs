// ABOUTME: Version and banner constants for the CLI driver

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const WELCOME_MESSAGE: &str = "mini-lisp-core";
pub const WELCOME_SUBTITLE: &str = "a small Lisp evaluator core: reader, printer, env, eval";
