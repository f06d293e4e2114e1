pub mod ast;
pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod redirect;

pub use ast::{Builtin, CommandNode, Operator, Redirections, SimpleCommand};
pub use lexer::tokenize;
pub use parser::{construct_command, is_complex_command, Parser};
pub use redirect::extract_redirections;
