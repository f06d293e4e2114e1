pub mod error;
pub mod executor;
pub mod parser;
mod readline;
#[allow(clippy::module_inception)]
mod shell;

pub use error::{BuiltinError, ParseError, ShellError};
pub use executor::Executor;
pub use parser::{CommandNode, Parser};
pub use shell::Shell;
