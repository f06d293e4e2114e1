//! pipesh：一个最小的命令解释器。
//!
//! 一行输入依次经过分词（[`shell::parser::lexer`]）、提取重定向
//! （[`shell::parser::redirect`]）、构造命令树（[`shell::parser::parser`]），
//! 最后由 [`shell::executor`] 通过 fork、pipe 和 dup2 执行。
//! 支持 `<`、`>`、`2>`、`&>` 重定向、`|` 管道以及 `cd`、`exit` 两个内建命令。

pub mod shell;
pub mod utils;
