use log::debug;

use super::ast::{Builtin, CommandNode, Operator, SimpleCommand};
use super::lexer::Lexer;
use super::redirect::extract_redirections;
use crate::shell::error::ParseError;

pub fn is_operator(token: &str) -> Option<Operator> {
    match token {
        "|" => Some(Operator::Pipe),
        _ => None,
    }
}

pub fn is_builtin(token: &str) -> Option<Builtin> {
    match token {
        "cd" => Some(Builtin::Cd),
        "exit" => Some(Builtin::Exit),
        _ => None,
    }
}

/// 是否含有操作符（目前只有 `|`）
pub fn is_complex_command(tokens: &[&str]) -> bool {
    tokens.iter().any(|token| is_operator(token).is_some())
}

/// 递归构造命令树，在第一个操作符处切分，操作符本身不进入任何一侧
pub fn construct_command(tokens: &[&str]) -> Result<CommandNode, ParseError> {
    let split = tokens
        .iter()
        .enumerate()
        .find_map(|(i, token)| is_operator(token).map(|op| (i, op)));

    match split {
        Some((i, operator)) => {
            let left = construct_command(&tokens[..i])?;
            let right = construct_command(&tokens[i + 1..])?;
            Ok(CommandNode::Complex {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            })
        }
        None => construct_simple_command(tokens).map(CommandNode::Simple),
    }
}

fn construct_simple_command(tokens: &[&str]) -> Result<SimpleCommand, ParseError> {
    // 内建命令按未过滤的第一个 token 判断
    let builtin = tokens.first().and_then(|token| is_builtin(token));
    let (argv, redirections) = extract_redirections(tokens)?;
    if argv.is_empty() {
        return Err(ParseError::EmptyCommand);
    }

    Ok(SimpleCommand {
        argv,
        redirections,
        builtin,
    })
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input),
        }
    }

    /// 解析一整行，空行返回 `Ok(None)`
    pub fn parse_command(&mut self) -> Result<Option<CommandNode>, ParseError> {
        let tokens: Vec<&str> = self.lexer.by_ref().collect();
        if tokens.is_empty() {
            return Ok(None);
        }

        debug!("解析 token: {:?}", tokens);
        construct_command(&tokens).map(Some)
    }
}
