use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Exit,
}

/// 连接两个命令的操作符，目前只有管道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Pipe, // |
}

/// 标准流重定向的目标文件，同一个流出现多次时以最后一次为准
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirections {
    pub input: Option<String>,
    pub output: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleCommand {
    /// argv[0] 是程序名，已去掉所有重定向
    pub argv: Vec<String>,
    pub redirections: Redirections,
    pub builtin: Option<Builtin>,
}

/// 命令树节点。
///
/// 管道总是在第一个操作符处切分，`a | b | c` 得到右嵌套的
/// `Complex(a, Complex(b, c))`，执行时最左边的阶段最先写入管道。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandNode {
    Simple(SimpleCommand),
    Complex {
        operator: Operator,
        left: Box<CommandNode>,
        right: Box<CommandNode>,
    },
}

impl CommandNode {
    /// 树中简单命令的个数，即管道的阶段数
    pub fn stages(&self) -> usize {
        match self {
            CommandNode::Simple(_) => 1,
            CommandNode::Complex { left, right, .. } => left.stages() + right.stages(),
        }
    }

    fn fmt_level(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        let indent = "  ".repeat(level);
        match self {
            CommandNode::Simple(cmd) => writeln!(f, "{}{}", indent, cmd),
            CommandNode::Complex { left, right, .. } => {
                writeln!(f, "{}Pipeline:", indent)?;
                left.fmt_level(f, level + 1)?;
                right.fmt_level(f, level + 1)
            }
        }
    }
}

impl fmt::Display for SimpleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_words::join(&self.argv))?;
        if let Some(input) = &self.redirections.input {
            write!(f, " < {}", input)?;
        }
        if let Some(output) = &self.redirections.output {
            write!(f, " > {}", output)?;
        }
        if let Some(error) = &self.redirections.error {
            write!(f, " 2> {}", error)?;
        }
        Ok(())
    }
}

/// 缩进打印整棵树，供调试日志使用
impl fmt::Display for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_level(f, 0)
    }
}
