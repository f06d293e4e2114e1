use std::error::Error;
use std::fmt;
use std::io;

/// 构造命令树时的错误，只影响当前这一行输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// 重定向操作符后面没有目标文件
    MissingRedirectionTarget { operator: String },
    /// 管道某一侧或去掉重定向后没有程序名
    EmptyCommand,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingRedirectionTarget { operator } => {
                write!(f, "missing redirection target after '{}'", operator)
            }
            ParseError::EmptyCommand => write!(f, "missing command"),
        }
    }
}

impl Error for ParseError {}

/// 内建命令失败，报告后不改变任何状态
#[derive(Debug)]
pub enum BuiltinError {
    MissingOperand,
    TooManyArguments,
    ChangeDir { path: String, source: io::Error },
}

impl fmt::Display for BuiltinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuiltinError::MissingOperand => write!(f, "cd: Please enter a directory"),
            BuiltinError::TooManyArguments => write!(f, "cd: too many arguments"),
            BuiltinError::ChangeDir { path, source } => write!(f, "cd: {}: {}", path, source),
        }
    }
}

impl Error for BuiltinError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BuiltinError::ChangeDir { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// 执行阶段的错误。
///
/// `Resource` 出现在父进程的编排调用（fork、pipe、wait）里时是致命的，
/// 交互循环收到后会直接结束；出现在子进程里时只让该子进程以失败状态退出。
#[derive(Debug)]
pub enum ShellError {
    Resource {
        op: &'static str,
        source: nix::Error,
    },
    Execution {
        program: String,
        source: nix::Error,
    },
}

impl ShellError {
    pub fn resource(op: &'static str, source: nix::Error) -> Self {
        ShellError::Resource { op, source }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Resource { .. })
    }
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Resource { op, source } => write!(f, "{}: {}", op, source.desc()),
            ShellError::Execution { program, source } => {
                write!(f, "{}: {}", program, source.desc())
            }
        }
    }
}

impl Error for ShellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ShellError::Resource { source, .. } | ShellError::Execution { source, .. } => {
                Some(source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ParseError::MissingRedirectionTarget {
            operator: ">".to_string(),
        };
        assert_eq!(err.to_string(), "missing redirection target after '>'");

        let err = ShellError::Execution {
            program: "nope".to_string(),
            source: nix::Error::ENOENT,
        };
        assert_eq!(err.to_string(), "nope: No such file or directory");
        assert!(!err.is_fatal());
        assert!(ShellError::resource("fork", nix::Error::EAGAIN).is_fatal());
    }
}
