use std::env;
use std::io;
use std::path::PathBuf;
use std::process;

use log::{debug, warn};

use crate::shell::error::BuiltinError;
use crate::utils::path::{is_relative, join_relative};

/// 进程级工作目录。
///
/// 工作目录只能通过这里修改，并且只在 shell 自己的进程里修改（管道里的
/// `cd` 运行在子进程中，不影响 shell）。
#[derive(Debug, Default)]
pub struct WorkingDir;

impl WorkingDir {
    pub fn new() -> Self {
        Self
    }

    pub fn current(&self) -> io::Result<PathBuf> {
        env::current_dir()
    }

    /// 绝对路径直接切换，相对路径拼接到当前目录后再切换。失败时目录不变。
    pub fn change(&mut self, target: &str) -> Result<PathBuf, BuiltinError> {
        let dest = if is_relative(target) {
            let current = self.current().map_err(|source| BuiltinError::ChangeDir {
                path: target.to_string(),
                source,
            })?;
            PathBuf::from(join_relative(&current.to_string_lossy(), target))
        } else {
            PathBuf::from(target)
        };

        env::set_current_dir(&dest).map_err(|source| BuiltinError::ChangeDir {
            path: target.to_string(),
            source,
        })?;
        debug!("切换工作目录: {}", dest.display());
        Ok(dest)
    }
}

fn cd(cwd: &mut WorkingDir, argv: &[String]) -> Result<PathBuf, BuiltinError> {
    match argv {
        [_] | [] => Err(BuiltinError::MissingOperand),
        [_, target] => cwd.change(target),
        _ => Err(BuiltinError::TooManyArguments),
    }
}

/// 执行 `cd`，返回退出状态。错误在这里报告给用户。
pub fn builtin_cd(cwd: &mut WorkingDir, argv: &[String]) -> i32 {
    match cd(cwd, argv) {
        Ok(_) => libc::EXIT_SUCCESS,
        Err(e) => {
            warn!("cd 失败: {}", e);
            eprintln!("{}", e);
            libc::EXIT_FAILURE
        }
    }
}

/// 以成功状态立即结束当前进程。
/// 在管道里时当前进程是该阶段的子进程，所以只结束这一阶段。
pub fn builtin_exit() -> ! {
    debug!("退出 pipesh...");
    process::exit(libc::EXIT_SUCCESS);
}
