use std::os::fd::AsRawFd;

use log::{debug, error};
use nix::fcntl::OFlag;

use super::builtin::{builtin_cd, builtin_exit, WorkingDir};
use super::spawner;
use crate::shell::error::ShellError;
use crate::shell::parser::ast::{Builtin, CommandNode, Operator, Redirections, SimpleCommand};

pub struct Executor {
    cwd: WorkingDir,
}

impl Executor {
    pub fn new() -> Self {
        Self {
            cwd: WorkingDir::new(),
        }
    }

    /// 执行命令树并返回退出状态。
    ///
    /// 管道的状态取右侧子树的状态，也就是最后一个阶段的状态。
    /// 返回 `Err` 说明父进程自身的 fork/pipe/wait 失败，调用方应当结束会话。
    pub fn execute(&mut self, node: &CommandNode) -> Result<i32, ShellError> {
        match node {
            CommandNode::Simple(command) => self.execute_simple_command(command),
            CommandNode::Complex {
                operator: Operator::Pipe,
                left,
                right,
            } => self.execute_pipeline(left, right),
        }
    }

    fn execute_simple_command(&mut self, command: &SimpleCommand) -> Result<i32, ShellError> {
        match command.builtin {
            Some(Builtin::Cd) => {
                debug!("执行内建命令: {}", command);
                Ok(builtin_cd(&mut self.cwd, &command.argv))
            }
            Some(Builtin::Exit) => builtin_exit(),
            None => {
                debug!("执行外部命令: {}", command);
                let pid = spawner::spawn(|| run_external(command))?;
                spawner::wait_for(pid)
            }
        }
    }

    fn execute_pipeline(
        &mut self,
        left: &CommandNode,
        right: &CommandNode,
    ) -> Result<i32, ShellError> {
        let (read_end, write_end) = spawner::make_pipe()?;
        let (read_fd, write_fd) = (read_end.as_raw_fd(), write_end.as_raw_fd());

        // 子进程以 exit 结束，不会 drop 继承来的 OwnedFd，所以按原始描述符关闭
        // 写端：标准输出接到管道，执行左子树
        let writer = spawner::spawn(|| {
            let wired = spawner::close_raw(read_fd)
                .and_then(|_| spawner::replace_stream(write_fd, libc::STDOUT_FILENO));
            match wired {
                Ok(()) => self.execute_in_child(left),
                Err(e) => report_child_error(&e),
            }
        })?;

        // 读端：标准输入接到管道，执行右子树
        let reader = spawner::spawn(|| {
            let wired = spawner::close_raw(write_fd)
                .and_then(|_| spawner::replace_stream(read_fd, libc::STDIN_FILENO));
            match wired {
                Ok(()) => self.execute_in_child(right),
                Err(e) => report_child_error(&e),
            }
        });
        let reader = match reader {
            Ok(pid) => pid,
            Err(e) => {
                drop((read_end, write_end));
                let _ = spawner::wait_for(writer);
                return Err(e);
            }
        };

        // 父进程必须关闭两端，否则读端永远等不到 EOF
        spawner::close_fd(read_end)?;
        spawner::close_fd(write_end)?;

        spawner::wait_for(writer)?;
        spawner::wait_for(reader)
    }

    /// 在子进程中执行子树，任何错误都只转换成该子进程的失败状态
    fn execute_in_child(&mut self, node: &CommandNode) -> i32 {
        match self.execute(node) {
            Ok(status) => status,
            Err(e) => report_child_error(&e),
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

fn report_child_error(e: &ShellError) -> i32 {
    error!("子进程执行失败: {}", e);
    eprintln!("pipesh: {}", e);
    libc::EXIT_FAILURE
}

/// 子进程中：按优先级只应用一个重定向（输入 > 输出 > 错误），然后 exec
fn run_external(command: &SimpleCommand) -> i32 {
    if let Err(e) = apply_redirections(&command.redirections) {
        return report_child_error(&e);
    }

    let e = spawner::exec(&command.argv);
    report_child_error(&e)
}

fn apply_redirections(redirections: &Redirections) -> Result<(), ShellError> {
    let write_flags = OFlag::O_WRONLY | OFlag::O_TRUNC | OFlag::O_CREAT;

    if let Some(input) = &redirections.input {
        spawner::redirect_stream(input, OFlag::O_RDONLY, libc::STDIN_FILENO)
    } else if let Some(output) = &redirections.output {
        spawner::redirect_stream(output, write_flags, libc::STDOUT_FILENO)
    } else if let Some(error) = &redirections.error {
        spawner::redirect_stream(error, write_flags, libc::STDERR_FILENO)
    } else {
        Ok(())
    }
}
