//! 进程原语：fork、pipe、文件描述符重定向、exec 和 wait。
//!
//! 父进程里的失败以 `ShellError::Resource` 向上传递；子进程里的失败由调用方
//! 报告后以失败状态退出，不会回到父进程的控制流。

use std::ffi::CString;
use std::io::{self, Write};
use std::os::fd::{IntoRawFd, OwnedFd, RawFd};
use std::path::Path;
use std::process;

use log::{debug, trace};
use nix::errno::Errno;
use nix::fcntl::{self, OFlag};
use nix::sys::signal::{self, SigHandler, Signal};
use nix::sys::stat::Mode;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{self, dup2, execvp, fork, ForkResult, Pid};

use crate::shell::error::ShellError;

/// 被信号终止的子进程的退出码基数
const SIGNAL_STATUS_BASE: i32 = 128;

/// 新建输出文件的权限，实际权限还会受 umask 影响
const CREATE_MODE: libc::mode_t = 0o666;

/// EINTR 时重试
fn syscall<F, T>(f: F) -> nix::Result<T>
where
    F: Fn() -> nix::Result<T>,
{
    loop {
        match f() {
            Err(Errno::EINTR) => (),
            result => return result,
        }
    }
}

/// fork 一个子进程执行 `body`，子进程以 `body` 的返回值退出，父进程拿到子进程 pid
pub fn spawn<F>(body: F) -> Result<Pid, ShellError>
where
    F: FnOnce() -> i32,
{
    // 避免子进程重复输出父进程缓冲区里尚未写出的内容
    flush_std_streams();

    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => {
            trace!("fork 子进程: {}", child);
            Ok(child)
        }
        Ok(ForkResult::Child) => {
            let code = body();
            flush_std_streams();
            process::exit(code);
        }
        Err(e) => Err(ShellError::resource("fork", e)),
    }
}

/// 阻塞等待指定子进程结束并返回它的退出状态
pub fn wait_for(pid: Pid) -> Result<i32, ShellError> {
    loop {
        match syscall(|| waitpid(pid, None)) {
            Ok(WaitStatus::Exited(_, code)) => {
                debug!("子进程 {} 退出, 状态码: {}", pid, code);
                return Ok(code);
            }
            Ok(WaitStatus::Signaled(_, sig, _)) => {
                debug!("子进程 {} 被信号 {} 终止", pid, sig);
                return Ok(SIGNAL_STATUS_BASE + sig as i32);
            }
            Ok(_) => continue,
            Err(e) => return Err(ShellError::resource("wait", e)),
        }
    }
}

/// 创建管道，返回 (读端, 写端)
pub fn make_pipe() -> Result<(OwnedFd, OwnedFd), ShellError> {
    unistd::pipe().map_err(|e| ShellError::resource("pipe", e))
}

/// 关闭描述符并报告错误，不依赖 `OwnedFd` 的 drop
pub fn close_fd(fd: OwnedFd) -> Result<(), ShellError> {
    close_raw(fd.into_raw_fd())
}

pub fn close_raw(fd: RawFd) -> Result<(), ShellError> {
    unistd::close(fd).map_err(|e| ShellError::resource("close", e))
}

/// 用 `fd` 替换标准流 `target`：先关闭原来的流，再 dup2，最后关闭 `fd` 本身
pub fn replace_stream(fd: RawFd, target: RawFd) -> Result<(), ShellError> {
    if fd == target {
        return Ok(());
    }

    match unistd::close(target) {
        Ok(()) | Err(Errno::EBADF) => (),
        Err(e) => return Err(ShellError::resource("close", e)),
    }
    syscall(|| dup2(fd, target)).map_err(|e| ShellError::resource("dup2", e))?;
    close_raw(fd)
}

/// 打开 `path` 并把它接到标准流 `target` 上
pub fn redirect_stream(path: &str, flags: OFlag, target: RawFd) -> Result<(), ShellError> {
    let fd = fcntl::open(
        Path::new(path),
        flags,
        Mode::from_bits_truncate(CREATE_MODE),
    )
    .map_err(|e| ShellError::resource("open", e))?;
    replace_stream(fd, target)
}

/// 用 argv[0] 替换当前进程映像（按 PATH 查找）。只有失败时才会返回。
pub fn exec(argv: &[String]) -> ShellError {
    let program = argv.first().cloned().unwrap_or_default();
    let args = match argv
        .iter()
        .map(|arg| CString::new(arg.as_bytes()))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(args) if !args.is_empty() => args,
        _ => {
            return ShellError::Execution {
                program,
                source: Errno::EINVAL,
            }
        }
    };

    // shell 自身忽略 SIGPIPE，新程序应恢复默认行为
    if let Err(e) = unsafe { signal::signal(Signal::SIGPIPE, SigHandler::SigDfl) } {
        return ShellError::resource("signal", e);
    }

    match execvp(&args[0], &args) {
        Ok(never) => match never {},
        Err(source) => ShellError::Execution { program, source },
    }
}

fn flush_std_streams() {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
}
