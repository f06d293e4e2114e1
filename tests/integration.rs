#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use pipesh::shell::{Executor, ParseError, Parser};

// fork 和工作目录都是进程级状态，这些用例串行执行
static SERIAL: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("pipesh-test-{}-{}", process::id(), name));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir.canonicalize().unwrap()
}

fn run(executor: &mut Executor, line: &str) -> i32 {
    let node = Parser::new(line)
        .parse_command()
        .unwrap()
        .expect("non-empty command line");
    executor.execute(&node).unwrap()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

/// 切换工作目录的用例结束后恢复原目录
struct RestoreDir(PathBuf);

impl Drop for RestoreDir {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.0);
    }
}

fn remember_cwd() -> RestoreDir {
    RestoreDir(env::current_dir().unwrap())
}

#[test]
fn pipe_feeds_word_count() {
    let _guard = serial();
    let dir = scratch_dir("wc");
    let out = dir.join("count.txt");
    let mut executor = Executor::new();

    let status = run(&mut executor, &format!("echo hi | wc -w > {}", out.display()));
    assert_eq!(status, 0);
    assert_eq!(read(&out).trim(), "1");
}

#[test]
fn three_stage_pipeline_runs_in_order() {
    let _guard = serial();
    let dir = scratch_dir("three");
    let input = dir.join("in.txt");
    let out = dir.join("out.txt");
    fs::write(&input, "pear\napple\nfig\n").unwrap();
    let mut executor = Executor::new();

    let line = format!(
        "cat {} | sort | head -n 1 > {}",
        input.display(),
        out.display()
    );
    assert_eq!(run(&mut executor, &line), 0);
    assert_eq!(read(&out), "apple\n");
}

#[test]
fn input_redirection_inside_pipeline() {
    let _guard = serial();
    let dir = scratch_dir("input");
    let input = dir.join("in.txt");
    let out = dir.join("out.txt");
    fs::write(&input, "a\nb\nc\n").unwrap();
    let mut executor = Executor::new();

    let line = format!("cat < {} | wc -l > {}", input.display(), out.display());
    assert_eq!(run(&mut executor, &line), 0);
    assert_eq!(read(&out).trim(), "3");
}

#[test]
fn output_redirection_truncates() {
    let _guard = serial();
    let dir = scratch_dir("trunc");
    let out = dir.join("out.txt");
    fs::write(&out, "a much longer previous content\n").unwrap();
    let mut executor = Executor::new();

    assert_eq!(run(&mut executor, &format!("echo new > {}", out.display())), 0);
    assert_eq!(read(&out), "new\n");
}

#[test]
fn last_output_redirection_wins() {
    let _guard = serial();
    let dir = scratch_dir("last");
    let a = dir.join("a.txt");
    let b = dir.join("b.txt");
    let mut executor = Executor::new();

    let line = format!("echo hi > {} > {}", a.display(), b.display());
    assert_eq!(run(&mut executor, &line), 0);
    assert!(!a.exists());
    assert_eq!(read(&b), "hi\n");
}

#[test]
fn error_redirection_captures_stderr() {
    let _guard = serial();
    let dir = scratch_dir("stderr");
    let err = dir.join("err.txt");
    let mut executor = Executor::new();

    let line = format!("ls {}/missing 2> {}", dir.display(), err.display());
    assert_ne!(run(&mut executor, &line), 0);
    assert!(!read(&err).is_empty());
}

#[test]
fn both_streams_redirection_applies_to_stdout() {
    let _guard = serial();
    let dir = scratch_dir("both");
    let out = dir.join("both.txt");
    let mut executor = Executor::new();

    assert_eq!(run(&mut executor, &format!("echo hi &> {}", out.display())), 0);
    assert_eq!(read(&out), "hi\n");
}

#[test]
fn input_redirection_takes_precedence_over_output() {
    let _guard = serial();
    let dir = scratch_dir("precedence");
    let input = dir.join("empty.txt");
    let out = dir.join("out.txt");
    fs::write(&input, "").unwrap();
    let mut executor = Executor::new();

    let line = format!("cat < {} > {}", input.display(), out.display());
    assert_eq!(run(&mut executor, &line), 0);
    assert!(!out.exists());
}

#[test]
fn missing_input_file_fails_only_the_child() {
    let _guard = serial();
    let dir = scratch_dir("noinput");
    let mut executor = Executor::new();

    let line = format!("cat < {}/nope.txt", dir.display());
    assert_eq!(run(&mut executor, &line), 1);
    assert_eq!(run(&mut executor, "true"), 0);
}

#[test]
fn unknown_program_reports_failure() {
    let _guard = serial();
    let mut executor = Executor::new();
    assert_eq!(run(&mut executor, "pipesh-definitely-not-a-program"), 1);
}

#[test]
fn exit_statuses() {
    let _guard = serial();
    let mut executor = Executor::new();
    assert_eq!(run(&mut executor, "true"), 0);
    assert_eq!(run(&mut executor, "false"), 1);
    // 管道的状态是最后一个阶段的状态
    assert_eq!(run(&mut executor, "true | false"), 1);
    assert_eq!(run(&mut executor, "false | true"), 0);
    assert_eq!(run(&mut executor, "true | true | false"), 1);
}

#[test]
fn writer_sees_broken_pipe_and_stops() {
    let _guard = serial();
    let dir = scratch_dir("sigpipe");
    let out = dir.join("out.txt");
    let mut executor = Executor::new();

    let line = format!("yes | head -n 2 > {}", out.display());
    assert_eq!(run(&mut executor, &line), 0);
    assert_eq!(read(&out), "y\ny\n");
}

#[test]
fn cd_absolute_path() {
    let _guard = serial();
    let _restore = remember_cwd();
    let target = env::temp_dir().canonicalize().unwrap();
    let mut executor = Executor::new();

    assert_eq!(run(&mut executor, &format!("cd {}", target.display())), 0);
    assert_eq!(env::current_dir().unwrap(), target);
}

#[test]
fn cd_relative_path() {
    let _guard = serial();
    let _restore = remember_cwd();
    let dir = scratch_dir("cdrel");
    fs::create_dir(dir.join("sub")).unwrap();
    let mut executor = Executor::new();

    assert_eq!(run(&mut executor, &format!("cd {}", dir.display())), 0);
    assert_eq!(run(&mut executor, "cd sub"), 0);
    assert_eq!(env::current_dir().unwrap(), dir.join("sub"));

    // 之后的相对重定向以新目录为准
    assert_eq!(run(&mut executor, "echo here > marker.txt"), 0);
    assert_eq!(read(&dir.join("sub/marker.txt")), "here\n");
}

#[test]
fn cd_failure_keeps_directory() {
    let _guard = serial();
    let _restore = remember_cwd();
    let dir = scratch_dir("cdfail");
    let mut executor = Executor::new();

    assert_eq!(run(&mut executor, &format!("cd {}", dir.display())), 0);
    assert_eq!(run(&mut executor, "cd missing"), 1);
    assert_eq!(run(&mut executor, "cd"), 1);
    assert_eq!(run(&mut executor, "cd a b"), 1);
    assert_eq!(env::current_dir().unwrap(), dir);
}

#[test]
fn builtins_in_pipeline_stay_in_their_stage() {
    let _guard = serial();
    let _restore = remember_cwd();
    let dir = scratch_dir("stage");
    let out = dir.join("out.txt");
    let before = env::current_dir().unwrap();
    let mut executor = Executor::new();

    assert_eq!(run(&mut executor, "cd / | true"), 0);
    assert_eq!(env::current_dir().unwrap(), before);

    let line = format!("exit | echo ok > {}", out.display());
    assert_eq!(run(&mut executor, &line), 0);
    assert_eq!(read(&out), "ok\n");
}

#[test]
fn parse_errors_do_not_execute() {
    let _guard = serial();
    assert_eq!(
        Parser::new("ls >").parse_command(),
        Err(ParseError::MissingRedirectionTarget {
            operator: ">".to_string()
        })
    );
    assert_eq!(
        Parser::new("echo hi |").parse_command(),
        Err(ParseError::EmptyCommand)
    );
    assert_eq!(Parser::new("   ").parse_command(), Ok(None));
}

#[test]
fn repeated_build_execute_release_cycles() {
    let _guard = serial();
    let dir = scratch_dir("cycles");
    let out = dir.join("out.txt");
    let mut executor = Executor::new();

    for i in 0..25 {
        let line = format!("echo {} | cat | cat > {}", i, out.display());
        let node = Parser::new(&line).parse_command().unwrap().unwrap();
        assert_eq!(node.stages(), 3);
        assert_eq!(executor.execute(&node).unwrap(), 0);
        drop(node);
        assert_eq!(read(&out), format!("{}\n", i));
    }
}
