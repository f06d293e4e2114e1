use log::{debug, error, warn};
use std::error::Error;
use std::io::Write;

use crate::shell::error::ShellError;
use crate::shell::executor::Executor;
use crate::shell::parser::Parser;
use crate::shell::readline::{ReadlineError, ReadlineManager};
use crate::utils::config::Config;
use crate::utils::path::current_dir;
use crate::utils::theme::Theme;

pub struct Shell<'a> {
    theme: Theme,
    readline: ReadlineManager<'a>,
    executor: Executor,
}

impl<'a> Shell<'a> {
    pub fn new(config: &'a Config) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            theme: Theme::load_theme(&config.theme),
            readline: ReadlineManager::new(config)?,
            executor: Executor::new(),
        })
    }

    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        debug!("初始化 pipesh...");
        self.readline.load_history()?;
        debug!("pipesh 准备就绪...");

        let result = self.run_loop();
        self.readline.save_history()?;

        debug!("退出 pipesh...");
        result
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn Error>> {
        loop {
            std::io::stdout().flush()?;
            let prompt = self.theme.prompt(&current_dir());

            match self.readline.readline(&prompt) {
                Ok(line) => {
                    if let Err(e) = self.handle_input(&line) {
                        // 父进程自身的 fork/pipe/wait 失败，结束会话
                        error!("致命错误，退出 pipesh: {}", e);
                        eprintln!("{}", (self.theme.error_style)(format!("pipesh: {}", e)));
                        return Err(e.into());
                    }
                }
                Err(err) => match err {
                    ReadlineError::Eof => {
                        warn!("接收到 EOF 信号，退出 pipesh...");
                        break;
                    }
                    ReadlineError::Interrupted => {
                        warn!("接收到中断信号...");
                    }
                    err => {
                        error!("发生错误: {}", err);
                        eprintln!("{}", (self.theme.error_style)(format!("pipesh: {}", err)));
                        return Err(err.into());
                    }
                },
            }
        }
        Ok(())
    }

    /// 解析并执行一行。只有致命错误才返回 `Err`，命令树在返回前释放。
    fn handle_input(&mut self, line: &str) -> Result<(), ShellError> {
        if line.trim().is_empty() {
            return Ok(());
        }

        if let Err(e) = self.readline.add_history(line) {
            warn!("无法记录历史: {}", e);
        }
        // `exit` 直接结束进程，先把历史写下来
        if let Err(e) = self.readline.save_history() {
            warn!("无法保存历史: {}", e);
        }

        let node = match Parser::new(line).parse_command() {
            Ok(Some(node)) => node,
            Ok(None) => return Ok(()),
            Err(e) => {
                warn!("解析失败: {}", e);
                eprintln!("{}", (self.theme.error_style)(format!("pipesh: {}", e)));
                return Ok(());
            }
        };
        debug!("命令树:\n{}", node);

        let status = self.executor.execute(&node)?;
        debug!("命令结束, 状态码: {}", status);
        Ok(())
    }
}
