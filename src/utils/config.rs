use dotenv::dotenv;
use log::LevelFilter;
use rustyline::EditMode;
use std::env;
use std::fs;
use std::path::PathBuf;

pub struct Config {
    pub name: String,
    pub theme: String,
    pub history_file: PathBuf,
    pub editor_mode: String,
    pub logger_level: String,
    pub logger_dir: PathBuf,
    pub log_to_stderr: bool,
}

/// 展开 `~` 后转成路径
fn expand_path(value: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(value).as_ref())
}

impl Config {
    fn get_config_dir() -> PathBuf {
        if let Ok(home) = env::var("HOME") {
            PathBuf::from(home).join(".config/pipesh")
        } else {
            env::temp_dir().join("pipesh")
        }
    }

    pub fn new() -> Self {
        // 优先加载环境变量
        if cfg!(debug_assertions) {
            dotenv::from_filename(".env.development").ok();
        } else {
            dotenv().ok();
        }

        // 默认配置
        let mut config = Config::default();

        // 从环境变量加载配置
        if let Ok(theme) = env::var("PIPESH_THEME") {
            config.theme = theme;
        }

        if let Ok(editor) = env::var("PIPESH_EDITOR") {
            config.editor_mode = editor;
        }

        if let Ok(history) = env::var("PIPESH_HISTORY") {
            config.history_file = expand_path(&history);
        }

        if let Ok(level) = env::var("PIPESH_LOG_LEVEL") {
            config.logger_level = level;
        }

        if let Ok(dir) = env::var("PIPESH_LOG_DIR") {
            config.logger_dir = expand_path(&dir);
        }

        if let Ok(flag) = env::var("PIPESH_LOG_STDERR") {
            config.log_to_stderr = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        // 确保历史文件目录存在，失败时只是无法保存历史
        if let Some(parent) = config.history_file.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("无法创建历史记录目录 {}: {}", parent.display(), e);
            }
        }

        config
    }

    pub fn get_edit_mode(&self) -> EditMode {
        match self.editor_mode.to_lowercase().as_str() {
            "vi" => EditMode::Vi,
            _ => EditMode::Emacs,
        }
    }

    pub fn get_log_level(&self) -> LevelFilter {
        match &self.logger_level {
            level if level.eq_ignore_ascii_case("off") => LevelFilter::Off,
            level if level.eq_ignore_ascii_case("error") => LevelFilter::Error,
            level if level.eq_ignore_ascii_case("warn") => LevelFilter::Warn,
            level if level.eq_ignore_ascii_case("info") => LevelFilter::Info,
            level if level.eq_ignore_ascii_case("debug") => LevelFilter::Debug,
            level if level.eq_ignore_ascii_case("trace") => LevelFilter::Trace,
            _ => LevelFilter::Warn,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = Self::get_config_dir();
        Config {
            name: String::from(env!("CARGO_PKG_NAME")),
            theme: String::from("default"),
            history_file: config_dir.join(".pipesh_history"),
            editor_mode: String::from("emacs"),
            logger_level: String::from("warn"),
            logger_dir: config_dir.join("logs"),
            log_to_stderr: false,
        }
    }
}
