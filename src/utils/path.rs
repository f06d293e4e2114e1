use std::env;

use log::error;

/// 不以 `/` 开头的路径都按相对路径处理
pub fn is_relative(path: &str) -> bool {
    !path.starts_with('/')
}

/// 把相对路径直接拼接到目录后面，不做规范化
pub fn join_relative(dir: &str, path: &str) -> String {
    format!("{}/{}", dir, path)
}

pub fn current_dir() -> String {
    let _current_dir = match env::current_dir() {
        Ok(x) => x,
        Err(e) => {
            error!("pipesh: PROMPT: env current_dir error: {}", e);
            return String::new();
        }
    };
    let current_dir = match _current_dir.to_str() {
        Some(x) => x,
        None => {
            error!("pipesh: PROMPT: to_str error");
            return String::new();
        }
    };

    current_dir.to_string()
}
