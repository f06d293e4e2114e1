use log::debug;
use pipesh::shell::Shell;
use pipesh::utils::config::Config;
use pipesh::utils::log::init_logger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new();
    let log_file = init_logger(&config)?;
    debug!("配置加载成功, 日志文件: {}", log_file.display());

    let mut shell = Shell::new(&config)?;
    shell.run()
}
