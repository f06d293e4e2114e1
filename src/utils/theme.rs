use colored::Colorize;

pub struct Theme {
    pub prompt_style: Box<dyn Fn(String) -> String>,
    pub error_style: Box<dyn Fn(String) -> String>,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            prompt_style: Box::new(|s| s.bright_cyan().to_string()),
            error_style: Box::new(|s| s.bright_red().to_string()),
        }
    }
}

impl Theme {
    pub fn load_theme(theme_name: &str) -> Theme {
        match theme_name {
            "dark" => Theme {
                prompt_style: Box::new(|s| s.bright_purple().to_string()),
                error_style: Box::new(|s| s.red().to_string()),
            },
            "plain" => Theme {
                prompt_style: Box::new(|s| s),
                error_style: Box::new(|s| s),
            },
            _ => Theme::default(),
        }
    }

    /// `<当前目录>> `
    pub fn prompt(&self, cwd: &str) -> String {
        (self.prompt_style)(format!("{}> ", cwd))
    }
}
