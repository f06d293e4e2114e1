/// 分隔符仅限空格、制表符和换行
fn is_delimiter(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n'
}

/// 把一行输入切分成单词。
///
/// 产出的每个 token 都是 `input` 的切片，不做任何拷贝，生命周期受输入缓冲区约束。
/// 不支持引号和转义，`"a b"` 会被切成 `"a` 和 `b"` 两个 token。
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// 返回下一个 token，没有更多 token 时返回 `None`
    pub fn next_token(&mut self) -> Option<&'a str> {
        self.skip_whitespace();

        let rest = &self.input[self.position..];
        if rest.is_empty() {
            return None;
        }

        let len = rest.find(is_delimiter).unwrap_or(rest.len());
        let word = &rest[..len];
        self.position += len;
        Some(word)
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.position..];
        let trimmed = rest.trim_start_matches(is_delimiter);
        self.position += rest.len() - trimmed.len();
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// 一次性切分整行
pub fn tokenize(line: &str) -> Vec<&str> {
    Lexer::new(line).collect()
}
