use super::ast::Redirections;
use crate::shell::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOp {
    Input,  // <
    Output, // >
    Error,  // 2>
    Both,   // &>
}

impl RedirectOp {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" => Some(RedirectOp::Input),
            ">" => Some(RedirectOp::Output),
            "2>" => Some(RedirectOp::Error),
            "&>" => Some(RedirectOp::Both),
            _ => None,
        }
    }

    fn apply(self, target: &str, redirections: &mut Redirections) {
        match self {
            RedirectOp::Input => redirections.input = Some(target.to_string()),
            RedirectOp::Output => redirections.output = Some(target.to_string()),
            RedirectOp::Error => redirections.error = Some(target.to_string()),
            RedirectOp::Both => {
                redirections.output = Some(target.to_string());
                redirections.error = Some(target.to_string());
            }
        }
    }
}

/// 从 token 序列中取出所有重定向，返回剩下的 argv（保持原有顺序）。
///
/// 操作符后紧跟的 token 一律当作目标文件，即使它本身看起来像操作符。
/// 同一个流重复重定向时后出现的覆盖先出现的。
pub fn extract_redirections(tokens: &[&str]) -> Result<(Vec<String>, Redirections), ParseError> {
    let mut argv = Vec::with_capacity(tokens.len());
    let mut redirections = Redirections::default();

    let mut iter = tokens.iter();
    while let Some(&token) = iter.next() {
        match RedirectOp::from_token(token) {
            Some(op) => {
                let target = iter
                    .next()
                    .ok_or_else(|| ParseError::MissingRedirectionTarget {
                        operator: token.to_string(),
                    })?;
                op.apply(target, &mut redirections);
            }
            None => argv.push(token.to_string()),
        }
    }

    Ok((argv, redirections))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_input_and_output() {
        let (argv, redirections) =
            extract_redirections(&["cat", "<", "in.txt", ">", "out.txt"]).unwrap();
        assert_eq!(argv, vec!["cat"]);
        assert_eq!(redirections.input.as_deref(), Some("in.txt"));
        assert_eq!(redirections.output.as_deref(), Some("out.txt"));
        assert_eq!(redirections.error, None);
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_missing_target() {
        let err = extract_redirections(&["ls", ">"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingRedirectionTarget {
                operator: ">".to_string()
            }
        );
        assert!(matches!(
            extract_redirections(&["ls", ">", "a", "2>"]),
            Err(ParseError::MissingRedirectionTarget { .. })
        ));
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_last_occurrence_wins() {
        let (argv, redirections) =
            extract_redirections(&["ls", "-l", ">", "a.txt", ">", "b.txt"]).unwrap();
        assert_eq!(argv, vec!["ls", "-l"]);
        assert_eq!(redirections.output.as_deref(), Some("b.txt"));

        let (_, redirections) =
            extract_redirections(&["cmd", "&>", "both.txt", "2>", "err.txt"]).unwrap();
        assert_eq!(redirections.output.as_deref(), Some("both.txt"));
        assert_eq!(redirections.error.as_deref(), Some("err.txt"));
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_both_streams() {
        let (argv, redirections) = extract_redirections(&["make", "&>", "build.log"]).unwrap();
        assert_eq!(argv, vec!["make"]);
        assert_eq!(redirections.output.as_deref(), Some("build.log"));
        assert_eq!(redirections.error.as_deref(), Some("build.log"));
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_order_preserved() {
        let (argv, redirections) =
            extract_redirections(&["grep", "2>", "e", "-n", "<", "i", "foo"]).unwrap();
        assert_eq!(argv, vec!["grep", "-n", "foo"]);
        assert_eq!(redirections.input.as_deref(), Some("i"));
        assert_eq!(redirections.error.as_deref(), Some("e"));
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_target_spelled_like_operator() {
        let (argv, redirections) = extract_redirections(&["echo", ">", "<", "x"]).unwrap();
        assert_eq!(argv, vec!["echo", "x"]);
        assert_eq!(redirections.output.as_deref(), Some("<"));
        assert_eq!(redirections.input, None);
    }
}
