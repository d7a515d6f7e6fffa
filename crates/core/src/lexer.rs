//! Lexeme splitter: tokenises one bytecode line into an opcode plus
//! shell-style quoted arguments.
//!
//! Double-quoted tokens may contain spaces; a backslash inside a quoted
//! token is passed through literally except before `"` or `\`, where it
//! escapes the following character. This mirrors POSIX shell quoting
//! (and, in particular, `shlex.split` in posix mode, which the original
//! interpreter used): `\n` inside a quoted string survives tokenisation
//! as the two characters backslash-n, and `PUSH_CONST str` is the stage
//! that turns that into an actual newline.

/// Split one source line into whitespace-separated tokens, honouring
/// double-quoted spans. Returns an empty vector for a blank line.
pub fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '\\' {
                match chars.peek() {
                    Some('"') | Some('\\') => {
                        current.push(chars.next().unwrap());
                    }
                    _ => current.push(c),
                }
            } else if c == '"' {
                in_quotes = false;
            } else {
                current.push(c);
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                in_token = true;
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    tokens
}

/// Blank lines and lines whose first non-space character is `;` or `#`
/// are no-ops.
pub fn is_comment_or_blank(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_tokens_on_whitespace() {
        assert_eq!(
            split_line("PUSH_CONST int 42"),
            vec!["PUSH_CONST", "int", "42"]
        );
    }

    #[test]
    fn keeps_spaces_inside_quotes() {
        assert_eq!(
            split_line(r#"PUSH_CONST str "hello world""#),
            vec!["PUSH_CONST", "str", "hello world"]
        );
    }

    #[test]
    fn preserves_escaped_newline_marker_for_later_interpretation() {
        assert_eq!(
            split_line(r#"PUSH_CONST str "line1\nline2""#),
            vec!["PUSH_CONST", "str", r"line1\nline2"]
        );
    }

    #[test]
    fn blank_and_comment_lines_are_recognised() {
        assert!(is_comment_or_blank(""));
        assert!(is_comment_or_blank("   "));
        assert!(is_comment_or_blank("; a comment"));
        assert!(is_comment_or_blank("# a comment"));
        assert!(!is_comment_or_blank("LABEL main"));
    }

    #[test]
    fn escaped_quote_is_embedded_literally() {
        assert_eq!(
            split_line(r#"PUSH_CONST str "say \"hi\"""#),
            vec!["PUSH_CONST", "str", r#"say "hi""#]
        );
    }
}
