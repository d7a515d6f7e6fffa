//! The one-pass program index.
//!
//! Scans every line of the program exactly once, before execution
//! begins, recording `LABEL <name>` and `CLASS <name>` positions. Class
//! *bodies* are not parsed here — that is the class loader's job, done
//! lazily on first use. Acceptable because the instruction stream is
//! immutable once loaded: nothing after this pass ever needs to
//! re-tokenise a line to find a label or a class.

use lit_core::{is_comment_or_blank, split_line};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ProgramIndex {
    pub labels: HashMap<String, usize>,
    pub class_positions: HashMap<String, usize>,
}

impl ProgramIndex {
    pub fn build(lines: &[String]) -> Self {
        let mut labels = HashMap::new();
        let mut class_positions = HashMap::new();

        for (idx, line) in lines.iter().enumerate() {
            if is_comment_or_blank(line) {
                continue;
            }
            let tokens = split_line(line);
            if tokens.is_empty() {
                continue;
            }
            match tokens[0].to_ascii_uppercase().as_str() {
                "LABEL" if tokens.len() > 1 => {
                    labels.insert(tokens[1].clone(), idx);
                }
                "CLASS" if tokens.len() > 1 => {
                    class_positions.insert(tokens[1].clone(), idx);
                }
                _ => {}
            }
        }

        ProgramIndex {
            labels,
            class_positions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(str::to_string).collect()
    }

    #[test]
    fn records_labels_and_class_positions() {
        let idx = ProgramIndex::build(&lines(
            "LABEL main\n\
             PUSH_CONST int 1\n\
             CLASS Dog\n\
             FIELD str name\n\
             END_CLASS\n\
             LABEL bark\n\
             RET",
        ));

        assert_eq!(idx.labels["main"], 0);
        assert_eq!(idx.labels["bark"], 5);
        assert_eq!(idx.class_positions["Dog"], 2);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let idx = ProgramIndex::build(&lines(
            "; a comment\n\
             \n\
             # another comment\n\
             LABEL main",
        ));
        assert_eq!(idx.labels["main"], 3);
    }
}
