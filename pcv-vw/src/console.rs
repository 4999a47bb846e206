//! Terminal operator for the pcv-vw binary

use std::io::{self, BufRead, Write};

use crate::operator::Operator;

/// Prompts on stdout and reads y/n answers from stdin
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOperator {
    /// Answer yes to every confirmation without prompting
    pub assume_yes: bool,
}

impl ConsoleOperator {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

/// `y`/`yes` in any case; everything else (including EOF) is no
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

impl Operator for ConsoleOperator {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        let mut stdout = io::stdout().lock();
        if write!(stdout, "{} [y/N] ", prompt).and_then(|_| stdout.flush()).is_err() {
            return false;
        }
        drop(stdout);

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&answer),
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn play_delete_sound(&self) {
        // Terminal bell
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\x07").and_then(|_| stdout.flush());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        assert!(ConsoleOperator::new(true).confirm("Delete?"));
    }
}
