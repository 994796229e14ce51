//! Yes/no confirmation for interactive runs.

use std::io::{self, BufRead, Write};

/// Asks the user a yes/no question.
pub trait Confirm {
    fn ask(&mut self, prompt: &str) -> bool;
}

/// Never asks; every question is answered yes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysYes;

impl Confirm for AlwaysYes {
    fn ask(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Line-based prompter over any reader/writer pair.
///
/// Writes `<prompt> [Yn]: ` and reads one line. An empty answer, `y` or
/// `yes` (any case) is a yes. Anything else is a no, and so is end of input
/// or a read failure.
pub struct Prompter<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stderr> {
    /// Read answers from stdin, prompt on stderr.
    pub fn stdio() -> Self {
        Prompter::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Confirm for Prompter<R, W> {
    fn ask(&mut self, prompt: &str) -> bool {
        let _ = write!(self.output, "{} [Yn]: ", prompt);
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&line),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.is_empty() || answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answers(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn empty_and_y_mean_yes() {
        let mut prompter = answers("\ny\nY\nyes\nYES\n");
        for _ in 0..5 {
            assert!(prompter.ask("Replace?"));
        }
    }

    #[test]
    fn other_answers_mean_no() {
        let mut prompter = answers("n\nno\nq\nyep\n");
        for _ in 0..4 {
            assert!(!prompter.ask("Replace?"));
        }
    }

    #[test]
    fn end_of_input_means_no() {
        let mut prompter = answers("y\n");
        assert!(prompter.ask("Rename?"));
        assert!(!prompter.ask("Rename?"));
    }

    #[test]
    fn answer_without_newline_is_read() {
        let mut prompter = answers("y");
        assert!(prompter.ask("Rename?"));
    }

    #[test]
    fn prompt_text_is_written() {
        let mut prompter = answers("n\n");
        prompter.ask("Replace?");
        let written = String::from_utf8(prompter.into_output()).unwrap();
        assert_eq!(written, "Replace? [Yn]: ");
    }

    #[test]
    fn always_yes_never_reads() {
        assert!(AlwaysYes.ask("Replace?"));
    }
}
