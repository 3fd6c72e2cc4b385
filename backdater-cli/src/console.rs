use dialoguer::Input;
use std::io::{self, BufRead, IsTerminal, Write};

/// Line-oriented prompts and output for the interactive loop.
pub trait Console {
    /// Shows `prompt` and reads one line without its line ending.
    /// Returns `None` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn say(&mut self, line: &str) -> io::Result<()>;
}

/// Reads plain lines from any reader; used when stdin is piped.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }
}

/// Prompts rendered by dialoguer on an interactive terminal.
pub struct TerminalConsole;

impl Console for TerminalConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let line = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();
        end_of_input(line)
    }

    fn say(&mut self, line: &str) -> io::Result<()> {
        println!("{line}");
        Ok(())
    }
}

/// Ctrl-D and Ctrl-C at a terminal prompt end input like a closed pipe.
fn end_of_input(line: Result<String, dialoguer::Error>) -> io::Result<Option<String>> {
    match line {
        Ok(line) => Ok(Some(line)),
        Err(dialoguer::Error::IO(e))
            if matches!(e.kind(), io::ErrorKind::UnexpectedEof | io::ErrorKind::Interrupted) =>
        {
            Ok(None)
        }
        Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
    }
}

pub fn stdio() -> Box<dyn Console> {
    if io::stdin().is_terminal() {
        Box::new(TerminalConsole)
    } else {
        Box::new(LineConsole::new(io::stdin().lock(), io::stdout()))
    }
}
