use crate::config::Pacing;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::thread;

/// Everything the game reads from or writes to the user goes through a `Console`.
pub trait Console {
    /// Reads one line of input, without the line terminator.
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] once the input is exhausted.
    fn read_line(&mut self) -> io::Result<String>;

    /// Prints a line of output.
    fn print(&mut self, text: &str) -> io::Result<()>;

    /// Paces the game before a player's turn.
    fn wait_for_ack(&mut self) -> io::Result<()>;

    /// Asks a question and reads the answer.
    fn prompt(&mut self, question: &str) -> io::Result<String> {
        self.print(question)?;
        self.read_line()
    }
}

#[inline]
fn input_closed() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "input closed")
}

/// A [`Console`] reading and writing lines of text, usually the terminal.
#[derive(Debug)]
pub struct StdConsole<R: BufRead, W: Write> {
    input: R,
    output: W,
    pacing: Pacing,
}

impl StdConsole<io::StdinLock<'static>, io::Stdout> {
    /// Creates a `StdConsole` on the process' standard input and output.
    pub fn stdio(pacing: Pacing) -> Self {
        StdConsole::new(io::stdin().lock(), io::stdout(), pacing)
    }
}

impl<R: BufRead, W: Write> StdConsole<R, W> {
    pub fn new(input: R, output: W, pacing: Pacing) -> StdConsole<R, W> {
        StdConsole {
            input,
            output,
            pacing,
        }
    }

    /// Gives back the output.
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;
        self.read_line()
    }
}

impl<R: BufRead, W: Write> Console for StdConsole<R, W> {
    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(input_closed());
        }
        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(line)
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    fn wait_for_ack(&mut self) -> io::Result<()> {
        match self.pacing {
            Pacing::Prompt => self.ask("Press enter to continue...").map(drop),
            Pacing::Delay(delay) => {
                self.output.flush()?;
                thread::sleep(delay);
                Ok(())
            }
            Pacing::Off => Ok(()),
        }
    }

    fn prompt(&mut self, question: &str) -> io::Result<String> {
        self.ask(question)
    }
}

/// An in-memory [`Console`]: input comes from a list of lines and output is recorded.
///
/// Acknowledgments don't consume input.
#[derive(Clone, Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    output: Vec<String>,
    acks: usize,
}

impl ScriptedConsole {
    pub fn new<I, S>(input: I) -> ScriptedConsole
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedConsole {
            input: input.into_iter().map(Into::into).collect(),
            output: Vec::new(),
            acks: 0,
        }
    }

    /// Lines printed so far, prompts included.
    #[inline]
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Number of times the game paused.
    #[inline]
    pub fn acks(&self) -> usize {
        self.acks
    }

    /// Input lines not read yet.
    #[inline]
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self) -> io::Result<String> {
        self.input.pop_front().ok_or_else(input_closed)
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        self.output.extend(text.lines().map(str::to_owned));
        Ok(())
    }

    fn wait_for_ack(&mut self) -> io::Result<()> {
        self.acks += 1;
        Ok(())
    }
}
