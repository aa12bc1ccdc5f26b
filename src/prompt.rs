//! Blocking questions on the terminal.

use crate::Result;
use std::io::{self, BufRead, Write};

/// Reads answers from `input` and writes questions to `output`
pub struct Prompt<R, W> {
	input: R,
	output: W,
}

impl Prompt<io::StdinLock<'static>, io::Stdout> {
	pub fn stdio() -> Self {
		Prompt::new(io::stdin().lock(), io::stdout())
	}
}

impl<R: BufRead, W: Write> Prompt<R, W> {
	pub fn new(input: R, output: W) -> Self {
		Prompt { input, output }
	}

	/// The next line with surrounding whitespace removed. EOF reads as an empty line.
	pub fn read_line(&mut self) -> Result<String> {
		let mut line = String::new();
		self.input.read_line(&mut line)?;
		Ok(line.trim().to_string())
	}

	/// Prints `question` and reads the answer
	pub fn ask(&mut self, question: &str) -> Result<String> {
		write!(self.output, "{}", question)?;
		self.output.flush()?;
		self.read_line()
	}

	/// Prints `question` and returns true for "y" or "yes"
	pub fn yes_no(&mut self, question: &str) -> Result<bool> {
		let answer = self.ask(question)?;
		Ok(is_yes(&answer))
	}

	/// Prints `message` and waits for the return key
	pub fn press_enter(&mut self, message: &str) -> Result<()> {
		writeln!(self.output, "{}", message)?;
		self.output.flush()?;
		self.read_line()?;
		Ok(())
	}

	/// Where the questions go, for printing around them
	pub fn output(&mut self) -> &mut W {
		&mut self.output
	}
}

pub fn is_yes(answer: &str) -> bool {
	let answer = answer.trim();
	answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
