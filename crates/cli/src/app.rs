//! Interactive loop driving the picker from line input.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;
use unipick_picker::{PickerController, Transition};

use crate::command::{Command, HELP};
use crate::render::write_state;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
	Continue,
	Quit,
}

/// Terminal presentation around a [`PickerController`].
pub struct App<W> {
	picker: PickerController,
	out: W,
	limit: usize,
}

impl<W: Write> App<W> {
	/// Creates an app writing to `out`, printing at most `limit` results.
	pub fn new(picker: PickerController, out: W, limit: usize) -> Self {
		Self { picker, out, limit }
	}

	/// Runs until `:quit`, or until input ends and the picker has settled.
	pub async fn run<R>(mut self, input: R) -> anyhow::Result<()>
	where
		R: AsyncBufRead + Unpin,
	{
		let mut lines = input.lines();
		let mut input_open = true;

		self.picker.initialize();
		self.render()?;

		loop {
			if !input_open && self.picker.is_idle() {
				break;
			}

			tokio::select! {
				line = lines.next_line(), if input_open => match line? {
					Some(line) => {
						if self.handle_line(&line)? == Flow::Quit {
							break;
						}
					}
					None => {
						debug!("input closed, waiting for outstanding requests");
						input_open = false;
					}
				},
				transition = self.picker.next_transition() => match transition {
					Some(Transition::Discarded { .. }) => {}
					Some(_) => self.render()?,
					None => break,
				},
			}
		}

		self.picker.shutdown();
		self.out.flush()?;
		Ok(())
	}

	fn handle_line(&mut self, line: &str) -> anyhow::Result<Flow> {
		let command = match Command::parse(line) {
			Ok(command) => command,
			Err(err) => {
				writeln!(self.out, "{err}")?;
				return Ok(Flow::Continue);
			}
		};

		match command {
			Command::Query(query) => self.picker.on_query_changed(query),
			Command::Search(query) => {
				self.picker.execute_search(query);
				self.render()?;
			}
			Command::Select(index) => match self.picker.select_index(index) {
				Ok(_) => self.render()?,
				Err(err) => writeln!(self.out, "{err}")?,
			},
			Command::Clear => {
				self.picker.on_select(None);
				self.render()?;
			}
			Command::State => self.render()?,
			Command::Help => write!(self.out, "{HELP}")?,
			Command::Quit => return Ok(Flow::Quit),
		}
		Ok(Flow::Continue)
	}

	fn render(&mut self) -> std::io::Result<()> {
		write_state(&mut self.out, self.picker.state(), self.limit)
	}
}
