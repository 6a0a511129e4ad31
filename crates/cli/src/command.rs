//! Input line parsing.

use thiserror::Error;

/// Help text printed for `:help`.
pub const HELP: &str = "\
type text to search (debounced)
  :search TEXT   search immediately
  :select N      select result N
  :clear         clear the selection
  :state         print the current state
  :help          show this help
  :quit          exit
";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	/// Raw query text, debounced before searching.
	Query(String),
	/// Search immediately.
	Search(String),
	/// Select a result by zero-based index.
	Select(usize),
	/// Clear the selection.
	Clear,
	/// Print the state.
	State,
	/// Print help.
	Help,
	/// Exit.
	Quit,
}

/// Errors parsing an input line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
	/// The `:` command is not recognised.
	#[error("unknown command :{0} (try :help)")]
	Unknown(String),

	/// `:select` was not given a result number of at least 1.
	#[error(":select expects a result number starting at 1, got {0:?}")]
	BadIndex(String),
}

impl Command {
	/// Parses a line. Lines not starting with `:` are queries, verbatim.
	pub fn parse(line: &str) -> Result<Self, CommandError> {
		let Some(rest) = line.strip_prefix(':') else {
			return Ok(Self::Query(line.to_string()));
		};

		let (name, arg) = match rest.split_once(char::is_whitespace) {
			Some((name, arg)) => (name, arg.trim()),
			None => (rest.trim(), ""),
		};

		match name {
			"search" | "s" => Ok(Self::Search(arg.to_string())),
			"select" => arg
				.parse::<usize>()
				.ok()
				.and_then(|n| n.checked_sub(1))
				.map(Self::Select)
				.ok_or_else(|| CommandError::BadIndex(arg.to_string())),
			"clear" => Ok(Self::Clear),
			"state" => Ok(Self::State),
			"help" | "h" => Ok(Self::Help),
			"quit" | "q" => Ok(Self::Quit),
			other => Err(CommandError::Unknown(other.to_string())),
		}
	}
}
