//! Command-line front-end: hand-parsed flags (no argument-parsing crate,
//! mirroring the teacher's own `Opts::parse`), and the help/version text.
//!
//! Grounded in `optionset.py`'s `_parse_args` for the flag set and
//! `src/main.rs`'s `Opts::parse`/`get_help` for the parsing/writing style.

use std::fmt::Write as _;

pub const BASENAME: &str = "optionset";
pub const VERSION: &str = "0.1.0";

/// Parsed, not-yet-validated command-line arguments. [`crate::input::parse_and_check`]
/// turns this into an [`crate::input::InputRequest`].
#[derive(Clone, Debug, Default)]
pub struct Args {
	pub option: String,
	pub setting: String,
	pub help: bool,
	pub help_full: bool,
	pub available: bool,
	pub showfiles: bool,
	pub verbose: bool,
	pub quiet: bool,
	pub debug: bool,
	pub no_log: bool,
	pub rename_option: Option<String>,
	pub rename_setting: Option<String>,
	pub bashcomp: bool,
	pub version: bool,
	pub aux_dir: Option<String>,
}

impl Args {
	/// Parse `std::env::args()` (skipping argv[0]). Mirrors the positional
	/// `option`/`setting` pair plus the flat flag set of `_parse_args`.
	pub fn parse() -> Result<Args, String> {
		Args::parse_from(std::env::args().skip(1))
	}

	fn parse_from(args: impl Iterator<Item = String>) -> Result<Args, String> {
		let mut new = Args::default();
		let mut positionals = Vec::new();
		let mut args = args.peekable();

		while let Some(arg) = args.next() {
			match arg.as_str() {
				"-h" | "--help" => new.help = true,
				"-H" | "--help-full" => new.help_full = true,
				"-a" | "--available" => new.available = true,
				"-f" | "--show-files" => new.showfiles = true,
				"-v" | "--verbose" => new.verbose = true,
				"-q" | "--quiet" => new.quiet = true,
				"-d" | "--debug" => new.debug = true,
				"-n" | "--no-log" => new.no_log = true,
				"--bash-completion" => new.bashcomp = true,
				"--version" => new.version = true,
				"--rename-option" => {
					let Some(next_arg) = args.next() else {
						return Err(format!("Expected an option name after '{arg}'"));
					};
					new.rename_option = Some(next_arg);
				}
				"--rename-setting" => {
					let Some(next_arg) = args.next() else {
						return Err(format!("Expected a setting name after '{arg}'"));
					};
					new.rename_setting = Some(next_arg);
				}
				"--auxiliary-dir" => {
					let Some(next_arg) = args.next() else {
						return Err(format!("Expected a path after '{arg}'"));
					};
					new.aux_dir = Some(next_arg);
				}
				_ if arg.starts_with('-') && arg != "-" => {
					return Err(format!("Unrecognized flag '{arg}'"));
				}
				_ => positionals.push(arg),
			}
		}

		let mut positionals = positionals.into_iter();
		new.option = positionals.next().unwrap_or_default();
		new.setting = positionals.next().unwrap_or_default();
		if let Some(extra) = positionals.next() {
			return Err(format!("Unexpected extra argument '{extra}'"));
		}

		Ok(new)
	}
}

pub fn get_version() -> String {
	format!("{BASENAME} {VERSION}")
}

pub fn get_short_help() -> String {
	let mut help = String::new();
	writeln!(help).ok();
	writeln!(help, "\x1b[1moptionset\x1b[0m").ok();
	writeln!(help, "Toggle named options and settings annotated as comments across a directory of text files.").ok();
	writeln!(help).ok();
	writeln!(help, "\x1b[1;4mUSAGE:\x1b[0m").ok();
	writeln!(help, "\t{BASENAME} [OPTIONS] [option] [setting]").ok();
	writeln!(help).ok();
	writeln!(help, "Run '{BASENAME} --help-full' to view more-detailed help").ok();
	help
}

pub fn get_full_help() -> String {
	let mut help = get_short_help();
	writeln!(help).ok();
	writeln!(help, "\x1b[1;4mOPTIONS:\x1b[0m").ok();
	writeln!(help, "\t-h, --help").ok();
	writeln!(help, "\t\tShow this short help message and exit.").ok();
	writeln!(help).ok();
	writeln!(help, "\t-H, --help-full").ok();
	writeln!(help, "\t\tShow this full help message and exit.").ok();
	writeln!(help).ok();
	writeln!(help, "\t-a, --available").ok();
	writeln!(help, "\t\tShow available option-setting combinations; 'option' is treated as a glob search.").ok();
	writeln!(help, "\t\tImplicitly enabled when no 'setting' is given.").ok();
	writeln!(help).ok();
	writeln!(help, "\t-f, --show-files").ok();
	writeln!(help, "\t\tShow files associated with available options.").ok();
	writeln!(help).ok();
	writeln!(help, "\t-v, --verbose").ok();
	writeln!(help, "\t\tTurn on verbose console output.").ok();
	writeln!(help).ok();
	writeln!(help, "\t-q, --quiet").ok();
	writeln!(help, "\t\tTurn off all console output except errors.").ok();
	writeln!(help).ok();
	writeln!(help, "\t-d, --debug").ok();
	writeln!(help, "\t\tTurn on debug output in the run log.").ok();
	writeln!(help).ok();
	writeln!(help, "\t-n, --no-log").ok();
	writeln!(help, "\t\tDo not write a run log.").ok();
	writeln!(help).ok();
	writeln!(help, "\t--rename-option <NAME>").ok();
	writeln!(help, "\t\tRename the input option in every file.").ok();
	writeln!(help).ok();
	writeln!(help, "\t--rename-setting <NAME>").ok();
	writeln!(help, "\t\tRename the input setting in every file.").ok();
	writeln!(help).ok();
	writeln!(help, "\t--bash-completion").ok();
	writeln!(help, "\t\tGenerate a Bash tab-completion script.").ok();
	writeln!(help).ok();
	writeln!(help, "\t--version").ok();
	writeln!(help, "\t\tShow version and exit.").ok();
	writeln!(help).ok();
	writeln!(help, "\x1b[1;4mEXAMPLE:\x1b[0m").ok();
	writeln!(help, "\t$ {BASENAME} ~nu water").ok();
	writeln!(help, "\tsets the kinematic viscosity option to its 'water' setting everywhere below the current directory.").ok();
	writeln!(help).ok();
	writeln!(help, "For more info, see: https://github.com/km-clay/optionset").ok();
	help
}
