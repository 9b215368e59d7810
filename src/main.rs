//! `optionset` toggles named options and settings annotated as comments
//! across a directory of plain-text files — a directory-scoped macro
//! preprocessor driven entirely by comments, so it works on any language.
//!
//! ### High-level structure:
//! 1. Command-line flags are parsed into [`cli::Args`]
//! 2. [`input::parse_and_check`] resolves them into a validated [`input::InputRequest`]
//! 3. [`discover::discover_files`] walks the current directory for candidate files
//! 4. [`driver::scroll_through_files`] drives [`processor::process_file`] over each one
//! 5. The accumulated databases are rendered as an availability report and/or
//!    a Bash completion script, depending on the request

use std::fmt::Display;
use std::path::PathBuf;
use std::time::Instant;

pub mod annotation;
pub mod classify;
pub mod cli;
pub mod comment;
pub mod completion;
pub mod config;
pub mod discover;
pub mod driver;
pub mod error;
pub mod grammar;
pub mod input;
pub mod logging;
pub mod mutate;
pub mod processor;
pub mod state;

#[cfg(test)]
mod tests;

/// Print the given error message and exit the program. Mirrors the
/// optionset.py `_handle_errors`/`_exit` boundary: one place converts a
/// `Result` into a console message and a non-zero exit code.
///
/// The error message will be prefixed with `optionset:` if it is not already.
pub fn complain_and_exit<T>(err: impl Display) -> T {
	let mut err = err.to_string();
	if !err.starts_with("optionset:") {
		err = format!("optionset: {err}");
	}
	eprintln!("{err}");
	std::process::exit(1)
}

fn main() {
	let start_time = Instant::now();

	let args = cli::Args::parse().unwrap_or_else(complain_and_exit);

	if args.help {
		println!("{}", cli::get_short_help());
		return;
	}
	if args.help_full {
		println!("{}", cli::get_full_help());
		return;
	}
	if args.version {
		println!("{}", cli::get_version());
		return;
	}

	let aux_dir = args.aux_dir.clone().map(PathBuf::from).unwrap_or_else(config::default_aux_dir);
	let console_mode = logging::console_mode(args.verbose, args.quiet);
	let log_path = logging::init(&aux_dir, args.debug, args.no_log, console_mode).unwrap_or_else(complain_and_exit);

	log::info!("Executing main optionset function");
	log::info!("Checking input options");

	let file_config = config::load_or_init(&aux_dir, args.no_log, args.bashcomp).unwrap_or_else(complain_and_exit);
	let input = input::parse_and_check(&args).unwrap_or_else(complain_and_exit);
	log::info!("<tag><raw_opt> <setting> = {}{} {}", input.tag, input.raw_opt, input.setting);

	log::info!("Generating valid files");
	let valid_files = discover::discover_files(
		&PathBuf::from("."),
		&file_config.ignore_dirs,
		&file_config.ignore_files,
	)
	.unwrap_or_else(complain_and_exit);

	let result =
		driver::scroll_through_files(&valid_files, &file_config.limits, &input).unwrap_or_else(complain_and_exit);

	if input.wants_available_or_showfiles() {
		let glob_pat = if args.option.is_empty() { "*".to_string() } else { format!("{}*", args.option) };
		let f_available = matches!(input.mode, crate::input::Mode::ShowAvailable) || args.available;
		let report = driver::format_available_report(&result.dbs, &glob_pat, f_available);
		crate::print_msg!("{report}");
	}

	if args.bashcomp {
		let bashcomp_path = aux_dir.join(completion::BASHCOMP_NAME);
		let script = completion::render(&cli::get_full_help(), &result.dbs.availability, &result.dbs.variables);
		std::fs::write(&bashcomp_path, script).unwrap_or_else(complain_and_exit);
	}

	if result.changes_made {
		if let Some(log_path) = &log_path {
			crate::print_msg!("See all modifications in {}", log_path.display());
		}
	}

	let elapsed = start_time.elapsed();
	log::info!("Finished in {:1.5} s", elapsed.as_secs_f64());
}
