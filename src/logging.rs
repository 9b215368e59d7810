//! Dual-sink logging: the on-disk run log records every level that passes
//! the `--debug`/default floor, while the console only shows a coarser
//! subset. Extends the teacher's `init_logger` technique (a custom
//! `env_logger::Builder::format` closure) to additionally tee every record
//! into a file, the way `optionset.py`'s `_setup_logging` layers a
//! `StreamHandler` with its own threshold on top of `basicConfig`'s root
//! file handler.
//!
//! The custom "PRINT" level (25, between INFO and WARNING in the original)
//! has no equivalent in `log`'s five fixed levels, so messages meant to
//! reach the console by default are logged at `Level::Info` against the
//! [`PRINT_TARGET`] target and special-cased in the console filter.

use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{Level, Record};

pub const LOG_NAME: &str = "log_optionset.txt";

/// Target used by [`crate::print_msg`] so the console filter can recognize
/// a message that should reach the console at the default verbosity even
/// though it's logged at `Info`.
pub const PRINT_TARGET: &str = "optionset::print";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleMode {
	Verbose,
	Quiet,
	Default,
}

fn console_visible(record: &Record, mode: ConsoleMode) -> bool {
	let is_print = record.target() == PRINT_TARGET;
	match mode {
		ConsoleMode::Quiet => record.level() == Level::Error,
		ConsoleMode::Verbose => record.level() <= Level::Info,
		ConsoleMode::Default => is_print || record.level() <= Level::Warn,
	}
}

/// Resolve the console mode from the mutually-exclusive `--verbose`/`--quiet`
/// flags (verbose wins if both are somehow set, matching argparse's
/// last-applicable-elif style checks in `_setup_logging`).
pub fn console_mode(verbose: bool, quiet: bool) -> ConsoleMode {
	if verbose {
		ConsoleMode::Verbose
	} else if quiet {
		ConsoleMode::Quiet
	} else {
		ConsoleMode::Default
	}
}

/// Where the run log is written, or `None` if `--no-log` suppresses it.
pub fn log_path(aux_dir: &Path, no_log: bool) -> Option<PathBuf> {
	if no_log {
		None
	} else {
		Some(aux_dir.join(LOG_NAME))
	}
}

/// Initialize `log`/`env_logger` with the dual-sink format closure. Returns
/// the log file path actually used, if logging to disk.
pub fn init(aux_dir: &Path, debug: bool, no_log: bool, mode: ConsoleMode) -> std::io::Result<Option<PathBuf>> {
	let path = log_path(aux_dir, no_log);
	let file: Option<Mutex<File>> = match &path {
		Some(p) => {
			if let Some(parent) = p.parent() {
				std::fs::create_dir_all(parent)?;
			}
			Some(Mutex::new(OpenOptions::new().create(true).write(true).truncate(true).open(p)?))
		}
		None => None,
	};

	let max_level = if debug { log::LevelFilter::Debug } else { log::LevelFilter::Info };
	let mut builder = env_logger::Builder::new();
	builder.filter_level(max_level);
	builder.format(move |buf, record| {
		let line = format!("{}:{}", record.level(), record.args());
		if let Some(file) = &file {
			if let Ok(mut f) = file.lock() {
				let _ = writeln!(f, "{line}");
			}
		}
		if console_visible(record, mode) {
			writeln!(buf, "{line}")
		} else {
			Ok(())
		}
	});
	builder.init();

	Ok(path)
}

/// Log a message at the console's default-visible level. Mirrors
/// `optionset.py`'s `logging.print` (the custom `PRINT` level).
#[macro_export]
macro_rules! print_msg {
	($($arg:tt)*) => {
		log::info!(target: $crate::logging::PRINT_TARGET, $($arg)*)
	};
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(level: Level, target: &str) -> log::Record<'static> {
		log::Record::builder().level(level).target(Box::leak(target.to_string().into_boxed_str())).build()
	}

	#[test]
	fn quiet_shows_only_errors() {
		assert_eq!(console_mode(false, true), ConsoleMode::Quiet);
		assert!(console_visible(&record(Level::Error, "x"), ConsoleMode::Quiet));
		assert!(!console_visible(&record(Level::Warn, "x"), ConsoleMode::Quiet));
	}

	#[test]
	fn default_mode_shows_print_and_warnings_but_not_info() {
		assert!(console_visible(&record(Level::Info, PRINT_TARGET), ConsoleMode::Default));
		assert!(console_visible(&record(Level::Warn, "x"), ConsoleMode::Default));
		assert!(!console_visible(&record(Level::Info, "x"), ConsoleMode::Default));
	}

	#[test]
	fn verbose_shows_info_but_not_debug() {
		assert!(console_visible(&record(Level::Info, "x"), ConsoleMode::Verbose));
		assert!(!console_visible(&record(Level::Debug, "x"), ConsoleMode::Verbose));
	}

	#[test]
	fn verbose_takes_priority_over_quiet() {
		assert_eq!(console_mode(true, true), ConsoleMode::Verbose);
	}

	#[test]
	fn default_mode_when_neither_set() {
		assert_eq!(console_mode(false, false), ConsoleMode::Default);
	}

	#[test]
	fn no_log_suppresses_log_path() {
		assert_eq!(log_path(Path::new("/tmp/aux"), true), None);
	}

	#[test]
	fn log_path_present_without_no_log() {
		assert_eq!(log_path(Path::new("/tmp/aux"), false), Some(PathBuf::from("/tmp/aux").join(LOG_NAME)));
	}
}
