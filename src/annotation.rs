//! Core data model shared by the grammar, classifier, and state machine:
//! annotations and the availability state they accumulate into.

use std::fmt;

/// One `(mtag, tag, option, setting)` triple discovered inside a comment body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
	pub mtag: bool,
	pub tag: String,
	pub option: String,
	pub setting: String,
}

impl Annotation {
	/// `tag + option`. Equality between two options is exact character match.
	pub fn option_key(&self) -> String {
		format!("{}{}", self.tag, self.option)
	}

	/// True if `setting` is a variable-setting literal of the form `='<regex>'`.
	pub fn is_variable_setting(&self) -> bool {
		is_variable_setting(&self.setting)
	}
}

/// True if `setting` is a variable-setting literal of the form `='<regex>'` (or `="..."`).
pub fn is_variable_setting(setting: &str) -> bool {
	let quoted = |q: char| {
		setting.starts_with('=') && setting.len() > 3 && setting.as_bytes()[1] as char == q && setting.ends_with(q)
	};
	quoted('\'') || quoted('"')
}

/// Strip the surrounding `='...'` (or `="..."`) from a variable-setting literal,
/// returning the bare regex text.
pub fn strip_variable_regex(setting: &str) -> &str {
	&setting[2..setting.len() - 1]
}

/// State of one (option, setting) pair as observed while scanning the tree.
///
/// Mirrors the state table in SPEC_FULL.md §4.E. `Both` and `Inactive` render
/// identically (blank brackets) but are tracked separately so a later update
/// can tell "never resolved because two annotations collided on one line"
/// apart from "deliberately commented out".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingState {
	Active,
	Inactive,
	Ambiguous,
	Both,
	/// A variable-setting observation; the key it's stored under in the
	/// availability entry is the live captured value, not the regex literal.
	Variable,
}

impl SettingState {
	/// Fold in a fresh observation of this (option, setting) pair, per the
	/// state table in SPEC_FULL.md §4.E.
	///
	/// `Both` is not sticky: the original only distinguishes "no state yet"
	/// from "state is Both" by testing for a null database entry, so a later
	/// observation of the same (option, setting) pair with only one inline
	/// occurrence can still resolve a `Both` row to `Active`/`Inactive`. Once
	/// a pair has resolved to `Active`/`Inactive`/`Ambiguous` it can no longer
	/// become `Both`.
	pub fn observe(existing: Option<&SettingState>, uncommented: bool, inline_count: usize) -> SettingState {
		match existing {
			None | Some(SettingState::Both) => {
				if inline_count > 1 {
					SettingState::Both
				} else if uncommented {
					SettingState::Active
				} else {
					SettingState::Inactive
				}
			}
			Some(SettingState::Active) => if uncommented { SettingState::Active } else { SettingState::Ambiguous },
			Some(SettingState::Inactive) => if uncommented { SettingState::Ambiguous } else { SettingState::Inactive },
			Some(SettingState::Ambiguous) => SettingState::Ambiguous,
			Some(SettingState::Variable) => SettingState::Variable,
		}
	}

	/// The left/right delimiters printed around the setting name in an
	/// availability report, e.g. `> active <`. Only `Active` is asymmetric.
	pub fn brackets(&self) -> (char, char) {
		match self {
			SettingState::Active => ('>', '<'),
			SettingState::Inactive | SettingState::Both => (' ', ' '),
			SettingState::Ambiguous => ('?', '?'),
			SettingState::Variable => ('=', '='),
		}
	}
}

impl fmt::Display for SettingState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let (left, right) = self.brackets();
		write!(f, "{left}{right}")
	}
}
