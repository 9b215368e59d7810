//! Bash tab-completion script emission.
//!
//! Grounded in `optionset.py`'s `_write_bashcompletion_file`: scrape short and
//! long flags out of the rendered help text, and list every known option and
//! its settings so Bash can complete both the flag and the second positional
//! argument.

use std::fmt::Write as _;

use crate::cli::BASENAME;
use crate::state::{AvailabilityDb, VariableValuesDb};

pub const BASHCOMP_NAME: &str = "bash_completion";

fn scrape_flags(help_text: &str, pattern: &str) -> Vec<String> {
	let re = regex::Regex::new(pattern).expect("flag-scrape template is statically valid regex");
	let mut flags: Vec<String> = re.captures_iter(help_text).filter_map(|c| c.get(1).map(|m| m.as_str().to_string())).collect();
	flags.sort();
	flags.dedup();
	flags
}

/// Render the completion script content for `help_text` and the options
/// gathered this run. Mirrors `_write_bashcompletion_file`'s template.
pub fn render(help_text: &str, availability: &AvailabilityDb, variables: &VariableValuesDb) -> String {
	let short_flags = scrape_flags(help_text, r"\s(-\w+)");
	let long_flags = scrape_flags(help_text, r"\s(--[a-zA-Z\-]+)");
	let short_str = short_flags.iter().map(|f| format!("'{f}'")).collect::<Vec<_>>().join(" ");
	let long_str = long_flags.iter().map(|f| format!("'{f}'")).collect::<Vec<_>>().join(" ");

	let mut gathered_optns = String::new();
	let mut optns_with_settings = String::new();
	for (optn, settings) in availability.iter() {
		let escaped = optn.replace('$', r"\$");
		write!(gathered_optns, "\n                '{escaped}'").ok();
		let settings_str = settings.keys().map(|s| format!(" '{s}'")).collect::<String>();
		write!(
			optns_with_settings,
			"\n                {escaped})\n                    COMPREPLY=($(compgen -W \"{settings_str}\" -- ${{cur}}))\n                    ;;"
		)
		.ok();
	}
	for (optn, values) in variables.iter() {
		let escaped = optn.replace('$', r"\$");
		write!(gathered_optns, "\n                '{escaped}'").ok();
		let settings_str = values.keys().map(|s| format!(" '{s}'")).collect::<String>();
		write!(
			optns_with_settings,
			"\n                {escaped})\n                    COMPREPLY=($(compgen -W \"{settings_str}\" -- ${{cur}}))\n                    ;;"
		)
		.ok();
	}

	format!(
		r#"#!/bin/bash
# Auto-generated Bash completion settings for {BASENAME}
optRegex="\-[a-z], --[a-z]*"
_optionset()
{{
    local cur prev

    cur=${{COMP_WORDS[COMP_CWORD]}}
    prev=${{COMP_WORDS[COMP_CWORD-1]}}

    case ${{COMP_CWORD}} in
        1)
            COMPREPLY=($(compgen -W "
                {short_str}
                {long_str}{gathered_optns}
                " -- ${{cur}}))
            ;;
        2)
            case ${{prev}} in {optns_with_settings}
            esac
            ;;
        *)
            COMPREPLY=()
            ;;
    esac
}}
complete -F _optionset {BASENAME}
complete -F _optionset ./{BASENAME}
"#
	)
}
