//! Plain-text rendering of the picker state.

use std::io::{self, Write};

use unipick_picker::{AssetRef, Entity, PickerError, PickerState};

const LOGO_UNAVAILABLE: &str = "Logo not available";

/// Writes the result list, status and selection card.
pub fn write_state(out: &mut impl Write, state: &PickerState, limit: usize) -> io::Result<()> {
	writeln!(out)?;
	if state.loading() {
		writeln!(out, "searching...")?;
	}
	if let Some(err) = state.error() {
		writeln!(out, "error: {err}")?;
	}

	let entities = state.entities();
	if entities.is_empty() && !state.loading() {
		writeln!(out, "no matches")?;
	}
	for (idx, entity) in entities.iter().take(limit).enumerate() {
		writeln!(out, "{:>3}. {}", idx + 1, label(entity))?;
	}
	if entities.len() > limit {
		writeln!(out, "     ... and {} more", entities.len() - limit)?;
	}

	if let Some(selected) = state.selection() {
		writeln!(out, "selected: {}", label(selected))?;
		writeln!(out, "    logo: {}", logo_line(state, selected))?;
	}
	out.flush()
}

fn label(entity: &Entity) -> String {
	match &entity.country {
		Some(country) => format!("{} ({country})", entity.display_name),
		None => entity.display_name.clone(),
	}
}

fn logo_line<'a>(state: &'a PickerState, selected: &Entity) -> &'a str {
	match state.asset() {
		Some(AssetRef::Resolved(locator)) => locator,
		Some(AssetRef::Absent) => LOGO_UNAVAILABLE,
		None if selected.lookup_key().is_none() => LOGO_UNAVAILABLE,
		None => match state.error() {
			Some(PickerError::AssetLookupFailed { key, .. }) if selected.lookup_key() == Some(key.as_str()) => LOGO_UNAVAILABLE,
			_ => "loading...",
		},
	}
}
