//! Human-readable output, the default format.
//!
//! One line per toplevel: the app-id in a left-aligned column sized to the
//! longest app-id, then the title. With the legacy protocol and more than
//! one output the toplevels are grouped under their outputs' headings
//! instead.

use std::borrow::Cow;
use std::io::{self, Write};

use crate::store::{EntityStore, Toplevel};

use super::{NULL_TEXT, quoted};

/// Upper bound for the app-id column so one pathological app-id does not
/// push every title off screen.
const APP_ID_COLUMN_MAX: usize = 40;

pub fn write_flat(out: &mut impl Write, store: &EntityStore) -> io::Result<()> {
    let width = app_id_column_width(store);
    for toplevel in store.committed_toplevels() {
        write_line(out, toplevel, width)?;
    }
    Ok(())
}

pub fn write_grouped(out: &mut impl Write, store: &EntityStore) -> io::Result<()> {
    let width = app_id_column_width(store);
    let mut first = true;
    for (_, output) in store.outputs() {
        if !first {
            writeln!(out)?;
        }
        first = false;

        match (&output.name, output.global_name) {
            (_, None) => writeln!(out, "Toplevels not on any output:")?,
            (Some(name), _) => writeln!(out, "{}:", display_text(Some(name)))?,
            (None, Some(global)) => writeln!(out, "Output {global} (global-name):")?,
        }

        if output.toplevels.is_empty() {
            writeln!(out, "[none]")?;
        }
        for &id in &output.toplevels {
            let toplevel = store.toplevel(id);
            if toplevel.committed() {
                write_line(out, toplevel, width)?;
            }
        }
    }
    Ok(())
}

fn write_line(out: &mut impl Write, toplevel: &Toplevel, width: usize) -> io::Result<()> {
    writeln!(
        out,
        "{:<width$}   {}",
        display_text(toplevel.app_id.as_deref()),
        display_text(toplevel.title.as_deref()),
    )
}

/// Width of the app-id column: the longest app-id in display form, capped.
fn app_id_column_width(store: &EntityStore) -> usize {
    store
        .committed_toplevels()
        .map(|t| display_text(t.app_id.as_deref()).chars().count())
        .max()
        .unwrap_or(0)
        .min(APP_ID_COLUMN_MAX)
}

/// Quote a value if printing it raw would be ambiguous.
fn display_text(value: Option<&str>) -> Cow<'_, str> {
    match value {
        None => Cow::Borrowed(NULL_TEXT),
        Some(text) if needs_quoting(text) => Cow::Owned(quoted(text)),
        Some(text) => Cow::Borrowed(text),
    }
}

fn needs_quoting(text: &str) -> bool {
    text.chars()
        .any(|c| c.is_whitespace() || c == '"' || c == '\'' || !c.is_ascii())
}
