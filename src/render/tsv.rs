//! Tab-separated output with a fixed column set.
//!
//! Columns: title, app-id, identifier, maximized, minimized, activated,
//! fullscreen, outputs. Text columns are always quoted so tabs and
//! newlines inside titles cannot break the row structure; fields the
//! active protocol cannot populate print the unsupported sentinel.

use std::io::{self, Write};

use crate::adapter::Capabilities;
use crate::store::{EntityStore, Output, Toplevel};

use super::{NULL_TEXT, UNSUPPORTED_TEXT, bool_text, quoted};

pub fn write(out: &mut impl Write, store: &EntityStore, caps: &Capabilities) -> io::Result<()> {
    for toplevel in store.committed_toplevels() {
        let columns = [
            quoted_text(&toplevel.title),
            quoted_text(&toplevel.app_id),
            if caps.identifier {
                quoted_text(&toplevel.identifier)
            } else {
                UNSUPPORTED_TEXT.to_string()
            },
            state_text(caps.maximized, toplevel.state.maximized),
            state_text(caps.minimized, toplevel.state.minimized),
            state_text(caps.activated, toplevel.state.activated),
            state_text(caps.fullscreen, toplevel.state.fullscreen),
            outputs_text(store, toplevel),
        ];
        writeln!(out, "{}", columns.join("\t"))?;
    }
    Ok(())
}

fn quoted_text(value: &Option<String>) -> String {
    quoted(value.as_deref().unwrap_or(NULL_TEXT))
}

fn state_text(supported: bool, value: bool) -> String {
    if supported {
        bool_text(value).to_string()
    } else {
        UNSUPPORTED_TEXT.to_string()
    }
}

/// Comma-joined labels of the outputs a toplevel is on, or `none` for the
/// no-output bucket.
fn outputs_text(store: &EntityStore, toplevel: &Toplevel) -> String {
    if toplevel.outputs.is_empty() {
        return "none".to_string();
    }
    let labels: Vec<String> = toplevel
        .outputs
        .iter()
        .map(|&id| output_label(store.output(id)))
        .collect();
    labels.join(",")
}

fn output_label(output: &Output) -> String {
    match (&output.name, output.global_name) {
        (Some(name), _) => quoted(name),
        (None, Some(global)) => quoted(&global.to_string()),
        (None, None) => "none".to_string(),
    }
}
