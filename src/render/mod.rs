//! Renderers for the finalized snapshot.
//!
//! All renderers consume the snapshot read-only and write to a generic
//! writer, so tests drive them with in-memory buffers. Committed order is
//! preserved in every format.

mod custom;
mod human;
mod json;
mod tsv;

use std::io::{self, Write};

use crate::adapter::ProtocolKind;
use crate::client::Snapshot;
use crate::format::CustomFormat;

/// Placeholder for a text attribute the compositor never sent.
pub(crate) const NULL_TEXT: &str = "<NULL>";

/// Placeholder for a field the active protocol cannot populate. Printed
/// instead of omitting the field so the column count stays constant.
pub(crate) const UNSUPPORTED_TEXT: &str = "<unsupported>";

/// The output format selected on the command line.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputMode {
    Human,
    Tsv,
    Json,
    Custom(CustomFormat),
}

/// Render the snapshot to `out` in the selected format.
pub fn write_snapshot(
    out: &mut impl Write,
    snapshot: &Snapshot,
    mode: &OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Human => {
            // Grouping by output only makes sense when the protocol
            // reports memberships and there is more than one group.
            if snapshot.protocol == ProtocolKind::WlrManagement
                && snapshot.store.output_count() > 1
            {
                human::write_grouped(out, &snapshot.store)
            } else {
                human::write_flat(out, &snapshot.store)
            }
        }
        OutputMode::Json => json::write(out, &snapshot.store, &snapshot.capabilities),
        OutputMode::Tsv => tsv::write(out, &snapshot.store, &snapshot.capabilities),
        OutputMode::Custom(format) => {
            custom::write(out, &snapshot.store, &snapshot.capabilities, format)
        }
    }
}

pub(crate) fn bool_text(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Wrap a string in double quotes, backslash-escaping embedded quotes and
/// backslashes so the result parses back to the original.
pub(crate) fn quoted(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('"');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::Capabilities;
    use crate::store::{EntityStore, StateFlags};

    fn snapshot(store: EntityStore, protocol: ProtocolKind) -> Snapshot {
        Snapshot {
            capabilities: Capabilities::for_protocol(protocol),
            protocol,
            store,
        }
    }

    fn render(snapshot: &Snapshot, mode: &OutputMode) -> String {
        let mut out = Vec::new();
        write_snapshot(&mut out, snapshot, mode).unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Legacy server, one output "eDP-1", one activated toplevel.
    fn single_output_store() -> EntityStore {
        let mut store = EntityStore::new();
        let output = store.register_output(1);
        store.set_output_name(output, "eDP-1".to_string());
        let id = store.insert_toplevel();
        store.set_title(id, "Editor".to_string());
        store.set_app_id(id, "editor.App".to_string());
        store.set_state(
            id,
            StateFlags {
                activated: true,
                ..Default::default()
            },
        );
        store.link_output(id, output);
        store.commit(id);
        store
    }

    #[test]
    fn test_single_output_human_is_flat() {
        let snapshot = snapshot(single_output_store(), ProtocolKind::WlrManagement);
        assert_eq!(render(&snapshot, &OutputMode::Human), "editor.App   Editor\n");
    }

    #[test]
    fn test_custom_format_scenario() {
        let snapshot = snapshot(single_output_store(), ProtocolKind::WlrManagement);
        let mode = OutputMode::Custom(CustomFormat::parse(",Aa").unwrap());
        assert_eq!(render(&snapshot, &mode), "true,editor.App\n");
    }

    #[test]
    fn test_duplicate_done_renders_once() {
        let mut store = EntityStore::new();
        let id = store.insert_toplevel();
        store.set_title(id, "Editor".to_string());
        store.set_app_id(id, "editor.App".to_string());
        store.commit(id);
        store.commit(id);
        let snapshot = snapshot(store, ProtocolKind::WlrManagement);
        let rendered = render(&snapshot, &OutputMode::Human);
        assert_eq!(rendered.lines().count(), 1);
    }

    #[test]
    fn test_quoted_round_trips() {
        for input in ["plain", "with \"quotes\"", "back\\slash", "tab\there", "nl\nthere"] {
            let escaped = quoted(input);
            // Conforming decoder: strip delimiters, unescape backslash pairs.
            let inner = escaped.strip_prefix('"').unwrap().strip_suffix('"').unwrap();
            let mut decoded = String::new();
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    decoded.push(chars.next().unwrap());
                } else {
                    decoded.push(c);
                }
            }
            assert_eq!(decoded, input);
        }
    }
}
