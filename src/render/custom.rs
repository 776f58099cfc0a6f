//! User-defined delimiter-separated output.
//!
//! Values are printed raw: no quoting, no escaping. Consumers picking a
//! delimiter that can occur inside titles get to keep the pieces. Fields
//! the active protocol cannot populate print a fixed sentinel so every row
//! has the same column count.

use std::io::{self, Write};

use crate::adapter::Capabilities;
use crate::format::{CustomFormat, Field};
use crate::store::{EntityStore, Toplevel};

use super::{NULL_TEXT, UNSUPPORTED_TEXT, bool_text};

pub fn write(
    out: &mut impl Write,
    store: &EntityStore,
    caps: &Capabilities,
    format: &CustomFormat,
) -> io::Result<()> {
    for toplevel in store.committed_toplevels() {
        let mut first = true;
        for &field in &format.fields {
            if !first {
                write!(out, "{}", format.delimiter)?;
            }
            first = false;
            write!(out, "{}", field_text(toplevel, field, caps))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn field_text<'a>(toplevel: &'a Toplevel, field: Field, caps: &Capabilities) -> &'a str {
    if !caps.supports(field) {
        return UNSUPPORTED_TEXT;
    }
    match field {
        Field::Title => toplevel.title.as_deref().unwrap_or(NULL_TEXT),
        Field::AppId => toplevel.app_id.as_deref().unwrap_or(NULL_TEXT),
        Field::Identifier => toplevel.identifier.as_deref().unwrap_or(NULL_TEXT),
        Field::Activated => bool_text(toplevel.state.activated),
        Field::Fullscreen => bool_text(toplevel.state.fullscreen),
        Field::Minimized => bool_text(toplevel.state.minimized),
        Field::Maximized => bool_text(toplevel.state.maximized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ProtocolKind;
    use crate::store::StateFlags;

    fn render(store: &EntityStore, caps: &Capabilities, spec: &str) -> String {
        let format = CustomFormat::parse(spec).unwrap();
        let mut out = Vec::new();
        write(&mut out, store, caps, &format).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn legacy_caps() -> Capabilities {
        Capabilities::for_protocol(ProtocolKind::WlrManagement)
    }

    #[test]
    fn test_activated_and_app_id() {
        let mut store = EntityStore::new();
        let id = store.insert_toplevel();
        store.set_app_id(id, "editor.App".to_string());
        store.set_state(
            id,
            StateFlags {
                activated: true,
                ..Default::default()
            },
        );
        store.commit(id);
        assert_eq!(render(&store, &legacy_caps(), ",Aa"), "true,editor.App\n");
    }

    #[test]
    fn test_values_are_never_quoted() {
        let mut store = EntityStore::new();
        let id = store.insert_toplevel();
        store.set_title(id, "has \"quotes\" and spaces".to_string());
        store.commit(id);
        assert_eq!(
            render(&store, &legacy_caps(), "|t"),
            "has \"quotes\" and spaces\n"
        );
    }

    #[test]
    fn test_unsupported_fields_keep_column_count() {
        let mut store = EntityStore::new();
        let id = store.insert_toplevel();
        store.set_title(id, "T".to_string());
        store.set_identifier(id, "win-1".to_string());
        store.commit(id);

        let caps = Capabilities::for_protocol(ProtocolKind::ExtList);
        assert_eq!(render(&store, &caps, ",tAi"), "T,<unsupported>,win-1\n");
        // Identifier is the legacy protocol's blind spot.
        assert_eq!(render(&store, &legacy_caps(), ",ti"), "T,<unsupported>\n");
    }

    #[test]
    fn test_missing_text_uses_placeholder() {
        let mut store = EntityStore::new();
        let id = store.insert_toplevel();
        store.commit(id);
        assert_eq!(render(&store, &legacy_caps(), ";ta"), "<NULL>;<NULL>\n");
    }

    #[test]
    fn test_one_row_per_toplevel() {
        let mut store = EntityStore::new();
        for title in ["A", "B", "C"] {
            let id = store.insert_toplevel();
            store.set_title(id, title.to_string());
            store.commit(id);
        }
        assert_eq!(render(&store, &legacy_caps(), ",t"), "A\nB\nC\n");
    }
}
