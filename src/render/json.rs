//! JSON output.
//!
//! The document declares up front which optional fields the negotiated
//! protocol can populate, then lists the toplevels. Optional fields the
//! protocol does not support are omitted from the toplevel objects rather
//! than reported with made-up values.

use std::io::{self, Write};

use serde_json::{Map, Value};

use crate::adapter::Capabilities;
use crate::store::EntityStore;

pub fn write(out: &mut impl Write, store: &EntityStore, caps: &Capabilities) -> io::Result<()> {
    let toplevels: Vec<Value> = store
        .committed_toplevels()
        .map(|toplevel| {
            let mut object = Map::new();
            object.insert("title".to_string(), text(&toplevel.title));
            object.insert("app-id".to_string(), text(&toplevel.app_id));
            if caps.identifier {
                object.insert("identifier".to_string(), text(&toplevel.identifier));
            }
            if caps.activated {
                object.insert("activated".to_string(), toplevel.state.activated.into());
            }
            if caps.fullscreen {
                object.insert("fullscreen".to_string(), toplevel.state.fullscreen.into());
            }
            if caps.minimized {
                object.insert("minimized".to_string(), toplevel.state.minimized.into());
            }
            if caps.maximized {
                object.insert("maximized".to_string(), toplevel.state.maximized.into());
            }
            Value::Object(object)
        })
        .collect();

    let document = serde_json::json!({
        "supported-data": caps,
        "toplevels": toplevels,
    });
    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out)
}

fn text(value: &Option<String>) -> Value {
    match value {
        Some(text) => Value::String(text.clone()),
        None => Value::Null,
    }
}
