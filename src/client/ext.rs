//! Dispatch impls for ext-foreign-toplevel-list-v1, the modern listing
//! protocol. Leaner than the wlr manager: no states, no output membership,
//! but a stable identifier per toplevel.

use std::sync::Arc;

use wayland_client::{Connection, Dispatch, Proxy, QueueHandle};
use wayland_protocols::ext::foreign_toplevel_list::v1::client::ext_foreign_toplevel_handle_v1::{
    self, ExtForeignToplevelHandleV1,
};
use wayland_protocols::ext::foreign_toplevel_list::v1::client::ext_foreign_toplevel_list_v1::{
    self, ExtForeignToplevelListV1,
};

use super::QueryState;
use crate::adapter::ToplevelEvent;

impl Dispatch<ExtForeignToplevelListV1, ()> for QueryState {
    fn event(
        state: &mut Self,
        _: &ExtForeignToplevelListV1,
        event: ext_foreign_toplevel_list_v1::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            ext_foreign_toplevel_list_v1::Event::Toplevel { toplevel } => {
                if let Some(adapter) = state.adapter {
                    let id = adapter.new_toplevel(&mut state.store);
                    state.toplevels.insert(toplevel.id(), id);
                }
                state.ext_handles.push(toplevel);
            }
            ext_foreign_toplevel_list_v1::Event::Finished => {}
            _ => {}
        }
    }

    fn event_created_child(
        opcode: u16,
        qhandle: &QueueHandle<Self>,
    ) -> Arc<dyn wayland_client::backend::ObjectData> {
        match opcode {
            ext_foreign_toplevel_list_v1::EVT_TOPLEVEL_OPCODE => {
                qhandle.make_data::<ExtForeignToplevelHandleV1, _>(())
            }
            _ => panic!("Unknown opcode {} for ext_foreign_toplevel_list_v1", opcode),
        }
    }
}

impl Dispatch<ExtForeignToplevelHandleV1, ()> for QueryState {
    fn event(
        state: &mut Self,
        handle: &ExtForeignToplevelHandleV1,
        event: ext_foreign_toplevel_handle_v1::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        use ext_foreign_toplevel_handle_v1::Event;

        let Some(&id) = state.toplevels.get(&handle.id()) else {
            return;
        };

        let event = match event {
            Event::Title { title } => ToplevelEvent::Title(title),
            Event::AppId { app_id } => ToplevelEvent::AppId(app_id),
            Event::Identifier { identifier } => ToplevelEvent::Identifier(identifier),
            Event::Done => ToplevelEvent::Done,
            _ => return,
        };

        if let Some(adapter) = state.adapter {
            adapter.apply(&mut state.store, id, event);
        }
    }
}
