//! Dispatch impls for zwlr-foreign-toplevel-management-unstable-v1, the
//! legacy listing protocol. Raw events are translated into
//! [`ToplevelEvent`] messages for the active adapter.

use std::sync::Arc;

use tracing::warn;
use wayland_client::{Connection, Dispatch, Proxy, QueueHandle};
use wayland_protocols_wlr::foreign_toplevel::v1::client::zwlr_foreign_toplevel_handle_v1::{
    self, ZwlrForeignToplevelHandleV1,
};
use wayland_protocols_wlr::foreign_toplevel::v1::client::zwlr_foreign_toplevel_manager_v1::{
    self, ZwlrForeignToplevelManagerV1,
};

use super::QueryState;
use crate::adapter::ToplevelEvent;
use crate::store::{OutputId, StateFlags};

impl Dispatch<ZwlrForeignToplevelManagerV1, ()> for QueryState {
    fn event(
        state: &mut Self,
        _: &ZwlrForeignToplevelManagerV1,
        event: zwlr_foreign_toplevel_manager_v1::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            zwlr_foreign_toplevel_manager_v1::Event::Toplevel { toplevel } => {
                if let Some(adapter) = state.adapter {
                    let id = adapter.new_toplevel(&mut state.store);
                    state.toplevels.insert(toplevel.id(), id);
                }
                state.wlr_handles.push(toplevel);
            }
            zwlr_foreign_toplevel_manager_v1::Event::Finished => {}
            _ => {}
        }
    }

    fn event_created_child(
        opcode: u16,
        qhandle: &QueueHandle<Self>,
    ) -> Arc<dyn wayland_client::backend::ObjectData> {
        match opcode {
            zwlr_foreign_toplevel_manager_v1::EVT_TOPLEVEL_OPCODE => {
                qhandle.make_data::<ZwlrForeignToplevelHandleV1, _>(())
            }
            _ => panic!(
                "Unknown opcode {} for zwlr_foreign_toplevel_manager_v1",
                opcode
            ),
        }
    }
}

impl Dispatch<ZwlrForeignToplevelHandleV1, ()> for QueryState {
    fn event(
        state: &mut Self,
        handle: &ZwlrForeignToplevelHandleV1,
        event: zwlr_foreign_toplevel_handle_v1::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        use zwlr_foreign_toplevel_handle_v1::Event;

        let Some(&id) = state.toplevels.get(&handle.id()) else {
            return;
        };

        let event = match event {
            Event::Title { title } => ToplevelEvent::Title(title),
            Event::AppId { app_id } => ToplevelEvent::AppId(app_id),
            Event::OutputEnter { output } => match output.data::<OutputId>() {
                Some(&output) => ToplevelEvent::OutputEnter(output),
                None => {
                    // Protocol anomaly: the output was never advertised.
                    // Drop the membership, keep the toplevel.
                    warn!("Toplevel reports membership in an unadvertised output");
                    return;
                }
            },
            Event::State { state: wire } => ToplevelEvent::State(state_from_wire(&wire)),
            Event::Done => ToplevelEvent::Done,
            // output_leave, closed and parent carry no information a
            // one-shot snapshot can use.
            _ => return,
        };

        if let Some(adapter) = state.adapter {
            adapter.apply(&mut state.store, id, event);
        }
    }
}

/// Decode the wl_array payload of a state event: native-endian u32 entries,
/// one per active state. Unknown entries from newer protocol revisions are
/// skipped.
fn state_from_wire(wire: &[u8]) -> StateFlags {
    use zwlr_foreign_toplevel_handle_v1::State;

    let mut flags = StateFlags::default();
    for chunk in wire.chunks_exact(4) {
        let Ok(bytes) = <[u8; 4]>::try_from(chunk) else {
            continue;
        };
        match State::try_from(u32::from_ne_bytes(bytes)) {
            Ok(State::Maximized) => flags.maximized = true,
            Ok(State::Minimized) => flags.minimized = true,
            Ok(State::Activated) => flags.activated = true,
            Ok(State::Fullscreen) => flags.fullscreen = true,
            Ok(_) | Err(_) => {}
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    #[test]
    fn test_state_from_wire() {
        // 0 = maximized, 2 = activated per the protocol enum.
        let flags = state_from_wire(&wire(&[0, 2]));
        assert!(flags.maximized);
        assert!(flags.activated);
        assert!(!flags.minimized);
        assert!(!flags.fullscreen);
    }

    #[test]
    fn test_state_from_wire_skips_unknown_values() {
        let flags = state_from_wire(&wire(&[99, 3]));
        assert!(flags.fullscreen);
        assert!(!flags.maximized);
    }

    #[test]
    fn test_state_from_empty_wire_clears_everything() {
        assert_eq!(state_from_wire(&[]), StateFlags::default());
    }
}
