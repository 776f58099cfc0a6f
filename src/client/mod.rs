//! Wayland client: connects, negotiates a listing protocol and collects a
//! one-shot snapshot of all toplevels.
//!
//! The query is a two-barrier handshake built on [`EventQueue::roundtrip`]:
//!
//! 1. The first roundtrip finishes registry enumeration. Outputs are bound
//!    while it runs; the toplevel protocol globals are only buffered.
//! 2. One listing protocol is bound, preferring the richer wlr manager.
//! 3. The second roundtrip flushes the initial event burst for every object
//!    that existed at bind time. After it the store is complete.
//!
//! Everything the compositor sends after the second barrier belongs to a
//! later point in time and is not part of the snapshot.

mod ext;
mod wlr;

use std::collections::HashMap;
use std::env;

use tracing::debug;
use wayland_client::backend::ObjectId;
use wayland_client::protocol::{wl_output, wl_registry};
use wayland_client::{Connection, Dispatch, EventQueue, QueueHandle};
use wayland_protocols::ext::foreign_toplevel_list::v1::client::ext_foreign_toplevel_handle_v1::ExtForeignToplevelHandleV1;
use wayland_protocols::ext::foreign_toplevel_list::v1::client::ext_foreign_toplevel_list_v1::ExtForeignToplevelListV1;
use wayland_protocols_wlr::foreign_toplevel::v1::client::zwlr_foreign_toplevel_handle_v1::ZwlrForeignToplevelHandleV1;
use wayland_protocols_wlr::foreign_toplevel::v1::client::zwlr_foreign_toplevel_manager_v1::ZwlrForeignToplevelManagerV1;

use crate::adapter::{Adapter, Capabilities, ProtocolKind};
use crate::error::QueryError;
use crate::store::{EntityStore, OutputId, ToplevelId};

/// Minimum and bound version of zwlr_foreign_toplevel_manager_v1.
pub const WLR_MANAGER_VERSION: u32 = 3;

/// Minimum and bound version of ext_foreign_toplevel_list_v1.
pub const EXT_LIST_VERSION: u32 = 1;

/// Minimum and bound version of wl_output. Version 4 carries the name event.
pub const WL_OUTPUT_VERSION: u32 = 4;

/// The finished, immutable result of a query.
pub struct Snapshot {
    pub store: EntityStore,
    pub protocol: ProtocolKind,
    pub capabilities: Capabilities,
}

/// Connect to the compositor named by `WAYLAND_DISPLAY` and collect a
/// snapshot of all toplevels.
pub fn capture() -> Result<Snapshot, QueryError> {
    // libwayland falls back to "wayland-0" when WAYLAND_DISPLAY is unset,
    // which is rarely the session the user meant. Require the variable.
    if env::var_os("WAYLAND_DISPLAY").is_none() {
        return Err(QueryError::DisplayNotSet);
    }

    let conn = Connection::connect_to_env()?;
    let display = conn.display();
    let mut queue = conn.new_event_queue();
    let qh = queue.handle();
    let registry = display.get_registry(&qh, ());

    let mut state = QueryState::default();
    let result = state.run(&mut queue, &registry, &qh);
    state.release();

    let adapter = result?;
    Ok(Snapshot {
        protocol: adapter.kind(),
        capabilities: adapter.capabilities(),
        store: state.store,
    })
}

/// Accumulated client state, threaded through every `Dispatch` impl.
#[derive(Default)]
pub struct QueryState {
    store: EntityStore,
    adapter: Option<Adapter>,
    /// Buffered registry advertisements of the two listing protocols,
    /// (numeric name, version) each.
    wlr_manager_global: Option<(u32, u32)>,
    ext_list_global: Option<(u32, u32)>,
    wlr_manager: Option<ZwlrForeignToplevelManagerV1>,
    ext_list: Option<ExtForeignToplevelListV1>,
    /// Proxy-to-entity mapping for live toplevel handles.
    toplevels: HashMap<ObjectId, ToplevelId>,
    wlr_handles: Vec<ZwlrForeignToplevelHandleV1>,
    ext_handles: Vec<ExtForeignToplevelHandleV1>,
    outputs: Vec<wl_output::WlOutput>,
    /// Fatal condition observed inside a dispatch, checked after the
    /// enclosing barrier.
    fatal: Option<QueryError>,
}

impl QueryState {
    fn run(
        &mut self,
        queue: &mut EventQueue<Self>,
        registry: &wl_registry::WlRegistry,
        qh: &QueueHandle<Self>,
    ) -> Result<Adapter, QueryError> {
        // First barrier: the registry has finished advertising globals and
        // every output is bound.
        queue.roundtrip(self)?;
        self.check_fatal()?;

        let adapter = self.bind_listing_protocol(registry, qh)?;

        // Second barrier: the server has delivered the complete initial
        // burst for every toplevel that existed at bind time, plus all
        // wl_output.name events.
        queue.roundtrip(self)?;
        self.check_fatal()?;

        Ok(adapter)
    }

    fn check_fatal(&mut self) -> Result<(), QueryError> {
        match self.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Pick and bind exactly one listing protocol.
    ///
    /// This must not run before registry enumeration is complete: binding a
    /// toplevel manager before the outputs makes the server silently omit
    /// output_enter events. See https://github.com/swaywm/wlroots/issues/1567
    fn bind_listing_protocol(
        &mut self,
        registry: &wl_registry::WlRegistry,
        qh: &QueueHandle<Self>,
    ) -> Result<Adapter, QueryError> {
        if let Some((name, version)) = self.wlr_manager_global {
            if version >= WLR_MANAGER_VERSION {
                let manager = registry.bind::<ZwlrForeignToplevelManagerV1, _, _>(
                    name,
                    WLR_MANAGER_VERSION,
                    qh,
                    (),
                );
                self.wlr_manager = Some(manager);
                let adapter = Adapter::new(ProtocolKind::WlrManagement);
                self.adapter = Some(adapter);
                debug!("Bound zwlr_foreign_toplevel_manager_v1 version {WLR_MANAGER_VERSION}");
                return Ok(adapter);
            }
            debug!(
                "zwlr_foreign_toplevel_manager_v1 version {version} is too old, \
                 falling back to ext-foreign-toplevel-list"
            );
        }

        if let Some((name, _)) = self.ext_list_global {
            let list =
                registry.bind::<ExtForeignToplevelListV1, _, _>(name, EXT_LIST_VERSION, qh, ());
            self.ext_list = Some(list);
            let adapter = Adapter::new(ProtocolKind::ExtList);
            self.adapter = Some(adapter);
            debug!("Bound ext_foreign_toplevel_list_v1 version {EXT_LIST_VERSION}");
            return Ok(adapter);
        }

        Err(QueryError::NoToplevelProtocol)
    }

    /// Destroy every protocol object we bound or received. Runs on the
    /// success path after the snapshot data is owned by the store, and on
    /// the abort path before the error propagates.
    fn release(&mut self) {
        for handle in self.wlr_handles.drain(..) {
            handle.destroy();
        }
        for handle in self.ext_handles.drain(..) {
            handle.destroy();
        }
        if let Some(manager) = self.wlr_manager.take() {
            manager.stop();
        }
        if let Some(list) = self.ext_list.take() {
            list.stop();
            list.destroy();
        }
        for output in self.outputs.drain(..) {
            output.release();
        }
    }
}

impl Dispatch<wl_registry::WlRegistry, ()> for QueryState {
    fn event(
        state: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_registry::Event::Global {
            name,
            interface,
            version,
        } = event
        {
            match interface.as_str() {
                "wl_output" => {
                    if version < WL_OUTPUT_VERSION {
                        if state.fatal.is_none() {
                            state.fatal = Some(QueryError::OutdatedOutput(version));
                        }
                        return;
                    }
                    let id = state.store.register_output(name);
                    let output =
                        registry.bind::<wl_output::WlOutput, _, _>(name, WL_OUTPUT_VERSION, qh, id);
                    state.outputs.push(output);
                }
                // Only buffered here; bound after enumeration finishes.
                "zwlr_foreign_toplevel_manager_v1" => {
                    state.wlr_manager_global = Some((name, version));
                }
                "ext_foreign_toplevel_list_v1" => {
                    state.ext_list_global = Some((name, version));
                }
                _ => {}
            }
        }
    }
}

impl Dispatch<wl_output::WlOutput, OutputId> for QueryState {
    fn event(
        state: &mut Self,
        _: &wl_output::WlOutput,
        event: wl_output::Event,
        data: &OutputId,
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_output::Event::Name { name } = event {
            state.store.set_output_name(*data, name);
        }
    }
}
