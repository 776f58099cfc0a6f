//! Entity store for toplevels and outputs.
//!
//! Events for a single object arrive in order, but events for different
//! objects interleave arbitrarily, so attributes are buffered per entity and
//! only become part of the final snapshot when the object's terminal `done`
//! event commits it. The store is append-only while events are collected and
//! is frozen by moving it into [`crate::client::Snapshot`].

use tracing::warn;

/// Store key of a toplevel entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ToplevelId(usize);

/// Store key of an output entity.
///
/// Also attached to every bound `wl_output` proxy as its user data, so
/// membership events can be resolved back to the entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutputId(usize);

/// The four boolean toplevel states of the legacy protocol.
///
/// The server resends the complete current set on every state change, so
/// these are always replaced wholesale, never merged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateFlags {
    pub maximized: bool,
    pub minimized: bool,
    pub activated: bool,
    pub fullscreen: bool,
}

/// One open application window as reported by the compositor.
#[derive(Debug, Default)]
pub struct Toplevel {
    pub title: Option<String>,
    pub app_id: Option<String>,
    /// Stable identifier from the modern protocol. Set once; the compositor
    /// re-sending it with a different value is a protocol violation.
    pub identifier: Option<String>,
    pub state: StateFlags,
    /// Outputs this toplevel is visible on, in membership-event order.
    pub outputs: Vec<OutputId>,
    /// Whether the terminal `done` event has been seen. Guards against the
    /// same toplevel being listed twice when the server repeats `done`.
    committed: bool,
}

impl Toplevel {
    pub fn committed(&self) -> bool {
        self.committed
    }
}

/// One display output, or the synthetic bucket for toplevels that are not
/// on any output.
#[derive(Debug)]
pub struct Output {
    /// Numeric name of the global as assigned by the server. `None` only
    /// for the synthetic no-output bucket.
    pub global_name: Option<u32>,
    /// Human-readable name from `wl_output.name`. May never arrive.
    pub name: Option<String>,
    /// Member toplevels in commit/membership order.
    pub toplevels: Vec<ToplevelId>,
}

impl Output {
    /// Whether this is the synthetic no-output bucket.
    pub fn is_fallback(&self) -> bool {
        self.global_name.is_none()
    }
}

/// Owns all toplevel and output entities accumulated during a query.
#[derive(Debug, Default)]
pub struct EntityStore {
    toplevels: Vec<Toplevel>,
    outputs: Vec<OutputId>,
    entries: Vec<Output>,
    committed: Vec<ToplevelId>,
    fallback: Option<OutputId>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh, uncommitted toplevel record.
    pub fn insert_toplevel(&mut self) -> ToplevelId {
        let id = ToplevelId(self.toplevels.len());
        self.toplevels.push(Toplevel::default());
        id
    }

    pub fn toplevel(&self, id: ToplevelId) -> &Toplevel {
        &self.toplevels[id.0]
    }

    pub fn set_title(&mut self, id: ToplevelId, title: String) {
        self.toplevels[id.0].title = Some(title);
    }

    pub fn set_app_id(&mut self, id: ToplevelId, app_id: String) {
        self.toplevels[id.0].app_id = Some(app_id);
    }

    /// Set the stable identifier. Re-setting it is a protocol violation,
    /// which is tolerated: the new value wins.
    pub fn set_identifier(&mut self, id: ToplevelId, identifier: String) {
        let toplevel = &mut self.toplevels[id.0];
        if let Some(old) = &toplevel.identifier
            && *old != identifier
        {
            warn!(
                "Compositor changed the identifier of a toplevel from \
                 '{old}' to '{identifier}', which the protocol forbids"
            );
        }
        toplevel.identifier = Some(identifier);
    }

    /// Replace all four state flags with the server's current set.
    pub fn set_state(&mut self, id: ToplevelId, state: StateFlags) {
        self.toplevels[id.0].state = state;
    }

    /// Record that a toplevel is visible on an output.
    pub fn link_output(&mut self, toplevel: ToplevelId, output: OutputId) {
        self.toplevels[toplevel.0].outputs.push(output);
        self.entries[output.0].toplevels.push(toplevel);
    }

    /// Commit a toplevel on its terminal `done` event. Repeated commits are
    /// no-ops. A toplevel without any output membership is filed into the
    /// lazily created no-output bucket.
    pub fn commit(&mut self, id: ToplevelId) {
        if self.toplevels[id.0].committed {
            return;
        }
        self.toplevels[id.0].committed = true;
        self.committed.push(id);

        if self.toplevels[id.0].outputs.is_empty() {
            let fallback = self.fallback_output();
            self.link_output(id, fallback);
        }
    }

    fn fallback_output(&mut self) -> OutputId {
        match self.fallback {
            Some(id) => id,
            None => {
                let id = OutputId(self.entries.len());
                self.entries.push(Output {
                    global_name: None,
                    name: None,
                    toplevels: Vec::new(),
                });
                self.outputs.push(id);
                self.fallback = Some(id);
                id
            }
        }
    }

    /// Register an output advertised by the registry.
    pub fn register_output(&mut self, global_name: u32) -> OutputId {
        let id = OutputId(self.entries.len());
        self.entries.push(Output {
            global_name: Some(global_name),
            name: None,
            toplevels: Vec::new(),
        });
        self.outputs.push(id);
        id
    }

    /// Apply a `wl_output.name` event. May fire at any time, or never.
    pub fn set_output_name(&mut self, id: OutputId, name: String) {
        self.entries[id.0].name = Some(name);
    }

    pub fn output(&self, id: OutputId) -> &Output {
        &self.entries[id.0]
    }

    /// All outputs in registration order. The no-output bucket, if it was
    /// ever materialized, comes last since it is only created while
    /// toplevels commit, after registry enumeration is over.
    pub fn outputs(&self) -> impl Iterator<Item = (OutputId, &Output)> {
        self.outputs.iter().map(|&id| (id, &self.entries[id.0]))
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Committed toplevels in commit order.
    pub fn committed_toplevels(&self) -> impl Iterator<Item = &Toplevel> {
        self.committed.iter().map(|&id| &self.toplevels[id.0])
    }

    pub fn committed_count(&self) -> usize {
        self.committed.len()
    }
}
