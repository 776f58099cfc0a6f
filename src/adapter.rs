//! Protocol-agnostic adapter between raw listing-protocol events and the
//! entity store.
//!
//! The two supported protocols produce different subsets of the same
//! per-object event stream. The client's `Dispatch` impls translate raw
//! Wayland events into [`ToplevelEvent`] messages and feed them through a
//! single [`Adapter`], so the store never learns which protocol is active
//! and the whole event path can be driven by a synthetic feed in tests.

use serde::Serialize;

use crate::format::Field;
use crate::store::{EntityStore, OutputId, StateFlags, ToplevelId};

/// Which toplevel listing protocol was negotiated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtocolKind {
    /// zwlr-foreign-toplevel-management-unstable-v1. Richer: state flags
    /// and output membership, but no stable identifier.
    WlrManagement,
    /// ext-foreign-toplevel-list-v1. Lean: stable identifier only.
    ExtList,
}

/// Which optional toplevel attributes the active protocol can populate.
///
/// Fixed after negotiation. Only consulted by the renderers; the state
/// machine itself never branches on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Capabilities {
    pub identifier: bool,
    pub activated: bool,
    pub fullscreen: bool,
    pub minimized: bool,
    pub maximized: bool,
}

impl Capabilities {
    pub fn for_protocol(kind: ProtocolKind) -> Self {
        match kind {
            ProtocolKind::WlrManagement => Self {
                identifier: false,
                activated: true,
                fullscreen: true,
                minimized: true,
                maximized: true,
            },
            ProtocolKind::ExtList => Self {
                identifier: true,
                activated: false,
                fullscreen: false,
                minimized: false,
                maximized: false,
            },
        }
    }

    pub fn supports(&self, field: Field) -> bool {
        match field {
            Field::Title | Field::AppId => true,
            Field::Identifier => self.identifier,
            Field::Activated => self.activated,
            Field::Fullscreen => self.fullscreen,
            Field::Minimized => self.minimized,
            Field::Maximized => self.maximized,
        }
    }
}

/// A typed per-toplevel event, decoupled from the wire protocol.
///
/// Attribute events may arrive zero or many times per object and in any
/// order; only `Done` makes the accumulated record final.
#[derive(Clone, Debug, PartialEq)]
pub enum ToplevelEvent {
    Title(String),
    AppId(String),
    Identifier(String),
    /// Membership in an already-resolved output. Legacy protocol only.
    OutputEnter(OutputId),
    /// The complete current state set. Legacy protocol only.
    State(StateFlags),
    /// Terminal event: commit the record.
    Done,
}

/// Applies toplevel events to the store for the negotiated protocol.
#[derive(Clone, Copy, Debug)]
pub struct Adapter {
    kind: ProtocolKind,
}

impl Adapter {
    pub fn new(kind: ProtocolKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ProtocolKind {
        self.kind
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_protocol(self.kind)
    }

    /// Allocate the store record for a newly announced toplevel.
    pub fn new_toplevel(&self, store: &mut EntityStore) -> ToplevelId {
        store.insert_toplevel()
    }

    /// Apply one event to the store.
    pub fn apply(&self, store: &mut EntityStore, id: ToplevelId, event: ToplevelEvent) {
        match event {
            ToplevelEvent::Title(title) => store.set_title(id, title),
            ToplevelEvent::AppId(app_id) => store.set_app_id(id, app_id),
            ToplevelEvent::Identifier(identifier) => store.set_identifier(id, identifier),
            ToplevelEvent::OutputEnter(output) => store.link_output(id, output),
            ToplevelEvent::State(state) => store.set_state(id, state),
            ToplevelEvent::Done => store.commit(id),
        }
    }
}
