//! Domain-specific error types for zwt.

use thiserror::Error;
use wayland_client::{ConnectError, DispatchError};

use crate::client::{EXT_LIST_VERSION, WLR_MANAGER_VERSION, WL_OUTPUT_VERSION};

/// Errors in the custom format string passed via `--custom`.
///
/// All of these are detected before any connection to the compositor
/// is opened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The format string was empty.
    #[error("Custom format is empty")]
    Empty,

    /// The first character of the format string must be an ASCII delimiter.
    #[error("Custom format delimiter '{0}' is not an ASCII character")]
    NonAsciiDelimiter(char),

    /// The format string contained a delimiter but no field codes.
    #[error("Custom format does not request any fields")]
    NoFields,

    /// An unknown field code was found in the format string.
    #[error("Unknown field code '{0}' in custom format")]
    UnknownField(char),
}

/// Errors while querying the compositor for the toplevel snapshot.
#[derive(Error, Debug)]
pub enum QueryError {
    /// `WAYLAND_DISPLAY` is not set. libwayland would fall back to
    /// "wayland-0" here, which is rarely what the user wants, so we
    /// refuse up front.
    #[error("WAYLAND_DISPLAY is not set")]
    DisplayNotSet,

    /// Failed to connect to the Wayland display.
    #[error("Can not connect to Wayland display: {0}")]
    Connect(#[from] ConnectError),

    /// The connection failed while dispatching events.
    #[error("Lost connection to Wayland display: {0}")]
    Dispatch(#[from] DispatchError),

    /// The compositor advertises neither toplevel listing protocol at a
    /// usable version.
    #[error(
        "Compositor supports neither zwlr-foreign-toplevel-management-unstable-v1 \
         version {WLR_MANAGER_VERSION} nor ext-foreign-toplevel-list-v1 \
         version {EXT_LIST_VERSION}"
    )]
    NoToplevelProtocol,

    /// The compositor advertises an outdated wl_output version. Version 4
    /// is needed for the name event.
    #[error(
        "Compositor advertises wl_output version {0}, \
         but version {WL_OUTPUT_VERSION} is required"
    )]
    OutdatedOutput(u32),
}
