//! JSON-RPC 2.0 bridge to the host page.
//!
//! In the WASM build the viewer runs inside an iframe and talks to its parent
//! window over `postMessage`. Natively the bridge still dispatches queued
//! messages but sends nothing out.
//!
//! ```text
//! Host page (parent)  <──postMessage──>  Viewer (iframe)
//!        │                                    │
//!        ├─ Request (with id) ──────────────> │
//!        │ <──────────────── Response (id) ───┤
//!        │ <────────── Notification (no id) ──┤
//! ```
//!
//! ## Requests
//!
//! - `zoom_in`, `zoom_out`, `reset_view`: viewport controls
//! - `select_point {id}`: toggle focus on a point, rejected for unknown ids
//! - `get_loading_progress`: chunk counters and completed fraction
//! - `get_selection`: selected id, zoom flag and title
//!
//! A request sent without an id still runs; it just gets no response.
//!
//! ## Notifications
//!
//! - `loading_progress` after chunks resolve
//! - `app_state_changed` on `Loading`, `Loaded` and `RenderReady`
//! - `selection_changed` when focus moves or clears
//! - `hover_changed` when the hovered point changes
//!
//! ## Error Codes
//!
//! - `-32601`: Method not found
//! - `-32602`: Invalid params

/// Message queue, method dispatch and postMessage transport.
pub mod web_rpc;
