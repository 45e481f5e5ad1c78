//! Game Shell - browser-side bootstrap for a WASM game runtime
//!
//! Core modules:
//! - `bootstrap`: engine startup rejection classification
//! - `mount`: canvas mount detection and loading-screen teardown
//! - `state`: in-memory snapshot buffer the engine writes into
//! - `store`: unload-time flush of the buffer into durable storage

pub mod bootstrap;
pub mod mount;
pub mod state;
pub mod store;

pub use state::{Snapshot, StateBuffer};

/// Shell configuration constants
pub mod consts {
    /// Message prefix the engine's init promise rejects with when it unwinds
    /// through its exception channel during a normal start. Not an error.
    pub const BENIGN_STARTUP_PREFIX: &str =
        "Using exceptions for control flow, don't mind me. This isn't actually an error!";

    /// DOM id of the loading placeholder shown until the engine mounts
    pub const LOADING_ELEMENT_ID: &str = "loading";

    /// Tag name of the element the engine renders into
    pub const SURFACE_TAG: &str = "canvas";

    /// Name the state write entry point is published under on `window`
    pub const STATE_ENTRY_POINT: &str = "buffer_game_state";
}
