//! Platform abstraction layer
//!
//! The browser drives frames with `requestAnimationFrame` (see `main.rs`).
//! Natively there is no display refresh, so a ticker thread stands in for it.

#[cfg(not(target_arch = "wasm32"))]
mod ticker;

#[cfg(not(target_arch = "wasm32"))]
pub use ticker::FrameTicker;

/// Seed from wall-clock time when settings don't pin one
#[cfg(target_arch = "wasm32")]
pub fn time_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
