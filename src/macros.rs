//! Small crate-wide logging macros.
//!
//! In the browser the messages go straight to `console.*`, everywhere else
//! they become `tracing` events so a headless host (or a test) can install
//! whatever subscriber it likes.
//!
//! ```rust,ignore
//! debug_log!("portal {} entered {:?}", id, state);
//! warn_log!("no app element configured");
//! ```

macro_rules! debug_log {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::console::log_1(&format!($($arg)*).into());
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::debug!($($arg)*);
        }
    }};
}

macro_rules! warn_log {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::console::warn_1(&format!($($arg)*).into());
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::warn!($($arg)*);
        }
    }};
}
