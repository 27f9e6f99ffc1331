//! Status output on stderr.
//!
//! Results (assembled configurations, naming reports) go to stdout; these
//! helpers are for everything around them.

mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use messages::{success, warning};

static COLORS: AtomicBool = AtomicBool::new(true);

/// Decide once whether status messages are colored.
pub fn init_colors(no_color: bool) {
    COLORS.store(
        !no_color && crate::logger::should_use_colors(),
        Ordering::Relaxed,
    );
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}
