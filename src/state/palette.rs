//! Round-robin color assignment.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::defaults::default_palette;

/// Hands out 256-color codes in order, wrapping around.
#[derive(Debug)]
pub struct Palette {
    colors: Vec<u8>,
    next: AtomicUsize,
}

impl Palette {
    /// Falls back to the built-in palette when `colors` is empty.
    pub fn new(colors: Vec<u8>) -> Self {
        let colors = if colors.is_empty() {
            default_palette()
        } else {
            colors
        };
        Self {
            colors,
            next: AtomicUsize::new(0),
        }
    }

    pub fn assign(&self) -> u8 {
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        self.colors[i % self.colors.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(default_palette())
    }
}
