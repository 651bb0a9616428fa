//! Branch color allocation.

use crate::graph::types::Color;

/// Hands out palette colors round-robin, one per new branch.
///
/// Each graph owns its allocator, so two graphs in one process do not
/// influence each other's colors.
#[derive(Debug, Clone)]
pub struct ColorAllocator {
    palette: Vec<Color>,
    next: usize,
}

impl ColorAllocator {
    /// fallback when a configuration supplies an empty palette
    const FALLBACK: &'static str = "#A081EF";

    pub fn new(palette: &[String]) -> Self {
        let mut palette: Vec<Color> = palette.iter().map(Color::new).collect();
        if palette.is_empty() {
            palette.push(Color::new(Self::FALLBACK));
        }
        Self { palette, next: 0 }
    }

    pub fn next_color(&mut self) -> Color {
        let color = self.palette[self.next % self.palette.len()].clone();
        self.next += 1;
        color
    }
}
