//! View rendering modules

mod linkmap;
mod pane;

pub use linkmap::render_link_map;
pub use pane::{render_gutter, render_pane, render_pane_title};

#[cfg(test)]
mod tests;
