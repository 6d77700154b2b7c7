//! chunklink-core - chunk actions and link maps for side-by-side diff views
//!
//! Given the chunks of a two- or three-pane comparison, this crate decides
//! which action a gutter click performs and how matching regions of two
//! panes are connected on screen. Text storage, editing and drawing stay
//! with the caller, reached through the [`DiffSource`], [`PaneView`] and
//! [`ChunkEditor`] traits.

pub mod action;
pub mod chunk;
pub mod color;
pub mod differ;
pub mod gutter;
pub mod linkmap;
pub mod pane;

pub use action::{classify, Action, ActionIcon, Direction, Mode, TextDirection};
pub use chunk::{ChangeKind, ChangeRecord, ChunkLocation, PairedChange};
pub use color::{ColorError, ColorScheme, Rgba};
pub use differ::{DiffChunk, DiffError, DiffSource, LineDiffer};
pub use gutter::{Activation, ChunkActionGutter, ChunkEditor, CopyPlacement};
pub use linkmap::{
    map_regions, Canvas, ChunkNavigator, Connector, ConnectorShape, LinkMap, LinkMapFrame,
    PathCommand, ScrollDirection, ScrollLinkMap,
};
pub use pane::{PaneView, UniformPane, VisibleRect};
