//! Pane texts and the edits gutter clicks perform on them

use anyhow::{Context, Result};
use chunklink_core::{ChangeRecord, ChunkEditor};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::info;

/// Text of one pane
#[derive(Debug, Clone)]
pub struct PaneText {
    /// File backing this pane, if any
    pub path: Option<PathBuf>,
    pub label: String,
    pub lines: Vec<String>,
    pub editable: bool,
    /// Edited since load or last save
    pub dirty: bool,
    /// Line terminator written back on save
    pub line_ending: &'static str,
    /// Whether the text ended with a line terminator
    pub final_newline: bool,
}

impl PaneText {
    pub fn from_text(label: &str, text: &str) -> Self {
        Self {
            path: None,
            label: label.to_string(),
            lines: text.lines().map(str::to_string).collect(),
            editable: true,
            dirty: false,
            line_ending: if text.contains("\r\n") { "\r\n" } else { "\n" },
            final_newline: text.is_empty() || text.ends_with('\n'),
        }
    }

    /// Text as it is written to disk
    pub fn contents(&self) -> String {
        let mut text = self.lines.join(self.line_ending);
        if self.final_newline && !self.lines.is_empty() {
            text.push_str(self.line_ending);
        }
        text
    }

    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        let mut pane = Self::from_text(&path.display().to_string(), &text);
        pane.path = Some(path.to_path_buf());
        Ok(pane)
    }

    fn clamp(&self, start: usize, end: usize) -> Range<usize> {
        let len = self.lines.len();
        start.min(len)..end.min(len).max(start.min(len))
    }
}

/// All panes of a comparison
#[derive(Debug, Clone)]
pub struct Document {
    pub panes: Vec<PaneText>,
}

impl Document {
    /// Load one pane per path; panes listed in `readonly` cannot be edited
    pub fn load(paths: &[PathBuf], readonly: &[usize]) -> Result<Self> {
        let mut panes = paths
            .iter()
            .map(|path| PaneText::load(path))
            .collect::<Result<Vec<_>>>()?;
        for (index, pane) in panes.iter_mut().enumerate() {
            pane.editable = !readonly.contains(&index);
        }
        info!(panes = panes.len(), "loaded document");
        Ok(Self { panes })
    }

    pub fn from_texts(texts: &[&str]) -> Self {
        let panes = texts
            .iter()
            .enumerate()
            .map(|(i, text)| PaneText::from_text(&format!("pane {}", i), text))
            .collect();
        Self { panes }
    }

    pub fn lines(&self) -> Vec<Vec<String>> {
        self.panes.iter().map(|p| p.lines.clone()).collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.panes.iter().any(|p| p.dirty)
    }

    /// Write every edited pane that has a backing file. Returns the number
    /// of files written.
    pub fn save(&mut self) -> Result<usize> {
        let mut written = 0;
        for pane in self.panes.iter_mut().filter(|p| p.dirty) {
            let Some(path) = &pane.path else {
                continue;
            };
            std::fs::write(path, pane.contents())
                .with_context(|| format!("Failed to write: {}", path.display()))?;
            info!(path = %path.display(), "saved pane");
            pane.dirty = false;
            written += 1;
        }
        Ok(written)
    }

    fn source_lines(&self, pane: usize, chunk: &ChangeRecord) -> Vec<String> {
        let Some(source) = self.panes.get(pane) else {
            return Vec::new();
        };
        source.lines[source.clamp(chunk.from_start, chunk.from_end)].to_vec()
    }

    fn splice(&mut self, pane: usize, start: usize, end: usize, lines: Vec<String>) {
        let Some(target) = self.panes.get_mut(pane) else {
            return;
        };
        let range = target.clamp(start, end);
        if range.is_empty() && lines.is_empty() {
            return;
        }
        target.lines.splice(range, lines);
        target.dirty = true;
    }
}

impl ChunkEditor for Document {
    fn delete_chunk(&mut self, pane: usize, chunk: &ChangeRecord) {
        self.splice(pane, chunk.from_start, chunk.from_end, Vec::new());
    }

    fn replace_chunk(&mut self, from_pane: usize, to_pane: usize, chunk: &ChangeRecord) {
        let lines = self.source_lines(from_pane, chunk);
        self.splice(to_pane, chunk.to_start, chunk.to_end, lines);
    }

    fn copy_chunk(&mut self, from_pane: usize, to_pane: usize, chunk: &ChangeRecord, copy_up: bool) {
        let lines = self.source_lines(from_pane, chunk);
        let at = if copy_up { chunk.to_start } else { chunk.to_end };
        self.splice(to_pane, at, at, lines);
    }
}
