//! NPC dialogue: reading dialogue files and revealing lines over time.
//!
//! This module provides:
//! - The dialogue file format (`{"dialogue": [{"speaker", "text": [..], "portrait"}]}`)
//! - Cached loading through [`lulu_core::Npc`]
//! - A dialogue box that types each line out at a fixed speed

use std::fs;
use std::path::{Path, PathBuf};

use lulu_core::{DialogueLine, Npc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Speaker used for lines that report a loading problem.
pub const SYSTEM_SPEAKER: &str = "System";

/// Characters revealed per second by default.
pub const DEFAULT_TEXT_SPEED: f32 = 30.0;

/// Error types for dialogue files.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// File not found
    #[error("Dialogue file not found: {0}")]
    NotFound(PathBuf),
    /// Failed to read file
    #[error("Failed to read dialogue file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse JSON
    #[error("Failed to parse dialogue JSON: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Result type for dialogue operations.
pub type DialogueResult<T> = Result<T, DialogueError>;

#[derive(Debug, Deserialize)]
struct DialogueFile {
    dialogue: Vec<DialogueEntry>,
}

#[derive(Debug, Deserialize)]
struct DialogueEntry {
    speaker: String,
    text: Vec<String>,
    #[serde(default)]
    portrait: String,
}

/// Reads a dialogue file, producing one line per text element.
pub fn read_dialogue(path: &Path) -> DialogueResult<Vec<DialogueLine>> {
    if !path.exists() {
        return Err(DialogueError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let file: DialogueFile = serde_json::from_str(&content)?;

    let lines = file
        .dialogue
        .into_iter()
        .flat_map(|entry| {
            let DialogueEntry {
                speaker,
                text,
                portrait,
            } = entry;
            text.into_iter()
                .map(move |t| DialogueLine::new(speaker.clone(), t, portrait.clone()))
        })
        .collect();
    Ok(lines)
}

/// Returns the NPC's dialogue, reading it from `root` on first use.
///
/// Problems never fail the conversation: a missing or malformed file
/// yields a single line from [`SYSTEM_SPEAKER`] describing what went wrong,
/// and that line is cached like any other dialogue.
pub fn load_dialogue<'a>(npc: &'a mut Npc, root: &Path) -> &'a [DialogueLine] {
    if npc.lines().is_none() {
        let path = root.join(&npc.dialogue);
        let lines = match read_dialogue(&path) {
            Ok(lines) => {
                debug!("Loaded {} dialogue lines for {}", lines.len(), npc.name);
                lines
            },
            Err(DialogueError::NotFound(path)) => {
                warn!("Dialogue for {} not found: {}", npc.name, path.display());
                vec![DialogueLine::new(
                    SYSTEM_SPEAKER,
                    format!("[Error: dialogue not found: {}]", npc.dialogue),
                    "",
                )]
            },
            Err(e) => {
                warn!("Dialogue for {} unreadable: {e}", npc.name);
                vec![DialogueLine::new(
                    SYSTEM_SPEAKER,
                    "[Error: invalid dialogue format]",
                    "",
                )]
            },
        };
        npc.set_lines(lines);
    }
    npc.lines().unwrap_or_default()
}

/// A conversation in progress, revealing text one character at a time.
#[derive(Debug, Clone)]
pub struct DialogueBox {
    speaker_name: String,
    lines: Vec<DialogueLine>,
    line: usize,
    active: bool,
    timer: f32,
    text_speed: f32,
    revealed: usize,
    complete: bool,
}

impl Default for DialogueBox {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogueBox {
    /// Creates an idle box.
    #[must_use]
    pub fn new() -> Self {
        Self {
            speaker_name: String::new(),
            lines: Vec::new(),
            line: 0,
            active: false,
            timer: 0.0,
            text_speed: DEFAULT_TEXT_SPEED,
            revealed: 0,
            complete: false,
        }
    }

    /// Changes how many characters appear per second.
    #[must_use]
    pub fn with_text_speed(mut self, chars_per_second: f32) -> Self {
        self.text_speed = chars_per_second.max(1.0);
        self
    }

    /// Starts a conversation with `npc`.
    pub fn start(&mut self, npc: &Npc, lines: &[DialogueLine]) {
        self.speaker_name.clone_from(&npc.name);
        self.lines = lines.to_vec();
        self.line = 0;
        self.active = true;
        self.restart_line();
        debug!("Dialogue with {} started ({} lines)", npc.name, lines.len());
    }

    /// Advances the typewriter by `delta` seconds.
    pub fn update(&mut self, delta: f32) {
        if self.complete || self.lines.is_empty() {
            return;
        }
        self.timer += delta;
        let target = (self.timer * self.text_speed) as usize;
        if target >= self.current_len() {
            self.complete_text();
        } else {
            self.revealed = target;
        }
    }

    /// Finishes the current line, moves to the next, or closes the box.
    pub fn advance(&mut self) {
        if !self.complete {
            self.complete_text();
        } else if self.has_more_lines() {
            self.line += 1;
            self.restart_line();
        } else {
            self.active = false;
        }
    }

    /// Shows the whole current line at once.
    pub fn complete_text(&mut self) {
        self.revealed = self.current_len();
        self.complete = true;
    }

    /// Closes the box and forgets the conversation.
    pub fn reset(&mut self) {
        *self = Self::new().with_text_speed(self.text_speed);
    }

    /// Returns `true` while a line is on screen.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active && self.line < self.lines.len()
    }

    /// Returns `true` if another line follows the current one.
    #[must_use]
    pub fn has_more_lines(&self) -> bool {
        self.line + 1 < self.lines.len()
    }

    /// Returns `true` once the current line is fully revealed.
    #[must_use]
    pub const fn is_text_complete(&self) -> bool {
        self.complete
    }

    /// Name of the NPC being talked to.
    #[must_use]
    pub fn npc_name(&self) -> &str {
        &self.speaker_name
    }

    /// Revealed part of the current line.
    #[must_use]
    pub fn current_text(&self) -> &str {
        self.lines.get(self.line).map_or("", |l| {
            let end = l
                .text
                .char_indices()
                .nth(self.revealed)
                .map_or(l.text.len(), |(i, _)| i);
            &l.text[..end]
        })
    }

    /// Speaker of the current line.
    #[must_use]
    pub fn current_speaker(&self) -> &str {
        self.lines.get(self.line).map_or("", |l| l.speaker.as_str())
    }

    /// Portrait of the current line.
    #[must_use]
    pub fn current_portrait(&self) -> &str {
        self.lines.get(self.line).map_or("", |l| l.portrait.as_str())
    }

    fn current_len(&self) -> usize {
        self.lines.get(self.line).map_or(0, |l| l.text.chars().count())
    }

    fn restart_line(&mut self) {
        self.revealed = 0;
        self.timer = 0.0;
        self.complete = false;
    }
}
