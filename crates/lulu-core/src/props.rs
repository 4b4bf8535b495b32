//! Non-moving gameplay actors: doors and NPCs.

use lulu_common::Vec2;
use serde::{Deserialize, Serialize};

/// Scene exit. Doors never block movement; stage glue watches the player's
/// collision list for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    /// Scene file to load when the player walks through
    pub destination: String,
    /// Where the player appears in the destination scene
    pub spawn: Vec2,
    /// Whether the destination plays different music
    #[serde(default)]
    pub change_music: bool,
}

impl Door {
    /// Creates a door.
    #[must_use]
    pub fn new(destination: impl Into<String>, spawn: Vec2, change_music: bool) -> Self {
        Self {
            destination: destination.into(),
            spawn,
            change_music,
        }
    }
}

/// One line of speech.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Who is talking
    pub speaker: String,
    /// What they say
    pub text: String,
    /// Portrait sprite (may be empty)
    #[serde(default)]
    pub portrait: String,
}

impl DialogueLine {
    /// Creates a line.
    #[must_use]
    pub fn new(
        speaker: impl Into<String>,
        text: impl Into<String>,
        portrait: impl Into<String>,
    ) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            portrait: portrait.into(),
        }
    }
}

/// A character the player can talk to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Npc {
    /// Display name
    pub name: String,
    /// Path of the dialogue file
    pub dialogue: String,
    lines: Option<Vec<DialogueLine>>,
}

impl Npc {
    /// Creates an NPC whose dialogue has not been read yet.
    #[must_use]
    pub fn new(name: impl Into<String>, dialogue: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dialogue: dialogue.into(),
            lines: None,
        }
    }

    /// Dialogue lines, once loaded.
    #[must_use]
    pub fn lines(&self) -> Option<&[DialogueLine]> {
        self.lines.as_deref()
    }

    /// Stores loaded dialogue.
    pub fn set_lines(&mut self, lines: Vec<DialogueLine>) {
        self.lines = Some(lines);
    }

    /// Forgets loaded dialogue so the next talk reads the file again.
    pub fn clear_lines(&mut self) {
        self.lines = None;
    }
}
