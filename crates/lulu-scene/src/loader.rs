//! Scene loading.
//!
//! This module provides:
//! - The scene document format (`{"arena": {...}}`)
//! - Validation of scene and character files on load
//! - A loader that builds a populated [`Arena`] and caches character files
//!
//! Paths inside scene documents (door destinations, character configs,
//! dialogue files, sprites) are relative to the loader's asset root.

use std::fs;
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use lulu_common::{EntityId, Rect, Vec2};
use lulu_core::{Actor, Arena, ArenaError, AssetMetrics, Direction, Door, Npc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::character::{CharacterDef, CharacterKind, SizeDef};
use crate::config::{GameConfig, PlayerConfig};

/// Errors that can occur during scene loading.
#[derive(Debug, Error)]
pub enum SceneError {
    /// File not found.
    #[error("Scene file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read scene file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse JSON.
    #[error("Failed to parse scene JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Validation error.
    #[error("Scene validation error: {0}")]
    ValidationError(String),

    /// Two doors cover the same area.
    #[error("Duplicate door at ({x}, {y})")]
    DuplicateDoor {
        /// Door x position
        x: f32,
        /// Door y position
        y: f32,
    },

    /// Arena bookkeeping failed during a transition.
    #[error(transparent)]
    Arena(#[from] ArenaError),
}

/// Result type for scene loading operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// A whole scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    /// Playfield and its contents
    pub arena: ArenaDef,
    /// Background image
    #[serde(default)]
    pub background: Option<String>,
    /// Music track
    #[serde(default)]
    pub music: Option<String>,
}

/// `arena` section of a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaDef {
    /// Top-left corner
    pub pos: Vec2,
    /// Playfield size
    pub size: SizeDef,
    /// Static obstacles
    #[serde(default)]
    pub actors: Vec<ObstacleDef>,
    /// Exits
    #[serde(default)]
    pub doors: Vec<DoorDef>,
    /// Talking characters
    #[serde(default)]
    pub npcs: Vec<NpcDef>,
    /// Fighters placed from definition files
    #[serde(default)]
    pub characters: Vec<CharacterPlacement>,
}

/// A solid block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDef {
    /// Top-left corner
    pub pos: Vec2,
    /// Size
    pub size: SizeDef,
    /// Sprite (may be empty)
    #[serde(default)]
    pub sprite: String,
}

/// An exit to another scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorDef {
    /// Top-left corner of the trigger area
    pub pos: Vec2,
    /// Trigger area size
    pub size: SizeDef,
    /// Destination scene file
    pub destination: String,
    /// Where the player appears in the destination
    pub spawn: Vec2,
    /// Whether the destination switches music
    #[serde(default, alias = "change_music")]
    pub change_music: bool,
}

/// A talking character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcDef {
    /// Top-left corner
    pub pos: Vec2,
    /// Size
    pub size: SizeDef,
    /// Sprite
    #[serde(default)]
    pub sprite: String,
    /// Display name
    pub name: String,
    /// Dialogue file
    pub dialogue: String,
}

/// A fighter placed in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterPlacement {
    /// Behavior
    #[serde(rename = "type")]
    pub kind: CharacterKind,
    /// Top-left corner (home position for traps)
    pub pos: Vec2,
    /// Definition file. Link may omit it to use the configured player defaults.
    #[serde(default)]
    pub config: Option<String>,
    /// Initial facing
    #[serde(default)]
    pub direction: Option<Direction>,
}

impl SceneFile {
    /// Validates the scene.
    pub fn validate(&self) -> SceneResult<()> {
        let arena = &self.arena;
        let size: Vec2 = arena.size.into();
        Rect::try_new(arena.pos, size)
            .map_err(|e| SceneError::ValidationError(format!("arena: {e}")))?;
        if size.x == 0.0 || size.y == 0.0 {
            return Err(SceneError::ValidationError("arena is empty".to_string()));
        }

        for (i, obstacle) in arena.actors.iter().enumerate() {
            Rect::try_new(obstacle.pos, obstacle.size.into())
                .map_err(|e| SceneError::ValidationError(format!("actor {i}: {e}")))?;
        }

        for (i, door) in arena.doors.iter().enumerate() {
            if door.destination.is_empty() {
                return Err(SceneError::ValidationError(format!(
                    "door {i} has no destination"
                )));
            }
            let duplicate = arena.doors[..i]
                .iter()
                .any(|other| other.pos == door.pos && other.size == door.size);
            if duplicate {
                return Err(SceneError::DuplicateDoor {
                    x: door.pos.x,
                    y: door.pos.y,
                });
            }
        }

        for npc in &arena.npcs {
            if npc.name.is_empty() {
                return Err(SceneError::ValidationError(
                    "npc has empty name".to_string(),
                ));
            }
        }

        let players = arena
            .characters
            .iter()
            .filter(|c| c.kind == CharacterKind::Link)
            .count();
        if players > 1 {
            return Err(SceneError::ValidationError(format!(
                "scene places {players} players"
            )));
        }

        for placement in &arena.characters {
            if placement.config.is_none() && placement.kind != CharacterKind::Link {
                return Err(SceneError::ValidationError(format!(
                    "{:?} at ({}, {}) has no config",
                    placement.kind, placement.pos.x, placement.pos.y
                )));
            }
        }

        Ok(())
    }
}

/// A scene built into a live arena.
#[derive(Debug)]
pub struct LoadedScene {
    /// Scene file path, relative to the asset root
    pub path: String,
    /// The populated arena
    pub arena: Arena,
    /// Player actor, if the scene places one
    pub player: Option<EntityId>,
    /// Music track
    pub music: Option<String>,
    /// Background image
    pub background: Option<String>,
}

/// Builds arenas from scene files.
pub struct SceneLoader {
    /// Directory that all scene-relative paths resolve against.
    root: PathBuf,
    /// Seed for arena random sources.
    seed: Option<u64>,
    /// Draws placement-time choices such as a Zol's first direction.
    rng: fastrand::Rng,
    /// Player used when a scene places Link without a definition.
    player: PlayerConfig,
    /// Character definitions by path.
    characters: AHashMap<String, CharacterDef>,
}

impl SceneLoader {
    /// Creates a loader rooted at `root`.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            seed: None,
            rng: fastrand::Rng::new(),
            player: PlayerConfig::default(),
            characters: AHashMap::new(),
        }
    }

    /// Creates a loader from game configuration.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        let mut loader = Self::new(&config.simulation.assets_root).with_seed(config.simulation.seed);
        loader.player = config.player.clone();
        loader
    }

    /// Seeds every arena this loader builds and the choices made while
    /// placing characters.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        if let Some(seed) = seed {
            self.rng = fastrand::Rng::with_seed(seed);
        }
        self
    }

    /// Asset root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of cached character definitions.
    #[must_use]
    pub fn cached_characters(&self) -> usize {
        self.characters.len()
    }

    /// Reads and validates a scene file.
    pub fn read_scene(&self, path: &str) -> SceneResult<SceneFile> {
        let full = self.root.join(path);
        if !full.exists() {
            return Err(SceneError::NotFound(full));
        }
        let content = fs::read_to_string(&full)?;
        let scene: SceneFile = serde_json::from_str(&content)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Reads a character definition, using the cache when possible.
    pub fn character(&mut self, path: &str) -> SceneResult<&CharacterDef> {
        if !self.characters.contains_key(path) {
            let full = self.root.join(path);
            if !full.exists() {
                return Err(SceneError::NotFound(full));
            }
            let content = fs::read_to_string(&full)?;
            let def: CharacterDef = serde_json::from_str(&content)?;
            def.validate()?;
            debug!("Loaded character definition {}", path);
            self.characters.insert(path.to_string(), def);
        }
        self.characters
            .get(path)
            .ok_or_else(|| SceneError::NotFound(self.root.join(path)))
    }

    /// Loads a scene file and builds its arena.
    pub fn load(&mut self, path: &str) -> SceneResult<LoadedScene> {
        let scene = self.read_scene(path)?;
        let loaded = self.build(path, &scene)?;
        info!(
            "Loaded scene {} ({} actors, player: {})",
            path,
            loaded.arena.len(),
            loaded.player.is_some()
        );
        Ok(loaded)
    }

    /// Builds an arena from an already parsed scene.
    pub fn build(&mut self, path: &str, scene: &SceneFile) -> SceneResult<LoadedScene> {
        let def = &scene.arena;
        let mut arena = Arena::new(def.pos, def.size.into())
            .with_metrics(AssetMetrics::new(&self.root));
        if let Some(seed) = self.seed {
            arena = arena.with_seed(seed);
        }

        for obstacle in &def.actors {
            arena.spawn(Actor::obstacle(
                obstacle.pos,
                obstacle.size.into(),
                obstacle.sprite.as_str(),
            ));
        }

        for door in &def.doors {
            arena.spawn(Actor::door(
                door.pos,
                door.size.into(),
                Door::new(door.destination.as_str(), door.spawn, door.change_music),
            ));
        }

        for npc in &def.npcs {
            arena.spawn(Actor::npc(
                npc.pos,
                npc.size.into(),
                npc.sprite.as_str(),
                Npc::new(npc.name.as_str(), npc.dialogue.as_str()),
            ));
        }

        let mut player = None;
        for placement in &def.characters {
            let actor = match &placement.config {
                Some(config) => {
                    self.character(config)?;
                    let def = self
                        .characters
                        .get(config.as_str())
                        .ok_or_else(|| SceneError::NotFound(self.root.join(config)))?;
                    def.build(
                        placement.kind,
                        placement.pos,
                        placement.direction,
                        &mut self.rng,
                    )
                },
                None => Actor::link(placement.pos, self.player.link()),
            };
            let id = arena.spawn(actor);
            if placement.kind == CharacterKind::Link {
                player = Some(id);
            }
        }

        Ok(LoadedScene {
            path: path.to_string(),
            arena,
            player,
            music: scene.music.clone(),
            background: scene.background.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lulu_core::ActorKind;
    use tempfile::TempDir;

    const HALL: &str = r#"{
        "music": "music/dungeon.ogg",
        "arena": {
            "pos": { "x": 100, "y": 100 },
            "size": { "width": 600, "height": 350 },
            "actors": [
                { "pos": { "x": 100, "y": 100 }, "size": { "width": 600, "height": 20 }, "sprite": "wall.png" }
            ],
            "doors": [
                { "pos": { "x": 680, "y": 250 }, "size": { "width": 20, "height": 60 },
                  "destination": "cave.json", "spawn": { "x": 20, "y": 40 }, "changeMusic": true }
            ],
            "npcs": [
                { "pos": { "x": 300, "y": 150 }, "size": { "width": 32, "height": 32 },
                  "sprite": "old_man.png", "name": "Old Man", "dialogue": "dialogue/old_man.json" }
            ],
            "characters": [
                { "type": "link", "pos": { "x": 400, "y": 275 } },
                { "type": "zol", "pos": { "x": 200, "y": 300 }, "config": "characters/zol.json", "direction": "left" },
                { "type": "zol", "pos": { "x": 250, "y": 300 }, "config": "characters/zol.json" }
            ]
        }
    }"#;

    const ZOL: &str = r#"{
        "actor": { "sprite": "zol.png", "size": { "width": 20, "height": 16 } },
        "movable": { "speed": { "x": 1, "y": 1 } },
        "fighter": { "hp": 2, "damage": 1 }
    }"#;

    fn assets() -> TempDir {
        let dir = TempDir::new().expect("temp dir");
        fs::create_dir_all(dir.path().join("characters")).expect("mkdir");
        fs::write(dir.path().join("hall.json"), HALL).expect("write scene");
        fs::write(dir.path().join("characters/zol.json"), ZOL).expect("write zol");
        dir
    }

    #[test]
    fn test_load_scene_populates_arena() {
        let dir = assets();
        let mut loader = SceneLoader::new(dir.path()).with_seed(Some(3));
        let scene = loader.load("hall.json").expect("scene loads");

        assert_eq!(scene.arena.len(), 6);
        assert_eq!(scene.arena.bounds().pos, Vec2::new(100.0, 100.0));
        assert_eq!(scene.music.as_deref(), Some("music/dungeon.ogg"));
        assert_eq!(loader.cached_characters(), 1);

        let player = scene.player.and_then(|id| scene.arena.get(id)).expect("player");
        assert_eq!(player.kind(), ActorKind::Player);
        assert_eq!(player.pos(), Vec2::new(400.0, 275.0));
        assert_eq!(player.size(), Vec2::splat(32.0));

        let door = scene
            .arena
            .actors()
            .iter()
            .find_map(Actor::as_door)
            .expect("door");
        assert_eq!(door.destination, "cave.json");
        assert!(door.change_music);

        let npc = scene
            .arena
            .actors()
            .iter()
            .find_map(Actor::as_npc)
            .expect("npc");
        assert_eq!(npc.name, "Old Man");
    }

    #[test]
    fn test_seed_fixes_zol_start_direction() {
        let dir = assets();
        let facings = |seed| {
            let mut loader = SceneLoader::new(dir.path()).with_seed(Some(seed));
            let scene = loader.load("hall.json").expect("scene loads");
            scene
                .arena
                .actors()
                .iter()
                .filter(|a| a.role().name() == "zol")
                .map(Actor::facing)
                .collect::<Vec<_>>()
        };

        let first = facings(21);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0], Direction::Left);
        assert!(Direction::COMPASS.contains(&first[1]));
        assert_eq!(facings(21), first);
    }

    #[test]
    fn test_missing_scene_is_not_found() {
        let dir = assets();
        let mut loader = SceneLoader::new(dir.path());
        assert!(matches!(loader.load("nowhere.json"), Err(SceneError::NotFound(_))));
    }

    #[test]
    fn test_missing_character_fails_fast() {
        let dir = assets();
        fs::remove_file(dir.path().join("characters/zol.json")).expect("remove");
        let mut loader = SceneLoader::new(dir.path());
        assert!(matches!(loader.load("hall.json"), Err(SceneError::NotFound(_))));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let dir = assets();
        fs::write(dir.path().join("broken.json"), "{ \"arena\": ").expect("write");
        let mut loader = SceneLoader::new(dir.path());
        assert!(matches!(loader.load("broken.json"), Err(SceneError::ParseError(_))));
    }

    #[test]
    fn test_validation_rejects_empty_arena() {
        let scene: SceneFile = serde_json::from_str(
            r#"{"arena": {"pos": {"x": 0, "y": 0}, "size": {"width": 0, "height": 10}}}"#,
        )
        .expect("parses");
        assert!(matches!(scene.validate(), Err(SceneError::ValidationError(_))));
    }

    #[test]
    fn test_validation_rejects_duplicate_door() {
        let door = r#"{"pos": {"x": 5, "y": 5}, "size": {"width": 10, "height": 10},
                       "destination": "a.json", "spawn": {"x": 0, "y": 0}}"#;
        let scene: SceneFile = serde_json::from_str(&format!(
            r#"{{"arena": {{"pos": {{"x": 0, "y": 0}}, "size": {{"width": 50, "height": 50}},
                 "doors": [{door}, {door}]}}}}"#
        ))
        .expect("parses");
        assert!(matches!(
            scene.validate(),
            Err(SceneError::DuplicateDoor { x, y }) if x == 5.0 && y == 5.0
        ));
    }

    #[test]
    fn test_validation_rejects_enemy_without_config() {
        let scene: SceneFile = serde_json::from_str(
            r#"{"arena": {"pos": {"x": 0, "y": 0}, "size": {"width": 50, "height": 50},
                "characters": [{"type": "zol", "pos": {"x": 1, "y": 1}}]}}"#,
        )
        .expect("parses");
        assert!(matches!(scene.validate(), Err(SceneError::ValidationError(_))));
    }
}
