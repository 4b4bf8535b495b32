//! The running game: one live scene, NPC conversations and door transitions.

use lulu_common::{EntityId, Key, Rect, Vec2};
use lulu_core::{check_collision, ActorKind, Arena, Door, InputSnapshot, Side, TickReport};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dialogue::{load_dialogue, DialogueBox};
use crate::loader::{LoadedScene, SceneLoader, SceneResult};

/// How far past the player's box an NPC can be and still be talked to.
pub const TALK_REACH: f32 = 4.0;

/// A door the player walked through this tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Scene that was left
    pub from: String,
    /// Scene that was entered
    pub to: String,
    /// Where the player was placed
    pub spawn: Vec2,
    /// Whether the new scene switches music
    pub change_music: bool,
}

/// What happened during one stage tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageTick {
    /// Arena tick outcome, from the scene that was ticked
    pub report: TickReport,
    /// Scene change caused by a door
    pub transition: Option<Transition>,
    /// Name of the NPC a conversation was started with
    pub dialogue_started: Option<String>,
}

/// Owns the live scene and everything that happens between scenes.
pub struct Stage {
    loader: SceneLoader,
    scene: LoadedScene,
    dialogue: DialogueBox,
    input: InputSnapshot,
    tick_seconds: f32,
}

impl Stage {
    /// Loads `start` and makes it the live scene.
    pub fn new(mut loader: SceneLoader, start: &str) -> SceneResult<Self> {
        let scene = loader.load(start)?;
        Ok(Self {
            loader,
            scene,
            dialogue: DialogueBox::new(),
            input: InputSnapshot::new(),
            tick_seconds: 1.0 / 60.0,
        })
    }

    /// Sets how much time one tick represents for the dialogue typewriter.
    #[must_use]
    pub fn with_tick_rate(mut self, ticks_per_second: u32) -> Self {
        self.tick_seconds = 1.0 / ticks_per_second.max(1) as f32;
        self
    }

    /// The live scene.
    #[must_use]
    pub const fn scene(&self) -> &LoadedScene {
        &self.scene
    }

    /// The live arena.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.scene.arena
    }

    /// The conversation box.
    #[must_use]
    pub const fn dialogue(&self) -> &DialogueBox {
        &self.dialogue
    }

    /// The player's id in the live arena.
    #[must_use]
    pub const fn player(&self) -> Option<EntityId> {
        self.scene.player
    }

    /// Runs one tick with `keys` held.
    ///
    /// While a conversation is open the world keeps running without player
    /// input and Enter moves the conversation along. Otherwise Enter next to
    /// an NPC opens a conversation, and touching a door loads its scene.
    pub fn tick(&mut self, keys: &[Key]) -> SceneResult<StageTick> {
        self.input.advance(keys);
        let confirm = self.input.is_just_pressed(Key::Enter);

        if self.dialogue.is_active() {
            self.dialogue.update(self.tick_seconds);
            if confirm {
                self.dialogue.advance();
                if !self.dialogue.is_active() {
                    debug!("Dialogue with {} closed", self.dialogue.npc_name());
                    self.dialogue.reset();
                }
            }
            return Ok(StageTick {
                report: self.scene.arena.tick(&[]),
                ..StageTick::default()
            });
        }

        let dialogue_started = if confirm { self.talk() } else { None };
        if dialogue_started.is_some() {
            return Ok(StageTick {
                report: self.scene.arena.tick(&[]),
                dialogue_started,
                ..StageTick::default()
            });
        }

        let report = self.scene.arena.tick(keys);
        let transition = match self.touched_door() {
            Some(door) => Some(self.go_through(&door)?),
            None => None,
        };

        Ok(StageTick {
            report,
            transition,
            dialogue_started: None,
        })
    }

    /// Opens a conversation with the first NPC within reach of the player.
    fn talk(&mut self) -> Option<String> {
        let player = self.scene.player.and_then(|id| self.scene.arena.get(id))?;
        let r = player.rect();
        let reach = Rect::new(
            Vec2::new(r.pos.x - TALK_REACH, r.pos.y - TALK_REACH),
            Vec2::new(r.size.x + 2.0 * TALK_REACH, r.size.y + 2.0 * TALK_REACH),
        );

        let npc_id = self
            .scene
            .arena
            .actors()
            .iter()
            .filter(|a| a.as_npc().is_some())
            .find(|a| check_collision(&reach, &a.rect()) != Side::None)
            .map(lulu_core::Actor::id)?;

        let npc = self.scene.arena.get_mut(npc_id)?.as_npc_mut()?;
        let lines = load_dialogue(npc, self.loader.root()).to_vec();
        self.dialogue.start(npc, &lines);
        info!("Talking to {}", npc.name);
        Some(npc.name.clone())
    }

    /// The first door in the player's latest collision list.
    fn touched_door(&self) -> Option<Door> {
        let player = self.scene.player?;
        let arena = &self.scene.arena;
        arena
            .collisions_of(player)
            .iter()
            .filter(|c| c.target_kind == ActorKind::Trigger)
            .find_map(|c| arena.get(c.target).and_then(|a| a.as_door()).cloned())
    }

    /// Loads the door's destination and moves the player into it.
    fn go_through(&mut self, door: &Door) -> SceneResult<Transition> {
        let mut next = self.loader.load(&door.destination)?;

        if let Some(stand_in) = next.player.take() {
            next.arena.kill(stand_in);
        }
        if let Some(player) = self.scene.player {
            let id = self.scene.arena.transfer(player, &mut next.arena)?;
            if let Some(actor) = next.arena.get_mut(id) {
                actor.body_mut().pos = door.spawn;
            }
            next.player = Some(id);
        }

        let previous = std::mem::replace(&mut self.scene, next);
        info!(
            "Player left {} for {} at ({}, {})",
            previous.path, self.scene.path, door.spawn.x, door.spawn.y
        );

        Ok(Transition {
            from: previous.path,
            to: self.scene.path.clone(),
            spawn: door.spawn,
            change_music: door.change_music,
        })
    }
}
