//! Match configuration.
//!
//! Loaded from `.ron` or `.json` by file extension. Every field has a default,
//! so a config file only needs to name what it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai::Difficulty;
use crate::constants::*;
use crate::locale::Language;
use crate::roster::CharacterId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),

    #[error("RON write error: {0}")]
    RonWrite(#[from] ron::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Arena geometry, physics and combat numbers shared by both fighters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub ground_height: f32,
    pub gravity: f32,
    pub run_speed: f32,
    pub jump_impulse: f32,
    pub body_width: f32,
    pub body_height: f32,
    pub max_health: i32,
    pub hit_damage: i32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            ground_height: GROUND_HEIGHT,
            gravity: GRAVITY,
            run_speed: RUN_SPEED,
            jump_impulse: JUMP_IMPULSE,
            body_width: BODY_WIDTH,
            body_height: BODY_HEIGHT,
            max_health: MAX_HEALTH,
            hit_damage: HIT_DAMAGE,
        }
    }
}

impl ArenaConfig {
    /// y of the ground surface (+y down).
    pub fn ground_line(&self) -> f32 {
        self.screen_height - self.ground_height
    }

    /// y of a fighter standing on the ground.
    pub fn standing_y(&self) -> f32 {
        self.ground_line() - self.body_height
    }
}

/// Who controls each side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Both sides human
    Pvp,
    /// Human player against an AI enemy
    Pve { difficulty: Difficulty },
    /// Both sides AI (headless runs and demos)
    AiVsAi { player: Difficulty, enemy: Difficulty },
}

impl GameMode {
    pub fn player_ai(&self) -> Option<Difficulty> {
        match self {
            GameMode::AiVsAi { player, .. } => Some(*player),
            _ => None,
        }
    }

    pub fn enemy_ai(&self) -> Option<Difficulty> {
        match self {
            GameMode::Pvp => None,
            GameMode::Pve { difficulty } => Some(*difficulty),
            GameMode::AiVsAi { enemy, .. } => Some(*enemy),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub arena: ArenaConfig,
    pub round_secs: u32,
    /// Tick length used by hosts that step at a fixed rate
    pub frame_ms: Millis,
    pub mode: GameMode,
    pub player: CharacterId,
    pub enemy: CharacterId,
    pub player_spawn: [f32; 2],
    pub enemy_spawn: [f32; 2],
    pub ai_seed: u64,
    pub language: Language,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            round_secs: DEFAULT_ROUND_SECS,
            frame_ms: FRAME_MS,
            mode: GameMode::Pve {
                difficulty: Difficulty::Expert,
            },
            player: CharacterId::SamuraiMack,
            enemy: CharacterId::SamuraiKenji,
            player_spawn: [200.0, 0.0],
            enemy_spawn: [750.0, 0.0],
            ai_seed: 42,
            language: Language::default(),
        }
    }
}

impl MatchConfig {
    /// Two AI fighters, used by the headless runner.
    pub fn ai_showcase() -> Self {
        Self {
            mode: GameMode::AiVsAi {
                player: Difficulty::Master,
                enemy: Difficulty::Expert,
            },
            ..Self::default()
        }
    }

    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a `.ron` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let contents = fs::read_to_string(path)?;
        let config = match ext.as_str() {
            "ron" => Self::from_ron_str(&contents)?,
            "json" => Self::from_json_str(&contents)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        info!("Loaded match config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => self.to_ron()?,
            Some("json") => self.to_json()?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ))
            }
        };
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.arena;
        let invalid =
            |msg: &str| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg.to_string())) };

        if self.round_secs == 0 {
            return invalid("round_secs must be positive");
        }
        if self.frame_ms == 0 {
            return invalid("frame_ms must be positive");
        }
        if a.screen_width <= 0.0 || a.screen_height <= 0.0 {
            return invalid("arena size must be positive");
        }
        if a.ground_height < 0.0 || a.ground_height >= a.screen_height {
            return invalid("ground_height must lie inside the arena");
        }
        if a.body_width <= 0.0 || a.body_height <= 0.0 {
            return invalid("body size must be positive");
        }
        if a.body_height > a.ground_line() {
            return invalid("body does not fit above the ground");
        }
        if a.run_speed <= 0.0 || a.gravity <= 0.0 || a.jump_impulse < 0.0 {
            return invalid("run_speed and gravity must be positive");
        }
        if a.max_health <= 0 || a.hit_damage <= 0 {
            return invalid("max_health and hit_damage must be positive");
        }
        for spawn in [self.player_spawn, self.enemy_spawn] {
            if spawn[0] < 0.0 || spawn[0] + a.body_width > a.screen_width {
                return invalid("spawn outside the arena");
            }
        }
        Ok(())
    }
}
