//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub game: GameRules,
    pub sound: SoundConfig,
    pub sim: SimSettings,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameRules {
    pub friendly_fire: bool,
    pub shots_pushback: bool,
    pub ally_collision: AllyCollision,
    pub non_player_hp: i32,     // percent applied to NPC max health on spawn
    pub player_hp: i32,         // percent applied to the heal cap
    pub move_when_shooting: bool,
    pub switch_move: SwitchMove,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SoundConfig {
    pub footsteps: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimSettings {
    pub seed: u64,
    pub mode: CampaignMode,
}

/// How actors on the same team treat each other on contact.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllyCollision {
    /// Allies block each other like any other actor.
    Normal,
    /// Allies pass through, then get pushed apart.
    Repel,
    /// Allies pass through freely.
    None,
}

/// What the second button does while moving.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchMove {
    Slide,
    Strafe,
    None,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignMode {
    Normal,
    Dogfight,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config.toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{key} must be positive, got {value}")]
    NonPositive { key: &'static str, value: i32 },
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    sound: TomlSound,
    #[serde(default)]
    sim: TomlSim,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_friendly_fire")]
    friendly_fire: bool,
    #[serde(default = "default_shots_pushback")]
    shots_pushback: bool,
    #[serde(default = "default_ally_collision")]
    ally_collision: AllyCollision,
    #[serde(default = "default_hp_percent")]
    non_player_hp: i32,
    #[serde(default = "default_hp_percent")]
    player_hp: i32,
    #[serde(default = "default_move_when_shooting")]
    move_when_shooting: bool,
    #[serde(default = "default_switch_move")]
    switch_move: SwitchMove,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_footsteps")]
    footsteps: bool,
}

#[derive(Deserialize, Debug)]
struct TomlSim {
    #[serde(default = "default_seed")]
    seed: u64,
    #[serde(default = "default_mode")]
    mode: CampaignMode,
}

// ── Defaults ──

fn default_friendly_fire() -> bool { false }
fn default_shots_pushback() -> bool { true }
fn default_ally_collision() -> AllyCollision { AllyCollision::Repel }
fn default_hp_percent() -> i32 { 100 }
fn default_move_when_shooting() -> bool { false }
fn default_switch_move() -> SwitchMove { SwitchMove::Slide }
fn default_footsteps() -> bool { true }
fn default_seed() -> u64 { 0x00C0_FFEE }
fn default_mode() -> CampaignMode { CampaignMode::Normal }

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            friendly_fire: default_friendly_fire(),
            shots_pushback: default_shots_pushback(),
            ally_collision: default_ally_collision(),
            non_player_hp: default_hp_percent(),
            player_hp: default_hp_percent(),
            move_when_shooting: default_move_when_shooting(),
            switch_move: default_switch_move(),
        }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { footsteps: default_footsteps() }
    }
}

impl Default for TomlSim {
    fn default() -> Self {
        TomlSim { seed: default_seed(), mode: default_mode() }
    }
}

impl From<TomlConfig> for SimConfig {
    fn from(t: TomlConfig) -> Self {
        SimConfig {
            game: GameRules {
                friendly_fire: t.game.friendly_fire,
                shots_pushback: t.game.shots_pushback,
                ally_collision: t.game.ally_collision,
                non_player_hp: t.game.non_player_hp,
                player_hp: t.game.player_hp,
                move_when_shooting: t.game.move_when_shooting,
                switch_move: t.game.switch_move,
            },
            sound: SoundConfig { footsteps: t.sound.footsteps },
            sim: SimSettings { seed: t.sim.seed, mode: t.sim.mode },
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl SimConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file, missing keys or a broken file fall back to defaults.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if !path.exists() { continue; }
            match Self::from_path(&path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!("{e}; using default settings");
                    return SimConfig::default();
                }
            }
        }
        SimConfig::default()
    }

    pub fn from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Strict parse: unknown enum values and non-positive HP percentages are errors.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(text)?;
        if parsed.game.non_player_hp <= 0 {
            return Err(ConfigError::NonPositive { key: "game.non_player_hp", value: parsed.game.non_player_hp });
        }
        if parsed.game.player_hp <= 0 {
            return Err(ConfigError::NonPositive { key: "game.player_hp", value: parsed.game.player_hp });
        }
        Ok(parsed.into())
    }

    pub fn is_dogfight(&self) -> bool {
        self.sim.mode == CampaignMode::Dogfight
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = SimConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, SimConfig::default());
        assert!(!cfg.game.friendly_fire);
        assert!(cfg.game.shots_pushback);
        assert_eq!(cfg.game.ally_collision, AllyCollision::Repel);
        assert!(cfg.sound.footsteps);
        assert!(!cfg.is_dogfight());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = SimConfig::from_toml_str(
            "[game]\nfriendly_fire = true\nally_collision = \"none\"\n[sim]\nmode = \"dogfight\"\n",
        ).unwrap();
        assert!(cfg.game.friendly_fire);
        assert_eq!(cfg.game.ally_collision, AllyCollision::None);
        assert_eq!(cfg.game.non_player_hp, 100);
        assert!(cfg.is_dogfight());
    }

    #[test]
    fn unknown_mode_is_parse_error() {
        let err = SimConfig::from_toml_str("[sim]\nmode = \"coop\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_hp_percent_rejected() {
        let err = SimConfig::from_toml_str("[game]\nnon_player_hp = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { key: "game.non_player_hp", value: 0 }));
    }
}
