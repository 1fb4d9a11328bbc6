//! Localization
//!
//! Two-language text tables, `{n}` placeholder substitution and change
//! notification. The [`Localizer`] is owned by the host and handed to whoever
//! renders text; listeners subscribe and unsubscribe explicitly.
//!
//! The chosen language is persisted through a [`PreferenceStore`]. Store
//! failures are logged and never block a language change.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ============================================================================
// Languages and keys
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        match code {
            "zh" => Some(Language::Zh),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    pub fn other(self) -> Language {
        match self {
            Language::Zh => Language::En,
            Language::En => Language::Zh,
        }
    }
}

/// Every translatable string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextKey {
    GameTitle,
    PvpMode,
    PveMode,
    /// Takes the round number as `{0}`
    Round,
    RoundTie,
    Player1RoundWin,
    Player2RoundWin,
    PlayerFinalWin,
    EnemyFinalWin,
    Victory,
    Defeat,
    Draw,
    FinalVictory,
    FinalDefeat,
    BackToStart,
    Easy,
    Expert,
    Master,
    SamuraiKenji,
    SamuraiMack,
    WizardAlatar,
    WizardAlbus,
    /// Label of the language switch, naming the language it switches to
    LanguageToggle,
}

fn text_en(key: TextKey) -> &'static str {
    match key {
        TextKey::GameTitle => "Samurai Duel",
        TextKey::PvpMode => "Player vs Player",
        TextKey::PveMode => "Player vs AI",
        TextKey::Round => "Round {0}",
        TextKey::RoundTie => "Round Tie!",
        TextKey::Player1RoundWin => "Player 1 Wins the Round!",
        TextKey::Player2RoundWin => "Player 2 Wins the Round!",
        TextKey::PlayerFinalWin => "Player Wins the Match!",
        TextKey::EnemyFinalWin => "Enemy Wins the Match!",
        TextKey::Victory => "Victory",
        TextKey::Defeat => "Defeat",
        TextKey::Draw => "Draw",
        TextKey::FinalVictory => "Final Victory!",
        TextKey::FinalDefeat => "Final Defeat",
        TextKey::BackToStart => "Back to Start",
        TextKey::Easy => "Easy",
        TextKey::Expert => "Expert",
        TextKey::Master => "Master",
        TextKey::SamuraiKenji => "Samurai Kenji",
        TextKey::SamuraiMack => "Samurai Mack",
        TextKey::WizardAlatar => "Wizard Alatar",
        TextKey::WizardAlbus => "Wizard Albus",
        TextKey::LanguageToggle => "中文",
    }
}

fn text_zh(key: TextKey) -> &'static str {
    match key {
        TextKey::GameTitle => "武士对决",
        TextKey::PvpMode => "玩家对战",
        TextKey::PveMode => "人机对战",
        TextKey::Round => "第 {0} 局",
        TextKey::RoundTie => "本局平局！",
        TextKey::Player1RoundWin => "玩家1 赢得本局！",
        TextKey::Player2RoundWin => "玩家2 赢得本局！",
        TextKey::PlayerFinalWin => "玩家赢得比赛！",
        TextKey::EnemyFinalWin => "敌人赢得比赛！",
        TextKey::Victory => "胜利",
        TextKey::Defeat => "失败",
        TextKey::Draw => "平局",
        TextKey::FinalVictory => "最终胜利！",
        TextKey::FinalDefeat => "最终失败",
        TextKey::BackToStart => "返回开始",
        TextKey::Easy => "简单",
        TextKey::Expert => "专家",
        TextKey::Master => "大师",
        TextKey::SamuraiKenji => "武士 剑二",
        TextKey::SamuraiMack => "武士 麦克",
        TextKey::WizardAlatar => "巫师 阿拉塔",
        TextKey::WizardAlbus => "巫师 阿不思",
        TextKey::LanguageToggle => "English",
    }
}

/// Raw table lookup.
pub fn text(language: Language, key: TextKey) -> &'static str {
    match language {
        Language::En => text_en(key),
        Language::Zh => text_zh(key),
    }
}

/// Replace `{0}`, `{1}`, ... with `args`. Unmatched placeholders stay as-is.
pub fn substitute(template: &str, args: &[&str]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_string(), |acc, (i, arg)| {
            acc.replace(&format!("{{{}}}", i), arg)
        })
}

// ============================================================================
// Preference storage
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the chosen language survives restarts.
pub trait PreferenceStore: Send + Sync {
    fn load(&self) -> Result<Option<Language>, PreferenceError>;
    fn save(&mut self, language: Language) -> Result<(), PreferenceError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Option<Language>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(language: Language) -> Self {
        Self {
            saved: Some(language),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Result<Option<Language>, PreferenceError> {
        Ok(self.saved)
    }

    fn save(&mut self, language: Language) -> Result<(), PreferenceError> {
        self.saved = Some(language);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Preferences {
    language: Language,
}

/// JSON file holding `{"language": "en"}`. A missing file means no preference.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self) -> Result<Option<Language>, PreferenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        let prefs: Preferences = serde_json::from_str(&contents)?;
        Ok(Some(prefs.language))
    }

    fn save(&mut self, language: Language) -> Result<(), PreferenceError> {
        let json = serde_json::to_string_pretty(&Preferences { language })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

// ============================================================================
// Localizer
// ============================================================================

/// Subscription handle returned by [`Localizer::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(Language) + Send + Sync>;

pub struct Localizer {
    language: Language,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    store: Option<Box<dyn PreferenceStore>>,
}

impl fmt::Debug for Localizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer")
            .field("language", &self.language)
            .field("listeners", &self.listeners.len())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl Localizer {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            listeners: Vec::new(),
            next_listener: 0,
            store: None,
        }
    }

    /// Start from the stored preference, falling back to `fallback` when the
    /// store is empty or unreadable.
    pub fn with_store(fallback: Language, store: Box<dyn PreferenceStore>) -> Self {
        let language = match store.load() {
            Ok(Some(saved)) => saved,
            Ok(None) => fallback,
            Err(e) => {
                warn!("Failed to load language preference: {}", e);
                fallback
            }
        };
        Self {
            store: Some(store),
            ..Self::new(language)
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch language. Listeners run and the preference is saved only when
    /// the language actually changes. Returns whether it changed.
    pub fn set_language(&mut self, language: Language) -> bool {
        if language == self.language {
            return false;
        }
        self.language = language;
        debug!(language = language.code(), "language changed");

        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.save(language) {
                warn!("Failed to save language preference: {}", e);
            }
        }
        for (_, listener) in self.listeners.iter_mut() {
            listener(language);
        }
        true
    }

    pub fn toggle(&mut self) -> Language {
        self.set_language(self.language.other());
        self.language
    }

    pub fn text(&self, key: TextKey) -> &'static str {
        text(self.language, key)
    }

    pub fn format(&self, key: TextKey, args: &[&str]) -> String {
        substitute(self.text(key), args)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(Language) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
