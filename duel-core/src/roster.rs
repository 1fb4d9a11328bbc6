//! Playable characters.
//!
//! Each character carries its clip lengths, strike box and the clip frame on
//! which its swing can land. Clip hold rates are in ticks per frame.

use serde::{Deserialize, Serialize};

use crate::fighter::{Clip, ClipSet};
use crate::locale::TextKey;

/// Strike volume geometry relative to the fighter's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeBox {
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterProfile {
    pub clips: ClipSet,
    pub strike: StrikeBox,
    /// Attack clip frame that opens the hit window
    pub attack_frame: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterId {
    SamuraiKenji,
    SamuraiMack,
    WizardAlatar,
    WizardAlbus,
}

const SAMURAI_MACK: CharacterProfile = CharacterProfile {
    clips: ClipSet {
        idle: Clip::new(8, 5),
        run: Clip::new(8, 5),
        jump: Clip::new(2, 5),
        fall: Clip::new(2, 5),
        attack: Clip::new(6, 5),
        take_hit: Clip::new(4, 5),
        death: Clip::new(6, 5),
    },
    strike: StrikeBox {
        offset_x: 100.0,
        offset_y: 50.0,
        width: 160.0,
        height: 50.0,
    },
    attack_frame: 4,
};

const SAMURAI_KENJI: CharacterProfile = CharacterProfile {
    clips: ClipSet {
        idle: Clip::new(4, 7),
        run: Clip::new(8, 5),
        jump: Clip::new(2, 5),
        fall: Clip::new(2, 5),
        attack: Clip::new(4, 6),
        take_hit: Clip::new(3, 6),
        death: Clip::new(7, 6),
    },
    strike: StrikeBox {
        offset_x: 100.0,
        offset_y: 50.0,
        width: 170.0,
        height: 50.0,
    },
    attack_frame: 2,
};

const WIZARD_ALATAR: CharacterProfile = CharacterProfile {
    clips: ClipSet {
        idle: Clip::new(8, 5),
        run: Clip::new(8, 5),
        jump: Clip::new(2, 5),
        fall: Clip::new(2, 5),
        attack: Clip::new(8, 4),
        take_hit: Clip::new(3, 5),
        death: Clip::new(7, 5),
    },
    strike: StrikeBox {
        offset_x: 110.0,
        offset_y: 40.0,
        width: 180.0,
        height: 60.0,
    },
    attack_frame: 5,
};

const WIZARD_ALBUS: CharacterProfile = CharacterProfile {
    clips: ClipSet {
        idle: Clip::new(8, 5),
        run: Clip::new(8, 5),
        jump: Clip::new(2, 5),
        fall: Clip::new(2, 5),
        attack: Clip::new(8, 4),
        take_hit: Clip::new(4, 5),
        death: Clip::new(5, 6),
    },
    strike: StrikeBox {
        offset_x: 90.0,
        offset_y: 40.0,
        width: 190.0,
        height: 60.0,
    },
    attack_frame: 6,
};

impl CharacterId {
    pub const ALL: [CharacterId; 4] = [
        CharacterId::SamuraiKenji,
        CharacterId::SamuraiMack,
        CharacterId::WizardAlatar,
        CharacterId::WizardAlbus,
    ];

    pub fn profile(self) -> CharacterProfile {
        match self {
            CharacterId::SamuraiKenji => SAMURAI_KENJI,
            CharacterId::SamuraiMack => SAMURAI_MACK,
            CharacterId::WizardAlatar => WIZARD_ALATAR,
            CharacterId::WizardAlbus => WIZARD_ALBUS,
        }
    }

    pub fn name_key(self) -> TextKey {
        match self {
            CharacterId::SamuraiKenji => TextKey::SamuraiKenji,
            CharacterId::SamuraiMack => TextKey::SamuraiMack,
            CharacterId::WizardAlatar => TextKey::WizardAlatar,
            CharacterId::WizardAlbus => TextKey::WizardAlbus,
        }
    }
}
