pub mod club;
pub mod frame;
pub mod hero;
pub mod league;
pub mod nation;
pub mod person;
pub mod player;
pub mod position;
pub mod trait_system;

pub use club::{Club, ClubColors, ClubId};
pub use frame::FrameTable;
pub use hero::{Hero, HeroInput, HeroRecord};
pub use league::{League, LeagueId, LeagueRatingMode};
pub use nation::{Nation, NationId};
pub use person::{NameTable, PersonName};
pub use player::{Attributes, Foot, Player, PlayerId, PlayerOrigin, SquadRole};
pub use position::{Position, PositionId, PositionWeights};
pub use trait_system::{Trait, TraitBucket, TraitId};
