//! The user-authored hero.
//!
//! A hero enters the game two ways: typed in by the user
//! ([`Hero::from_input`]) or read back from a saved setup
//! ([`Hero::from_record`]). Both paths run the same validation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::club::ClubId;
use super::nation::NationId;
use super::person::PersonName;
use super::player::{Attributes, Foot, Player, PlayerOrigin, SquadRole};
use super::trait_system::TraitId;
use crate::player::rating::Rateable;
use crate::player::validation::{PlayerValidator, ValidationError};
use crate::world::World;

pub const HERO_AGE: u32 = 16;
pub const HERO_POTENTIAL_MIN: f64 = 80.0;
pub const HERO_POTENTIAL_MAX: f64 = 95.0;

/// Raw hero data as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroInput {
    pub full_name: String,
    /// Defaults to the last word of the full name.
    pub shirt_name: Option<String>,
    /// Any nation alias: name, code or ranking.
    pub nation: String,
    /// Points per attribute, in attribute order.
    pub points: [u32; 6],
    pub foot: Foot,
    /// 1-based trait ordinals.
    pub traits: Vec<u32>,
}

/// Hero as written into a setup file. Potential is rolled again on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeroRecord {
    pub full_name: String,
    pub shirt_name: String,
    pub nation: String,
    pub age: u32,
    pub pace: u32,
    pub shooting: u32,
    pub passing: u32,
    pub dribbling: u32,
    pub defending: u32,
    pub physicality: u32,
    pub foot: Foot,
    pub traits: Vec<u32>,
}

impl HeroRecord {
    pub fn points(&self) -> [u32; 6] {
        [self.pace, self.shooting, self.passing, self.dribbling, self.defending, self.physicality]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hero {
    pub full_name: String,
    pub shirt_name: String,
    pub nation: NationId,
    pub age: u32,
    points: [u32; 6],
    attributes: Attributes,
    pub foot: Foot,
    /// Sorted by ordinal.
    traits: Vec<TraitId>,
    pub potential: f64,
}

/// Last word of the full name, or the whole name when it is a single word.
pub fn default_shirt_name(full_name: &str) -> String {
    let words: Vec<&str> = full_name.split_whitespace().collect();
    match words.as_slice() {
        [.., last] if words.len() > 1 => last.to_string(),
        _ => full_name.trim().to_string(),
    }
}

impl Hero {
    pub fn from_input<R: Rng + ?Sized>(
        world: &World,
        input: HeroInput,
        rng: &mut R,
    ) -> Result<Self, ValidationError> {
        let shirt_name = input
            .shirt_name
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default_shirt_name(&input.full_name));
        Self::build(
            world,
            input.full_name,
            shirt_name,
            &input.nation,
            HERO_AGE,
            input.points,
            input.foot,
            &input.traits,
            rng,
        )
    }

    pub fn from_record<R: Rng + ?Sized>(
        world: &World,
        record: HeroRecord,
        rng: &mut R,
    ) -> Result<Self, ValidationError> {
        let points = record.points();
        Self::build(
            world,
            record.full_name,
            record.shirt_name,
            &record.nation,
            record.age,
            points,
            record.foot,
            &record.traits,
            rng,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build<R: Rng + ?Sized>(
        world: &World,
        full_name: String,
        shirt_name: String,
        nation: &str,
        age: u32,
        points: [u32; 6],
        foot: Foot,
        traits: &[u32],
        rng: &mut R,
    ) -> Result<Self, ValidationError> {
        PlayerValidator::validate_name("full name", &full_name)?;
        PlayerValidator::validate_name("shirt name", &shirt_name)?;
        PlayerValidator::validate_age(age, HERO_AGE)?;
        PlayerValidator::validate_allocation(&points)?;
        PlayerValidator::validate_trait_picks(traits, world.trait_count())?;

        let nation = world
            .find_nation(nation)
            .ok_or_else(|| ValidationError::UnknownNation(nation.to_string()))?;

        let mut ordinals = traits.to_vec();
        ordinals.sort_unstable();
        let traits = ordinals
            .iter()
            .map(|o| world.trait_by_ordinal(*o).ok_or(ValidationError::UnknownTrait(*o)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut hero = Self {
            full_name: full_name.trim().to_string(),
            shirt_name: shirt_name.trim().to_string(),
            nation,
            age,
            points,
            attributes: Attributes::from_array(points.map(f64::from)),
            foot,
            traits,
            potential: 0.0,
        };
        let rating = world.rating_model().rating(&hero);
        let rolled = rng.gen_range(HERO_POTENTIAL_MIN..=HERO_POTENTIAL_MAX).round();
        hero.potential = rolled.max(rating);
        Ok(hero)
    }

    pub fn points(&self) -> [u32; 6] {
        self.points
    }

    pub fn traits(&self) -> &[TraitId] {
        &self.traits
    }

    /// Setup-file form. The nation is written by its primary name and traits
    /// by ordinal.
    pub fn to_record(&self, world: &World) -> Result<HeroRecord, ValidationError> {
        let nation = world
            .nation(self.nation)
            .ok_or_else(|| ValidationError::ValidationFailed("hero nation is stale".into()))?;
        let traits = self
            .traits
            .iter()
            .map(|t| {
                world
                    .trait_(*t)
                    .map(|tr| tr.ordinal)
                    .ok_or_else(|| ValidationError::ValidationFailed("hero trait is stale".into()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let [pace, shooting, passing, dribbling, defending, physicality] = self.points;
        Ok(HeroRecord {
            full_name: self.full_name.clone(),
            shirt_name: self.shirt_name.clone(),
            nation: nation.name().to_string(),
            age: self.age,
            pace,
            shooting,
            passing,
            dribbling,
            defending,
            physicality,
            foot: self.foot,
            traits,
        })
    }

    /// The hero as a squad member of `club`.
    pub fn into_player(self, club: ClubId) -> Player {
        let last = self.shirt_name.clone();
        let first = self
            .full_name
            .strip_suffix(&last)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        Player {
            name: PersonName { first, last },
            age: self.age,
            nation: self.nation,
            attributes: self.attributes,
            foot: self.foot,
            traits: self.traits,
            suitability: Vec::new(),
            role: SquadRole::Reserve,
            potential: self.potential,
            club,
            origin: PlayerOrigin::Hero { full_name: self.full_name, shirt_name: self.shirt_name },
        }
    }
}

impl Rateable for Hero {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn foot(&self) -> Foot {
        self.foot
    }

    fn has_trait(&self, id: TraitId) -> bool {
        self.traits.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::nation::Nation;
    use crate::models::person::NameTable;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world() -> World {
        let mut world = World::new();
        world
            .register_nation(Nation::new(
                0,
                vec!["Brazil".into()],
                "BRA".into(),
                "Brazilian".into(),
                "yellow".into(),
                NameTable::default(),
            ))
            .unwrap();
        for name in ["Speedster", "Weak Foot", "Engine", "Finisher"] {
            world.register_trait(name.into(), String::new(), "white".into(), None);
        }
        world
    }

    fn input() -> HeroInput {
        HeroInput {
            full_name: "Joao Pedro Silva".into(),
            shirt_name: None,
            nation: "bra".into(),
            points: [60, 60, 50, 50, 40, 40],
            foot: Foot::Left,
            traits: vec![4, 1, 2],
        }
    }

    #[test]
    fn test_from_input_defaults() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let hero = Hero::from_input(&world, input(), &mut rng).unwrap();
        assert_eq!(hero.shirt_name, "Silva");
        assert_eq!(hero.age, HERO_AGE);
        assert!((HERO_POTENTIAL_MIN..=HERO_POTENTIAL_MAX).contains(&hero.potential));
        let ordinals: Vec<u32> =
            hero.traits().iter().map(|t| world.trait_(*t).unwrap().ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 4]);
    }

    #[test]
    fn test_from_input_rejects_bad_allocation() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut bad = input();
        bad.points = [60, 60, 50, 50, 40, 41];
        assert_eq!(
            Hero::from_input(&world, bad, &mut rng),
            Err(ValidationError::InvalidPointTotal(301))
        );

        let mut bad = input();
        bad.points = [85, 55, 50, 50, 40, 20];
        assert!(matches!(
            Hero::from_input(&world, bad, &mut rng),
            Err(ValidationError::InvalidAttribute { value: 85, .. })
        ));
    }

    #[test]
    fn test_from_input_rejects_duplicate_traits_and_short_names() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut bad = input();
        bad.traits = vec![1, 1, 2];
        assert_eq!(
            Hero::from_input(&world, bad, &mut rng),
            Err(ValidationError::DuplicateTrait(1))
        );

        let mut bad = input();
        bad.full_name = "J".into();
        assert!(matches!(
            Hero::from_input(&world, bad, &mut rng),
            Err(ValidationError::InvalidName(_))
        ));
    }

    #[test]
    fn test_unknown_nation() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut bad = input();
        bad.nation = "Atlantis".into();
        assert_eq!(
            Hero::from_input(&world, bad, &mut rng),
            Err(ValidationError::UnknownNation("Atlantis".into()))
        );
    }

    #[test]
    fn test_record_round_trip() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let hero = Hero::from_input(&world, input(), &mut rng).unwrap();
        let record = hero.to_record(&world).unwrap();
        assert_eq!(record.nation, "Brazil");
        assert_eq!(record.traits, vec![1, 2, 4]);

        let back = Hero::from_record(&world, record.clone(), &mut rng).unwrap();
        assert_eq!(back.to_record(&world).unwrap(), record);
        assert_eq!(back.points(), hero.points());
    }

    #[test]
    fn test_default_shirt_name() {
        assert_eq!(default_shirt_name("Pele"), "Pele");
        assert_eq!(default_shirt_name("Kylian  Mbappe"), "Mbappe");
    }

    #[test]
    fn test_into_player_keeps_names() {
        let world = world();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let hero = Hero::from_input(&world, input(), &mut rng).unwrap();
        let player = hero.into_player(world.free_agents());
        assert_eq!(player.name.first, "Joao Pedro");
        assert_eq!(player.name.last, "Silva");
        assert!(player.is_hero());
        assert_eq!(player.display_name(), "Joao Pedro Silva");
    }
}
