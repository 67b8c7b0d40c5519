use super::club::ClubId;
use super::nation::NationId;
use crate::registry::Handle;

pub type LeagueId = Handle<League>;

#[derive(Debug, Clone)]
pub struct League {
    pub name: String,
    pub nation: NationId,
    /// Pyramid level, 1 for the top flight.
    pub level: u32,
    /// Nation code followed by the level, e.g. `ENG1`.
    pub code: String,
    pub(crate) clubs: Vec<ClubId>,
}

impl League {
    pub fn new(name: String, nation: NationId, nation_code: &str, level: u32) -> Self {
        Self {
            name,
            nation,
            level,
            code: format!("{}{}", nation_code, level),
            clubs: Vec::new(),
        }
    }

    pub fn clubs(&self) -> &[ClubId] {
        &self.clubs
    }

    pub fn capacity(&self) -> usize {
        self.clubs.len()
    }

    pub fn search_aliases(&self, nation_names: &[String]) -> Vec<String> {
        let mut aliases = vec![self.name.clone(), self.code.clone()];
        aliases.extend(nation_names.iter().map(|n| format!("{} {}", n, self.level)));
        aliases
    }
}

/// How a league's strength is summarised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeagueRatingMode {
    #[default]
    Average,
    /// Mean of the first eight clubs in league order.
    Top,
    Median,
}
