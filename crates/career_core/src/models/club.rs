use super::league::LeagueId;
use super::nation::NationId;
use super::player::PlayerId;
use crate::registry::Handle;

pub type ClubId = Handle<Club>;

pub const CLUB_NAME_MIN_LEN: usize = 1;
pub const CLUB_NAME_MAX_LEN: usize = 25;
pub const SHORT_CODE_LEN: usize = 3;
pub const MIN_CLUB_RATING: f64 = 27.0;
pub const MAX_CLUB_RATING: f64 = 87.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubColors {
    pub primary: String,
    pub secondary: String,
}

#[derive(Debug, Clone)]
pub struct Club {
    /// Authored strength on the internal 27–87 scale; drives generation.
    /// The displayed rating is derived from the squad instead.
    pub base_rating: f64,
    pub colors: ClubColors,
    /// Generic name first, alternates after.
    pub names: Vec<String>,
    pub full_name: String,
    pub nickname: String,
    pub code: String,
    pub league: Option<LeagueId>,
    pub nation: Option<NationId>,
    pub(crate) squad: Vec<PlayerId>,
    free_agents: bool,
}

impl Club {
    pub fn new(
        base_rating: f64,
        colors: ClubColors,
        names: Vec<String>,
        full_name: String,
        nickname: String,
        code: String,
    ) -> Self {
        Self {
            base_rating,
            colors,
            names,
            full_name,
            nickname,
            code,
            league: None,
            nation: None,
            squad: Vec::new(),
            free_agents: false,
        }
    }

    /// The sentinel holding unattached players.
    pub fn free_agents() -> Self {
        Self {
            base_rating: MIN_CLUB_RATING,
            colors: ClubColors { primary: "lgrey".into(), secondary: "grey".into() },
            names: vec!["Free agents".into()],
            full_name: "Free agents".into(),
            nickname: "Free agents".into(),
            code: "---".into(),
            league: None,
            nation: None,
            squad: Vec::new(),
            free_agents: true,
        }
    }

    pub fn is_free_agents(&self) -> bool {
        self.free_agents
    }

    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.full_name)
    }

    pub fn squad(&self) -> &[PlayerId] {
        &self.squad
    }

    pub fn search_aliases(&self) -> Vec<String> {
        let mut aliases = vec![self.full_name.clone(), self.nickname.clone(), self.code.clone()];
        aliases.extend(self.names.iter().cloned());
        aliases
    }
}
