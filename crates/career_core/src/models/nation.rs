use super::club::ClubId;
use super::league::LeagueId;
use super::person::NameTable;
use crate::registry::Handle;

pub type NationId = Handle<Nation>;

#[derive(Debug, Clone)]
pub struct Nation {
    /// 1-based FIFA ranking; equal to the nation's position in the nations file.
    pub fifa_ranking: u32,
    /// Primary display name first, alternates after.
    pub names: Vec<String>,
    pub code: String,
    pub nationality: String,
    pub color: String,
    pub name_table: NameTable,
    pub(crate) leagues: Vec<LeagueId>,
    pub(crate) clubs: Vec<ClubId>,
}

impl Nation {
    pub fn new(
        fifa_ranking: u32,
        names: Vec<String>,
        code: String,
        nationality: String,
        color: String,
        name_table: NameTable,
    ) -> Self {
        Self {
            fifa_ranking,
            names,
            code,
            nationality,
            color,
            name_table,
            leagues: Vec::new(),
            clubs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.code)
    }

    /// Leagues of this nation, top flight first.
    pub fn leagues(&self) -> &[LeagueId] {
        &self.leagues
    }

    pub fn clubs(&self) -> &[ClubId] {
        &self.clubs
    }

    pub fn search_aliases(&self) -> Vec<String> {
        let mut aliases = vec![self.fifa_ranking.to_string(), self.code.clone()];
        aliases.extend(self.names.iter().cloned());
        aliases
    }
}
