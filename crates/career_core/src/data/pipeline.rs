//! Ingestion pipeline
//!
//! Checks every required path, then runs the loaders in dependency order.
//! Errors are collected, never short-circuited: the caller either gets a
//! fully built [`World`] or an [`IngestionReport`] listing everything that
//! went wrong, and the partial world is dropped.

use std::error::Error as _;
use std::fmt;

use rand::Rng;

use super::layout::{
    DataLayout, RequiredPath, FRAMES_FILE, LEAGUES_FILE, NATIONS_FILE, POSITIONS_FILE,
    SETTINGS_FILE, STYLE_FILE, TRAITS_FILE,
};
use super::loaders;
use super::settings::{Settings, StyleTable};
use crate::error::{CareerError, ErrorKind, LoadErrors, LoadResult};
use crate::player::params::GenerationParams;
use crate::world::World;

const INCOMPLETE_HEADER: &str = "The database is incomplete.\n\
If you moved or edited any files from the game directory, please revert the changes \
or reinstall the game in case you cannot.";

/// Observes ingestion progress. Purely informational.
pub trait ProgressSink {
    fn start(&mut self, total_units: usize);
    fn advance(&mut self, units: usize);
    fn finish(&mut self) {}
}

/// Discards progress updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn start(&mut self, _total_units: usize) {}
    fn advance(&mut self, _units: usize) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    Settings,
    Style,
    Nations,
    Positions,
    Traits,
    Frames,
    Leagues,
}

impl Step {
    /// Canonical run order.
    pub const ALL: [Step; 7] = [
        Step::Settings,
        Step::Style,
        Step::Nations,
        Step::Positions,
        Step::Traits,
        Step::Frames,
        Step::Leagues,
    ];

    pub fn file(self) -> &'static str {
        match self {
            Step::Settings => SETTINGS_FILE,
            Step::Style => STYLE_FILE,
            Step::Nations => NATIONS_FILE,
            Step::Positions => POSITIONS_FILE,
            Step::Traits => TRAITS_FILE,
            Step::Frames => FRAMES_FILE,
            Step::Leagues => LEAGUES_FILE,
        }
    }

    pub fn prerequisites(self) -> &'static [Step] {
        match self {
            Step::Settings | Step::Style | Step::Nations | Step::Positions | Step::Traits => &[],
            Step::Frames => &[Step::Positions],
            Step::Leagues => &[
                Step::Settings,
                Step::Nations,
                Step::Positions,
                Step::Traits,
                Step::Frames,
            ],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Step::Settings => "settings",
            Step::Style => "style",
            Step::Nations => "nations",
            Step::Positions => "positions",
            Step::Traits => "traits",
            Step::Frames => "frames",
            Step::Leagues => "leagues",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub kind: ErrorKind,
    /// File the failing loader reads; `None` for path checks.
    pub file: Option<String>,
    pub message: String,
    /// Source chain, outermost first.
    pub detail: Vec<String>,
}

impl ReportEntry {
    fn from_error(file: Option<&str>, err: &CareerError) -> Self {
        let mut detail = Vec::new();
        let mut source = err.source();
        while let Some(inner) = source {
            detail.push(inner.to_string());
            source = inner.source();
        }
        Self {
            kind: err.kind(),
            file: file.map(str::to_string),
            message: err.to_string(),
            detail,
        }
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{} in {}: {}", self.kind, file, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// Everything that went wrong during one ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionReport {
    pub entries: Vec<ReportEntry>,
    /// Steps not run because a prerequisite failed.
    pub skipped: Vec<Step>,
}

impl IngestionReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Full text; `traceback` adds each entry's source chain.
    pub fn render(&self, traceback: bool) -> String {
        let mut out = String::from(INCOMPLETE_HEADER);
        out.push_str("\n\nThe following error(s) occurred:\n");
        for (i, entry) in self.entries.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, entry));
            if traceback {
                for cause in &entry.detail {
                    out.push_str(&format!("   caused by: {}\n", cause));
                }
            }
        }
        if !self.skipped.is_empty() {
            let names: Vec<&str> = self.skipped.iter().map(|s| s.name()).collect();
            out.push_str(&format!("\nNot loaded because of earlier errors: {}\n", names.join(", ")));
        }
        out
    }

    fn record(&mut self, file: Option<&str>, errors: LoadErrors) {
        for err in errors {
            self.entries.push(ReportEntry::from_error(file, &err));
        }
    }
}

impl fmt::Display for IngestionReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

impl std::error::Error for IngestionReport {}

/// Result of a clean ingestion.
#[derive(Debug)]
pub struct Ingested {
    pub world: World,
    pub settings: Settings,
    pub style: StyleTable,
}

enum Output {
    Settings(Settings),
    Style(StyleTable),
    Count(usize),
}

fn run_step<R: Rng + ?Sized>(
    step: Step,
    layout: &DataLayout,
    world: &mut World,
    params: &GenerationParams,
    rng: &mut R,
) -> LoadResult<Output> {
    match step {
        Step::Settings => {
            let settings = loaders::load_settings(layout)?;
            world.set_settings(settings.clone());
            Ok(Output::Settings(settings))
        }
        Step::Style => loaders::load_style(layout).map(Output::Style),
        Step::Nations => loaders::load_nations(layout, world).map(Output::Count),
        Step::Positions => loaders::load_positions(layout, world).map(Output::Count),
        Step::Traits => loaders::load_traits(layout, world).map(Output::Count),
        Step::Frames => loaders::load_frames(layout, world).map(Output::Count),
        Step::Leagues => loaders::load_leagues(layout, world, params, rng).map(Output::Count),
    }
}

/// Builds a fresh [`World`] from the game directory.
pub fn ingest<R: Rng + ?Sized>(
    layout: &DataLayout,
    params: &GenerationParams,
    rng: &mut R,
    progress: &mut dyn ProgressSink,
) -> Result<Ingested, IngestionReport> {
    let required = DataLayout::required_paths();
    progress.start(required.len() + 2 * Step::ALL.len());

    let mut report = IngestionReport::default();
    let mut missing: Vec<&RequiredPath> = Vec::new();
    for path in &required {
        if !layout.exists(path) {
            log::warn!("{} {} is missing", path.kind, path.relative);
            report.record(
                None,
                CareerError::MissingPath { path: path.relative.into(), kind: path.kind }.into(),
            );
            missing.push(path);
        }
        progress.advance(1);
    }

    let mut world = World::new();
    let mut settings = None;
    let mut style = None;
    let mut failed: Vec<Step> = Vec::new();

    for step in Step::ALL {
        let file = step.file();
        if missing.iter().any(|p| p.relative == file) {
            failed.push(step);
            progress.advance(2);
            continue;
        }
        if step.prerequisites().iter().any(|p| failed.contains(p)) {
            log::warn!("skipping {} because a prerequisite failed", step);
            report.skipped.push(step);
            failed.push(step);
            progress.advance(2);
            continue;
        }

        log::debug!("loading {}", file);
        progress.advance(1);
        match run_step(step, layout, &mut world, params, rng) {
            Ok(Output::Settings(s)) => settings = Some(s),
            Ok(Output::Style(s)) => style = Some(s),
            Ok(Output::Count(n)) => log::debug!("{} finished with {} entries", step, n),
            Err(errors) => {
                log::warn!("{} failed with {} error(s)", step, errors.len());
                report.record(Some(file), errors);
                failed.push(step);
            }
        }
        progress.advance(1);
    }
    progress.finish();

    match (settings, style) {
        (Some(settings), Some(style)) if report.is_empty() => {
            log::info!(
                "ingestion finished: {} clubs, {} players",
                world.club_count(),
                world.player_count()
            );
            Ok(Ingested { world, settings, style })
        }
        _ => Err(report),
    }
}

/// [`ingest`] without progress reporting.
pub fn ingest_quiet<R: Rng + ?Sized>(
    layout: &DataLayout,
    params: &GenerationParams,
    rng: &mut R,
) -> Result<Ingested, IngestionReport> {
    ingest(layout, params, rng, &mut NoProgress)
}
