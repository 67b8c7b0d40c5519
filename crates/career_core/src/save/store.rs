use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use rand::Rng;
use time::OffsetDateTime;

use super::codec::{is_digest, IntegrityCodec, SealedSetup};
use super::error::SetupError;
use crate::data::layout::DataLayout;
use crate::models::hero::Hero;
use crate::world::World;

/// File extension of setup files.
pub const SETUP_EXTENSION: &str = "plc";

/// Unix seconds with sub-second precision.
pub fn unix_seconds(at: OffsetDateTime) -> f64 {
    at.unix_timestamp_nanos() as f64 / 1e9
}

fn modified_seconds(path: &Path) -> Result<f64, SetupError> {
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|source| SetupError::Io { path: path.to_path_buf(), source })?;
    Ok(unix_seconds(OffsetDateTime::from(modified)))
}

/// Named hero setups under `setups/`.
#[derive(Debug, Clone)]
pub struct SetupStore {
    dir: PathBuf,
    codec: IntegrityCodec,
}

impl SetupStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), codec: IntegrityCodec::default() }
    }

    pub fn for_layout(layout: &DataLayout) -> Self {
        Self::new(layout.setups_dir())
    }

    pub fn with_codec(mut self, codec: IntegrityCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> Result<PathBuf, SetupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SetupError::EmptyName);
        }
        if name.contains(['/', '\\']) {
            return Err(SetupError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", name, SETUP_EXTENSION)))
    }

    /// Seals the hero with the current time and writes it atomically.
    pub fn save(&self, name: &str, hero: &Hero, world: &World) -> Result<PathBuf, SetupError> {
        let path = self.path_for(name)?;
        let record = hero.to_record(world)?;
        let corrupted = |err: serde_yaml::Error| SetupError::Corrupted {
            path: path.clone(),
            reason: err.to_string(),
        };
        let now = unix_seconds(OffsetDateTime::now_utc());
        let sealed = self.codec.seal(record, now).map_err(corrupted)?;
        let yaml = serde_yaml::to_string(&sealed).map_err(corrupted)?;

        let io = |source: std::io::Error| SetupError::Io { path: path.clone(), source };
        fs::create_dir_all(&self.dir).map_err(io)?;
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path).map_err(io)?;
            file.write_all(yaml.as_bytes()).map_err(io)?;
            file.sync_all().map_err(io)?;
        }
        fs::rename(&temp_path, &path).map_err(io)?;

        log::info!("setup {} saved to {}", name.trim(), path.display());
        Ok(path)
    }

    /// Setup names, most recently written first.
    pub fn list(&self) -> Result<Vec<String>, SetupError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(SetupError::Io { path: self.dir.clone(), source }),
        };

        let mut found: Vec<(SystemTime, String)> = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|source| SetupError::Io { path: self.dir.clone(), source })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SETUP_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .map_err(|source| SetupError::Io { path: path.clone(), source })?;
            found.push((modified, stem.to_string()));
        }
        found.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        Ok(found.into_iter().map(|(_, name)| name).collect())
    }

    /// Reads and checks a setup without resolving it against a world.
    pub fn read_sealed(&self, name: &str) -> Result<SealedSetup, SetupError> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(SetupError::NotFound(name.trim().to_string()));
        }
        let contents = fs::read_to_string(&path)
            .map_err(|source| SetupError::Io { path: path.clone(), source })?;
        let sealed: SealedSetup = serde_yaml::from_str(&contents)
            .map_err(|source| SetupError::Parse { path: path.clone(), source })?;
        if !is_digest(&sealed.hash) {
            return Err(SetupError::Corrupted {
                path,
                reason: "the hash field is not a digest".into(),
            });
        }

        let mtime = modified_seconds(&path)?;
        if let Err(signal) = self.codec.verify(&sealed, mtime) {
            log::warn!("setup {} rejected ({})", name.trim(), signal);
            return Err(SetupError::Tampered(signal));
        }
        Ok(sealed)
    }

    /// Loads a setup into a hero of `world`. Potential is rolled again.
    pub fn load<R: Rng + ?Sized>(
        &self,
        name: &str,
        world: &World,
        rng: &mut R,
    ) -> Result<Hero, SetupError> {
        let sealed = self.read_sealed(name)?;
        let hero = Hero::from_record(world, sealed.hero, rng)?;
        log::info!("setup {} loaded", name.trim());
        Ok(hero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hero::HeroInput;
    use crate::models::nation::Nation;
    use crate::models::person::NameTable;
    use crate::models::player::Foot;
    use crate::save::error::TamperSignal;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    fn world() -> World {
        let mut world = World::new();
        world
            .register_nation(Nation::new(
                0,
                vec!["England".into()],
                "ENG".into(),
                "English".into(),
                "white".into(),
                NameTable::default(),
            ))
            .unwrap();
        for name in ["Speedster", "Weak Foot", "Engine"] {
            world.register_trait(name.into(), String::new(), "white".into(), None);
        }
        world
    }

    fn hero(world: &World) -> Hero {
        let input = HeroInput {
            full_name: "Ada Stone".into(),
            shirt_name: None,
            nation: "ENG".into(),
            points: [50, 50, 50, 50, 50, 50],
            foot: Foot::Right,
            traits: vec![3, 1, 2],
        };
        Hero::from_input(world, input, &mut ChaCha8Rng::seed_from_u64(2)).unwrap()
    }

    /// Rewrites a setup file and pins its mtime to `time`.
    fn rewrite(path: &Path, sealed: &SealedSetup, time: f64) {
        fs::write(path, serde_yaml::to_string(sealed).unwrap()).unwrap();
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs_f64(time)).unwrap();
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = SetupStore::new(temp_dir.path());
        let world = world();
        let original = hero(&world);

        let path = store.save("ada", &original, &world).unwrap();
        assert!(path.ends_with("ada.plc"));
        assert!(!path.with_extension("tmp").exists());

        let loaded = store.load("ada", &world, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(loaded.to_record(&world).unwrap(), original.to_record(&world).unwrap());
    }

    #[test]
    fn test_empty_name_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = SetupStore::new(temp_dir.path());
        let world = world();
        assert!(matches!(store.save("  ", &hero(&world), &world), Err(SetupError::EmptyName)));
        assert!(matches!(store.path_for("../x"), Err(SetupError::InvalidName(_))));
    }

    #[test]
    fn test_tamper_signals() {
        let temp_dir = TempDir::new().unwrap();
        let store = SetupStore::new(temp_dir.path());
        let world = world();
        let path = store.save("ada", &hero(&world), &world).unwrap();
        let sealed = store.read_sealed("ada").unwrap();

        let mut edited = sealed.clone();
        edited.hero.pace = 70;
        edited.hero.physicality = 30;
        rewrite(&path, &edited, sealed.time);
        let err = store.read_sealed("ada").unwrap_err();
        assert_eq!(err.tamper_signal(), Some(TamperSignal::HashMismatch));
        assert!(err.is_recoverable());

        let codec = IntegrityCodec::default();
        let old = codec.seal(sealed.hero.clone(), sealed.time - 3600.0).unwrap();
        rewrite(&path, &old, sealed.time);
        assert_eq!(
            store.read_sealed("ada").unwrap_err().tamper_signal(),
            Some(TamperSignal::TimeMismatch)
        );

        let mut both = old.clone();
        both.hero.shirt_name = "Rock".into();
        rewrite(&path, &both, sealed.time);
        assert_eq!(
            store.read_sealed("ada").unwrap_err().tamper_signal(),
            Some(TamperSignal::Both)
        );
    }

    #[test]
    fn test_garbage_is_not_a_setup() {
        let temp_dir = TempDir::new().unwrap();
        let store = SetupStore::new(temp_dir.path());
        fs::write(temp_dir.path().join("junk.plc"), "hero: [1, 2").unwrap();
        assert!(matches!(store.read_sealed("junk"), Err(SetupError::Parse { .. })));
        assert!(matches!(store.read_sealed("nobody"), Err(SetupError::NotFound(_))));
    }

    #[test]
    fn test_list_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let store = SetupStore::new(temp_dir.path());
        let world = world();
        let hero = hero(&world);
        for name in ["first", "second", "third"] {
            store.save(name, &hero, &world).unwrap();
        }
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let pin = |name: &str, secs: u64| {
            let file = File::options()
                .write(true)
                .open(temp_dir.path().join(format!("{}.plc", name)))
                .unwrap();
            file.set_modified(UNIX_EPOCH + Duration::from_secs(secs)).unwrap();
        };
        pin("first", 3_000);
        pin("second", 1_000);
        pin("third", 2_000);

        assert_eq!(store.list().unwrap(), vec!["first", "third", "second"]);
    }

    #[test]
    fn test_list_without_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = SetupStore::new(temp_dir.path().join("missing"));
        assert!(store.list().unwrap().is_empty());
    }
}
