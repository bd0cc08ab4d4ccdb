use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, warn};

use crate::codec::CodecError;
use crate::config::editor::EditorConfig;
use crate::world::World;

/// Errors raised while reading or writing save files.
#[derive(Debug, thiserror::Error)]
pub enum SaveFileError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("neither {} nor its backup holds a readable world", .path.display())]
    NoValidSave { path: PathBuf },
}

impl SaveFileError {
    fn io(path: &Path, source: io::Error) -> Self {
        SaveFileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// How a world is written back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Spaces per indentation level; 0 writes compact JSON.
    pub indent: usize,
    /// Copy an existing file to `<file>.bak` before replacing it.
    pub backup: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            indent: 0,
            backup: true,
        }
    }
}

impl From<&EditorConfig> for SaveOptions {
    fn from(config: &EditorConfig) -> Self {
        Self {
            indent: config.indent,
            backup: config.backup,
        }
    }
}

/// Path of the backup kept next to `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "world".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Read and parse a save file without interpreting it.
pub fn load_document(path: &Path) -> Result<Value, SaveFileError> {
    let text = fs::read_to_string(path).map_err(|e| SaveFileError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| SaveFileError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_world(path: &Path) -> Result<World, SaveFileError> {
    let document = load_document(path)?;
    let world = World::decode(&document)?;
    debug!(path = %path.display(), name = %world.name, "Loaded world");
    Ok(world)
}

/// Load `path`, falling back to its backup if the file itself is unreadable.
pub fn load_world_or_backup(path: &Path) -> Result<World, SaveFileError> {
    match load_world(path) {
        Ok(world) => Ok(world),
        Err(err) => {
            let backup = backup_path(path);
            warn!(path = %path.display(), error = %err, "Save unreadable, trying backup");
            load_world(&backup).map_err(|backup_err| {
                warn!(path = %backup.display(), error = %backup_err, "Backup unreadable");
                SaveFileError::NoValidSave {
                    path: path.to_path_buf(),
                }
            })
        }
    }
}

/// Serialize a document with the given indentation.
pub fn render(document: &Value, indent: usize) -> Result<Vec<u8>, serde_json::Error> {
    if indent == 0 {
        return serde_json::to_vec(document);
    }
    let indent = vec![b' '; indent];
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
    document.serialize(&mut serializer)?;
    Ok(out)
}

/// Encode `world` and write it to `path`.
///
/// The text goes to a hidden temporary file next to the target which is then
/// renamed over it, so a failed write never leaves a truncated save behind.
pub fn save_world(world: &World, path: &Path, options: SaveOptions) -> Result<(), SaveFileError> {
    let document = world.encode()?;
    let bytes = render(&document, options.indent).map_err(|source| SaveFileError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if options.backup && path.is_file() {
        let backup = backup_path(path);
        fs::copy(path, &backup).map_err(|e| SaveFileError::io(&backup, e))?;
        debug!(path = %backup.display(), "Wrote backup");
    }

    let tmp = temp_path(path);
    if let Err(e) = fs::write(&tmp, &bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(SaveFileError::io(&tmp, e));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(SaveFileError::io(path, e));
    }

    debug!(path = %path.display(), bytes = bytes.len(), "Saved world");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{GameFlag, GameMode, TileType};
    use tempfile::TempDir;

    fn sample_world() -> World {
        let mut world = World::new("Disk", GameMode::Free, 42, 20, TileType::Grass).unwrap();
        let rock = world.new_object("Rock");
        world.place(3, 4, rock).unwrap();
        world.set_option(GameFlag::Recording, true);
        world
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("world.json");
        let world = sample_world();

        save_world(&world, &path, SaveOptions::default()).unwrap();
        let loaded = load_world(&path).unwrap();
        assert_eq!(loaded, world);
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("world.json");
        save_world(&sample_world(), &path, SaveOptions::default()).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["world.json".to_string()]);
    }

    #[test]
    fn overwrite_keeps_backup_of_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("world.json");
        let mut world = sample_world();
        save_world(&world, &path, SaveOptions::default()).unwrap();

        world.rename("Second");
        save_world(&world, &path, SaveOptions::default()).unwrap();

        assert_eq!(load_world(&path).unwrap().name, "Second");
        assert_eq!(load_world(&backup_path(&path)).unwrap().name, "Disk");
    }

    #[test]
    fn backup_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("world.json");
        let options = SaveOptions {
            indent: 0,
            backup: false,
        };
        save_world(&sample_world(), &path, options).unwrap();
        save_world(&sample_world(), &path, options).unwrap();
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn indent_controls_layout() {
        let dir = TempDir::new().unwrap();
        let compact = dir.path().join("compact.json");
        let pretty = dir.path().join("pretty.json");
        let world = sample_world();
        save_world(&world, &compact, SaveOptions { indent: 0, backup: false }).unwrap();
        save_world(&world, &pretty, SaveOptions { indent: 4, backup: false }).unwrap();

        let compact_text = fs::read_to_string(&compact).unwrap();
        let pretty_text = fs::read_to_string(&pretty).unwrap();
        assert!(!compact_text.contains('\n'));
        assert!(pretty_text.contains("\n    \"AutonautsWorld\": 1"));
        assert_eq!(load_document(&compact).unwrap(), load_document(&pretty).unwrap());
    }

    #[test]
    fn encoded_key_order_is_preserved() {
        let text = String::from_utf8(render(&sample_world().encode().unwrap(), 0).unwrap()).unwrap();
        let marker = text.find("AutonautsWorld").unwrap();
        let objects = text.find("Objects").unwrap();
        assert!(marker < objects);
        assert!(text.starts_with("{\"AutonautsWorld\":1,\"Version\":\"140.2\""));
    }

    #[test]
    fn invalid_json_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_world(&path).unwrap_err();
        assert!(matches!(err, SaveFileError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn codec_errors_pass_through() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "{}").unwrap();
        let err = load_world(&path).unwrap_err();
        assert!(matches!(err, SaveFileError::Codec(CodecError::Schema { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_document(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SaveFileError::Io { .. }));
    }

    #[test]
    fn backup_used_when_primary_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("world.json");
        let world = sample_world();
        save_world(&world, &path, SaveOptions::default()).unwrap();
        save_world(&world, &path, SaveOptions::default()).unwrap();
        fs::write(&path, "garbage").unwrap();

        let recovered = load_world_or_backup(&path).unwrap();
        assert_eq!(recovered, world);

        fs::write(backup_path(&path), "garbage").unwrap();
        assert!(matches!(
            load_world_or_backup(&path),
            Err(SaveFileError::NoValidSave { .. })
        ));
    }
}
