pub mod savefile;

pub use savefile::{
    SaveFileError, SaveOptions, backup_path, load_document, load_world, load_world_or_backup,
    render, save_world,
};
