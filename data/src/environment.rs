use std::env;
use std::path::PathBuf;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub fn config_dir() -> PathBuf {
    portable_dir().unwrap_or_else(|| {
        dirs_next::config_dir()
            .expect("expected valid config dir")
            .join("backchat")
    })
}

pub fn data_dir() -> PathBuf {
    portable_dir().unwrap_or_else(|| {
        dirs_next::data_dir()
            .expect("expected valid data dir")
            .join("backchat")
    })
}

/// Checks if a settings file exists in the same directory as the executable.
/// If so, it'll use that directory for both config & data dirs.
fn portable_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let dir = exe.parent()?;

    dir.join(SETTINGS_FILE_NAME)
        .is_file()
        .then(|| dir.to_path_buf())
}
