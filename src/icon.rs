use std::path::{Path, PathBuf};

pub const ICON_FILE_NAME: &str = "icon.svg";

/// Compiled-in copy of `assets/icon.svg`.
pub const BUNDLED_ICON: &str = include_str!("../assets/icon.svg");

/// Used when neither an asset override nor the bundled icon is usable.
pub const DEFAULT_ICON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><rect width="24" height="24" fill="#0060FF"/><text x="12" y="14" font-size="10" fill="#fff" text-anchor="middle">P4</text></svg>"##;

/// Directory next to the running executable, where a packaged connector may
/// place an `icon.svg` override.
pub fn default_asset_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Reads `icon.svg` from `asset_dir`, then falls back to [`BUNDLED_ICON`] and
/// finally [`DEFAULT_ICON`].
///
/// Never fails: a missing directory, unreadable file or blank file all
/// produce a fallback.
pub fn load_icon(asset_dir: Option<&Path>) -> String {
    pick_icon(asset_dir, BUNDLED_ICON)
}

fn pick_icon(asset_dir: Option<&Path>, bundled: &str) -> String {
    asset_dir
        .map(|dir| dir.join(ICON_FILE_NAME))
        .and_then(|path| std::fs::read_to_string(path).ok())
        .filter(|svg| !svg.trim().is_empty())
        .or_else(|| Some(bundled.trim().to_string()).filter(|svg| !svg.is_empty()))
        .unwrap_or_else(|| DEFAULT_ICON.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_the_asset_file() {
        let dir = tempfile::tempdir().unwrap();
        let svg = "<svg xmlns=\"http://www.w3.org/2000/svg\"><circle r=\"4\"/></svg>";
        std::fs::write(dir.path().join(ICON_FILE_NAME), svg).unwrap();
        assert_eq!(load_icon(Some(dir.path())), svg);
    }

    #[test]
    fn falls_back_to_bundled_icon_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_icon(Some(dir.path())), BUNDLED_ICON.trim());
        assert_eq!(load_icon(None), BUNDLED_ICON.trim());
    }

    #[test]
    fn falls_back_when_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in place of the file cannot be read as text.
        std::fs::create_dir(dir.path().join(ICON_FILE_NAME)).unwrap();
        assert_eq!(load_icon(Some(dir.path())), BUNDLED_ICON.trim());

        let other = tempfile::tempdir().unwrap();
        std::fs::write(other.path().join(ICON_FILE_NAME), [0xff, 0xfe, 0x00]).unwrap();
        assert_eq!(load_icon(Some(other.path())), BUNDLED_ICON.trim());
    }

    #[test]
    fn blank_asset_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ICON_FILE_NAME), "  \n").unwrap();
        assert_eq!(load_icon(Some(dir.path())), BUNDLED_ICON.trim());
    }

    #[test]
    fn inline_icon_is_last_resort() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(pick_icon(Some(dir.path()), " \n"), DEFAULT_ICON);
        assert_eq!(pick_icon(None, ""), DEFAULT_ICON);
    }

    #[test]
    fn bundled_icon_is_svg() {
        assert!(BUNDLED_ICON.trim_start().starts_with("<svg"));
        assert_ne!(BUNDLED_ICON.trim(), DEFAULT_ICON);
    }
}
