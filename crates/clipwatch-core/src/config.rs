//! Filesystem locations used by Clipwatch.
//!
//! # Storage Structure
//!
//! ```text
//! ~/.clipwatch/
//! ├── config.json     # Operator configuration
//! └── transcripts/    # Per-session chat and trigger transcripts
//! ```
//!
//! Saved clips live in the platform video directory, not under the state dir.
//!
//! # Environment Variables
//!
//! - `CLIPWATCH_STATE_DIR`: Override the base state directory
//! - `CONFIG_FILE`: Override the configuration file path
//! - `VIDEO_DIRECTORY`: Override the clip directory (`~` is expanded)
//! - `PLATFORM_OS`: Force platform detection (`windows`, `linux`, `darwin`)
//! - `XDG_VIDEOS_DIR`: Linux video directory when no override is set

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::debug;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "CLIPWATCH_STATE_DIR";

/// Environment variable for custom configuration file.
pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";

/// Environment variable for custom video directory.
pub const VIDEO_DIR_ENV: &str = "VIDEO_DIRECTORY";

/// Environment variable forcing the detected platform.
pub const PLATFORM_ENV: &str = "PLATFORM_OS";

const XDG_VIDEOS_ENV: &str = "XDG_VIDEOS_DIR";

const DEFAULT_STATE_DIR: &str = ".clipwatch";
const CONFIG_FILE_NAME: &str = "config.json";
const TRANSCRIPTS_SUBDIR: &str = "transcripts";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Host platform, as far as directory conventions are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    Darwin,
}

impl Platform {
    /// Parses a platform name; unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "windows" => Some(Platform::Windows),
            "linux" => Some(Platform::Linux),
            "darwin" | "macos" => Some(Platform::Darwin),
            _ => None,
        }
    }

    /// Detects the platform, honouring `PLATFORM_OS`. Unknown systems are
    /// treated as Linux.
    pub fn detect() -> Self {
        std::env::var(PLATFORM_ENV)
            .ok()
            .and_then(|name| Self::from_name(&name))
            .or_else(|| Self::from_name(std::env::consts::OS))
            .unwrap_or(Platform::Linux)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Darwin => "darwin",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Get the Clipwatch state directory.
///
/// 1. `CLIPWATCH_STATE_DIR` environment variable if set
/// 2. `~/.clipwatch` if home directory is available
/// 3. `.clipwatch` in current directory as fallback
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| {
            std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::home_dir()
                        .map(|h| h.join(DEFAULT_STATE_DIR))
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
                })
        })
        .clone()
}

/// Get the configuration file path.
///
/// Defaults to `~/.clipwatch/config.json` or the `CONFIG_FILE` env var.
pub fn config_file() -> PathBuf {
    std::env::var(CONFIG_FILE_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| state_dir().join(CONFIG_FILE_NAME))
}

/// Get the transcripts directory.
pub fn transcripts_dir() -> PathBuf {
    state_dir().join(TRANSCRIPTS_SUBDIR)
}

/// Get the directory saved clips are listed from.
pub fn video_dir() -> PathBuf {
    let platform = Platform::detect();
    let dir = resolve_video_dir(
        std::env::var(VIDEO_DIR_ENV).ok().as_deref(),
        platform,
        dirs::home_dir(),
        std::env::var(XDG_VIDEOS_ENV).ok().as_deref(),
    );
    debug!(platform = platform.as_str(), dir = %dir.display(), "Resolved video directory");
    dir
}

/// Resolves the video directory from explicit inputs.
///
/// An override wins and is tilde-expanded. Otherwise macOS uses `~/Movies`,
/// Linux uses `XDG_VIDEOS_DIR` when set, and everything else `~/Videos`.
pub fn resolve_video_dir(
    override_dir: Option<&str>,
    platform: Platform,
    home: Option<PathBuf>,
    xdg_videos: Option<&str>,
) -> PathBuf {
    if let Some(custom) = override_dir.map(str::trim).filter(|d| !d.is_empty()) {
        return PathBuf::from(shellexpand::tilde(custom).into_owned());
    }

    let home = home.unwrap_or_else(|| PathBuf::from("."));
    match platform {
        Platform::Darwin => home.join("Movies"),
        Platform::Windows => home.join("Videos"),
        Platform::Linux => xdg_videos
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join("Videos")),
    }
}

/// Ensure the state directory exists, creating it if necessary.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn ensure_state_dir() -> std::io::Result<()> {
    let dir = state_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_platform_from_name() {
        assert_eq!(Platform::from_name("Windows"), Some(Platform::Windows));
        assert_eq!(Platform::from_name(" darwin "), Some(Platform::Darwin));
        assert_eq!(Platform::from_name("macos"), Some(Platform::Darwin));
        assert_eq!(Platform::from_name("linux"), Some(Platform::Linux));
        assert_eq!(Platform::from_name("plan9"), None);
    }

    #[test]
    fn test_video_dir_override_wins() {
        let dir = resolve_video_dir(
            Some("/srv/clips"),
            Platform::Darwin,
            Some(PathBuf::from("/home/u")),
            None,
        );
        assert_eq!(dir, PathBuf::from("/srv/clips"));
    }

    #[test]
    fn test_video_dir_override_blank_ignored() {
        let dir = resolve_video_dir(
            Some("  "),
            Platform::Windows,
            Some(PathBuf::from("/home/u")),
            None,
        );
        assert_eq!(dir, Path::new("/home/u").join("Videos"));
    }

    #[test]
    fn test_video_dir_platform_defaults() {
        let home = Some(PathBuf::from("/home/u"));
        assert_eq!(
            resolve_video_dir(None, Platform::Darwin, home.clone(), None),
            Path::new("/home/u").join("Movies")
        );
        assert_eq!(
            resolve_video_dir(None, Platform::Linux, home.clone(), None),
            Path::new("/home/u").join("Videos")
        );
        assert_eq!(
            resolve_video_dir(None, Platform::Linux, home, Some("/media/videos")),
            PathBuf::from("/media/videos")
        );
    }

    #[test]
    fn test_transcripts_dir_name() {
        assert!(transcripts_dir().ends_with("transcripts"));
    }

    #[test]
    fn test_state_dir_smoke() {
        let dir = state_dir();
        assert!(dir.is_absolute() || dir.ends_with(".clipwatch"));
    }
}
