use crate::deck::{ImageRef, SlideDraft};
use crate::events::AppEvent;
use crate::gui::input::KeyBindings;
use crate::gui::ring::{Point, ViewportTuning};
use crate::gui::theme::ThemeConfig;
use crate::summarize::{ShellCommand, TitleService};
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/orbital.sock";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SlideConfig {
    pub title: Option<String>,
    pub content: String,
    pub image: Option<ImageRef>,
}

impl From<&SlideConfig> for SlideDraft {
    fn from(cfg: &SlideConfig) -> Self {
        Self {
            title: cfg.title.clone(),
            content: cfg.content.clone(),
            image: cfg.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub command: Option<ShellCommand>,
    pub timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            command: None,
            timeout_secs: 15,
        }
    }
}

impl SummarizerConfig {
    pub fn service(&self) -> TitleService {
        TitleService::from_config(
            self.command.as_ref(),
            Duration::from_secs(self.timeout_secs),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub socket: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            socket: PathBuf::from(SOCKET_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl DisplayConfig {
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub viewport: ViewportTuning,
    #[serde(default)]
    pub keys: KeyBindings,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub slides: Vec<SlideConfig>,
}

impl Config {
    /// Built-in configuration, including the sample slides.
    pub fn bundled() -> Result<Self, ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()?;
        Ok(s.try_deserialize()?)
    }

    pub fn seed_drafts(&self) -> impl Iterator<Item = SlideDraft> + '_ {
        self.slides.iter().map(SlideDraft::from)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No home directory to keep orbital's config in")]
    ConfigDirNotFound,
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("File watcher failed: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "orbital", "orbital").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("ORBITAL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads the user's config, or the bundled one when there is none or it is unreadable.
pub fn load_or_default() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        return bundled_or_empty();
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            bundled_or_empty()
        }
    }
}

fn bundled_or_empty() -> Config {
    Config::bundled().unwrap_or_else(|e| {
        log::error!("Bundled config is invalid: {}", e);
        Config::default()
    })
}

/// Seeds the config file with the bundled defaults on first run. An existing file is
/// left alone. Returns the config path either way.
pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path = get_config_path().map_err(std::io::Error::other)?;
    if path.exists() {
        return Ok(path);
    }
    if let Some(dir) = path.parent() {
        fs_err::create_dir_all(dir)?;
    }
    fs_err::write(&path, DEFAULT_CONFIG)?;
    log::info!("Wrote default config to {}", path.display());
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Quiet period after the last file event before a reload is requested. Editors
/// usually save with several writes and renames in quick succession.
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(200);

fn touches_config(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

/// Watches the config directory and sends one `ConfigReload` per burst of changes
/// to the config file. Returns when the event loop is gone or the watcher fails.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Not watching config: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return;
    };
    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Not watching config: {}", e);
        return;
    }

    // notify calls back on its own thread; bridge into the runtime
    let (file_tx, file_rx) = async_channel::unbounded();
    let watcher = RecommendedWatcher::new(
        move |res| {
            let _ = file_tx.send_blocking(res);
        },
        notify::Config::default(),
    );
    let mut watcher = match watcher {
        Ok(w) => w,
        Err(e) => {
            log::error!("Not watching config: {}", ConfigError::from(e));
            return;
        }
    };
    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Not watching {}: {}", config_dir.display(), e);
        return;
    }
    log::debug!("Watching {} for changes", config_path.display());

    let is_change = |res: notify::Result<notify::Event>| match res {
        Ok(event) => touches_config(&event, &config_path),
        Err(e) => {
            log::warn!("Config watch error: {}", e);
            false
        }
    };

    while let Ok(res) = file_rx.recv().await {
        if !is_change(res) {
            continue;
        }
        // swallow the rest of the burst
        while let Ok(Ok(_)) = tokio::time::timeout(RELOAD_DEBOUNCE, file_rx.recv()).await {}

        log::info!("{} changed, reloading", config_path.display());
        if tx.send(AppEvent::ConfigReload).await.is_err() {
            break;
        }
    }
}
