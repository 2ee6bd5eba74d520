use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::{collections::BTreeMap, fmt::Debug, fs, path::PathBuf};

/// Storage key holding `"dark"` or `"light"`.
pub const THEME_KEY: &str = "weather-app-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Only the two exact stored values are recognised.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Page-level style key, empty for the light theme.
    pub fn style_class(&self) -> &'static str {
        match self {
            Theme::Light => "",
            Theme::Dark => "dark-theme",
        }
    }

    /// Icon shown on the toggle: the theme you would switch to.
    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Theme::Light => "fas fa-moon",
            Theme::Dark => "fas fa-sun",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value storage for the persisted theme flag.
pub trait ThemeStore: Send + Debug {
    fn load(&self) -> Result<Option<String>>;
    fn save(&mut self, value: &str) -> Result<()>;
}

/// Read the persisted theme; any failure or unknown value means light.
pub fn restore_theme(store: &dyn ThemeStore) -> Theme {
    match store.load() {
        Ok(Some(value)) => Theme::parse(&value).unwrap_or_else(|| {
            tracing::debug!(value = %value, "ignoring unrecognised stored theme");
            Theme::Light
        }),
        Ok(None) => Theme::Light,
        Err(e) => {
            tracing::warn!("Could not load saved theme: {e:#}");
            Theme::Light
        }
    }
}

/// Persist the theme, logging instead of failing.
pub fn persist_theme(store: &mut dyn ThemeStore, theme: Theme) {
    if let Err(e) = store.save(theme.as_str()) {
        tracing::warn!("Theme preference not saved: {e:#}");
    }
}

/// Preferences TOML file in the platform data directory.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_location() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "weather-dash", "weather-dash")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(Self::new(dirs.data_dir().join("preferences.toml")))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences: {}", self.path.display()))
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(THEME_KEY))
    }

    fn save(&mut self, value: &str) -> Result<()> {
        // Keep unrelated keys; a corrupt file is replaced.
        let mut prefs = self.read_all().unwrap_or_default();
        prefs.insert(THEME_KEY.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string(&prefs).context("Failed to serialize preferences")?;
        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))
    }
}

/// In-process store; `unavailable()` fails every operation.
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    value: Option<String>,
    unavailable: bool,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        Self { value: Some(value.to_string()), unavailable: false }
    }

    pub fn unavailable() -> Self {
        Self { value: None, unavailable: true }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<String>> {
        if self.unavailable {
            return Err(anyhow!("storage unavailable"));
        }
        Ok(self.value.clone())
    }

    fn save(&mut self, value: &str) -> Result<()> {
        if self.unavailable {
            return Err(anyhow!("storage unavailable"));
        }
        self.value = Some(value.to_string());
        Ok(())
    }
}
