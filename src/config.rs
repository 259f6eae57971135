use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use crate::gl_api::buffer::UsageType;

/// Where the configuration is looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "triangle.toml";

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, io::Error),
    Parse(toml::de::Error),
    Invalid(String),
    Args(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Io(path, err) => write!(f, "could not read {}: {}", path.display(), err),
            ConfigError::Parse(err) => write!(f, "malformed config: {}", err),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
            ConfigError::Args(msg) => write!(f, "{}", msg),
        }
    }
}

impl ::std::error::Error for ConfigError {}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DrawMode {
    /// Upload the points once into a vertex buffer and draw it with
    /// `glDrawArrays` every frame.
    #[default]
    Buffer,
    /// Send every vertex with `glBegin`/`glVertex`/`glEnd` every frame.
    Immediate,
}

impl FromStr for DrawMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buffer" => Ok(DrawMode::Buffer),
            "immediate" => Ok(DrawMode::Immediate),
            other => Err(ConfigError::Args(format!(
                "unknown draw mode {:?}, expected `buffer` or `immediate`",
                other
            ))),
        }
    }
}

impl TryFrom<String> for DrawMode {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            DrawMode::Buffer => "buffer",
            DrawMode::Immediate => "immediate",
        })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferUsage {
    #[default]
    Static,
    Dynamic,
    Stream,
}

impl From<BufferUsage> for UsageType {
    fn from(usage: BufferUsage) -> Self {
        match usage {
            BufferUsage::Static => UsageType::StaticDraw,
            BufferUsage::Dynamic => UsageType::DynamicDraw,
            BufferUsage::Stream => UsageType::StreamDraw,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub close_on_escape: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "Hello World".to_owned(),
            width: 640,
            height: 480,
            vsync: true,
            close_on_escape: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub mode: DrawMode,
    /// Draw in immediate mode when buffer objects are not available instead
    /// of failing.
    pub fallback_to_immediate: bool,
    pub usage: BufferUsage,
    pub clear_color: [f32; 4],
    pub color: [f32; 4],
    /// Triangle corners in normalized device coordinates, three per triangle.
    pub vertices: Vec<[f32; 2]>,
    pub vertex_shader: Option<PathBuf>,
    pub fragment_shader: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            mode: DrawMode::Buffer,
            fallback_to_immediate: false,
            usage: BufferUsage::Static,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            color: [1.0, 1.0, 1.0, 1.0],
            vertices: vec![[-0.5, -0.5], [0.0, 0.5], [0.5, 0.5]],
            vertex_shader: None,
            fragment_shader: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `env_logger` filter, e.g. `"debug"` or `"hello_triangle=trace"`.
    pub filter: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`. A missing file at the default location is not an error,
    /// the built-in defaults are used instead.
    pub fn load(path: &Path, explicit: bool) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(source) => Config::from_toml(&source),
            Err(err) if err.kind() == io::ErrorKind::NotFound && !explicit => Ok(Config::default()),
            Err(err) => Err(ConfigError::Io(path.to_owned(), err)),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.window.width == 0 || self.window.height == 0 {
            return invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            ));
        }

        let vertices = &self.render.vertices;
        if vertices.is_empty() || vertices.len() % 3 != 0 {
            return invalid(format!(
                "vertex count must be a non-zero multiple of 3, got {}",
                vertices.len()
            ));
        }
        if let Some(index) = vertices.iter().position(|v| !v.iter().all(|c| c.is_finite())) {
            return invalid(format!("vertex {} is not finite: {:?}", index, vertices[index]));
        }

        for (name, color) in &[("clear_color", self.render.clear_color), ("color", self.render.color)] {
            if !color.iter().all(|c| (0.0..=1.0).contains(c)) {
                return invalid(format!("{} components must be in [0, 1], got {:?}", name, color));
            }
        }

        Ok(())
    }
}

/// Command line arguments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub mode: Option<DrawMode>,
    pub help: bool,
}

pub const USAGE: &str = "usage: hello-triangle [--config <path>] [--mode <buffer|immediate>]";

impl Args {
    /// Parses arguments, not including the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Args::default();
        let mut args = args.into_iter().map(Into::<String>::into);

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| ConfigError::Args(format!("{} needs a value\n{}", flag, USAGE)))
            };
            match arg.as_str() {
                "-c" | "--config" => parsed.config = Some(PathBuf::from(value(arg.as_str())?)),
                "-m" | "--mode" => parsed.mode = Some(value(arg.as_str())?.parse()?),
                "-h" | "--help" => parsed.help = true,
                other => return Err(ConfigError::Args(format!("unexpected argument {:?}\n{}", other, USAGE))),
            }
        }

        Ok(parsed)
    }

    /// Loads the config file and applies the command line overrides on top.
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path, true)?,
            None => Config::load(Path::new(DEFAULT_CONFIG_PATH), false)?,
        };
        if let Some(mode) = self.mode {
            config.render.mode = mode;
        }
        Ok(config)
    }
}
