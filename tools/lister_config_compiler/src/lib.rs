//! Compiles `config/lister.toml` into the Rust constants consumed by
//! `src/config.rs` through `include!`.

use std::{fmt, fs, io, path::Path};

use serde::Deserialize;

pub const FILENAME_BUFFER_MIN: usize = 13;
pub const FILENAME_BUFFER_MAX: usize = 255;
pub const SIZE_COLUMN_WIDTH_MAX: u8 = 20;

#[derive(Debug)]
pub enum ConfigCompilerError {
    Io(io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigCompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "read failed: {err}"),
            Self::Parse(err) => write!(f, "parse failed: {err}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigCompilerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for ConfigCompilerError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::de::Error> for ConfigCompilerError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilesystemToml {
    Fat,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IdleToml {
    Advance,
    Hold,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VolumeToml {
    pub device: String,
    pub mount_point: String,
    pub filesystem: FilesystemToml,
    #[serde(default)]
    pub mount_flags: u32,
    #[serde(default)]
    pub list_path: Option<String>,
}

impl VolumeToml {
    pub fn resolved_list_path(&self) -> &str {
        self.list_path.as_deref().unwrap_or(&self.mount_point)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineToml {
    pub idle: IdleToml,
    pub mount_wait_log_interval: u32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleToml {
    pub filename_buffer_len: usize,
    pub size_column_width: u8,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListerToml {
    pub volume: VolumeToml,
    pub machine: MachineToml,
    pub console: ConsoleToml,
}

pub fn parse_config_str(source: &str) -> Result<ListerToml, ConfigCompilerError> {
    Ok(toml::from_str(source)?)
}

pub fn parse_config_file(path: &Path) -> Result<ListerToml, ConfigCompilerError> {
    let source = fs::read_to_string(path)?;
    parse_config_str(&source)
}

/// Path-component containment: `/mnt/a/b` is inside `/mnt/a`, `/mnt/ab` is not.
fn is_inside(path: &str, dir: &str) -> bool {
    match path.strip_prefix(dir.trim_end_matches('/')) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub fn validate_config(config: &ListerToml) -> Result<(), ConfigCompilerError> {
    let volume = &config.volume;
    check_absolute("volume.device", &volume.device)?;
    check_absolute("volume.mount_point", &volume.mount_point)?;
    let list_path = volume.resolved_list_path();
    check_absolute("volume.list_path", list_path)?;
    if !is_inside(list_path, &volume.mount_point) {
        return Err(invalid(format!(
            "volume.list_path `{list_path}` must be inside volume.mount_point `{}`",
            volume.mount_point
        )));
    }

    if config.machine.mount_wait_log_interval == 0 {
        return Err(invalid("machine.mount_wait_log_interval must be > 0"));
    }

    let len = config.console.filename_buffer_len;
    if !(FILENAME_BUFFER_MIN..=FILENAME_BUFFER_MAX).contains(&len) {
        return Err(invalid(format!(
            "console.filename_buffer_len must be in {FILENAME_BUFFER_MIN}..={FILENAME_BUFFER_MAX}, got {len}"
        )));
    }

    let width = config.console.size_column_width;
    if width == 0 || width > SIZE_COLUMN_WIDTH_MAX {
        return Err(invalid(format!(
            "console.size_column_width must be in 1..={SIZE_COLUMN_WIDTH_MAX}, got {width}"
        )));
    }

    Ok(())
}

fn check_absolute(field: &str, value: &str) -> Result<(), ConfigCompilerError> {
    if value.is_empty() {
        return Err(invalid(format!("{field} must not be empty")));
    }
    if !value.starts_with('/') {
        return Err(invalid(format!("{field} must start with `/`, got `{value}`")));
    }
    if value.chars().any(char::is_control) {
        return Err(invalid(format!("{field} must not contain control characters")));
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> ConfigCompilerError {
    ConfigCompilerError::Invalid(msg.into())
}

pub fn render_generated_config(config: &ListerToml) -> String {
    let volume = &config.volume;
    let filesystem = match volume.filesystem {
        FilesystemToml::Fat => "FilesystemKind::Fat",
    };
    let idle = match config.machine.idle {
        IdleToml::Advance => "IdleBehavior::Advance",
        IdleToml::Hold => "IdleBehavior::Hold",
    };

    let mut out = String::new();
    out.push_str("// @generated by lister_config_compiler. Do not edit.\n\n");
    out.push_str(&format!(
        "pub const FILENAME_BUFFER_LEN: usize = {};\n\n",
        config.console.filename_buffer_len
    ));
    out.push_str("pub const LISTER_CONFIG: ListerConfig = ListerConfig {\n");
    out.push_str("    volume: VolumeConfig {\n");
    out.push_str(&format!("        device: {:?},\n", volume.device));
    out.push_str(&format!("        mount_point: {:?},\n", volume.mount_point));
    out.push_str(&format!("        list_path: {:?},\n", volume.resolved_list_path()));
    out.push_str(&format!("        filesystem: {filesystem},\n"));
    out.push_str(&format!("        mount_flags: {},\n", volume.mount_flags));
    out.push_str("    },\n");
    out.push_str(&format!("    idle: {idle},\n"));
    out.push_str(&format!(
        "    mount_wait_log_interval: {},\n",
        config.machine.mount_wait_log_interval
    ));
    out.push_str(&format!(
        "    size_column_width: {},\n",
        config.console.size_column_width
    ));
    out.push_str("};\n");
    out
}

pub fn generate_from_path(path: &Path) -> Result<String, ConfigCompilerError> {
    let config = parse_config_file(path)?;
    validate_config(&config)?;
    Ok(render_generated_config(&config))
}
