use std::{fs, io};
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use log::{debug, warn};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "snail.ini";
pub const CONFIG_SECTION: &str = "config";

pub const JAVA_PATH_KEY: &str = "java.path";
pub const JVM_FILE_PATH_KEY: &str = "jvm.file.path";
pub const MODEL_KEY: &str = "model";
pub const XMS_KEY: &str = "xms";
pub const XMX_KEY: &str = "xmx";
pub const FILE_ENCODING_KEY: &str = "file.encoding";
pub const JAR_FILE_PATH_KEY: &str = "jar.file.path";

/// Values are read through a 128 unit buffer, one unit of which is the terminator.
pub const MAX_VALUE_LEN: usize = 127;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ini::ParseError),
}

/// Values read from the `[config]` section. An absent key is an empty string, nothing here
/// is validated or defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchConfig {
    pub java_path: String,
    pub jvm_file_path: String,
    pub model: String,
    pub xms: String,
    pub xmx: String,
    pub file_encoding: String,
    pub jar_file_path: String,
}

impl LaunchConfig {
    pub fn parse(text: impl AsRef<str>) -> Result<LaunchConfig, ConfigError> {
        let text = text.as_ref();
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let parse_option = ParseOption {
            enabled_quote: true,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, parse_option)?;
        Ok(Self::from_ini(&ini))
    }

    pub fn from_ini(ini: &Ini) -> LaunchConfig {
        let lookup = |key: &str| -> String {
            match ini.get_from(Some(CONFIG_SECTION), key) {
                None => {
                    debug!("config key `{}` is not set", key);
                    String::new()
                }
                Some(value) => truncate_value(value).to_string(),
            }
        };
        LaunchConfig {
            java_path: lookup(JAVA_PATH_KEY),
            jvm_file_path: lookup(JVM_FILE_PATH_KEY),
            model: lookup(MODEL_KEY),
            xms: lookup(XMS_KEY),
            xmx: lookup(XMX_KEY),
            file_encoding: lookup(FILE_ENCODING_KEY),
            jar_file_path: lookup(JAR_FILE_PATH_KEY),
        }
    }

    pub fn try_read(path: impl AsRef<Path>) -> Result<LaunchConfig, ConfigError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| ConfigError::Io { path: path.to_path_buf(), err })?;
        Self::parse(String::from_utf8_lossy(bytes.as_slice()))
    }

    /// Behaves like a profile string lookup with an empty default: if the file can't be read
    /// or parsed every key comes back empty.
    pub fn read(path: impl AsRef<Path>) -> LaunchConfig {
        match Self::try_read(path.as_ref()) {
            Ok(config) => config,
            Err(err) => {
                warn!("{}, continuing with an empty config", err);
                LaunchConfig::default()
            }
        }
    }

    pub fn library_search_path(&self) -> &str {
        self.java_path.as_str()
    }

    pub fn jvm_library_path(&self) -> &Path {
        Path::new(self.jvm_file_path.as_str())
    }

    /// Options handed to the runtime factory, always in this order.
    pub fn jvm_options(&self) -> [&str; 5] {
        [
            self.model.as_str(),
            self.xms.as_str(),
            self.xmx.as_str(),
            self.file_encoding.as_str(),
            self.jar_file_path.as_str(),
        ]
    }
}

fn truncate_value(value: &str) -> &str {
    if value.len() <= MAX_VALUE_LEN {
        return value;
    }
    let mut end = MAX_VALUE_LEN;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

pub fn default_config_path() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let exe_dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(exe_dir.join(CONFIG_FILE_NAME))
}
