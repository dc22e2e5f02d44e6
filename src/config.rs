use std::path::PathBuf;
use std::{fs, io};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Base configuration schema backed by a TOML file in the user config dir.
pub trait BaseConfig: Sized + Default + Serialize + DeserializeOwned {
    /// Package name (e.g. `CARGO_PKG_NAME`)
    const PACKAGE: &'static str;

    /// Path of the serialized configuration
    fn path() -> Option<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(Self::PACKAGE))
            .map(|p| p.join("config.toml"))
    }

    /// Load a config instance from the config dir
    fn load() -> io::Result<Self> {
        let path = Self::path().ok_or_else(|| {
            io::Error::new(io::ErrorKind::Other, "unable to define configuration path")
        })?;

        if !path.exists() {
            let config = Self::default();

            // config serialization is optional
            path.parent()
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::Other,
                        "unable to fetch parent dir of config file",
                    )
                })
                .and_then(fs::create_dir_all)
                .and_then(|_| {
                    toml::to_string_pretty(&config)
                        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
                })
                .and_then(|contents| fs::write(path, contents))
                .unwrap_or_else(|e| eprintln!("failed to serialize config file: {}", e));

            return Ok(config);
        }

        let contents = fs::read_to_string(path)?;

        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

/// Directory parsing guards.
///
/// Containers are parsed before any of their payload is trusted, so the
/// directory walk is bounded: a source declaring an absurd section count or
/// size is rejected instead of driving allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum number of directory entries accepted per container.
    pub max_sections: u32,
    /// Maximum declared payload size accepted per section, in bytes.
    pub max_section_size: u64,
}

impl Limits {
    /// Default value as constant
    pub const DEFAULT: Self = Self {
        max_sections: 256,
        max_section_size: 1 << 40,
    };

    /// Set the maximum number of directory entries
    pub fn with_max_sections(&mut self, max_sections: u32) -> &mut Self {
        self.max_sections = max_sections;
        self
    }

    /// Set the maximum declared section size
    pub fn with_max_section_size(&mut self, max_section_size: u64) -> &mut Self {
        self.max_section_size = max_section_size;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BaseConfig for Limits {
    const PACKAGE: &'static str = env!("CARGO_PKG_NAME");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_functions_works() {
        let mut limits = Limits::default();

        limits.with_max_sections(8).with_max_section_size(1024);

        assert_eq!(limits.max_sections, 8);
        assert_eq!(limits.max_section_size, 1024);
    }

    #[test]
    fn default_is_the_constant() {
        assert_eq!(Limits::default(), Limits::DEFAULT);
    }
}
