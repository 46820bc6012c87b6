// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2018, Olof Kraigher olof.kraigher@gmail.com

//! Configuration of libraries, the VHDL standard and diagnostic severities

use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::path::Path;

use fnv::FnvHashMap;
use toml::{Table, Value};

use crate::data::error_codes::ErrorCode;
use crate::data::*;
use crate::standard::VHDLStandard;

/// Libraries treated as predefined unless a configuration says otherwise
const DEFAULT_PREDEFINED: [&str; 2] = ["std", "ieee"];

/// Name of the configuration file looked for in the home folder
const HOME_CONFIG_FILE: &str = ".vhdl_model.toml";

/// Environment variable naming an additional configuration file
pub const CONFIG_ENV_VAR: &str = "VHDL_MODEL_CONFIG";

#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct Config {
    // A map from normalized library name to its settings
    libraries: FnvHashMap<String, LibraryConfig>,
    standard: VHDLStandard,
    // Defines the severity that diagnostics are displayed with
    severities: SeverityMap,
}

#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct LibraryConfig {
    name: String,
    pub(crate) predefined: bool,
}

impl LibraryConfig {
    /// Returns the name of the library as written in the configuration
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn is_predefined(&self) -> bool {
        self.predefined
    }
}

impl Config {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(string: &str) -> Result<Config, String> {
        let config = string.parse::<Table>().map_err(|err| err.to_string())?;
        let mut libraries = FnvHashMap::default();

        let standard = if let Some(std) = config.get("standard") {
            let std_str = std.as_str().ok_or("standard must be a string")?;
            VHDLStandard::try_from(std_str)
                .map_err(|_| format!("Unsupported standard '{std_str}'"))?
        } else {
            VHDLStandard::default()
        };

        if let Some(libs) = config.get("libraries") {
            let libs = libs.as_table().ok_or("libraries must be a table")?;

            for (name, lib) in libs.iter() {
                if name.eq_ignore_ascii_case("work") {
                    return Err(format!(
                        "The '{name}' library is not a valid library.\nHint: 'work' always refers to the library of the design unit itself"
                    ));
                }

                let lib = lib
                    .as_table()
                    .ok_or_else(|| format!("library {name} must be a table"))?;

                let mut predefined = false;
                if let Some(opt) = lib.get("predefined") {
                    if let Some(opt) = opt.as_bool() {
                        predefined = opt;
                    } else {
                        return Err(format!(
                            "Expected predefined to be boolean for library {name}"
                        ));
                    }
                }

                libraries.insert(
                    name.to_ascii_lowercase(),
                    LibraryConfig {
                        name: name.to_owned(),
                        predefined,
                    },
                );
            }
        }

        let severities = if let Some(lint) = config.get("lint") {
            Self::read_severity_overwrites(lint.as_table().ok_or("lint must be a table")?)?
        } else {
            SeverityMap::default()
        };

        Ok(Config {
            libraries,
            severities,
            standard,
        })
    }

    fn read_severity_overwrites(severity_overwrites: &Table) -> Result<SeverityMap, String> {
        let mut severities = SeverityMap::default();

        for (name, severity) in severity_overwrites {
            let error_code = ErrorCode::try_from(name.as_str())
                .map_err(|_| format!("'{name}' is not a valid error code"))?;
            match severity {
                Value::String(severity) => {
                    let severity = Severity::try_from(severity.as_str())
                        .map_err(|_| format!("'{severity}' is not a valid severity level"))?;
                    severities[error_code] = Some(severity);
                }
                Value::Boolean(should_show) => {
                    if !should_show {
                        severities[error_code] = None
                    }
                }
                _ => return Err("severity must be a string or boolean".to_string()),
            }
        }
        Ok(severities)
    }

    pub fn read_file_path(file_name: &Path) -> io::Result<Config> {
        let mut file = File::open(file_name)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Config::from_str(&contents).map_err(io::Error::other)
    }

    pub fn get_library(&self, name: &str) -> Option<&LibraryConfig> {
        self.libraries.get(&name.to_ascii_lowercase())
    }

    pub fn iter_libraries(&self) -> impl Iterator<Item = &LibraryConfig> {
        self.libraries.values()
    }

    /// Whether units of the library are marked as predefined in the dependency graph.
    /// Libraries absent from the configuration fall back to `std` and `ieee`.
    pub fn is_predefined(&self, library_name: &str) -> bool {
        match self.get_library(library_name) {
            Some(library) => library.predefined,
            None => DEFAULT_PREDEFINED
                .iter()
                .any(|name| name.eq_ignore_ascii_case(library_name)),
        }
    }

    pub fn set_predefined(&mut self, library_name: &str, predefined: bool) {
        self.libraries
            .entry(library_name.to_ascii_lowercase())
            .or_insert_with(|| LibraryConfig {
                name: library_name.to_owned(),
                predefined,
            })
            .predefined = predefined;
    }

    /// Append another config to self
    ///
    /// In case of conflict the appended config takes precedence
    pub fn append(&mut self, config: &Config, messages: &mut dyn MessageHandler) {
        self.standard = config.standard;
        for (key, library) in config.libraries.iter() {
            if let Some(parent_library) = self.libraries.get_mut(key) {
                *parent_library = library.clone();

                messages.push(Message::warning(format!(
                    "Re-defined library {}",
                    &library.name
                )));
            } else {
                self.libraries.insert(key.clone(), library.clone());
            }
        }
        self.severities = config.severities;
    }

    /// Load configuration file from home folder
    fn load_home_config(&mut self, messages: &mut dyn MessageHandler) {
        if let Some(home_dir) = dirs::home_dir() {
            let file_name = home_dir.join(HOME_CONFIG_FILE);

            if !file_name.exists() {
                return;
            }

            self.load_config(&file_name, "HOME folder", messages);
        }
    }

    /// Load configuration file from environment
    fn load_env_config(&mut self, env_name: &str, messages: &mut dyn MessageHandler) {
        if let Some(file_name) = std::env::var_os(env_name) {
            self.load_config(Path::new(&file_name), env_name, messages);
        };
    }

    /// Load and append configuration file
    fn load_config(&mut self, file_name: &Path, desc: &str, messages: &mut dyn MessageHandler) {
        match Config::read_file_path(file_name) {
            Ok(env_config) => {
                messages.push(Message::log(format!(
                    "Loaded {} configuration file: {}",
                    desc,
                    file_name.to_string_lossy()
                )));

                self.append(&env_config, messages);
            }
            Err(ref err) => {
                messages.push(Message::file_error(
                    format!("Error while loading {desc} configuration file: {err}"),
                    file_name,
                ));
            }
        }
    }

    /// Load all external configuration: first `~/.vhdl_model.toml`, then
    /// the file named by the `VHDL_MODEL_CONFIG` environment variable.
    pub fn load_external_config(&mut self, messages: &mut dyn MessageHandler) {
        self.load_home_config(messages);
        self.load_env_config(CONFIG_ENV_VAR, messages);
    }

    pub fn severities(&self) -> &SeverityMap {
        &self.severities
    }

    /// The VHDL standard to check the design against.
    /// By default, VHDL 2008 is assumed
    pub fn standard(&self) -> VHDLStandard {
        self.standard
    }

    pub fn with_standard(mut self, standard: VHDLStandard) -> Config {
        self.standard = standard;
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Utility function to create a file with contents in parent folder
    fn write_file(parent: &Path, file_name: &str, contents: &str) -> std::path::PathBuf {
        let path = parent.join(file_name);
        let mut file = File::create(&path).expect("Assume file can be created");
        file.write_all(contents.as_bytes())
            .expect("Assume file can be written");
        path
    }

    #[test]
    fn default_predefined_libraries() {
        let config = Config::default();
        assert!(config.is_predefined("std"));
        assert!(config.is_predefined("IEEE"));
        assert!(!config.is_predefined("lib"));
        assert_eq!(config.standard(), VHDLStandard::VHDL2008);
    }

    #[test]
    fn config_from_str() {
        let config = Config::from_str(
            "
standard = '1993'

[libraries]
unisim.predefined = true
ieee.predefined = false
lib.predefined = false
",
        )
        .unwrap();

        assert_eq!(config.standard(), VHDLStandard::VHDL1993);
        assert!(config.is_predefined("UNISIM"));
        assert!(!config.is_predefined("ieee"));
        assert!(config.is_predefined("std"));
        assert!(!config.is_predefined("lib"));
        assert_eq!(config.get_library("Unisim").map(|lib| lib.name()), Some("unisim"));
        assert_eq!(config.iter_libraries().count(), 3);
    }

    #[test]
    fn work_is_not_a_valid_library_name() {
        let err = Config::from_str(
            "
[libraries]
work.predefined = true
",
        )
        .unwrap_err();
        assert!(err.starts_with("The 'work' library is not a valid library."));
    }

    #[test]
    fn predefined_must_be_boolean() {
        assert_eq!(
            Config::from_str(
                "
[libraries]
lib.predefined = 'yes'
"
            ),
            Err("Expected predefined to be boolean for library lib".to_owned())
        );
    }

    #[test]
    fn unsupported_standard() {
        assert_eq!(
            Config::from_str("standard = '2000'"),
            Err("Unsupported standard '2000'".to_owned())
        );
    }

    #[test]
    fn severity_overrides() {
        let config = Config::from_str(
            "
[lint]
unbound_component = 'error'
no_top_level = false
",
        )
        .unwrap();

        let severities = config.severities();
        assert_eq!(
            severities[ErrorCode::UnboundComponent],
            Some(Severity::Error)
        );
        assert_eq!(severities[ErrorCode::NoTopLevel], None);
        assert_eq!(
            severities[ErrorCode::AmbiguousTopLevel],
            Some(Severity::Warning)
        );
    }

    #[test]
    fn invalid_severity_overrides() {
        assert_eq!(
            Config::from_str(
                "
[lint]
not_a_code = 'error'
"
            ),
            Err("'not_a_code' is not a valid error code".to_owned())
        );
        assert_eq!(
            Config::from_str(
                "
[lint]
no_top_level = 'loud'
"
            ),
            Err("'loud' is not a valid severity level".to_owned())
        );
    }

    #[test]
    fn append_config() {
        let mut config0 = Config::from_str(
            "
[libraries]
lib0.predefined = true
lib1.predefined = false
",
        )
        .unwrap();

        let config1 = Config::from_str(
            "
standard = '2019'

[libraries]
lib1.predefined = true
",
        )
        .unwrap();

        let mut messages = vec![];
        config0.append(&config1, &mut messages);
        assert_eq!(
            messages,
            vec![Message::warning("Re-defined library lib1")]
        );
        assert!(config0.is_predefined("lib0"));
        assert!(config0.is_predefined("lib1"));
        assert_eq!(config0.standard(), VHDLStandard::VHDL2019);
    }

    #[test]
    fn read_config_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let file_name = write_file(
            tempdir.path(),
            "vhdl_model.toml",
            "
[libraries]
osvvm.predefined = true
",
        );

        let config = Config::read_file_path(&file_name).unwrap();
        assert!(config.is_predefined("osvvm"));

        let missing = tempdir.path().join("missing.toml");
        assert!(Config::read_file_path(&missing).is_err());
    }

    #[test]
    fn load_config_reports_errors_as_messages() {
        let tempdir = tempfile::tempdir().unwrap();
        let file_name = write_file(tempdir.path(), "broken.toml", "standard = [");

        let mut config = Config::default();
        let mut messages = vec![];
        config.load_config(&file_name, "test", &mut messages);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message_type, MessageType::Error);
        assert_eq!(config, Config::default());

        let file_name = write_file(tempdir.path(), "good.toml", "standard = '2019'");
        let mut messages = vec![];
        config.load_config(&file_name, "test", &mut messages);
        assert_eq!(messages[0].message_type, MessageType::Log);
        assert_eq!(config.standard(), VHDLStandard::VHDL2019);
    }

    #[test]
    fn set_predefined_overrides_default() {
        let mut config = Config::default();
        config.set_predefined("ieee", false);
        config.set_predefined("unisim", true);
        assert!(!config.is_predefined("ieee"));
        assert!(config.is_predefined("unisim"));
    }
}
