use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use config::{Config as RawConfig, Environment, Map};
use yaml_rust2::{Yaml, YamlLoader, yaml};

use crate::cli::{CONFIG_FILE_FLAG, Cli, FLAG_NAMES, LOG_LEVEL_FLAG, help_text};
use crate::config::schema::{Config, ProgramVars};
use crate::error::ConfigError;

/// Joins nested config file keys into flag names (`log: {level: x}` sets `log_level`).
pub const KEY_DELIMITER: &str = "_";

/// Merges, from highest to lowest priority: command line flags, environment
/// variables, then the optional YAML config file.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    env: Option<Map<String, String>>,
}

impl ConfigLoader {
    /// Loader backed by the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the process environment with `vars`. Keys are variable names
    /// as they would appear in the environment (`LOG_LEVEL`).
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn load<I, T>(&self, args: I) -> Result<Config, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        if args.is_empty() {
            return Err(ConfigError::NotEnoughArguments);
        }
        if help_requested(&args[1..]) {
            eprintln!("{}", help_text());
            return Err(ConfigError::HelpRequested);
        }

        let cli = Cli::try_parse_from(&args)?;
        let env = self.flag_env();

        let config_file = cli
            .config_file
            .clone()
            .or_else(|| env.get(CONFIG_FILE_FLAG).map(PathBuf::from))
            .filter(|p| !p.as_os_str().is_empty());

        let mut builder = RawConfig::builder();
        if let Some(path) = &config_file {
            for (key, value) in file_values(path)? {
                builder = builder.set_default(key, value)?;
            }
        }
        builder = builder
            .add_source(Environment::default().source(Some(env)))
            .set_override_option(LOG_LEVEL_FLAG, cli.log_level)?;

        let vars: ProgramVars = builder.build()?.try_deserialize()?;
        vars.validate(config_file)
    }

    /// Environment values for declared flags only, keyed by flag name.
    /// Empty values count as unset.
    fn flag_env(&self) -> Map<String, String> {
        FLAG_NAMES
            .iter()
            .filter_map(|flag| {
                let var = flag.to_ascii_uppercase();
                let value = match &self.env {
                    Some(env) => env.get(&var).cloned(),
                    None => std::env::var(&var).ok(),
                }?;
                (!value.is_empty()).then(|| (flag.to_string(), value))
            })
            .collect()
    }
}

/// Parse program variables from `args` (program name first) and the process
/// environment.
pub fn read_program_variables<I, T>(args: I) -> Result<Config, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    ConfigLoader::new().load(args)
}

/// `-h`/`--help` anywhere before a `--` terminator.
fn help_requested(args: &[OsString]) -> bool {
    args.iter()
        .map(|a| a.to_str())
        .take_while(|a| *a != Some("--"))
        .any(|a| matches!(a, Some("-h" | "--help")))
}

/// Flattened `(flag, value)` pairs from the YAML file at `path`, in document
/// order. A missing file or an empty/null document yields nothing; keys that
/// are not declared flags are dropped.
fn file_values(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ConfigError::ReadFile {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let docs = YamlLoader::load_from_str(&contents).map_err(|source| ConfigError::ParseFile {
        path: path.to_path_buf(),
        source,
    })?;

    let mut values = Vec::new();
    match docs.first() {
        None | Some(Yaml::Null) => {}
        Some(Yaml::Hash(hash)) => flatten(None, hash, &mut values),
        Some(_) => {
            return Err(ConfigError::NotAMapping {
                path: path.to_path_buf(),
            });
        }
    }
    values.retain(|(key, _)| FLAG_NAMES.contains(&key.as_str()));
    Ok(values)
}

fn flatten(prefix: Option<&str>, hash: &yaml::Hash, out: &mut Vec<(String, String)>) {
    for (key, value) in hash {
        let Some(key) = scalar_string(key) else {
            continue;
        };
        let name = match prefix {
            Some(prefix) => format!("{prefix}{KEY_DELIMITER}{key}"),
            None => key,
        };
        match value {
            Yaml::Hash(inner) => flatten(Some(&name), inner, out),
            Yaml::Array(items) => {
                out.extend(items.iter().filter_map(scalar_string).map(|v| (name.clone(), v)));
            }
            _ => {
                if let Some(v) = scalar_string(value) {
                    out.push((name, v));
                }
            }
        }
    }
}

fn scalar_string(value: &Yaml) -> Option<String> {
    match value {
        Yaml::String(s) | Yaml::Real(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}
