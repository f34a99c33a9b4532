//! Config extraction errors
use crate::Config;
use figment::{Metadata, Profile, Source};
use std::{collections::HashSet, error::Error, fmt, path::PathBuf};

/// The message shown if the config could not be extracted from the figment
pub const FAILED_TO_EXTRACT_CONFIG_MSG: &str = "failed to extract reef config:";

/// Represents a failed attempt to extract `Config` from a `Figment`.
///
/// Every invalid setting is reported once, together with the `reef.toml` profile or `REEF_*`
/// variable it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractConfigError {
    error: figment::Error,
    issues: Vec<ConfigIssue>,
}

impl ExtractConfigError {
    /// Wraps the figment error
    pub fn new(error: figment::Error) -> Self {
        let mut seen = HashSet::new();
        let issues = error
            .clone()
            .into_iter()
            .map(|err| ConfigIssue::new(&err))
            .filter(|issue| seen.insert(issue.to_string()))
            .collect();
        Self { error, issues }
    }

    /// The invalid settings, in the order figment reported them.
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }
}

impl fmt::Display for ExtractConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{FAILED_TO_EXTRACT_CONFIG_MSG}")?;
        for issue in &self.issues {
            writeln!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl Error for ExtractConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Error::source(&self.error)
    }
}

/// A single setting that could not be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted key of the setting, e.g. `verification_delay`.
    pub setting: Option<String>,
    /// Where the offending value came from, if figment knows.
    pub origin: Option<SettingOrigin>,
    /// What was wrong with the value.
    pub message: String,
}

impl ConfigIssue {
    fn new(err: &figment::Error) -> Self {
        let setting = (!err.path.is_empty()).then(|| err.path.join("."));
        let origin = err
            .metadata
            .as_ref()
            .map(|meta| SettingOrigin::new(meta, err.profile.as_ref(), setting.as_deref()));
        Self { setting, origin, message: err.kind.to_string() }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(setting) = &self.setting {
            write!(f, " for setting `{setting}`")?;
        }
        if let Some(origin) = &self.origin {
            write!(f, " (from {origin})")?;
        }
        Ok(())
    }
}

/// The config source an invalid value was read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingOrigin {
    /// A `[profile.<name>]` table of a `reef.toml` file.
    File {
        /// path of the toml file
        path: PathBuf,
        /// profile table the value was read from
        profile: Profile,
    },
    /// A `REEF_*` environment variable.
    Env(String),
    /// Any other provider, such as the command line overrides.
    Provider(String),
}

impl SettingOrigin {
    fn new(meta: &Metadata, profile: Option<&Profile>, setting: Option<&str>) -> Self {
        match &meta.source {
            Some(Source::File(path)) => Self::File {
                path: path.clone(),
                profile: profile.cloned().unwrap_or(Config::DEFAULT_PROFILE),
            },
            _ if meta.name.contains("environment variable") => {
                let key = setting.unwrap_or_default().replace('.', "_").to_uppercase();
                Self::Env(format!("{}{key}", Config::ENV_PREFIX))
            }
            _ => Self::Provider(meta.name.to_string()),
        }
    }
}

impl fmt::Display for SettingOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File { path, profile } => write!(f, "`{}` [profile.{profile}]", path.display()),
            Self::Env(var) => write!(f, "env var `{var}`"),
            Self::Provider(name) => f.write_str(name),
        }
    }
}
