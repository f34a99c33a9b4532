//! # reef-config
//!
//! Layered configuration for reef-deploy.
//!
//! Values are merged, in increasing priority, from the defaults, the `reef.toml` file in the
//! working directory, `REEF_*` environment variables and finally any caller supplied
//! [`Provider`], usually the CLI arguments.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use figment::{
    Error, Figment, Metadata, Profile, Provider,
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map, Value},
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

mod error;
pub use error::{ConfigIssue, ExtractConfigError, SettingOrigin};

/// reef-deploy configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// The selected profile. **(default: _default_ `default`)**
    ///
    /// **Note:** This field is never serialized nor deserialized. When a `Config` is merged into
    /// a `Figment` as a `Provider`, this profile is selected on the `Figment`. When a `Config`
    /// is extracted, this field is set to the extracting Figment's selected `Profile`.
    #[serde(skip)]
    pub profile: Profile,
    /// JSON-RPC endpoint of the chain node.
    pub eth_rpc_url: Option<String>,
    /// Base URL of the block explorer. Used for the contract link in the deployment
    /// notification and as the verification service endpoint. Verification is skipped when
    /// unset.
    pub reefscan_url: Option<String>,
    /// Seconds to wait after deployment before submitting the verification request, so the
    /// explorer has a chance to index the contract.
    pub verification_delay: u64,
    /// Compiled contracts JSON file.
    pub artifacts: PathBuf,
}

impl Config {
    /// The default profile: "default"
    pub const DEFAULT_PROFILE: Profile = Profile::Default;

    /// File name of config toml file
    pub const FILE_NAME: &'static str = "reef.toml";

    /// Environment variable used to select the profile.
    pub const PROFILE_ENV: &'static str = "REEF_PROFILE";

    /// Prefix of the environment variables merged into the config.
    pub const ENV_PREFIX: &'static str = "REEF_";

    /// Endpoint used when no RPC URL is configured.
    pub const DEFAULT_RPC_URL: &'static str = "http://127.0.0.1:8545";

    /// Default for [`Config::verification_delay`].
    pub const DEFAULT_VERIFICATION_DELAY: u64 = 5;

    /// Returns the current `Config`.
    ///
    /// See [`figment`](Self::figment) for more details.
    pub fn load() -> Result<Self, ExtractConfigError> {
        Self::try_from(Self::figment())
    }

    /// Returns the current `Config` with `overrides` merged on top of every other source.
    pub fn load_with<T: Provider>(overrides: T) -> Result<Self, ExtractConfigError> {
        Self::try_from(Self::figment().merge(overrides))
    }

    /// Attempts to extract a `Config` from `provider`, returning the result.
    pub fn try_from<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        let figment = Figment::from(provider);
        trace!("load config with provider: {:?}", figment.metadata().collect::<Vec<_>>());
        let mut config = figment.extract::<Self>().map_err(ExtractConfigError::new)?;
        config.profile = figment.profile().clone();
        Ok(config)
    }

    /// Returns the default figment: defaults, `reef.toml` and `REEF_*` env vars.
    pub fn figment() -> Figment {
        Self::figment_with_root(".")
    }

    /// Same as [`figment`](Self::figment) but reads `reef.toml` from `root`.
    pub fn figment_with_root(root: impl AsRef<Path>) -> Figment {
        let profile = Self::selected_profile();
        Figment::from(Self::default())
            .merge(ProfileTomlProvider::new(root.as_ref().join(Self::FILE_NAME)))
            .merge(Env::prefixed(Self::ENV_PREFIX).ignore(&["PROFILE", "DEBUG"]).global())
            .select(profile)
    }

    /// Returns the selected profile.
    ///
    /// If the `REEF_PROFILE` env variable is not set, this returns the `DEFAULT_PROFILE`.
    pub fn selected_profile() -> Profile {
        Profile::from_env_or(Self::PROFILE_ENV, Self::DEFAULT_PROFILE)
    }

    /// The configured RPC endpoint, or the local node default.
    pub fn rpc_url(&self) -> &str {
        self.eth_rpc_url.as_deref().unwrap_or(Self::DEFAULT_RPC_URL)
    }

    /// The explorer base URL without trailing slash.
    pub fn reefscan_url(&self) -> Option<&str> {
        self.reefscan_url.as_deref().map(|url| url.trim_end_matches('/')).filter(|url| !url.is_empty())
    }

    /// The delay applied before submitting a verification request.
    pub fn verification_delay(&self) -> Duration {
        Duration::from_secs(self.verification_delay)
    }
}

impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("Reef Config")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        Serialized::defaults(self).data()
    }

    fn profile(&self) -> Option<Profile> {
        Some(self.profile.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: Self::DEFAULT_PROFILE,
            eth_rpc_url: None,
            reefscan_url: None,
            verification_delay: Self::DEFAULT_VERIFICATION_DELAY,
            artifacts: PathBuf::from("artifacts/contracts.json"),
        }
    }
}

/// Reads a toml file whose top level `[profile.<name>]` tables map to figment profiles.
///
/// A missing file contributes nothing.
#[derive(Clone, Debug)]
struct ProfileTomlProvider {
    path: PathBuf,
}

impl ProfileTomlProvider {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Provider for ProfileTomlProvider {
    fn metadata(&self) -> Metadata {
        Toml::file(&self.path).metadata()
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut profiles = Map::new();
        if !self.path.exists() {
            return Ok(profiles);
        }
        for dict in Toml::file(&self.path).data()?.into_values() {
            let Some(Value::Dict(_, tables)) = dict.get("profile") else { continue };
            for (name, table) in tables {
                if let Value::Dict(_, table) = table {
                    profiles.insert(Profile::new(name), table.clone());
                }
            }
        }
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figment_is_default() {
        figment::Jail::expect_with(|_| {
            let config = Config::load().unwrap();
            assert_eq!(config, Config::default());
            assert_eq!(config.rpc_url(), Config::DEFAULT_RPC_URL);
            assert_eq!(config.verification_delay(), Duration::from_secs(5));
            assert_eq!(config.reefscan_url(), None);
            Ok(())
        });
    }

    #[test]
    fn test_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "reef.toml",
                r#"
                [profile.default]
                eth_rpc_url = "https://rpc.reefscan.com"
                reefscan_url = "https://reefscan.com/"
                verification_delay = 10
            "#,
            )?;
            let config = Config::load().unwrap();
            assert_eq!(config.rpc_url(), "https://rpc.reefscan.com");
            assert_eq!(config.reefscan_url(), Some("https://reefscan.com"));
            assert_eq!(config.verification_delay, 10);
            assert_eq!(config.artifacts, PathBuf::from("artifacts/contracts.json"));
            Ok(())
        });
    }

    #[test]
    fn test_profile_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "reef.toml",
                r#"
                [profile.default]
                reefscan_url = "https://reefscan.com"
                [profile.testnet]
                reefscan_url = "https://testnet.reefscan.com"
            "#,
            )?;
            assert_eq!(Config::load().unwrap().reefscan_url(), Some("https://reefscan.com"));

            jail.set_env("REEF_PROFILE", "testnet");
            let config = Config::load().unwrap();
            assert_eq!(config.profile, Profile::new("testnet"));
            assert_eq!(config.reefscan_url(), Some("https://testnet.reefscan.com"));
            Ok(())
        });
    }

    #[test]
    fn test_precedence() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "reef.toml",
                r#"
                [profile.default]
                verification_delay = 10
                eth_rpc_url = "http://toml:8545"
            "#,
            )?;
            jail.set_env("REEF_VERIFICATION_DELAY", "2");
            let config = Config::load().unwrap();
            assert_eq!(config.verification_delay, 2);
            assert_eq!(config.rpc_url(), "http://toml:8545");

            #[derive(Serialize)]
            struct Overrides {
                eth_rpc_url: &'static str,
            }
            let config =
                Config::load_with(Serialized::globals(Overrides { eth_rpc_url: "http://cli:8545" }))
                    .unwrap();
            assert_eq!(config.rpc_url(), "http://cli:8545");
            assert_eq!(config.verification_delay, 2);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("REEF_VERIFICATION_DELAY", "soon");
            let err = Config::load().unwrap_err();
            assert!(err.to_string().starts_with(error::FAILED_TO_EXTRACT_CONFIG_MSG), "{err}");

            let [issue] = err.issues() else { panic!("expected one issue: {err}") };
            assert_eq!(issue.setting.as_deref(), Some("verification_delay"));
            assert_eq!(
                issue.origin,
                Some(SettingOrigin::Env("REEF_VERIFICATION_DELAY".to_string()))
            );
            assert!(err.to_string().contains("(from env var `REEF_VERIFICATION_DELAY`)"), "{err}");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_toml_value_names_profile() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "reef.toml",
                r#"
                [profile.testnet]
                verification_delay = "soon"
            "#,
            )?;
            jail.set_env("REEF_PROFILE", "testnet");
            let err = Config::load().unwrap_err();

            let [issue] = err.issues() else { panic!("expected one issue: {err}") };
            assert_eq!(issue.setting.as_deref(), Some("verification_delay"));
            match &issue.origin {
                Some(SettingOrigin::File { path, .. }) => assert!(path.ends_with("reef.toml")),
                origin => panic!("unexpected origin {origin:?}"),
            }
            assert!(err.to_string().contains("reef.toml"), "{err}");
            Ok(())
        });
    }
}
