use tracing::{debug, info};

use super::builtin;
use super::dto::ProfileSpec;
use super::profile::LayoutProfile;
use crate::errors::{StatementParseError, StatementResult};
use crate::parsers::traits::Parser;

/// Ordered set of layout profiles plus an optional default.
///
/// Built once and then only read; detection borrows profiles out of it, so one
/// registry can serve any number of independent extractions.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    profiles: Vec<LayoutProfile>,
    default: Option<LayoutProfile>,
}

impl FormatRegistry {
    /// An empty registry with no default profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// DBS, Citi, Singapore-, US- and UK-generic, with the SGD default profile.
    pub fn builtin() -> StatementResult<Self> {
        let mut registry = Self::new();
        for spec in builtin::builtin_specs() {
            registry.register(spec)?;
        }
        registry.set_default(builtin::default_profile())?;
        Ok(registry)
    }

    pub fn register(&mut self, spec: ProfileSpec) -> StatementResult<&LayoutProfile> {
        let profile = LayoutProfile::try_from(spec)?;
        if self.get(&profile.name).is_some() {
            return Err(StatementParseError::DuplicateProfile(profile.name));
        }
        debug!(profile = %profile.name, "registered layout profile");
        self.profiles.push(profile);
        Ok(&self.profiles[self.profiles.len() - 1])
    }

    /// Registers every profile of a YAML sequence of [`ProfileSpec`]s, in order.
    pub fn register_yaml(&mut self, yaml: &str) -> StatementResult<usize> {
        let specs: Vec<ProfileSpec> = serde_yaml::from_str(yaml)?;
        let count = specs.len();
        for spec in specs {
            self.register(spec)?;
        }
        Ok(count)
    }

    pub fn set_default(&mut self, spec: ProfileSpec) -> StatementResult<()> {
        let profile = LayoutProfile::try_from(spec)?;
        if self.profiles.iter().any(|p| p.name.eq_ignore_ascii_case(&profile.name)) {
            return Err(StatementParseError::DuplicateProfile(profile.name));
        }
        self.default = Some(profile);
        Ok(())
    }

    pub fn clear_default(&mut self) {
        self.default = None;
    }

    pub fn default_profile(&self) -> Option<&LayoutProfile> {
        self.default.as_ref()
    }

    /// Case-insensitive lookup by name, the default profile included.
    pub fn get(&self, name: &str) -> Option<&LayoutProfile> {
        self.profiles
            .iter()
            .chain(self.default.iter())
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn profiles(&self) -> impl Iterator<Item = &LayoutProfile> {
        self.profiles.iter()
    }

    /// First profile (in registration order) whose token appears in `text`,
    /// otherwise the default profile.
    ///
    /// Only fails when there is no default profile to fall back to.
    pub fn detect(&self, text: &str) -> StatementResult<&LayoutProfile> {
        let profile = self
            .profiles
            .iter()
            .find(|p| p.is_supported(None, text))
            .or(self.default.as_ref())
            .ok_or_else(|| {
                StatementParseError::UnsupportedStatement(
                    "no layout profile matched and no default is registered".to_string(),
                )
            })?;
        info!(profile = %profile.name, "detected statement layout");
        Ok(profile)
    }

    /// Like [`detect`](Self::detect) but restricted to bank-specific profiles and
    /// never falling back to the default.
    pub fn detect_strict(&self, text: &str) -> StatementResult<&LayoutProfile> {
        let profile = self
            .profiles
            .iter()
            .filter(|p| p.bank_specific)
            .find(|p| p.is_supported(None, text))
            .ok_or_else(|| {
                StatementParseError::UnsupportedStatement(
                    "no bank-specific layout profile matched".to_string(),
                )
            })?;
        info!(profile = %profile.name, "detected bank statement layout");
        Ok(profile)
    }
}
