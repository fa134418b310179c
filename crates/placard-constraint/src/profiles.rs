//! Channel profiles, retailer and brand policy, built in or loaded from TOML

use placard_core::{BrandPolicy, Channel, ChannelProfile, PlacardError, Result, RetailerPolicy};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One profile file: optional `[retailer]` and `[brand]` tables and
/// `[[channel]]` entries
#[derive(Debug, Deserialize)]
pub struct ProfileFile {
    #[serde(default)]
    pub retailer: Option<RetailerPolicy>,
    #[serde(default)]
    pub brand: Option<BrandPolicy>,
    #[serde(default)]
    pub channel: Vec<ChannelProfile>,
}

/// Per-channel rule parameters plus the retailer and brand policies
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: HashMap<Channel, ChannelProfile>,
    retailer: RetailerPolicy,
    brand: BrandPolicy,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileRegistry {
    /// Built-in profiles for every known channel and the default retailer
    pub fn builtin() -> Self {
        let profiles = Channel::KNOWN
            .into_iter()
            .map(|c| (c, ChannelProfile::builtin(c)))
            .collect();
        Self {
            profiles,
            retailer: RetailerPolicy::default(),
            brand: BrandPolicy::default(),
        }
    }

    /// Built-ins overridden by `path/channels/*.toml`, if that directory exists
    pub fn load_from_directory<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut registry = Self::builtin();
        let channels_path = path.as_ref().join("channels");

        if channels_path.exists() {
            let mut files: Vec<_> = fs::read_dir(&channels_path)?
                .collect::<std::result::Result<Vec<_>, _>>()?
                .into_iter()
                .map(|entry| entry.path())
                .filter(|p| p.extension().map(|e| e == "toml").unwrap_or(false))
                .collect();
            // read_dir order is platform dependent; later files win
            files.sort();
            for file_path in files {
                registry.load_file(&file_path)?;
            }
        }

        Ok(registry)
    }

    /// Load overrides from a TOML file
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let content = fs::read_to_string(path)?;
        self.load_string(&content)
    }

    /// Load overrides from a TOML string
    pub fn load_string(&mut self, content: &str) -> Result<()> {
        let file: ProfileFile = toml::from_str(content).map_err(|e| {
            PlacardError::ProfileLoadError(format!("Failed to parse profile TOML: {}", e))
        })?;

        if let Some(retailer) = file.retailer {
            if !retailer.is_approved(&retailer.canonical_tag) {
                return Err(PlacardError::ProfileLoadError(format!(
                    "canonical tag '{}' is not in the approved list",
                    retailer.canonical_tag
                )));
            }
            self.retailer = retailer;
        }
        if let Some(brand) = file.brand {
            tracing::debug!(brand = %brand.name, colors = brand.colors.len(), "brand policy loaded");
            self.brand = brand;
        }
        for profile in file.channel {
            tracing::debug!(channel = %profile.channel, "channel profile loaded");
            self.register(profile);
        }

        Ok(())
    }

    /// Register or replace a channel's profile
    pub fn register(&mut self, profile: ChannelProfile) {
        self.profiles.insert(profile.channel, profile);
    }

    /// Parameters for a channel.
    ///
    /// Channels without a profile get the strictest combination of every
    /// registered profile rather than an error.
    pub fn profile(&self, channel: Channel) -> ChannelProfile {
        if let Some(profile) = self.profiles.get(&channel) {
            return profile.clone();
        }

        let mut known = Channel::KNOWN
            .iter()
            .filter_map(|c| self.profiles.get(c));
        let Some(first) = known.next() else {
            return ChannelProfile::conservative();
        };
        let mut strictest = first.clone();
        for other in known {
            strictest.tighten(other);
        }
        strictest.channel = channel;
        strictest
    }

    pub fn retailer(&self) -> &RetailerPolicy {
        &self.retailer
    }

    pub fn brand(&self) -> &BrandPolicy {
        &self.brand
    }

    pub fn set_brand(&mut self, brand: BrandPolicy) {
        self.brand = brand;
    }
}
