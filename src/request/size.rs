//! Size tier to upstream resolution mapping

use serde::{Deserialize, Deserializer, Serialize};

use super::mode::Mode;

/// Caller-facing abstract size selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeTier {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeTier {
    /// Lenient parse: unrecognized or empty input is `Medium`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "small" => SizeTier::Small,
            "large" => SizeTier::Large,
            _ => SizeTier::Medium,
        }
    }
}

impl<'de> Deserialize<'de> for SizeTier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Non-string values (null, numbers) fall back the same way unknown names do
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map(SizeTier::parse).unwrap_or_default())
    }
}

/// Concrete `WxH` size per tier for one mode class
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SizeTable {
    pub small: String,
    pub medium: String,
    pub large: String,
}

impl SizeTable {
    fn new(small: &str, medium: &str, large: &str) -> Self {
        Self {
            small: small.to_string(),
            medium: medium.to_string(),
            large: large.to_string(),
        }
    }

    pub fn get(&self, tier: SizeTier) -> &str {
        match tier {
            SizeTier::Small => &self.small,
            SizeTier::Medium => &self.medium,
            SizeTier::Large => &self.large,
        }
    }

    pub fn entries(&self) -> [&str; 3] {
        [&self.small, &self.medium, &self.large]
    }
}

/// Maps `(tier, mode)` to the size sent upstream.
///
/// Generate mode has its own table with portrait and landscape entries;
/// edit and inpaint share one table. Defaults are sizes `gpt-image-1` accepts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SizePolicy {
    #[serde(default = "default_generate_sizes")]
    pub generate: SizeTable,
    #[serde(default = "default_edit_sizes")]
    pub edit: SizeTable,
}

fn default_generate_sizes() -> SizeTable {
    SizeTable::new("1024x1024", "1024x1536", "1536x1024")
}

fn default_edit_sizes() -> SizeTable {
    SizeTable::new("1024x1024", "1024x1024", "1536x1024")
}

impl Default for SizePolicy {
    fn default() -> Self {
        Self {
            generate: default_generate_sizes(),
            edit: default_edit_sizes(),
        }
    }
}

impl SizePolicy {
    pub fn table(&self, mode: Mode) -> &SizeTable {
        if mode.is_edit_class() {
            &self.edit
        } else {
            &self.generate
        }
    }

    pub fn resolve(&self, tier: SizeTier, mode: Mode) -> &str {
        self.table(mode).get(tier)
    }
}

/// `WxH` with positive dimensions, or `auto`
pub fn is_valid_size(size: &str) -> bool {
    if size == "auto" {
        return true;
    }
    match size.split_once('x') {
        Some((w, h)) => [w, h]
            .iter()
            .all(|d| d.parse::<u32>().map(|n| n > 0).unwrap_or(false)),
        None => false,
    }
}
