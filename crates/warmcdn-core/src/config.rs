use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Object-storage endpoint and credentials (`[storage]` in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base endpoint of the S3-compatible listing API, e.g. `https://s3.example.net`.
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    /// Bucket to enumerate for keys.
    pub bucket: String,
}

/// CDN prefetch API endpoint pieces and credentials (`[cdn]` in config.toml).
///
/// The final endpoint is `base_api_path + cdn_api_path + prefetch_api_path`,
/// with `{PROJECT_ID}` and `{RESOURCE_ID}` substituted in the last component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdnConfig {
    pub base_api_path: String,
    pub cdn_api_path: String,
    pub prefetch_api_path: String,
    pub project_id: String,
    pub resource_id: String,
    /// Static API token, sent as the `X-token` header.
    pub token: String,
}

/// Key filtering and batching knobs (`[filter]` in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Only keys starting with this prefix are considered at all.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Comma-separated extension suffixes eligible for multi-prefetch,
    /// e.g. `".m3u8,.ts"`. A trailing comma is tolerated.
    pub multi_prefetch_extensions: String,
    /// Maximum number of paths per multi-prefetch request. Must be > 0.
    pub multi_prefetch_max_amount: usize,
}

/// Repetition and pacing knobs for the dispatch loop (`[pacing]` in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingSettings {
    /// How many times each multi-batch request is issued. Must be >= 1.
    pub multi_repeat_count: u32,
    /// Delay after every multi-batch call, in seconds.
    pub multi_delay_secs: u64,
    /// Delay after every single-path call, in seconds.
    pub single_delay_secs: u64,
}

fn default_key_prefix() -> String {
    "hls/".to_string()
}

/// Global configuration loaded from `~/.config/warmcdn/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarmerConfig {
    pub storage: StorageConfig,
    pub cdn: CdnConfig,
    pub filter: FilterConfig,
    pub pacing: PacingSettings,
}

impl Default for WarmerConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                endpoint: "https://s3.example.net".to_string(),
                access_key: String::new(),
                secret_key: String::new(),
                bucket: "media".to_string(),
            },
            cdn: CdnConfig {
                base_api_path: "https://api.example.net".to_string(),
                cdn_api_path: "/cdn/v1".to_string(),
                prefetch_api_path: "/projects/{PROJECT_ID}/resources/{RESOURCE_ID}/prefetch"
                    .to_string(),
                project_id: String::new(),
                resource_id: String::new(),
                token: String::new(),
            },
            filter: FilterConfig {
                key_prefix: default_key_prefix(),
                multi_prefetch_extensions: ".m3u8,.ts".to_string(),
                multi_prefetch_max_amount: 10,
            },
            pacing: PacingSettings {
                multi_repeat_count: 1,
                multi_delay_secs: 1,
                single_delay_secs: 1,
            },
        }
    }
}

impl WarmerConfig {
    /// Startup-time validation; any violation here aborts before a run starts.
    pub fn validate(&self) -> Result<()> {
        if self.storage.bucket.trim().is_empty() {
            bail!("storage.bucket must not be empty");
        }
        if self.filter.multi_prefetch_max_amount == 0 {
            bail!("filter.multi_prefetch_max_amount must be > 0");
        }
        if self.pacing.multi_repeat_count == 0 {
            bail!("pacing.multi_repeat_count must be >= 1");
        }
        if self.extension_list().is_empty() {
            bail!("filter.multi_prefetch_extensions must name at least one extension");
        }
        Ok(())
    }

    /// Parsed extension suffixes for multi-prefetch eligibility.
    ///
    /// Splits on `,` and drops empty tokens. A trailing comma in the config
    /// would otherwise leave an empty suffix that every key matches,
    /// misclassifying the whole listing.
    pub fn extension_list(&self) -> Vec<String> {
        self.filter
            .multi_prefetch_extensions
            .split(',')
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(|e| e.to_string())
            .collect()
    }

    pub fn multi_delay(&self) -> Duration {
        Duration::from_secs(self.pacing.multi_delay_secs)
    }

    pub fn single_delay(&self) -> Duration {
        Duration::from_secs(self.pacing.single_delay_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("warmcdn")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
/// The default file is a template; it fails validation until credentials
/// and IDs are filled in.
pub fn load_or_init() -> Result<WarmerConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WarmerConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: WarmerConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_toml() -> &'static str {
        r#"
            [storage]
            endpoint = "https://s3.example.net"
            access_key = "AK"
            secret_key = "SK"
            bucket = "media"

            [cdn]
            base_api_path = "https://api.example.net"
            cdn_api_path = "/cdn/v1"
            prefetch_api_path = "/projects/{PROJECT_ID}/resources/{RESOURCE_ID}/prefetch"
            project_id = "p1"
            resource_id = "r1"
            token = "t0k"

            [filter]
            key_prefix = "hls/"
            multi_prefetch_extensions = ".m3u8,.ts,"
            multi_prefetch_max_amount = 10

            [pacing]
            multi_repeat_count = 3
            multi_delay_secs = 2
            single_delay_secs = 1
        "#
    }

    #[test]
    fn config_toml_parses() {
        let cfg: WarmerConfig = toml::from_str(sample_toml()).unwrap();
        assert_eq!(cfg.storage.bucket, "media");
        assert_eq!(cfg.filter.multi_prefetch_max_amount, 10);
        assert_eq!(cfg.pacing.multi_repeat_count, 3);
        assert_eq!(cfg.multi_delay(), Duration::from_secs(2));
        assert_eq!(cfg.single_delay(), Duration::from_secs(1));
        cfg.validate().unwrap();
    }

    #[test]
    fn trailing_comma_in_extensions_is_dropped() {
        let cfg: WarmerConfig = toml::from_str(sample_toml()).unwrap();
        assert_eq!(cfg.extension_list(), vec![".m3u8", ".ts"]);
    }

    #[test]
    fn key_prefix_defaults_to_hls() {
        let toml = sample_toml().replace("key_prefix = \"hls/\"\n", "");
        let cfg: WarmerConfig = toml::from_str(&toml).unwrap();
        assert_eq!(cfg.filter.key_prefix, "hls/");
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let toml = sample_toml().replace(
            "multi_prefetch_max_amount = 10",
            "multi_prefetch_max_amount = 0",
        );
        let cfg: WarmerConfig = toml::from_str(&toml).unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_repeat_count_is_rejected() {
        let toml = sample_toml().replace("multi_repeat_count = 3", "multi_repeat_count = 0");
        let cfg: WarmerConfig = toml::from_str(&toml).unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn only_commas_in_extensions_is_rejected() {
        let toml = sample_toml().replace(
            "multi_prefetch_extensions = \".m3u8,.ts,\"",
            "multi_prefetch_extensions = \",,\"",
        );
        let cfg: WarmerConfig = toml::from_str(&toml).unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = WarmerConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: WarmerConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.filter.key_prefix, cfg.filter.key_prefix);
        assert_eq!(
            parsed.filter.multi_prefetch_max_amount,
            cfg.filter.multi_prefetch_max_amount
        );
        assert_eq!(parsed.pacing.multi_repeat_count, cfg.pacing.multi_repeat_count);
    }
}
