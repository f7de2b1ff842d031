// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;

/// Validate configuration and report the effective crawl settings.
pub fn run_validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");

    match config.validate() {
        Ok(()) => {
            let seeds = config.run.seed_keys()?;
            log::info!("✓ Config OK");
            log::info!("    User agent: {}", config.crawler.user_agent);
            log::info!(
                "    Timeout: {}",
                config
                    .crawler
                    .timeout_secs
                    .map_or_else(|| "none".to_string(), |secs| format!("{secs}s"))
            );
            log::info!("    Max concurrent: {}", config.crawler.max_concurrent);
            log::info!("    Index: {}", config.site.index_base_url);
            log::info!(
                "    Seeds: {} ({})",
                seeds.len(),
                seeds
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(",")
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Config validation failed: {}", e);
            Err(e)
        }
    }
}
