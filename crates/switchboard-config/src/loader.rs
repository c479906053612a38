use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

use crate::Config;
use crate::llm::MAX_RETRIES_LIMIT;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, expansion or parsing
    /// fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw =
            std::fs::read_to_string(path).with_context(|| format!("failed to read config file {}", path.display()))?;

        let config: Self = raw.parse()?;
        tracing::debug!(path = %path.display(), themes = config.themes.len(), "loaded configuration");

        Ok(config)
    }

    /// Check cross-field constraints serde cannot express
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_retry()?;
        self.validate_telemetry()?;
        self.validate_themes()?;
        Ok(())
    }

    fn validate_retry(&self) -> anyhow::Result<()> {
        let retry = &self.llm.retry;

        if retry.base_delay_ms == 0 {
            anyhow::bail!("llm.retry.base_delay_ms must be greater than 0");
        }

        if retry.max_retries > MAX_RETRIES_LIMIT {
            anyhow::bail!(
                "llm.retry.max_retries is {}, the maximum is {MAX_RETRIES_LIMIT}",
                retry.max_retries
            );
        }

        Ok(())
    }

    fn validate_telemetry(&self) -> anyhow::Result<()> {
        EnvFilter::try_new(&self.telemetry.filter)
            .with_context(|| format!("invalid telemetry.filter `{}`", self.telemetry.filter))?;
        Ok(())
    }

    fn validate_themes(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();

        for theme in &self.themes {
            if theme.id.trim().is_empty() {
                anyhow::bail!("theme ids must not be empty");
            }
            if !seen.insert(theme.id.as_str()) {
                anyhow::bail!("theme `{}` is declared more than once", theme.id);
            }
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = anyhow::Error;

    /// Parse and validate config text, expanding environment placeholders
    fn from_str(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw).context("config variable expansion failed")?;
        let config: Self = toml::from_str(&expanded).context("failed to parse config")?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use crate::LogFormat;

    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = "".parse().unwrap();

        assert_eq!(config.llm.retry.max_retries, 3);
        assert_eq!(config.llm.retry.base_delay(), Duration::from_secs(1));
        assert_eq!(config.telemetry.filter, "info");
        assert_eq!(config.telemetry.format, LogFormat::Pretty);
        assert!(config.plugins.system);
        assert!(config.themes.is_empty());
    }

    #[test]
    fn loads_every_section_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[llm.retry]
max_retries = 5
base_delay_ms = 250

[telemetry]
filter = "switchboard=debug,info"
format = "json"
ansi = false

[plugins]
system = false

[[themes]]
id = "dusk"
name = "Dusk"
description = "Low light"
style = {{ background = "bg-slate-900", text = "text-slate-100" }}
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.llm.retry.max_retries, 5);
        assert_eq!(config.llm.retry.base_delay(), Duration::from_millis(250));
        assert_eq!(config.telemetry.format, LogFormat::Json);
        assert!(!config.telemetry.ansi);
        assert!(!config.plugins.system);
        assert_eq!(config.themes.len(), 1);
        let keys: Vec<_> = config.themes[0].style.keys().map(String::as_str).collect();
        assert_eq!(keys, ["background", "text"]);
    }

    #[test]
    fn expands_environment_before_parsing() {
        temp_env::with_var("SWITCHBOARD_TEST_RETRIES", Some("7"), || {
            let config: Config = "[llm.retry]\nmax_retries = {{ env.SWITCHBOARD_TEST_RETRIES }}\n"
                .parse()
                .unwrap();
            assert_eq!(config.llm.retry.max_retries, 7);
        });
    }

    #[test]
    fn missing_file_names_path() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = "[llm.retry]\nmax_attempts = 3\n".parse::<Config>().unwrap_err();
        assert!(format!("{err:#}").contains("max_attempts"));
    }

    #[test]
    fn rejects_zero_base_delay() {
        let err = "[llm.retry]\nbase_delay_ms = 0\n".parse::<Config>().unwrap_err();
        assert!(err.to_string().contains("base_delay_ms"));
    }

    #[test]
    fn rejects_excessive_retries() {
        let err = "[llm.retry]\nmax_retries = 11\n".parse::<Config>().unwrap_err();
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    fn rejects_invalid_filter() {
        let err = "[telemetry]\nfilter = \"foo=bogus_level\"\n".parse::<Config>().unwrap_err();
        assert!(err.to_string().contains("telemetry.filter"));
    }

    #[test]
    fn rejects_duplicate_theme_ids() {
        let raw = "[[themes]]\nid = \"dusk\"\nname = \"Dusk\"\n\n[[themes]]\nid = \"dusk\"\nname = \"Other\"\n";
        let err = raw.parse::<Config>().unwrap_err();
        assert!(err.to_string().contains("dusk"));
    }
}
