use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_CAPTURE_BINARY: &str = "/usr/libexec/libinput/libinput-debug-events";

/// Target tracing для сырых строк событий
pub const RAW_EVENT_TARGET: &str = "raw_event";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub reset: ResetConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Печатать сырые строки событий и уведомления о срабатываниях
    pub debug: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub device: String,
    pub capture_binary: PathBuf,
    /// Читать события из записанного файла вместо запуска процесса захвата
    #[serde(default)]
    pub replay: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResetConfig {
    pub command: String,
    pub shell: PathBuf,
    pub delay_secs: u64,
    pub debounce_secs: u64,
}

/// Значения из командной строки, перекрывающие все остальные источники
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub device: Option<String>,
    pub reset_cmd: Option<String>,
    pub delay_secs: Option<u64>,
    pub debounce_secs: Option<u64>,
    pub log_level: Option<String>,
    pub debug: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            debug: false,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            device: String::new(),
            capture_binary: PathBuf::from(DEFAULT_CAPTURE_BINARY),
            replay: None,
        }
    }
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            shell: PathBuf::from("/bin/bash"),
            delay_secs: 5,
            debounce_secs: 1,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            input: InputConfig::default(),
            reset: ResetConfig::default(),
        }
    }
}

impl Config {
    /// Загрузка: значения по умолчанию -> TOML -> окружение -> командная строка
    pub fn load<P: AsRef<Path>>(config_path: P, overrides: &CliOverrides) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("TOUCH_RESET_").split("__"));

        let mut config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.apply_overrides(overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(device) = &overrides.device {
            self.input.device = device.clone();
        }
        if let Some(command) = &overrides.reset_cmd {
            self.reset.command = command.clone();
        }
        if let Some(delay) = overrides.delay_secs {
            self.reset.delay_secs = delay;
        }
        if let Some(debounce) = overrides.debounce_secs {
            self.reset.debounce_secs = debounce;
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
        if overrides.debug {
            self.logging.debug = true;
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        if self.input.device.trim().is_empty() && self.input.replay.is_none() {
            anyhow::bail!("Не указано устройство (--device или input.device)");
        }

        if self.input.capture_binary.as_os_str().is_empty() {
            anyhow::bail!("input.capture_binary не может быть пустым");
        }

        if self.reset.command.trim().is_empty() {
            anyhow::bail!("Не указана команда сброса (--reset-cmd или reset.command)");
        }

        if self.reset.shell.as_os_str().is_empty() {
            anyhow::bail!("reset.shell не может быть пустым");
        }

        Ok(())
    }

    /// Перекрытие отложенных сбросов допустимо, но обычно это ошибка настройки
    pub fn warn_on_overlap(&self) {
        if self.reset.debounce_secs < self.reset.delay_secs {
            warn!(
                "debounce ({}с) меньше delay ({}с): несколько сбросов могут выполняться одновременно",
                self.reset.debounce_secs, self.reset.delay_secs
            );
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.reset.delay_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.reset.debounce_secs)
    }

    /// Директивы, добавляемые к фильтру (RUST_LOG или logging.level) в режиме debug:
    /// сырые строки и уведомления о срабатываниях видны при любом базовом фильтре
    pub fn debug_directives(&self) -> Vec<String> {
        if self.logging.debug {
            vec![
                format!("{}=debug", RAW_EVENT_TARGET),
                format!("{}=debug", env!("CARGO_CRATE_NAME")),
            ]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.input.device = "/dev/input/event5".to_string();
        config.reset.command = "reset-zoom".to_string();
        config
    }

    #[test]
    fn test_default_config_requires_device_and_command() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.input.device = "/dev/input/event5".to_string();
        assert!(config.validate().is_err());

        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = valid_config();
        assert_eq!(config.delay(), Duration::from_secs(5));
        assert_eq!(config.debounce(), Duration::from_secs(1));
        assert_eq!(config.input.capture_binary, PathBuf::from(DEFAULT_CAPTURE_BINARY));
        assert!(config.debug_directives().is_empty());
    }

    #[test]
    fn test_replay_does_not_need_device() {
        let mut config = Config::default();
        config.reset.command = "reset-zoom".to_string();
        config.input.replay = Some(PathBuf::from("events.log"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = valid_config();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_adds_directives_regardless_of_level() {
        let mut config = valid_config();
        config.apply_overrides(&CliOverrides {
            debug: true,
            log_level: Some("warn".to_string()),
            ..CliOverrides::default()
        });
        assert_eq!(config.logging.level, "warn");
        assert_eq!(
            config.debug_directives(),
            vec!["raw_event=debug".to_string(), "touch_reset=debug".to_string()]
        );
    }

    #[test]
    fn test_debug_directives_parse_on_top_of_env_filter() {
        use tracing_subscriber::EnvFilter;

        let mut config = valid_config();
        config.logging.debug = true;

        // Как с RUST_LOG=warn: директивы debug добавляются, а не заменяются
        let mut filter = EnvFilter::try_new("warn").unwrap();
        for directive in config.debug_directives() {
            filter = filter.add_directive(directive.parse().unwrap());
        }
        let rendered = filter.to_string();
        assert!(rendered.contains("raw_event=debug"));
        assert!(rendered.contains("touch_reset=debug"));
        assert!(rendered.contains("warn"));
    }

    #[test]
    fn test_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "touch-reset.toml",
                r#"
                [input]
                device = "/dev/input/event7"

                [reset]
                command = "gsettings set org.gnome.desktop.a11y.magnifier mag-factor 1.0"
                delay_secs = 3
                "#,
            )?;
            jail.set_env("TOUCH_RESET_RESET__DEBOUNCE_SECS", "4");

            let overrides = CliOverrides {
                delay_secs: Some(10),
                ..CliOverrides::default()
            };
            let config = Config::load("touch-reset.toml", &overrides)
                .map_err(|e| figment::Error::from(e.to_string()))?;

            assert_eq!(config.input.device, "/dev/input/event7");
            assert_eq!(config.reset.delay_secs, 10);
            assert_eq!(config.reset.debounce_secs, 4);
            assert_eq!(config.reset.shell, PathBuf::from("/bin/bash"));
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_uses_cli_only() {
        Jail::expect_with(|_jail| {
            let overrides = CliOverrides {
                device: Some("/dev/input/event5".to_string()),
                reset_cmd: Some("reset-zoom".to_string()),
                ..CliOverrides::default()
            };
            let config = Config::load("missing.toml", &overrides)
                .map_err(|e| figment::Error::from(e.to_string()))?;

            assert_eq!(config.reset.command, "reset-zoom");
            assert_eq!(config.reset.delay_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn test_missing_device_is_rejected_on_load() {
        Jail::expect_with(|_jail| {
            let overrides = CliOverrides {
                reset_cmd: Some("reset-zoom".to_string()),
                ..CliOverrides::default()
            };
            assert!(Config::load("missing.toml", &overrides).is_err());
            Ok(())
        });
    }
}
