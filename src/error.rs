use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TouchResetError {
    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Не удалось запустить {program:?}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Не удалось запустить команду сброса через {shell:?}: {source}")]
    ActionSpawn {
        shell: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl TouchResetError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(TouchResetError::DeviceNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, TouchResetError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! touch_error {
    (device_not_found, $($arg:tt)*) => {
        $crate::error::TouchResetError::DeviceNotFound(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::TouchResetError::Permission(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::TouchResetError::Internal(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_error_mentions_program() {
        let err = TouchResetError::Spawn {
            program: PathBuf::from("/usr/libexec/libinput/libinput-debug-events"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("libinput-debug-events"));
    }

    #[test]
    fn test_macro_builds_variant() {
        let err = touch_error!(permission, "нет доступа к {}", "/dev/input/event5");
        assert!(matches!(err, TouchResetError::Permission(ref msg) if msg.contains("event5")));
    }
}
