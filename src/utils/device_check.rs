use crate::error::{Result, TouchResetError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct DeviceCheck;

impl DeviceCheck {
    /// Убедиться, что устройство существует и доступно для чтения
    pub fn verify(device: &str) -> Result<PathBuf> {
        let path = PathBuf::from(device);

        if !path.exists() {
            return TouchResetError::device_not_found(format!(
                "Указанное устройство не найдено: {:?}",
                path
            ));
        }

        if let Err(e) = fs::File::open(&path) {
            if e.kind() == ErrorKind::PermissionDenied {
                Self::log_access_hints(&path);
                return Err(crate::touch_error!(
                    permission,
                    "Нет доступа к {}: {}",
                    path.display(),
                    e
                ));
            }
            return Err(TouchResetError::Io(e));
        }

        Self::log_device_name(&path);
        info!("Используется устройство: {:?}", path);
        Ok(path)
    }

    // Имя только для логов: /dev/null и прочие не-evdev пути допустимы
    fn log_device_name(path: &Path) {
        match evdev::Device::open(path) {
            Ok(device) => {
                info!("Имя устройства: {}", device.name().unwrap_or("Unknown"));
            }
            Err(e) => {
                debug!("Не удалось прочитать сведения evdev для {:?}: {}", path, e);
            }
        }
    }

    fn log_access_hints(path: &Path) {
        warn!("Устройство {} недоступно для чтения", path.display());
        warn!("Попробуйте:");
        warn!("1. Добавить пользователя в группу input: sudo usermod -a -G input $USER");
        warn!("2. Перезайти в систему после добавления в группу");
        warn!("3. Или запустить демон от root");
    }
}
