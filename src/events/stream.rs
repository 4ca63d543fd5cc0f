use std::fmt;
use std::process::ExitStatus;

/// Причина завершения потока событий
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamClosed {
    /// Процесс захвата завершился с кодом 0 (или поток был конечным)
    Clean,
    /// Ненулевой код выхода или завершение по сигналу
    Abnormal {
        code: Option<i32>,
        signal: Option<i32>,
    },
}

impl StreamClosed {
    pub fn is_clean(&self) -> bool {
        matches!(self, StreamClosed::Clean)
    }

    /// Код выхода демона, отражающий исход процесса захвата
    pub fn exit_code(&self) -> u8 {
        match *self {
            StreamClosed::Clean => 0,
            StreamClosed::Abnormal { code: Some(code), .. } => match u8::try_from(code) {
                Ok(0) | Err(_) => 1,
                Ok(code) => code,
            },
            StreamClosed::Abnormal { signal: Some(signal), .. } => {
                u8::try_from(128 + signal).unwrap_or(1)
            }
            StreamClosed::Abnormal { .. } => 1,
        }
    }
}

impl From<ExitStatus> for StreamClosed {
    fn from(status: ExitStatus) -> Self {
        if status.success() {
            return StreamClosed::Clean;
        }

        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;

        StreamClosed::Abnormal {
            code: status.code(),
            signal,
        }
    }
}

impl fmt::Display for StreamClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamClosed::Clean => write!(f, "поток закрыт штатно"),
            StreamClosed::Abnormal { code: Some(code), .. } => {
                write!(f, "процесс захвата завершился с кодом {}", code)
            }
            StreamClosed::Abnormal { signal: Some(signal), .. } => {
                write!(f, "процесс захвата убит сигналом {}", signal)
            }
            StreamClosed::Abnormal { .. } => write!(f, "процесс захвата завершился аварийно"),
        }
    }
}
