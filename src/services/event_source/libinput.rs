use crate::error::{Result, TouchResetError};
use crate::events::StreamClosed;
use crate::utils::DeviceCheck;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::BufReader;
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::r#trait::EventSource;

/// Процесс `libinput debug-events`, запущенный для одного устройства
pub struct LibinputSource {
    program: PathBuf,
    child: Child,
    stdout: BufReader<ChildStdout>,
    buffer: Vec<u8>,
    stderr_task: Option<JoinHandle<()>>,
}

impl LibinputSource {
    /// Проверить устройство и запустить `<capture_binary> --device <device>`
    pub fn start(device: &str, capture_binary: &Path) -> Result<Self> {
        let device_path = DeviceCheck::verify(device)?;

        let mut command = Command::new(capture_binary);
        command.arg("--device").arg(&device_path);

        Self::spawn(command, capture_binary)
    }

    /// Запустить уже подготовленную команду захвата.
    ///
    /// Дочерний процесс убивается при удалении источника (`kill_on_drop`),
    /// поэтому остановка демона не оставляет сирот.
    pub fn spawn(mut command: Command, program: &Path) -> Result<Self> {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|source| TouchResetError::Spawn {
            program: program.to_path_buf(),
            source,
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| crate::touch_error!(internal, "stdout процесса захвата недоступен"))?;

        let stderr_task = child.stderr.take().map(|stderr| {
            let program = program.to_path_buf();
            tokio::spawn(async move {
                let mut reader = BufReader::new(stderr);
                let mut buffer = Vec::new();
                while let Ok(Some(line)) = super::read_line_lossy(&mut reader, &mut buffer).await {
                    if !line.is_empty() {
                        warn!("{}: {}", program.display(), line);
                    }
                }
            })
        });

        let source = Self {
            program: program.to_path_buf(),
            child,
            stdout: BufReader::new(stdout),
            buffer: Vec::new(),
            stderr_task,
        };

        info!(
            "Процесс захвата запущен: {} (pid: {:?})",
            program.display(),
            source.pid()
        );

        Ok(source)
    }

    /// `None` после того, как процесс дождан
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }
}

#[async_trait::async_trait]
impl EventSource for LibinputSource {
    async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(super::read_line_lossy(&mut self.stdout, &mut self.buffer).await?)
    }

    async fn close(self: Box<Self>) -> Result<StreamClosed> {
        let mut this = *self;
        let status = this.child.wait().await?;

        // Дочитываем stderr, чтобы последние сообщения процесса попали в лог
        if let Some(task) = this.stderr_task.take() {
            let _ = task.await;
        }

        let closed = StreamClosed::from(status);
        debug!("{} завершился: {}", this.program.display(), closed);
        Ok(closed)
    }
}
