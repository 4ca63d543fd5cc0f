use crate::error::{Result, TouchResetError};
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::info;

/// Внешняя команда сброса, неизменная на всё время работы демона
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetCommand {
    pub shell: PathBuf,
    pub command: String,
}

impl ResetCommand {
    pub fn new(shell: impl Into<PathBuf>, command: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            command: command.into(),
        }
    }
}

impl fmt::Display for ResetCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -c {:?}", self.shell.display(), self.command)
    }
}

/// Trait for launching the reset command
#[async_trait::async_trait]
pub trait ActionLauncher: Send + Sync {
    /// Launch the command; the outcome of the command itself is not inspected
    async fn launch(&self, command: &ResetCommand) -> Result<()>;
}

/// Factory function to create a launcher based on the dry_run flag
pub fn create_action_launcher(dry_run: bool) -> Arc<dyn ActionLauncher> {
    if dry_run {
        Arc::new(DryRunLauncher)
    } else {
        Arc::new(ShellLauncher)
    }
}

/// Запуск через `<shell> -c <command>` отдельным процессом
pub struct ShellLauncher;

#[async_trait::async_trait]
impl ActionLauncher for ShellLauncher {
    async fn launch(&self, command: &ResetCommand) -> Result<()> {
        let mut child = Command::new(&command.shell)
            .arg("-c")
            .arg(&command.command)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| TouchResetError::ActionSpawn {
                shell: command.shell.clone(),
                source,
            })?;

        // Только reap: код выхода команды сброса не анализируется
        let _ = child.wait().await;
        Ok(())
    }
}

pub struct DryRunLauncher;

#[async_trait::async_trait]
impl ActionLauncher for DryRunLauncher {
    async fn launch(&self, command: &ResetCommand) -> Result<()> {
        info!("[DRY RUN] Сброс: {}", command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let command = ResetCommand::new("/bin/bash", "reset-zoom --now");
        assert_eq!(command.to_string(), "/bin/bash -c \"reset-zoom --now\"");
    }

    #[tokio::test]
    async fn test_shell_launcher_runs_command() {
        let marker = std::env::temp_dir().join(format!("touch-reset-launch-{}", std::process::id()));
        let _ = std::fs::remove_file(&marker);

        let command = ResetCommand::new("sh", format!("touch {}", marker.display()));
        ShellLauncher.launch(&command).await.unwrap();

        assert!(marker.exists());
        std::fs::remove_file(&marker).ok();
    }

    #[tokio::test]
    async fn test_failing_command_is_not_an_error() {
        let command = ResetCommand::new("sh", "exit 7");
        assert!(ShellLauncher.launch(&command).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_shell_is_action_spawn_error() {
        let command = ResetCommand::new("/non/existent/shell", "true");
        let result = ShellLauncher.launch(&command).await;
        assert!(matches!(result, Err(TouchResetError::ActionSpawn { .. })));
    }

    #[tokio::test]
    async fn test_dry_run_launcher() {
        let launcher = create_action_launcher(true);
        let command = ResetCommand::new("/non/existent/shell", "true");
        assert!(launcher.launch(&command).await.is_ok());
    }
}
