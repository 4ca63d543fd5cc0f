use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod services;
mod utils;

use config::{CliOverrides, Config};
use services::{
    create_action_launcher,
    create_event_source,
    ResetCommand,
    SchedulerSettings,
    TouchWatcher,
    TriggerScheduler,
};

#[derive(Parser, Debug)]
#[command(name = "touch-reset")]
#[command(about = "Сброс масштаба экрана после отпускания касания на тачскрине")]
struct Args {
    /// Путь к файлу конфигурации (необязательный)
    #[arg(short, long, default_value = "touch-reset.toml")]
    config: PathBuf,

    /// Устройство тачскрина, например /dev/input/event5
    #[arg(long)]
    device: Option<String>,

    /// Команда сброса масштаба (выполняется через shell -c)
    #[arg(long)]
    reset_cmd: Option<String>,

    /// Секунд ожидания после отпускания касания [по умолчанию: 5]
    #[arg(long)]
    delay: Option<u64>,

    /// Минимум секунд между сбросами [по умолчанию: 1]
    #[arg(long)]
    debounce: Option<u64>,

    /// Печатать сырые события и уведомления о срабатываниях
    #[arg(long)]
    debug: bool,

    /// Режим сухого запуска (команда сброса только логируется)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            device: self.device.clone(),
            reset_cmd: self.reset_cmd.clone(),
            delay_secs: self.delay,
            debounce_secs: self.debounce,
            log_level: self.log_level.clone(),
            debug: self.debug,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Загрузка конфигурации (ошибка здесь завершает процесс с ненулевым кодом)
    let config = Config::load(&args.config, &args.overrides())?;

    // Инициализация системы логирования
    init_tracing(&config)?;

    info!("Запуск touch-reset v{}", env!("CARGO_PKG_VERSION"));

    config.warn_on_overlap();

    if args.dry_run {
        warn!("Режим сухого запуска - команда сброса не выполняется");
    }

    let settings = SchedulerSettings {
        delay: config.delay(),
        debounce: config.debounce(),
        debug: config.logging.debug,
    };
    let command = ResetCommand::new(config.reset.shell.clone(), config.reset.command.clone());
    info!(
        "Команда сброса: {} (delay: {:?}, debounce: {:?})",
        command, settings.delay, settings.debounce
    );

    let scheduler = Arc::new(TriggerScheduler::new(
        settings,
        command,
        create_action_launcher(args.dry_run),
    ));

    let source = create_event_source(&config).map_err(|e| {
        error!("Не удалось запустить источник событий: {}", e);
        e
    })?;

    let watcher = TouchWatcher::new(source, scheduler, config.logging.debug);

    // Остановка по сигналу удаляет watcher вместе с процессом захвата (kill_on_drop)
    // и не ждёт отложенных сбросов; при закрытии потока они дожидаются
    let exit_code = tokio::select! {
        closed = watcher.run_to_completion() => {
            let closed = closed?;
            if closed.is_clean() {
                info!("Процесс захвата завершился: {}", closed);
            } else {
                error!("Процесс захвата завершился аварийно: {}", closed);
            }
            ExitCode::from(closed.exit_code())
        }
        _ = shutdown_signal() => {
            info!("Получен сигнал завершения");
            ExitCode::SUCCESS
        }
    };

    info!("touch-reset завершил работу");
    Ok(exit_code)
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};

        match unix_signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
                return;
            }
            Err(err) => {
                warn!("Не удалось подписаться на SIGTERM: {}", err);
            }
        }
    }

    if let Err(err) = signal::ctrl_c().await {
        error!("Ошибка при ожидании сигнала завершения: {}", err);
        std::future::pending::<()>().await;
    }
}

fn init_tracing(config: &Config) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let mut filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;

    // Режим debug включает диагностику поверх любого RUST_LOG
    for directive in config.debug_directives() {
        filter = filter.add_directive(directive.parse()?);
    }

    // Диагностика идёт в stderr, stdout остаётся свободным
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    Ok(())
}
