use crate::config::RAW_EVENT_TARGET;
use crate::error::Result;
use crate::events::{classify, StreamClosed};
use crate::services::{EventSource, TriggerScheduler};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::info;

/// Основной последовательный цикл: чтение строки -> классификация -> планировщик
pub struct TouchWatcher {
    source: Box<dyn EventSource>,
    scheduler: Arc<TriggerScheduler>,
    debug: bool,
}

impl TouchWatcher {
    pub fn new(source: Box<dyn EventSource>, scheduler: Arc<TriggerScheduler>, debug: bool) -> Self {
        Self {
            source,
            scheduler,
            debug,
        }
    }

    /// Работает до конца потока. Уже запланированные сбросы не отменяются:
    /// после закрытия потока их дожидается `run_to_completion`.
    pub async fn run(mut self) -> Result<StreamClosed> {
        info!("TouchWatcher запущен, ожидаем события касания");

        while let Some(line) = self.source.next_line().await? {
            if self.debug {
                tracing::debug!(target: RAW_EVENT_TARGET, "{}", line);
            }

            self.scheduler.on_event(classify(&line), Instant::now());
        }

        let closed = self.source.close().await?;
        info!(
            "Поток событий завершён ({}): сбросов {}, отброшено debounce {}",
            closed,
            self.scheduler.accepted_count(),
            self.scheduler.debounced_count()
        );
        Ok(closed)
    }

    /// Цикл чтения, затем ожидание уже запланированных сбросов
    pub async fn run_to_completion(self) -> Result<StreamClosed> {
        let scheduler = Arc::clone(&self.scheduler);
        let closed = self.run().await?;

        let pending = scheduler.pending_count();
        if pending > 0 {
            info!("Ожидание запланированных сбросов: {}", pending);
        }
        scheduler.wait_pending().await;

        Ok(closed)
    }
}
