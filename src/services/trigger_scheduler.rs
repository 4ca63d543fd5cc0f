use crate::events::EventKind;
use crate::services::reset_action::{ActionLauncher, ResetCommand};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{sleep, Instant};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Пауза между обнаружением и запуском команды
    pub delay: Duration,
    /// Минимальный интервал между принятыми срабатываниями
    pub debounce: Duration,
    /// Уведомления о срабатываниях и ошибках запуска команды
    pub debug: bool,
}

/// Время последнего принятого срабатывания; `None` - срабатываний ещё не было
#[derive(Debug, Default)]
pub struct TriggerState {
    last_reset: Option<Instant>,
}

impl TriggerState {
    pub fn last_reset(&self) -> Option<Instant> {
        self.last_reset
    }

    /// Принять срабатывание, если окно debounce уже истекло.
    /// Окно считается от прошлого принятого срабатывания и не продлевается отклонёнными.
    fn try_accept(&mut self, now: Instant, debounce: Duration) -> bool {
        if let Some(last) = self.last_reset {
            if now.saturating_duration_since(last) < debounce {
                return false;
            }
        }

        // Метка времени никогда не уменьшается
        self.last_reset = Some(self.last_reset.map_or(now, |last| last.max(now)));
        true
    }
}

/// Решение планировщика по одному событию
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Ignored,
    Debounced,
    /// `fire_at` равно `None`, если момент запуска не представим (огромный delay)
    Accepted { fire_at: Option<Instant> },
}

pub struct TriggerScheduler {
    settings: SchedulerSettings,
    command: Arc<ResetCommand>,
    launcher: Arc<dyn ActionLauncher>,
    state: Mutex<TriggerState>,
    pending: Mutex<JoinSet<()>>,
    accepted: AtomicU64,
    debounced: AtomicU64,
}

impl TriggerScheduler {
    pub fn new(
        settings: SchedulerSettings,
        command: ResetCommand,
        launcher: Arc<dyn ActionLauncher>,
    ) -> Self {
        Self {
            settings,
            command: Arc::new(command),
            launcher,
            state: Mutex::new(TriggerState::default()),
            pending: Mutex::new(JoinSet::new()),
            accepted: AtomicU64::new(0),
            debounced: AtomicU64::new(0),
        }
    }

    pub fn last_reset(&self) -> Option<Instant> {
        self.state.lock().last_reset()
    }

    pub fn accepted_count(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn debounced_count(&self) -> u64 {
        self.debounced.load(Ordering::Relaxed)
    }

    /// Число запланированных, но ещё не выполненных сбросов
    pub fn pending_count(&self) -> usize {
        let mut pending = self.pending.lock();
        while pending.try_join_next().is_some() {}
        pending.len()
    }

    /// Дождаться всех уже запланированных сбросов.
    /// Вызывается после закрытия потока, чтобы завершение runtime их не отменило.
    pub async fn wait_pending(&self) {
        let mut pending = std::mem::take(&mut *self.pending.lock());
        while let Some(result) = pending.join_next().await {
            if let Err(e) = result {
                debug!("Задача сброса завершилась с ошибкой: {}", e);
            }
        }
    }

    /// Обработать классифицированное событие. Не блокирует: сброс
    /// выполняется в отдельной задаче после `delay`.
    pub fn on_event(&self, kind: EventKind, now: Instant) -> Decision {
        if !kind.is_touch_released() {
            return Decision::Ignored;
        }

        // Состояние обновляется сразу, до планирования: окно debounce идёт от момента обнаружения
        let accepted = self.state.lock().try_accept(now, self.settings.debounce);
        if !accepted {
            self.debounced.fetch_add(1, Ordering::Relaxed);
            if self.settings.debug {
                debug!("Отпускание касания отброшено (debounce {:?})", self.settings.debounce);
            }
            return Decision::Debounced;
        }

        self.accepted.fetch_add(1, Ordering::Relaxed);
        if self.settings.debug {
            debug!(
                "Обнаружено отпускание касания, сброс через {}с",
                self.settings.delay.as_secs()
            );
        }

        self.schedule_reset();

        Decision::Accepted {
            fire_at: now.checked_add(self.settings.delay),
        }
    }

    // Результат задачи не наблюдается: отмены и повторов нет, главный цикл её не ждёт.
    // Набор задач нужен только для wait_pending при закрытии потока.
    fn schedule_reset(&self) {
        let delay = self.settings.delay;
        let debug = self.settings.debug;
        let command = Arc::clone(&self.command);
        let launcher = Arc::clone(&self.launcher);

        let mut pending = self.pending.lock();
        while pending.try_join_next().is_some() {}

        pending.spawn(async move {
            // tokio::time::sleep сам ограничивает слишком далёкий дедлайн
            sleep(delay).await;
            if let Err(e) = launcher.launch(&command).await {
                if debug {
                    debug!("Команда сброса не запущена: {}", e);
                }
            }
        });
    }
}
