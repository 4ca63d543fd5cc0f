pub mod event_source;
pub mod reset_action;
pub mod touch_watcher;
pub mod trigger_scheduler;

pub use event_source::{create_event_source, EventSource};
pub use reset_action::{create_action_launcher, ResetCommand};
pub use touch_watcher::TouchWatcher;
pub use trigger_scheduler::{SchedulerSettings, TriggerScheduler};
