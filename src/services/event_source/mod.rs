//! Event Source: владеет процессом захвата событий и отдаёт его вывод построчно.
//!
//! Здесь нет никакой логики классификации или планирования сброса; строки
//! передаются как есть, решения принимает TriggerScheduler.

mod libinput;
mod replay;
mod r#trait;

pub use self::libinput::LibinputSource;
pub use self::r#trait::{create_event_source, EventSource};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Прочитать одну строку, не падая на невалидном UTF-8.
/// Хвостовые пробельные символы (включая `\r\n`) отбрасываются.
async fn read_line_lossy<R>(reader: &mut R, buffer: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buffer.clear();
    let n = reader.read_until(b'\n', buffer).await?;
    if n == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buffer);
    Ok(Some(line.trim_end().to_string()))
}
