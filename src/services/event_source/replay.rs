use crate::error::Result;
use crate::events::StreamClosed;
use std::path::Path;
use tokio::fs::File;
use tokio::io::BufReader;
use tracing::info;

use super::r#trait::EventSource;

/// Источник, читающий заранее записанный вывод libinput из файла
pub struct ReplaySource {
    reader: BufReader<File>,
    buffer: Vec<u8>,
}

impl ReplaySource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        info!("Воспроизведение событий из файла: {:?}", path);
        Ok(Self {
            reader: BufReader::new(File::from_std(file)),
            buffer: Vec::new(),
        })
    }
}

#[async_trait::async_trait]
impl EventSource for ReplaySource {
    async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(super::read_line_lossy(&mut self.reader, &mut self.buffer).await?)
    }

    async fn close(self: Box<Self>) -> Result<StreamClosed> {
        Ok(StreamClosed::Clean)
    }
}
