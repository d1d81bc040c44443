//! Completion marker stores

use crate::error::{Result, TrackerError};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Durable set of gameweeks whose standings were already published
#[async_trait::async_trait]
pub trait CompletionStore: Send + Sync {
    /// Whether `period` was marked by an earlier run
    async fn is_marked(&self, period: u32) -> Result<bool>;

    /// Mark `period` as published. Marking twice is a no-op.
    async fn mark(&self, period: u32) -> Result<()>;
}

/// Marker file holding one gameweek id per line
#[derive(Debug, Clone)]
pub struct FileCompletionTracker {
    path: PathBuf,
}

impl FileCompletionTracker {
    /// Open the marker file at `path`, creating it empty if absent
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        OpenOptions::new().create(true).append(true).open(&path).await?;

        tracing::debug!("Completion marker file ready at: {:?}", path);

        Ok(Self { path })
    }

    /// Every gameweek id currently in the file
    pub async fn marked_periods(&self) -> Result<BTreeSet<u32>> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        self.parse(&contents)
    }

    fn parse(&self, contents: &str) -> Result<BTreeSet<u32>> {
        let mut periods = BTreeSet::new();
        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let period = line
                .parse::<u32>()
                .map_err(|_| TrackerError::corruption(&self.path, index + 1, line))?;
            periods.insert(period);
        }

        Ok(periods)
    }
}

#[async_trait::async_trait]
impl CompletionStore for FileCompletionTracker {
    async fn is_marked(&self, period: u32) -> Result<bool> {
        Ok(self.marked_periods().await?.contains(&period))
    }

    async fn mark(&self, period: u32) -> Result<()> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        if self.parse(&contents)?.contains(&period) {
            tracing::warn!("Gameweek {} already marked in {:?}", period, self.path);
            return Ok(());
        }

        // An unterminated last line must not run into the new id
        let separator = if contents.is_empty() || contents.ends_with('\n') { "" } else { "\n" };

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path).await?;
        file.write_all(format!("{separator}{period}\n").as_bytes()).await?;
        file.flush().await?;

        tracing::info!("Marked gameweek {} as published", period);

        Ok(())
    }
}

/// In-memory marker set (for testing and dry runs)
#[derive(Debug, Clone, Default)]
pub struct InMemoryCompletionTracker {
    periods: Arc<Mutex<BTreeSet<u32>>>,
}

impl InMemoryCompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the tracker with already published gameweeks
    pub fn with_marked(periods: impl IntoIterator<Item = u32>) -> Self {
        Self { periods: Arc::new(Mutex::new(periods.into_iter().collect())) }
    }

    pub async fn marked_periods(&self) -> BTreeSet<u32> {
        self.periods.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl CompletionStore for InMemoryCompletionTracker {
    async fn is_marked(&self, period: u32) -> Result<bool> {
        Ok(self.periods.lock().await.contains(&period))
    }

    async fn mark(&self, period: u32) -> Result<()> {
        if !self.periods.lock().await.insert(period) {
            tracing::warn!("Gameweek {} already marked", period);
        }
        Ok(())
    }
}
