//! Channel-based data source.
//!
//! Receives dataset documents via a tokio watch channel. This lets a host
//! application push data it fetched itself instead of going through a file.

use tokio::sync::watch;

use super::{DataSource, DatasetDocument};

/// A data source that receives datasets via a channel.
///
/// # Example
///
/// ```
/// use tabview::{ChannelSource, DataSource, DatasetDocument};
///
/// # tokio_test::block_on(async {
/// let (tx, mut source) = ChannelSource::create("dashboard");
///
/// // A host task fetches data and pushes it in
/// let producer = tokio::spawn(async move {
///     tx.send(DatasetDocument::default()).unwrap();
///     tx
/// });
/// let _tx = producer.await.unwrap();
///
/// assert!(source.poll().is_some());
/// # });
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<DatasetDocument>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - Where the datasets come from
    pub fn new(receiver: watch::Receiver<DatasetDocument>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for sending datasets to a ChannelSource.
    ///
    /// Returns (sender, source).
    pub fn create(source_description: &str) -> (watch::Sender<DatasetDocument>, Self) {
        let (tx, rx) = watch::channel(DatasetDocument::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<DatasetDocument> {
        // Return the initial value on first poll
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(title: &str) -> DatasetDocument {
        DatasetDocument {
            title: Some(title.to_string()),
            ..DatasetDocument::default()
        }
    }

    #[test]
    fn test_channel_source_initial_value() {
        let (_tx, mut source) = ChannelSource::create("test");

        let first = source.poll().unwrap();
        assert!(first.rows.is_empty());

        assert!(source.poll().is_none());
    }

    #[test]
    fn test_channel_source_receives_updates() {
        let (tx, mut source) = ChannelSource::create("test");
        let _ = source.poll();

        tx.send(document("Alarms")).unwrap();
        assert_eq!(source.poll().unwrap().title.as_deref(), Some("Alarms"));
        assert!(source.poll().is_none());
    }

    #[tokio::test]
    async fn test_channel_source_fed_from_task() {
        let (tx, mut source) = ChannelSource::create("task");
        let _ = source.poll();

        let producer = tokio::spawn(async move {
            tx.send(document("Pushed")).unwrap();
            tx
        });
        let _tx = producer.await.unwrap();

        assert_eq!(source.poll().unwrap().title.as_deref(), Some("Pushed"));
    }

    #[test]
    fn test_channel_source_description() {
        let (_tx, source) = ChannelSource::create("dashboard-api");
        assert_eq!(source.description(), "channel: dashboard-api");
        assert!(source.error().is_none());
    }
}
