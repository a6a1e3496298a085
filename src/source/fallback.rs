//! Fixture fallback for an unavailable primary source.

use tracing::warn;

use super::{DataSource, DatasetDocument};

/// Wraps a primary source and substitutes a fixture dataset when the
/// primary fails before ever delivering data.
///
/// The fixture is served at most once. As soon as the primary produces a
/// dataset it takes over again.
#[derive(Debug)]
pub struct FallbackSource {
    primary: Box<dyn DataSource>,
    fixture: Option<DatasetDocument>,
    fallback_description: String,
    primary_delivered: bool,
    serving_fixture: bool,
}

impl FallbackSource {
    pub fn new(primary: Box<dyn DataSource>, fixture: DatasetDocument) -> Self {
        let fallback_description = format!("{} (fallback data)", primary.description());
        Self {
            primary,
            fixture: Some(fixture),
            fallback_description,
            primary_delivered: false,
            serving_fixture: false,
        }
    }

    /// Whether the data currently on screen came from the fixture.
    pub fn serving_fixture(&self) -> bool {
        self.serving_fixture
    }
}

impl DataSource for FallbackSource {
    fn poll(&mut self) -> Option<DatasetDocument> {
        if let Some(document) = self.primary.poll() {
            self.primary_delivered = true;
            self.serving_fixture = false;
            return Some(document);
        }

        if self.primary_delivered {
            return None;
        }

        let error = self.primary.error()?;
        let fixture = self.fixture.take()?;
        warn!(source = self.primary.description(), %error, "primary source failed, using fallback data");
        self.serving_fixture = true;
        Some(fixture)
    }

    fn description(&self) -> &str {
        if self.serving_fixture {
            &self.fallback_description
        } else {
            self.primary.description()
        }
    }

    fn error(&self) -> Option<&str> {
        self.primary.error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChannelSource, FileSource};

    fn fixture() -> DatasetDocument {
        DatasetDocument::from_json(r#"[{"alarm": "LOS", "site": "NYC-01"}]"#).unwrap()
    }

    #[test]
    fn test_serves_fixture_when_primary_fails() {
        let primary = Box::new(FileSource::new("/nonexistent/alarms.json"));
        let mut source = FallbackSource::new(primary, fixture());

        let document = source.poll().unwrap();
        assert_eq!(document.rows.len(), 1);
        assert!(source.serving_fixture());
        assert!(source.description().ends_with("(fallback data)"));

        // Fixture is only handed out once
        assert!(source.poll().is_none());
        assert!(source.error().is_some());
    }

    #[test]
    fn test_primary_data_wins() {
        let (_tx, primary) = ChannelSource::create("api");
        let mut source = FallbackSource::new(Box::new(primary), fixture());

        let document = source.poll().unwrap();
        assert!(document.rows.is_empty());
        assert!(!source.serving_fixture());
        assert_eq!(source.description(), "channel: api");
    }
}
