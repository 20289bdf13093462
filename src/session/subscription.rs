use chrono::Utc;

/// The one stream a session is currently following.
///
/// Requesting another stream replaces the subscription wholesale; the old
/// stream's buffered value is discarded with it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StreamSubscription {
    stream_name: Option<String>,
    last_value: Option<f64>,
    /// Unix timestamp in milliseconds of the last applied value.
    updated_at: Option<i64>,
}

impl StreamSubscription {
    /// Points the subscription at `stream_name`. An empty name clears it.
    pub fn replace(&mut self, stream_name: &str) {
        *self = Self {
            stream_name: (!stream_name.is_empty()).then(|| stream_name.to_string()),
            ..Self::default()
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Exact, case-sensitive match against the subscribed stream.
    pub fn matches(&self, stream_name: &str) -> bool {
        self.stream_name.as_deref() == Some(stream_name)
    }

    /// Stores a new value for the subscribed stream.
    pub fn record(&mut self, value: f64) {
        self.last_value = Some(value);
        self.updated_at = Some(Utc::now().timestamp_millis());
    }

    pub fn stream_name(&self) -> Option<&str> {
        self.stream_name.as_deref()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.last_value
    }

    pub fn updated_at(&self) -> Option<i64> {
        self.updated_at
    }
}
