use fundamentals_core::LogSummary;
use serde::{Deserialize, Serialize};

/// Single-field string message, the shape of `std_msgs/String`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringMsg {
    pub data: String,
}

impl StringMsg {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

impl From<String> for StringMsg {
    fn from(data: String) -> Self {
        Self { data }
    }
}

impl From<&str> for StringMsg {
    fn from(data: &str) -> Self {
        Self::new(data)
    }
}

impl LogSummary for StringMsg {
    fn log_summary(&self) -> String {
        format!("\"{}\"", self.data)
    }
}
