use async_trait::async_trait;
use std::sync::Mutex;

use storefront_analytics::services::{AnalyticsError, ProductAnalytics};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackedCall {
    Bookmark { product_id: String, user_id: String },
    CartAdd { product_id: String, user_id: String },
    View { product_id: String, user_id: Option<String> },
}

/// In-memory stand-in for the analytics backend. Remembers every call and
/// can be switched into a failing mode.
#[derive(Default)]
pub struct RecordingAnalytics {
    calls: Mutex<Vec<TrackedCall>>,
    failure: Mutex<Option<String>>,
}

impl RecordingAnalytics {
    pub fn calls(&self) -> Vec<TrackedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_with(&self, reason: &str) {
        *self.failure.lock().unwrap() = Some(reason.to_string());
    }

    fn record(&self, call: TrackedCall) -> Result<(), AnalyticsError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().as_ref() {
            Some(reason) => Err(AnalyticsError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProductAnalytics for RecordingAnalytics {
    async fn track_bookmark(&self, product_id: &str, user_id: &str) -> Result<(), AnalyticsError> {
        self.record(TrackedCall::Bookmark {
            product_id: product_id.to_string(),
            user_id: user_id.to_string(),
        })
    }

    async fn track_cart_add(&self, product_id: &str, user_id: &str) -> Result<(), AnalyticsError> {
        self.record(TrackedCall::CartAdd {
            product_id: product_id.to_string(),
            user_id: user_id.to_string(),
        })
    }

    async fn track_product_view(&self, product_id: &str, user_id: Option<&str>) -> Result<(), AnalyticsError> {
        self.record(TrackedCall::View {
            product_id: product_id.to_string(),
            user_id: user_id.map(str::to_string),
        })
    }
}
