use flightcheck_core::ScheduleSource;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct AppState {
    source: Option<Arc<dyn ScheduleSource>>,
}

impl AppState {
    pub fn new(source: Arc<dyn ScheduleSource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// State for a gateway started without provider credentials; batch
    /// lookups are refused.
    pub fn without_credentials() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<&Arc<dyn ScheduleSource>> {
        self.source.as_ref()
    }
}
