//! Background job status

use parasut_domain::RequestDescriptor;
use serde_json::Value;

use crate::api::RequestDispatcher;

#[derive(Clone, Copy)]
pub struct TrackableJobs<'a> {
    dispatcher: &'a RequestDispatcher,
}

impl<'a> TrackableJobs<'a> {
    pub(crate) fn new(dispatcher: &'a RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn show_trackable_job(&self, id: &str) -> Value {
        let descriptor = RequestDescriptor::get(format!("/trackable_jobs/{id}"));
        self.dispatcher.send(descriptor).await.into_value()
    }
}
