//! Purchase bills

use parasut_domain::RequestDescriptor;
use serde_json::Value;

use super::query::ListParams;
use crate::api::RequestDispatcher;

#[derive(Clone, Copy)]
pub struct Expenses<'a> {
    dispatcher: &'a RequestDispatcher,
}

impl<'a> Expenses<'a> {
    pub(crate) fn new(dispatcher: &'a RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn get_purchase_bills(&self, params: &ListParams) -> Value {
        let descriptor = RequestDescriptor::get(params.path_for("purchase_bills"));
        self.dispatcher.send(descriptor).await.into_value()
    }
}
