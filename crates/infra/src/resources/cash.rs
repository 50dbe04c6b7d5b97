//! Bank and cash accounts

use parasut_domain::RequestDescriptor;
use serde_json::Value;

use super::query::ListParams;
use crate::api::RequestDispatcher;

#[derive(Clone, Copy)]
pub struct Cash<'a> {
    dispatcher: &'a RequestDispatcher,
}

impl<'a> Cash<'a> {
    pub(crate) fn new(dispatcher: &'a RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    /// `GET /accounts`
    pub async fn get_bank_accounts(&self, params: &ListParams) -> Value {
        let descriptor = RequestDescriptor::get(params.path_for("accounts"));
        self.dispatcher.send(descriptor).await.into_value()
    }
}
