//! E-archives and e-invoice inboxes

use parasut_domain::{RequestDescriptor, Result};
use serde::Serialize;
use serde_json::Value;

use super::query::{include_suffix, ListParams};
use super::resource_body;
use crate::api::RequestDispatcher;

const E_ARCHIVES: &str = "e_archives";

#[derive(Clone, Copy)]
pub struct Legalize<'a> {
    dispatcher: &'a RequestDispatcher,
}

impl<'a> Legalize<'a> {
    pub(crate) fn new(dispatcher: &'a RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    async fn send(&self, descriptor: RequestDescriptor) -> Value {
        self.dispatcher.send(descriptor).await.into_value()
    }

    /// Issue an e-archive for an invoice. The service answers with a
    /// trackable job.
    ///
    /// # Errors
    /// Returns `ParasutError::Serialization` if `attributes` cannot be
    /// serialized.
    pub async fn create_e_archive<A: Serialize + ?Sized>(
        &self,
        attributes: &A,
        relationships: Value,
    ) -> Result<Value> {
        let body = resource_body(E_ARCHIVES, None, attributes, Some(relationships))?;
        Ok(self.send(RequestDescriptor::post(format!("/{E_ARCHIVES}"), body)).await)
    }

    pub async fn show_e_archive(&self, id: &str, include: Option<&str>) -> Value {
        let path = format!("/{E_ARCHIVES}/{id}{}", include_suffix(include));
        self.send(RequestDescriptor::get(path)).await
    }

    /// Document carrying the PDF URL of an e-archive.
    pub async fn show_e_archive_pdf(&self, id: &str) -> Value {
        self.send(RequestDescriptor::get(format!("/{E_ARCHIVES}/{id}/pdf"))).await
    }

    pub async fn get_e_invoice_inboxes(&self, params: &ListParams) -> Value {
        self.send(RequestDescriptor::get(params.path_for("e_invoice_inboxes"))).await
    }
}
