//! Contacts and sales invoices

use parasut_domain::{RequestDescriptor, Result};
use serde::Serialize;
use serde_json::Value;

use super::query::{include_suffix, ListParams};
use super::resource_body;
use crate::api::RequestDispatcher;

const CONTACTS: &str = "contacts";
const SALES_INVOICES: &str = "sales_invoices";

/// Sales endpoints: `/contacts` and `/sales_invoices`.
#[derive(Clone, Copy)]
pub struct Sales<'a> {
    dispatcher: &'a RequestDispatcher,
}

impl<'a> Sales<'a> {
    pub(crate) fn new(dispatcher: &'a RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    async fn send(&self, descriptor: RequestDescriptor) -> Value {
        self.dispatcher.send(descriptor).await.into_value()
    }

    pub async fn get_contacts(&self, params: &ListParams) -> Value {
        self.send(RequestDescriptor::get(params.path_for(CONTACTS))).await
    }

    /// # Errors
    /// Returns `ParasutError::Serialization` if `attributes` cannot be
    /// serialized; request failures come back as an `errors` document.
    pub async fn create_contact<A: Serialize + ?Sized>(
        &self,
        attributes: &A,
        relationships: Option<Value>,
    ) -> Result<Value> {
        let body = resource_body(CONTACTS, None, attributes, relationships)?;
        Ok(self.send(RequestDescriptor::post(format!("/{CONTACTS}"), body)).await)
    }

    pub async fn show_contact(&self, id: &str) -> Value {
        self.send(RequestDescriptor::get(format!("/{CONTACTS}/{id}"))).await
    }

    /// # Errors
    /// Returns `ParasutError::Serialization` if `attributes` cannot be
    /// serialized.
    pub async fn update_contact<A: Serialize + ?Sized>(
        &self,
        id: &str,
        attributes: &A,
        relationships: Option<Value>,
    ) -> Result<Value> {
        let body = resource_body(CONTACTS, Some(id), attributes, relationships)?;
        Ok(self.send(RequestDescriptor::put(format!("/{CONTACTS}/{id}"), body)).await)
    }

    pub async fn delete_contact(&self, id: &str) -> Value {
        self.send(RequestDescriptor::delete(format!("/{CONTACTS}/{id}"))).await
    }

    pub async fn get_sales_invoices(&self, params: &ListParams) -> Value {
        self.send(RequestDescriptor::get(params.path_for(SALES_INVOICES))).await
    }

    /// # Errors
    /// Returns `ParasutError::Serialization` if `attributes` cannot be
    /// serialized.
    pub async fn create_sales_invoice<A: Serialize + ?Sized>(
        &self,
        attributes: &A,
        relationships: Option<Value>,
    ) -> Result<Value> {
        let body = resource_body(SALES_INVOICES, None, attributes, relationships)?;
        Ok(self.send(RequestDescriptor::post(format!("/{SALES_INVOICES}"), body)).await)
    }

    pub async fn show_sales_invoice(&self, id: &str, include: Option<&str>) -> Value {
        let path = format!("/{SALES_INVOICES}/{id}{}", include_suffix(include));
        self.send(RequestDescriptor::get(path)).await
    }

    /// # Errors
    /// Returns `ParasutError::Serialization` if `attributes` cannot be
    /// serialized.
    pub async fn update_sales_invoice<A: Serialize + ?Sized>(
        &self,
        id: &str,
        attributes: &A,
        relationships: Option<Value>,
    ) -> Result<Value> {
        let body = resource_body(SALES_INVOICES, Some(id), attributes, relationships)?;
        Ok(self.send(RequestDescriptor::put(format!("/{SALES_INVOICES}/{id}"), body)).await)
    }

    pub async fn delete_sales_invoice(&self, id: &str) -> Value {
        self.send(RequestDescriptor::delete(format!("/{SALES_INVOICES}/{id}"))).await
    }

    pub async fn cancel_sales_invoice(&self, id: &str, include: Option<&str>) -> Value {
        let path = format!("/{SALES_INVOICES}/{id}/cancel{}", include_suffix(include));
        self.send(RequestDescriptor::delete(path)).await
    }

    pub async fn recover_sales_invoice(&self, id: &str) -> Value {
        self.send(RequestDescriptor::patch(format!("/{SALES_INVOICES}/{id}/recover"))).await
    }

    pub async fn archive_sales_invoice(&self, id: &str) -> Value {
        self.send(RequestDescriptor::patch(format!("/{SALES_INVOICES}/{id}/archive"))).await
    }

    pub async fn unarchive_sales_invoice(&self, id: &str) -> Value {
        self.send(RequestDescriptor::patch(format!("/{SALES_INVOICES}/{id}/unarchive"))).await
    }
}
