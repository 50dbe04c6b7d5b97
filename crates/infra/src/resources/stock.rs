//! Products

use parasut_domain::{RequestDescriptor, Result};
use serde::Serialize;
use serde_json::Value;

use super::query::ListParams;
use super::resource_body;
use crate::api::RequestDispatcher;

const PRODUCTS: &str = "products";

#[derive(Clone, Copy)]
pub struct Stock<'a> {
    dispatcher: &'a RequestDispatcher,
}

impl<'a> Stock<'a> {
    pub(crate) fn new(dispatcher: &'a RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn get_products(&self, params: &ListParams) -> Value {
        let descriptor = RequestDescriptor::get(params.path_for(PRODUCTS));
        self.dispatcher.send(descriptor).await.into_value()
    }

    /// # Errors
    /// Returns `ParasutError::Serialization` if `attributes` cannot be
    /// serialized.
    pub async fn create_product<A: Serialize + ?Sized>(
        &self,
        attributes: &A,
        relationships: Option<Value>,
    ) -> Result<Value> {
        let body = resource_body(PRODUCTS, None, attributes, relationships)?;
        let descriptor = RequestDescriptor::post(format!("/{PRODUCTS}"), body);
        Ok(self.dispatcher.send(descriptor).await.into_value())
    }
}
