//! Resource clients
//!
//! Thin wrappers that turn typed calls into [`RequestDescriptor`]s and hand
//! the dispatcher's envelope back as JSON. They carry no retry or auth logic
//! of their own.
//!
//! [`RequestDescriptor`]: parasut_domain::RequestDescriptor

pub mod cash;
pub mod expenses;
pub mod legalize;
pub mod query;
pub mod sales;
pub mod stock;
pub mod trackable_jobs;

use parasut_domain::Result;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::InfraError;

pub use cash::Cash;
pub use expenses::Expenses;
pub use legalize::Legalize;
pub use query::{ListParams, Page};
pub use sales::Sales;
pub use stock::Stock;
pub use trackable_jobs::TrackableJobs;

/// `{"data": {"type", ["id"], "attributes", ["relationships"]}}`
///
/// # Errors
/// Returns `ParasutError::Serialization` if `attributes` cannot be turned
/// into JSON.
pub fn resource_body<A: Serialize + ?Sized>(
    resource_type: &str,
    id: Option<&str>,
    attributes: &A,
    relationships: Option<Value>,
) -> Result<Value> {
    let attributes = serde_json::to_value(attributes).map_err(InfraError::from)?;

    let mut data = Map::new();
    data.insert("type".into(), Value::String(resource_type.to_string()));
    if let Some(id) = id {
        data.insert("id".into(), Value::String(id.to_string()));
    }
    data.insert("attributes".into(), attributes);
    if let Some(relationships) = relationships {
        data.insert("relationships".into(), relationships);
    }

    let mut body = Map::new();
    body.insert("data".into(), Value::Object(data));
    Ok(Value::Object(body))
}
