//! The shapes `StoreFacade::open`'s `configuration` argument accepts
//!
//! The original this mapping is drawn from lets `configuration` be a
//! connection object, a `[positional_args, keyword_args]` pair, or a JSON
//! string encoding that pair. A Rust driver cannot be constructed from an
//! opaque argument list at runtime the way a dynamically-dispatched Python
//! one can, so the `Args`/`Json` shapes carry inert `serde_json::Value`
//! data for an embedder-supplied connection factory instead of invoking one
//! themselves.

use std::fmt;

use rdb2rdf_schema::RdbConnection;
use serde_json::Value;

use crate::error::StoreError;

/// Positional and keyword connection arguments, opaque to this crate.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ConnectionArgs {
    pub positional: Vec<Value>,
    pub keyword: serde_json::Map<String, Value>,
}

/// What was passed to `StoreFacade::open`.
pub enum StoreConfiguration {
    /// A connection already constructed by the caller — the Rust
    /// equivalent of passing a `Connectable` object directly.
    Direct(Box<dyn RdbConnection>),
    /// `[positional_args, keyword_args]`, handed to `open`'s connection
    /// factory.
    Args(ConnectionArgs),
}

impl fmt::Debug for StoreConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreConfiguration::Direct(_) => write!(f, "StoreConfiguration::Direct(..)"),
            StoreConfiguration::Args(args) => f.debug_tuple("StoreConfiguration::Args").field(args).finish(),
        }
    }
}

impl StoreConfiguration {
    /// Parse the JSON-string-encoded `[positional_args, keyword_args]`
    /// shape. Any other JSON value fails with `StoreError::Configuration`.
    pub fn from_json_str(s: &str) -> Result<StoreConfiguration, StoreError> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| StoreError::Configuration(format!("invalid configuration JSON: {e}")))?;
        Self::from_json_value(value)
    }

    fn from_json_value(value: Value) -> Result<StoreConfiguration, StoreError> {
        let mut items = match value {
            Value::Array(items) if items.len() == 2 => items,
            other => {
                return Err(StoreError::Configuration(format!(
                    "expected a two-item [positional_args, keyword_args] array, got {other}"
                )))
            }
        };
        let keyword = match items.pop().expect("length checked above") {
            Value::Object(map) => map,
            other => return Err(StoreError::Configuration(format!("expected a keyword_args object, got {other}"))),
        };
        let positional = match items.pop().expect("length checked above") {
            Value::Array(args) => args,
            other => return Err(StoreError::Configuration(format!("expected a positional_args array, got {other}"))),
        };
        Ok(StoreConfiguration::Args(ConnectionArgs { positional, keyword }))
    }
}
