//! Normalization of Jenkins build payloads into stable summary shapes.
//!
//! Missing or `null` fields resolve to defaults; only a payload that is not
//! a JSON object at all (or whose fields have the wrong JSON type) is
//! reported as [`DashError::MalformedResponse`].

mod build;
mod humanize;
mod schema;
mod selector;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DashError, Result};

pub use build::{
    to_build_detail, to_build_list, to_build_summary, to_console_output, BuildDetail, BuildRef,
    BuildStatus, BuildSummary, ConsoleOutput,
};
pub use humanize::to_relative_time;
pub use selector::{BuildId, BuildSelector};

fn parse_object<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let value: Value = serde_json::from_str(raw).map_err(|_| DashError::malformed(raw))?;
    if !value.is_object() {
        return Err(DashError::malformed(raw));
    }
    serde_json::from_value(value).map_err(|e| {
        log::warn!("Payload has unexpected field types: {e}");
        DashError::malformed(raw)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrongly_typed_field_is_malformed() {
        let result = to_build_summary(r#"{"number": "seventeen"}"#);
        assert!(matches!(result, Err(DashError::MalformedResponse { .. })));
    }
}
