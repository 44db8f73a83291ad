//! Run-payload handling for the execution dispatcher.
//!
//! The dispatcher's local half: turning the raw run-input text into an
//! execution request, or into a local input failure before any call is
//! issued. The remote half (the actual POST and last-execution tracking)
//! lives in the workbench.

use serde_json::Value;

use crate::api::ApiError;
use crate::api::payloads::ExecutionCreate;
use crate::types::WorkflowId;

/// Parses the raw run payload.
///
/// A trimmed-empty payload means "no input" (`None`). Anything else must
/// be valid JSON; a parse failure is a local input failure and no call
/// may be issued for it.
///
/// # Examples
///
/// ```
/// use flowdeck::execution::parse_run_input;
/// use serde_json::json;
///
/// assert_eq!(parse_run_input("").unwrap(), None);
/// assert_eq!(parse_run_input("  ").unwrap(), None);
/// assert_eq!(parse_run_input("{}").unwrap(), Some(json!({})));
/// assert!(parse_run_input("{bad json").is_err());
/// ```
pub fn parse_run_input(raw: &str) -> Result<Option<Value>, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|err| ApiError::InvalidInput(format!("run input is not valid JSON: {err}")))
}

/// Builds the execution request for a workflow, validating the payload.
pub fn build_request(workflow_id: WorkflowId, raw: &str) -> Result<ExecutionCreate, ApiError> {
    Ok(ExecutionCreate {
        workflow_id,
        input_data: parse_run_input(raw)?,
    })
}
