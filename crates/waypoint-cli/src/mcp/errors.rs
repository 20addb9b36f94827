//! Error conversion for MCP tool results.

use rmcp::ErrorData;
use waypoint_core::PlanError;

/// Maps a core error onto an MCP error.
///
/// Problems with the caller's request (bad input, unknown ids, rejected
/// transitions, broken plans) are `invalid_params`; everything else is an
/// internal error.
pub fn to_mcp_error(message: &str, error: &PlanError) -> ErrorData {
    let text = format!("{message}: {error}");
    match error {
        PlanError::InvalidInput { .. }
        | PlanError::PlanNotFound { .. }
        | PlanError::GoalNotFound { .. }
        | PlanError::TaskNotFound { .. } => ErrorData::invalid_params(text, None),
        e if e.is_lifecycle() || e.is_structural() => ErrorData::invalid_params(text, None),
        _ => ErrorData::internal_error(text, None),
    }
}
