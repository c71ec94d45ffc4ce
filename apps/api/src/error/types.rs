use serde::Serialize;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    error: ErrorBody,
}

impl ErrorResponse {
    pub(super) fn new(error: ErrorBody) -> Self {
        Self { error }
    }
}

/// Machine-readable error details.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-body.ts"
)]
pub struct ErrorBody {
    kind: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    permission_ids: Option<Vec<String>>,
}

impl ErrorBody {
    pub(super) fn new(
        kind: &str,
        message: String,
        permission_ids: Option<Vec<String>>,
    ) -> Self {
        Self {
            kind: kind.to_owned(),
            message,
            permission_ids,
        }
    }
}
