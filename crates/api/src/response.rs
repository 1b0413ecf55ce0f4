//! Shared response envelope for API handlers.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// Every successful response wraps its payload in this envelope so clients
/// can distinguish it from the `{ "error", "code" }` error shape.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
