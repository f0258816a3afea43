use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Uniform success envelope: `status` mirrors the HTTP status code,
/// `message` is human-readable, `result` carries the payload when there is
/// one.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

fn envelope<T: Serialize>(
    status: StatusCode,
    message: impl Into<String>,
    result: Option<T>,
) -> Response {
    let body = Envelope {
        status: status.as_u16(),
        message: message.into(),
        result,
    };
    (status, Json(body)).into_response()
}

pub fn ok<T: Serialize>(message: impl Into<String>, result: T) -> Response {
    envelope(StatusCode::OK, message, Some(result))
}

pub fn ok_message(message: impl Into<String>) -> Response {
    envelope::<()>(StatusCode::OK, message, None)
}

pub fn created<T: Serialize>(message: impl Into<String>, result: T) -> Response {
    envelope(StatusCode::CREATED, message, Some(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn ok_wraps_result() {
        let (status, json) = body_json(ok("Success", serde_json::json!({"id": 7}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], 200);
        assert_eq!(json["message"], "Success");
        assert_eq!(json["result"]["id"], 7);
    }

    #[tokio::test]
    async fn ok_message_omits_result() {
        let (status, json) = body_json(ok_message("User deleted successfully")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json.get("result").is_none());
    }

    #[tokio::test]
    async fn created_sets_201() {
        let (status, json) = body_json(created("Listing created successfully", 1_i64)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["status"], 201);
        assert_eq!(json["result"], 1);
    }
}
