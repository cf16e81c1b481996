//! Interactive classification route.
//!
//! Consumed synchronously by the inspection UI whenever the operator
//! selects an element in the preview iframe. Nothing is persisted; the
//! suggestion is recomputed on every call.

use axum::Json;
use serde::{Deserialize, Serialize};

use mining::{classify, CanonicalType};

/// Element facts as observed by the inspector overlay.
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(rename = "tagName")]
    pub tag_name: String,

    #[serde(default)]
    pub id: String,

    #[serde(rename = "className", default)]
    pub class_name: String,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    /// Suggested canonical type, or null when nothing matched
    pub suggestion: Option<CanonicalType>,
}

/// Propose a canonical type for the selected element.
///
/// Never fails: absence of a match is a valid, non-exceptional answer.
pub async fn classify_handler(Json(request): Json<ClassifyRequest>) -> Json<ClassifyResponse> {
    let suggestion = classify(&request.tag_name, &request.id, &request.class_name);
    Json(ClassifyResponse { suggestion })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_suggestion_for_hero_class() {
        let response = classify_handler(Json(ClassifyRequest {
            tag_name: "div".to_string(),
            id: String::new(),
            class_name: "hero jumbotron".to_string(),
        }))
        .await;

        assert_eq!(response.suggestion, Some(CanonicalType::HeroBanner));
    }

    #[tokio::test]
    async fn test_tag_fallback() {
        let response = classify_handler(Json(ClassifyRequest {
            tag_name: "nav".to_string(),
            id: String::new(),
            class_name: String::new(),
        }))
        .await;

        assert_eq!(response.suggestion, Some(CanonicalType::Navigation));
    }

    #[tokio::test]
    async fn test_no_match_is_null_not_error() {
        let response = classify_handler(Json(ClassifyRequest {
            tag_name: "div".to_string(),
            id: String::new(),
            class_name: String::new(),
        }))
        .await;

        assert_eq!(response.suggestion, None);
    }

    #[test]
    fn test_request_accepts_inspector_payload() {
        let request: ClassifyRequest =
            serde_json::from_str(r#"{"tagName": "div", "className": "hero", "id": "top"}"#)
                .unwrap();

        assert_eq!(request.tag_name, "div");
        assert_eq!(request.class_name, "hero");
        assert_eq!(request.id, "top");

        // id and className are optional on the wire
        let sparse: ClassifyRequest = serde_json::from_str(r#"{"tagName": "h1"}"#).unwrap();
        assert!(sparse.id.is_empty());
        assert!(sparse.class_name.is_empty());
    }
}
