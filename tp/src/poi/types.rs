//! POI service request/response types

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, Poi};

/// Body of a POI fetch request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiRequest {
    /// Interest category tags
    pub interests: Vec<String>,
    /// Walking budget in hours
    pub walking_time: f32,
    /// Where the walk starts, if known
    pub user_location: Option<Coordinate>,
}

/// Ordered POIs plus an explanatory note
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoiResponse {
    pub routes: Vec<Poi>,
    #[serde(default)]
    pub explanation: String,
}

impl PoiResponse {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request = PoiRequest {
            interests: vec!["HISTORY".to_string(), "COFFEE".to_string()],
            walking_time: 2.0,
            user_location: Some(Coordinate::new(56.3269, 44.0075)),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "interests": ["HISTORY", "COFFEE"],
                "walking_time": 2.0,
                "user_location": "POINT (44.0075 56.3269)",
            })
        );
    }

    #[test]
    fn test_request_without_location_sends_null() {
        let request = PoiRequest {
            interests: vec!["PARKS".to_string()],
            walking_time: 0.5,
            user_location: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value["user_location"].is_null());
    }

    #[test]
    fn test_response_parses() {
        let json = r#"{
            "routes": [
                {"id": 1, "title": "A", "description": "", "address": "", "coordinate": "POINT (44.0 56.3)",
                 "category_id": "HISTORY", "url": "", "time": null, "distance": null}
            ],
            "explanation": "Two hours of history"
        }"#;
        let response: PoiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.routes.len(), 1);
        assert_eq!(response.explanation, "Two hours of history");
        assert!(!response.is_empty());
    }
}
