//! Data models and configuration
//!
//! Request/response bodies of the HTTP surface, the plant description
//! passed to the chat vendor, and environment configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    /// Free-text color description; also labels the stored object.
    pub result: String,
    pub phone_number: String,
    pub mood_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub image_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReplyRequest {
    pub diary_entry: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateReplyResponse {
    pub reply: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantInfo {
    pub plant_type: String,
    pub plant_name: String,
    pub watering_cycle: LooseText,
    pub start_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantProfileResponse {
    #[serde(rename = "plantMBTI")]
    pub plant_mbti: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysisRequest {
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnalysisResponse {
    pub analysis: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlantHealthRequest {
    pub image: String,
}

/// A JSON scalar accepted either as a string or a number, rendered as text.
///
/// Clients send `wateringCycle` as `7` or `"7"` interchangeably.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseText {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for LooseText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LooseText::Text(text) => f.write_str(text),
            LooseText::Number(number) => write!(f, "{}", number),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub image_model: String,
    pub chat_model: String,
    pub vision_model: String,
    pub http_timeout_secs: Option<u64>,
    pub storage_bucket: String,
    pub storage_endpoint: String,
    pub storage_region: String,
    pub storage_public_base_url: String,
    pub storage_access_key_id: Option<String>,
    pub storage_secret_access_key: Option<String>,
    pub firestore_credentials_file: String,
    pub firestore_project_id: Option<String>,
    pub firestore_base_url: String,
    pub records_collection: String,
    pub cors_allowed_origins: Vec<String>,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| crate::Error::Config(format!("{} not set", key)))
        };
        let or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let storage_bucket = required("FIREBASE_STORAGE_BUCKET")?;
        let storage_endpoint = or_default("STORAGE_ENDPOINT", "https://storage.googleapis.com");
        let storage_public_base_url = or_default(
            "STORAGE_PUBLIC_BASE_URL",
            &format!("{}/{}", storage_endpoint.trim_end_matches('/'), storage_bucket),
        );

        let http_timeout_secs = match lookup("HTTP_TIMEOUT_SECS").filter(|v| !v.is_empty()) {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                crate::Error::Config(format!("Invalid HTTP_TIMEOUT_SECS '{}'", raw))
            })?),
            None => None,
        };

        let port = match lookup("PORT").filter(|v| !v.is_empty()) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| crate::Error::Config(format!("Invalid PORT '{}'", raw)))?,
            None => 3001,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_base_url: or_default("OPENAI_BASE_URL", "https://api.openai.com"),
            image_model: or_default("IMAGE_MODEL", "dall-e-3"),
            chat_model: or_default("CHAT_MODEL", "gpt-3.5-turbo"),
            vision_model: or_default("VISION_MODEL", "gpt-4-turbo"),
            http_timeout_secs,
            storage_bucket,
            storage_endpoint,
            storage_region: or_default("STORAGE_REGION", "auto"),
            storage_public_base_url,
            storage_access_key_id: lookup("STORAGE_ACCESS_KEY_ID").filter(|v| !v.is_empty()),
            storage_secret_access_key: lookup("STORAGE_SECRET_ACCESS_KEY")
                .filter(|v| !v.is_empty()),
            firestore_credentials_file: or_default(
                "FIRESTORE_CREDENTIALS_FILE",
                "./config/service-account.json",
            ),
            firestore_project_id: lookup("FIRESTORE_PROJECT_ID").filter(|v| !v.is_empty()),
            firestore_base_url: or_default("FIRESTORE_BASE_URL", "https://firestore.googleapis.com"),
            records_collection: or_default("RECORDS_COLLECTION", "results"),
            cors_allowed_origins,
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("OPENAI_API_KEY", "sk-test"),
        ("FIREBASE_STORAGE_BUCKET", "flowe.appspot.com"),
    ];

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(MINIMAL)).unwrap();

        assert_eq!(config.port, 3001);
        assert_eq!(config.openai_base_url, "https://api.openai.com");
        assert_eq!(config.image_model, "dall-e-3");
        assert_eq!(config.chat_model, "gpt-3.5-turbo");
        assert_eq!(config.vision_model, "gpt-4-turbo");
        assert_eq!(config.http_timeout_secs, None);
        assert_eq!(
            config.storage_public_base_url,
            "https://storage.googleapis.com/flowe.appspot.com"
        );
        assert_eq!(config.records_collection, "results");
        assert!(config.cors_allowed_origins.is_empty());
        assert!(config.storage_access_key_id.is_none());
    }

    #[test]
    fn test_config_requires_api_key() {
        let err = Config::from_lookup(lookup_from(&[("FIREBASE_STORAGE_BUCKET", "b")]))
            .unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_config_requires_bucket() {
        let err = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "k")])).unwrap_err();
        assert!(err.to_string().contains("FIREBASE_STORAGE_BUCKET"));
    }

    #[test]
    fn test_config_overrides() {
        let mut pairs = MINIMAL.to_vec();
        pairs.extend_from_slice(&[
            ("PORT", "8080"),
            ("HTTP_TIMEOUT_SECS", "45"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("STORAGE_PUBLIC_BASE_URL", "https://cdn.example"),
        ]);
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.http_timeout_secs, Some(45));
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.storage_public_base_url, "https://cdn.example");
    }

    #[test]
    fn test_config_rejects_bad_port() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("PORT", "not-a-port"));
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_plant_info_accepts_numeric_and_text_cycle() {
        let numeric: PlantInfo = serde_json::from_str(
            r#"{"plantType":"Succulent","plantName":"Sprout","wateringCycle":7,"startDate":"2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(numeric.watering_cycle.to_string(), "7");

        let text: PlantInfo = serde_json::from_str(
            r#"{"plantType":"Fern","plantName":"Leafy","wateringCycle":"3","startDate":"2024-02-01"}"#,
        )
        .unwrap();
        assert_eq!(text.watering_cycle.to_string(), "3");
    }

    #[test]
    fn test_plant_profile_response_field_name() {
        let json = serde_json::to_value(PlantProfileResponse {
            plant_mbti: "INTJ".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "plantMBTI": "INTJ" }));
    }

    #[test]
    fn test_generate_image_request_camel_case() {
        let req: GenerateImageRequest = serde_json::from_str(
            r#"{"result":"blue","phoneNumber":"01012345678","moodAnswer":"calm"}"#,
        )
        .unwrap();
        assert_eq!(req.phone_number, "01012345678");
        assert_eq!(req.mood_answer, "calm");
    }
}
