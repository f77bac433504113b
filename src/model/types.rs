use serde::{Deserialize, Serialize};

/// Role attached to a turn in a `generateContent` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    User,
    Model,
}

impl ProviderRole {
    /// Maps a chat role onto the provider's vocabulary. Only `assistant`
    /// becomes `model`; everything else is sent as `user`.
    pub fn from_chat_role(role: &str) -> Self {
        if role == "assistant" {
            ProviderRole::Model
        } else {
            ProviderRole::User
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 payload
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ProviderRole>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// Sampling parameters used for every chat conversation.
    pub fn chat() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// A multi-turn conversation sent with the chat sampling parameters.
    pub fn conversation<'a, I>(turns: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let contents = turns
            .into_iter()
            .map(|(role, text)| Content {
                role: Some(ProviderRole::from_chat_role(role)),
                parts: vec![Part::text(text)],
            })
            .collect();

        Self {
            contents,
            generation_config: Some(GenerationConfig::chat()),
        }
    }

    /// A single turn with no role and the provider's default sampling.
    pub fn single_turn(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content { role: None, parts }],
            generation_config: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assistant_maps_to_model_and_everything_else_to_user() {
        assert_eq!(ProviderRole::from_chat_role("assistant"), ProviderRole::Model);
        for role in ["user", "system", "Assistant", "", "bot"] {
            assert_eq!(ProviderRole::from_chat_role(role), ProviderRole::User, "role {role:?}");
        }
    }

    #[test]
    fn conversation_serialises_in_provider_shape() {
        let request = GenerateContentRequest::conversation([
            ("user", "hello"),
            ("assistant", "hi"),
            ("system", "be brief"),
        ]);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "hello"}]},
                    {"role": "model", "parts": [{"text": "hi"}]},
                    {"role": "user", "parts": [{"text": "be brief"}]}
                ],
                "generationConfig": {
                    "temperature": 0.7,
                    "topP": 0.9,
                    "topK": 40,
                    "maxOutputTokens": 1024
                }
            })
        );
    }

    #[test]
    fn single_turn_with_attachment_omits_role_and_config() {
        let request = GenerateContentRequest::single_turn(vec![
            Part::text("Describe the following image:"),
            Part::inline("image/png", "iVBORw0KGgo="),
        ]);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "parts": [
                        {"text": "Describe the following image:"},
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                    ]
                }]
            })
        );
    }
}
