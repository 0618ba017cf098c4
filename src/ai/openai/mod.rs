/// Builder options every OpenAI-backed client forwards to its http client.
macro_rules! impl_openai_options {
    ($client:ty) => {
        impl $client {
            pub fn with_base_url(mut self, base_url: String) -> Self {
                self.http = self.http.with_base_url(base_url);
                self
            }

            pub fn with_timeout(mut self, timeout: Option<std::time::Duration>) -> Self {
                self.http = self.http.with_timeout(timeout);
                self
            }
        }
    };
}
pub(crate) use impl_openai_options;

pub mod chat;
pub mod client;
pub mod image;
pub mod types;
pub mod vision;

#[cfg(test)]
pub(crate) mod test_support;

pub use chat::OpenAiChatClient;
pub use client::OpenAiHttpClient;
pub use image::OpenAiImageClient;
pub use vision::OpenAiVisionClient;

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const IMAGE_GENERATIONS_PATH: &str = "/v1/images/generations";
