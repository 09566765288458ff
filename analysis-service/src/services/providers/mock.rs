//! Mock provider implementation for testing.

use super::{
    FinishReason, GenerationParams, ImageData, ProviderError, ProviderResponse, VisionProvider,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted vision provider. Returns a fixed reply, counts calls, and keeps
/// the last prompt so tests can assert what was (or was not) sent upstream.
pub struct MockVisionProvider {
    enabled: bool,
    reply: String,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockVisionProvider {
    pub fn new(enabled: bool) -> Self {
        Self::with_reply(enabled, r#"{"is_healthy":true,"disease_name":null,"description":"Mock analysis","treatments":[]}"#)
    }

    pub fn with_reply(enabled: bool, reply: impl Into<String>) -> Self {
        Self {
            enabled,
            reply: reply.into(),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn analyze(
        &self,
        prompt: &str,
        _image: &ImageData,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock vision provider not enabled".to_string(),
            ));
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        Ok(ProviderResponse {
            text: Some(self.reply.clone()),
            input_tokens: prompt.len() as i32 / 4,
            output_tokens: 10,
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock vision provider not enabled".to_string(),
            ))
        }
    }
}
