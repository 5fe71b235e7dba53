use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use kinews_core::Article;

use crate::error::GenerationError;
use crate::generator::{GenerationOptions, TextGenerator};

/// Scripted generator that records every prompt it receives.
pub(crate) struct MockGenerator {
    reply: Result<String, u16>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub(crate) fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _options: GenerationOptions,
    ) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(GenerationError::Api {
                status: *status,
                body: "upstream unavailable".to_string(),
            }),
        }
    }
}

pub(crate) fn article(title: &str, link: &str) -> Article {
    Article {
        title: title.to_string(),
        description: format!("Beschreibung zu {title}"),
        content: None,
        link: link.to_string(),
        guid: link.to_string(),
        pub_date: Utc.with_ymd_and_hms(2025, 10, 14, 9, 0, 0).unwrap(),
        source_name: "heise online".to_string(),
        author: None,
        categories: vec![],
    }
}
