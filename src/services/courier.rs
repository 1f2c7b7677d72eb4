use std::path::Path;

use reqwest::{multipart, Client};
use serde::{Deserialize, Serialize};

/// Telegram bot client. Every send is fire-and-forget: a failed delivery
/// is logged and the scrape carries on.
pub struct Courier {
    client: Client,
    url: String,
    chat_id: i64,
    enabled: bool,
}

#[derive(Serialize)]
struct SendMessageBody {
    chat_id: i64,
    text: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

impl Courier {
    pub fn new(token: String, chat_id: i64) -> Self {
        let client = reqwest::Client::new();

        Courier {
            client,
            url: format!("https://api.telegram.org/bot{}", token),
            chat_id,
            enabled: !token.is_empty(),
        }
    }

    pub async fn send_text(&self, text: &str) {
        if !self.enabled {
            return;
        }

        let body = SendMessageBody {
            chat_id: self.chat_id,
            text: text.to_string(),
        };

        match self
            .client
            .post(format!("{}/sendMessage", self.url))
            .json(&body)
            .send()
            .await
        {
            Ok(res) => match res.json::<ApiResponse>().await {
                Ok(json) => match json.ok {
                    true => (),
                    false => log::error!(
                        "Telegram rejected message: {}",
                        json.description.unwrap_or_default()
                    ),
                },
                Err(e) => log::error!("Error when deserializing to json: {:?}", e),
            },
            Err(e) => log::error!("Got error from telegram api: {:?}", e),
        }
    }

    pub async fn send_document(&self, path: &Path) {
        if !self.enabled {
            return;
        }

        let content = match tokio::fs::read(path).await {
            Ok(content) => content,
            Err(e) => {
                log::error!("Failed to read {} for upload: {:?}", path.display(), e);
                return;
            }
        };
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let form = multipart::Form::new()
            .text("chat_id", self.chat_id.to_string())
            .part("document", multipart::Part::bytes(content).file_name(file_name));

        match self
            .client
            .post(format!("{}/sendDocument", self.url))
            .multipart(form)
            .send()
            .await
        {
            Ok(res) => match res.json::<ApiResponse>().await {
                Ok(json) => match json.ok {
                    true => (),
                    false => log::error!(
                        "Telegram rejected document: {}",
                        json.description.unwrap_or_default()
                    ),
                },
                Err(e) => log::error!("Error when deserializing to json: {:?}", e),
            },
            Err(e) => log::error!("Got error from telegram api: {:?}", e),
        }
    }
}
