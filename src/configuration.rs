use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub webdriver: WebdriverSettings,
    pub telegram: TelegramSettings,
    pub export: ExportSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct WebdriverSettings {
    pub server_url: String,
    pub headless: bool,
}

#[derive(serde::Deserialize, Clone)]
pub struct TelegramSettings {
    pub token: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub chat_id: i64,
    pub notify_each_listing: bool,
}

#[derive(serde::Deserialize, Clone)]
pub struct ExportSettings {
    pub base_name: String,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration"))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
