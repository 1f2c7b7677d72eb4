use thirtyfour::{error::WebDriverResult, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver};

use crate::configuration::WebdriverSettings;

pub struct Droid {
    pub driver: WebDriver,
}

impl Droid {
    pub async fn connect(settings: &WebdriverSettings) -> WebDriverResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if settings.headless {
            caps.set_headless()?;
        }

        // chromedriver --port=9515
        // http://chrome:4444/wd/hub
        let driver = WebDriver::new(&settings.server_url, caps).await?;
        driver.maximize_window().await?;

        Ok(Droid { driver })
    }

    pub async fn quit(self) -> WebDriverResult<()> {
        self.driver.quit().await
    }
}
