use std::time::Duration;

use thirtyfour::{error::WebDriverResult, By, Key, WebDriver, WebElement};

use crate::{
    configuration::Settings,
    domain::{
        coordinates::coordinates_from_url,
        listing::{ExportFormat, Listing, ListingBook},
        rating::parse_rating_label,
    },
    services::{Courier, Droid},
};

const GOOGLE_MAPS_URL: &str = "https://www.google.com/maps";
const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(60);

const SEARCH_BOX_XPATH: &str = r#"//input[@id="searchboxinput"]"#;
const RESULT_LINK_XPATH: &str = r#"//a[contains(@href, "https://www.google.com/maps/place")]"#;

// The card holds the name and review badge; everything else only
// renders in the detail pane.
const NAME_XPATH: &str = r#".//div[contains(@class, "fontHeadlineSmall")]"#;
const RATING_BADGE_XPATH: &str = r#".//span[@role="img"]"#;
const ADDRESS_XPATH: &str =
    r#"//button[@data-item-id="address"]//div[contains(@class, "fontBodyMedium")]"#;
const WEBSITE_XPATH: &str =
    r#"//a[@data-item-id="authority"]//div[contains(@class, "fontBodyMedium")]"#;
const PHONE_NUMBER_XPATH: &str =
    r#"//button[contains(@data-item-id, "phone:tel:")]//div[contains(@class, "fontBodyMedium")]"#;

const SCROLL_FEED_SCRIPT: &str =
    r#"const feed = document.querySelector('div[role="feed"]'); if (feed) feed.scrollBy(0, 10000);"#;

/// The whole scrape as one background task: notify, connect, scrape,
/// export, upload. The browser is shut down on every exit path.
pub async fn map_scraper_handler(configuration: Settings, search: String, target: usize) {
    let courier = Courier::new(
        configuration.telegram.token.clone(),
        configuration.telegram.chat_id,
    );
    courier.send_text("Started...").await;
    log::info!("Scraping up to {} listings for: {}", target, search);

    let droid = match Droid::connect(&configuration.webdriver).await {
        Ok(droid) => droid,
        Err(e) => {
            log::error!("Failed to reach the webdriver server: {:?}", e);
            courier.send_text(&format!("Scraping failed: {}", e)).await;
            return;
        }
    };

    let outcome = scrape_and_export(&droid, &courier, &configuration, &search, target).await;

    if let Err(e) = droid.quit().await {
        log::error!("Failed to shut the browser down: {:?}", e);
    }

    if let Err(e) = outcome {
        log::error!("Scrape run failed: {:?}", e);
        courier.send_text(&format!("Scraping failed: {}", e)).await;
    }
}

async fn scrape_and_export(
    droid: &Droid,
    courier: &Courier,
    configuration: &Settings,
    search: &str,
    target: usize,
) -> anyhow::Result<()> {
    let book = scrape_google_maps(
        &droid.driver,
        courier,
        search,
        target,
        configuration.telegram.notify_each_listing,
    )
    .await?;

    let xlsx_path = book.export(ExportFormat::Xlsx, &configuration.export.base_name)?;
    let csv_path = book.export(ExportFormat::Csv, &configuration.export.base_name)?;
    log::info!(
        "Exported {} listings to {} and {}",
        book.len(),
        xlsx_path.display(),
        csv_path.display()
    );

    courier
        .send_text(&format!("Scraping completed: {} listings", book.len()))
        .await;
    courier.send_document(&csv_path).await;

    Ok(())
}

pub async fn scrape_google_maps(
    driver: &WebDriver,
    courier: &Courier,
    search: &str,
    target: usize,
    notify_each: bool,
) -> anyhow::Result<ListingBook> {
    open_map_search(driver, search).await?;

    let links = collect_result_links(driver, target).await?;
    let mut book = ListingBook::default();

    for (position, link) in links.iter().enumerate() {
        match extract_listing(driver, link).await {
            Ok(listing) => {
                book.push(listing);
                log::info!("Scraped listing {} of {}", position + 1, links.len());
                if notify_each {
                    courier.send_text("Done").await;
                }
            }
            Err(e) => {
                log::error!(
                    "Skipping listing {} of {}: {:?}",
                    position + 1,
                    links.len(),
                    e
                );
            }
        }
    }

    Ok(book)
}

async fn open_map_search(driver: &WebDriver, search: &str) -> WebDriverResult<()> {
    driver.set_page_load_timeout(PAGE_LOAD_TIMEOUT).await?;
    driver.goto(GOOGLE_MAPS_URL).await?;
    tokio::time::sleep(Duration::from_secs(5)).await;

    let search_box = driver.find(By::XPath(SEARCH_BOX_XPATH)).await?;
    search_box.send_keys(search).await?;
    tokio::time::sleep(Duration::from_secs(3)).await;

    search_box.send_keys(Key::Enter + "").await?;
    tokio::time::sleep(Duration::from_secs(5)).await;

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollVerdict {
    TargetReached,
    Exhausted,
    KeepScrolling,
}

/// Termination policy for the results feed. The feed lazy-loads with no
/// total-count signal, so a stalled count is the only end-of-results
/// marker short of reaching the target.
pub fn scroll_verdict(
    previously_seen: usize,
    currently_seen: usize,
    target: usize,
) -> ScrollVerdict {
    match currently_seen >= target {
        true => ScrollVerdict::TargetReached,
        false => match currently_seen == previously_seen {
            true => ScrollVerdict::Exhausted,
            false => ScrollVerdict::KeepScrolling,
        },
    }
}

async fn collect_result_links(
    driver: &WebDriver,
    target: usize,
) -> WebDriverResult<Vec<WebElement>> {
    let mut previously_seen = 0;

    loop {
        driver.execute(SCROLL_FEED_SCRIPT, vec![]).await?;
        tokio::time::sleep(Duration::from_secs(3)).await;

        let mut links = driver.find_all(By::XPath(RESULT_LINK_XPATH)).await?;

        match scroll_verdict(previously_seen, links.len(), target) {
            ScrollVerdict::TargetReached => {
                links.truncate(target);
                log::info!("Reached target: {} listings", links.len());
                return Ok(links);
            }
            ScrollVerdict::Exhausted => {
                log::info!("Arrived at all available: {} listings", links.len());
                return Ok(links);
            }
            ScrollVerdict::KeepScrolling => {
                previously_seen = links.len();
                log::info!("Currently loaded: {} listings", previously_seen);
            }
        }
    }
}

async fn extract_listing(driver: &WebDriver, link: &WebElement) -> anyhow::Result<Listing> {
    link.click().await?;
    // The detail pane swaps its content in place with no loaded signal.
    tokio::time::sleep(Duration::from_secs(5)).await;

    let card = link.find(By::XPath("..")).await?;

    let name = first_text(&card, NAME_XPATH).await?;
    let address = first_pane_text(driver, ADDRESS_XPATH).await?;
    let website = first_pane_text(driver, WEBSITE_XPATH).await?;
    let phone_number = first_pane_text(driver, PHONE_NUMBER_XPATH).await?;

    let badges = card.find_all(By::XPath(RATING_BADGE_XPATH)).await?;
    let rating = match badges.first() {
        Some(badge) => match badge.attr("aria-label").await? {
            Some(label) => Some(parse_rating_label(&label)?),
            None => None,
        },
        None => None,
    };

    let url = driver.current_url().await?;
    let (latitude, longitude) = coordinates_from_url(url.as_str())?;

    Ok(Listing {
        name,
        address,
        website,
        phone_number,
        reviews_count: rating.map(|rating| rating.count),
        reviews_average: rating.map(|rating| rating.average),
        latitude,
        longitude,
    })
}

async fn first_text(scope: &WebElement, xpath: &str) -> WebDriverResult<Option<String>> {
    let matches = scope.find_all(By::XPath(xpath)).await?;

    match matches.first() {
        Some(element) => Ok(Some(element.text().await?)),
        None => Ok(None),
    }
}

async fn first_pane_text(driver: &WebDriver, xpath: &str) -> WebDriverResult<Option<String>> {
    let matches = driver.find_all(By::XPath(xpath)).await?;

    match matches.first() {
        Some(element) => Ok(Some(element.text().await?)),
        None => Ok(None),
    }
}
