//! Wellfound (formerly AngelList Talent) adapter.

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::adapters::{FetchContext, JobSource, element_text, role_slug, selector};
use crate::error::Result;
use crate::models::JobPosting;
use crate::utils::http::fetch_text;
use crate::utils::resolve_url;

const PLATFORM: &str = "Wellfound";
const MAX_ROLES: usize = 2;
const MAX_ROWS: usize = 15;

pub struct Wellfound;

#[async_trait]
impl JobSource for Wellfound {
    fn platform(&self) -> &'static str {
        PLATFORM
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<JobPosting>> {
        let mut postings = Vec::new();

        for role in ctx.search.roles.iter().take(MAX_ROLES) {
            let url = format!("https://wellfound.com/role/l/{}/india", role_slug(role));

            match fetch_text(&ctx.client, &url).await {
                Ok(html) => postings.extend(parse_listing(&html, &url)?),
                Err(e) => log::warn!("Wellfound search failed for '{}': {}", role, e),
            }
            ctx.pause().await;
        }

        Ok(postings)
    }
}

/// Parse startup cards and their nested job listings.
fn parse_listing(html: &str, page_url: &str) -> Result<Vec<JobPosting>> {
    let document = Html::parse_document(html);
    let card_sel = selector("div[data-test=\"StartupResult\"]")?;
    let row_sel = selector("div[data-test=\"JobListing\"]")?;
    let title_sel = selector("a[data-test=\"job-title-link\"]")?;
    let company_sel = selector("h2[data-test=\"startup-name\"]")?;
    let location_sel = selector("span[data-test=\"job-location\"]")?;

    let base = Url::parse(page_url)?;
    let mut postings = Vec::new();

    for card in document.select(&card_sel) {
        let company = card
            .select(&company_sel)
            .next()
            .map(|el| element_text(&el))
            .unwrap_or_else(|| "Not specified".to_string());

        for row in card.select(&row_sel) {
            if postings.len() >= MAX_ROWS {
                break;
            }
            let Some(title_elem) = row.select(&title_sel).next() else {
                continue;
            };

            let link = title_elem
                .value()
                .attr("href")
                .map(|href| resolve_url(&base, href))
                .unwrap_or_default();

            let location = row
                .select(&location_sel)
                .next()
                .map(|el| element_text(&el))
                .unwrap_or_else(|| "Remote".to_string());

            postings.push(JobPosting::new(
                PLATFORM,
                element_text(&title_elem),
                company.clone(),
                location,
                link,
            ));
        }
    }

    Ok(postings)
}
