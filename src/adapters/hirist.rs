//! Hirist.tech adapter.

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::adapters::{FetchContext, JobSource, element_text, role_slug, selector};
use crate::error::Result;
use crate::models::JobPosting;
use crate::utils::http::fetch_text;
use crate::utils::resolve_url;

const PLATFORM: &str = "Hirist";
const MAX_ROLES: usize = 2;
const MAX_ROWS: usize = 15;

pub struct Hirist;

#[async_trait]
impl JobSource for Hirist {
    fn platform(&self) -> &'static str {
        PLATFORM
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<JobPosting>> {
        let mut postings = Vec::new();

        for role in ctx.search.roles.iter().take(MAX_ROLES) {
            let url = format!("https://www.hirist.tech/k/{}-jobs", role_slug(role));

            match fetch_text(&ctx.client, &url).await {
                Ok(html) => postings.extend(parse_listing(&html, &url)?),
                Err(e) => log::warn!("Hirist search failed for '{}': {}", role, e),
            }
            ctx.pause().await;
        }

        Ok(postings)
    }
}

fn parse_listing(html: &str, page_url: &str) -> Result<Vec<JobPosting>> {
    let document = Html::parse_document(html);
    let row_sel = selector("div.job-feed-item, li.job-item")?;
    let title_sel = selector("a.job-title, h3 a")?;
    let company_sel = selector("span.company-name, div.company")?;
    let location_sel = selector("span.job-location, span.loc")?;

    let base = Url::parse(page_url)?;
    let mut postings = Vec::new();

    for row in document.select(&row_sel).take(MAX_ROWS) {
        let Some(title_elem) = row.select(&title_sel).next() else {
            continue;
        };

        let link = title_elem
            .value()
            .attr("href")
            .map(|href| resolve_url(&base, href))
            .unwrap_or_default();

        let company = row
            .select(&company_sel)
            .next()
            .map(|el| element_text(&el))
            .unwrap_or_else(|| "Not specified".to_string());

        let location = row
            .select(&location_sel)
            .next()
            .map(|el| element_text(&el))
            .unwrap_or_else(|| "India".to_string());

        postings.push(JobPosting::new(
            PLATFORM,
            element_text(&title_elem),
            company,
            location,
            link,
        ));
    }

    Ok(postings)
}
