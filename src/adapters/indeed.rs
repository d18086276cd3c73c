//! Indeed India adapter.

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::adapters::{FetchContext, JobSource, element_text, encode_query, selector};
use crate::error::Result;
use crate::models::JobPosting;
use crate::utils::http::fetch_text;
use crate::utils::resolve_url;

const PLATFORM: &str = "Indeed";
const MAX_ROLES: usize = 2;
const MAX_ROWS: usize = 15;

const SEARCH_LOCATIONS: [&str; 4] = ["Bangalore", "Hyderabad", "Pune", "India"];

pub struct Indeed;

#[async_trait]
impl JobSource for Indeed {
    fn platform(&self) -> &'static str {
        PLATFORM
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<JobPosting>> {
        let mut postings = Vec::new();

        for role in ctx.search.roles.iter().take(MAX_ROLES) {
            for location in SEARCH_LOCATIONS {
                // fromage=1 limits results to the last day.
                let url = format!(
                    "https://in.indeed.com/jobs?q={}&l={}&fromage=1",
                    encode_query(role),
                    encode_query(location)
                );

                match fetch_text(&ctx.client, &url).await {
                    Ok(html) => postings.extend(parse_listing(&html, &url, location)?),
                    Err(e) => {
                        log::warn!("Indeed search failed for '{}' in '{}': {}", role, location, e);
                    }
                }
                ctx.pause().await;
            }
        }

        Ok(postings)
    }
}

/// Parse job cards from an Indeed search result page.
fn parse_listing(html: &str, page_url: &str, default_location: &str) -> Result<Vec<JobPosting>> {
    let document = Html::parse_document(html);
    let row_sel = selector("div.job_seen_beacon, div[data-jk]")?;
    let title_link_sel = selector("h2.jobTitle a, a[data-jk]")?;
    let company_sel = selector("span.companyName, a[data-testid=\"company-name\"]")?;
    let location_sel = selector("div.companyLocation, div[data-testid=\"job-location\"]")?;

    let base = Url::parse(page_url)?;
    let mut postings = Vec::new();

    for row in document.select(&row_sel).take(MAX_ROWS) {
        let Some(title_link) = row.select(&title_link_sel).next() else {
            continue;
        };

        let title = title_link
            .value()
            .attr("title")
            .map(|t| t.to_string())
            .unwrap_or_else(|| element_text(&title_link));

        let link = title_link
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
            .unwrap_or_else(|| default_location.to_string());

        postings.push(JobPosting::new(PLATFORM, title, company, location, link));
    }

    Ok(postings)
}
