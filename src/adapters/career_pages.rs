//! Generic company career-page adapter.
//!
//! Career pages have no common markup, so this adapter scans every link on
//! each configured page and keeps those whose text matches a target role.

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::adapters::{FetchContext, JobSource, element_text, selector};
use crate::error::Result;
use crate::models::JobPosting;
use crate::utils::http::fetch_text;
use crate::utils::url::{get_domain, resolve_url};

const PLATFORM: &str = "Company Pages";
const MAX_LINKS_PER_PAGE: usize = 25;

pub struct CareerPages {
    pages: Vec<String>,
}

impl CareerPages {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl JobSource for CareerPages {
    fn platform(&self) -> &'static str {
        PLATFORM
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<JobPosting>> {
        if self.pages.is_empty() {
            log::debug!("No company career pages configured");
            return Ok(Vec::new());
        }

        let matchers = role_matchers(&ctx.search.roles);
        let mut postings = Vec::new();

        for page in &self.pages {
            match fetch_text(&ctx.client, page).await {
                Ok(html) => postings.extend(parse_page(&html, page, &matchers)?),
                Err(e) => log::warn!("Career page fetch failed for {}: {}", page, e),
            }
            ctx.pause().await;
        }

        Ok(postings)
    }
}

/// Lowercased role phrases to match against link text.
fn role_matchers(roles: &[String]) -> Vec<String> {
    let mut matchers: Vec<String> = roles.iter().map(|r| r.to_lowercase()).collect();
    // Short forms that career pages commonly use instead of full titles.
    for extra in ["devops", "site reliability", "sre"] {
        if !matchers.iter().any(|m| m == extra) {
            matchers.push(extra.to_string());
        }
    }
    matchers
}

/// Keep links whose text matches a target role.
fn parse_page(html: &str, page_url: &str, matchers: &[String]) -> Result<Vec<JobPosting>> {
    let document = Html::parse_document(html);
    let link_sel = selector("a[href]")?;

    let base = Url::parse(page_url)?;
    let company = get_domain(page_url)
        .map(|d| d.trim_start_matches("www.").to_string())
        .unwrap_or_else(|| "Not specified".to_string());

    let mut postings = Vec::new();

    for anchor in document.select(&link_sel) {
        if postings.len() >= MAX_LINKS_PER_PAGE {
            break;
        }

        let text = element_text(&anchor);
        let lower = text.to_lowercase();
        if text.is_empty() || !matchers.iter().any(|m| lower.contains(m.as_str())) {
            continue;
        }

        let link = anchor
            .value()
            .attr("href")
            .map(|href| resolve_url(&base, href))
            .unwrap_or_default();

        postings.push(JobPosting::new(PLATFORM, text, company.clone(), "", link));
    }

    Ok(postings)
}
