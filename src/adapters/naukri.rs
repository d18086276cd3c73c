//! Naukri.com adapter.

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::adapters::{FetchContext, JobSource, element_text, role_slug, selector};
use crate::error::Result;
use crate::models::JobPosting;
use crate::utils::http::fetch_text;
use crate::utils::resolve_url;

const PLATFORM: &str = "Naukri";
const MAX_ROLES: usize = 2;
const MAX_ROWS: usize = 20;
const MAX_DETAILS: usize = 10;

pub struct Naukri;

#[async_trait]
impl JobSource for Naukri {
    fn platform(&self) -> &'static str {
        PLATFORM
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<JobPosting>> {
        let mut postings = Vec::new();

        for role in ctx.search.roles.iter().take(MAX_ROLES) {
            let url = format!("https://www.naukri.com/{}-jobs", role_slug(role));
            let html = match fetch_text(&ctx.client, &url).await {
                Ok(html) => html,
                Err(e) => {
                    log::warn!("Naukri search failed for '{}': {}", role, e);
                    continue;
                }
            };

            postings.extend(parse_listing(&html, &url)?);
            ctx.pause().await;
        }

        // Descriptions feed keyword extraction; a failed detail fetch only
        // leaves the description empty.
        for posting in postings.iter_mut().take(MAX_DETAILS) {
            match fetch_text(&ctx.client, &posting.link).await {
                Ok(html) => posting.description = parse_description(&html),
                Err(e) => {
                    log::debug!("Naukri detail fetch failed for {}: {}", posting.link, e);
                }
            }
            ctx.pause().await;
        }

        Ok(postings)
    }
}

/// Parse job cards from a Naukri search result page.
fn parse_listing(html: &str, page_url: &str) -> Result<Vec<JobPosting>> {
    let document = Html::parse_document(html);
    let row_sel = selector("article.jobTuple, div.jobTuple")?;
    let title_sel = selector("a.title, h3 a")?;
    let company_sel = selector("a.subTitle, div.companyInfo")?;
    let location_sel = selector("span.locationsContainer, li.location")?;

    let base = Url::parse(page_url)?;
    let mut postings = Vec::new();

    for row in document.select(&row_sel).take(MAX_ROWS) {
        let Some(title_elem) = row.select(&title_sel).next() else {
            continue;
        };

        let title = element_text(&title_elem);
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

        postings.push(JobPosting::new(PLATFORM, title, company, location, link));
    }

    Ok(postings)
}

/// Extract the description text from a Naukri job detail page.
fn parse_description(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(sel) = selector("div.jobDescription, section.job-description") else {
        return String::new();
    };
    document
        .select(&sel)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <article class="jobTuple">
            <a class="title" href="/job-listings-devops-engineer-4128793">DevOps Engineer</a>
            <a class="subTitle">Acme Corp</a>
            <span class="locationsContainer">Bengaluru, Pune</span>
          </article>
          <article class="jobTuple">
            <a class="title" href="https://www.naukri.com/job-listings-sre-5551234">SRE</a>
            <div class="companyInfo">Globex</div>
          </article>
          <div class="unrelated">not a job</div>
        </body></html>
    "#;

    #[test]
    fn test_parse_listing() {
        let postings = parse_listing(LISTING, "https://www.naukri.com/devops-engineer-jobs").unwrap();
        assert_eq!(postings.len(), 2);

        assert_eq!(postings[0].title, "DevOps Engineer");
        assert_eq!(postings[0].company, "Acme Corp");
        assert_eq!(postings[0].location, "Bengaluru, Pune");
        assert_eq!(
            postings[0].link,
            "https://www.naukri.com/job-listings-devops-engineer-4128793"
        );

        // Missing location falls back, absolute links pass through.
        assert_eq!(postings[1].company, "Globex");
        assert_eq!(postings[1].location, "India");
        assert_eq!(
            postings[1].link,
            "https://www.naukri.com/job-listings-sre-5551234"
        );
    }

    #[test]
    fn test_parse_description() {
        let html = r#"<div class="jobDescription">Kubernetes and
            Terraform   experience required.</div>"#;
        assert_eq!(
            parse_description(html),
            "Kubernetes and Terraform experience required."
        );
    }

    #[test]
    fn test_parse_description_missing() {
        assert_eq!(parse_description("<p>no description here</p>"), "");
    }
}
