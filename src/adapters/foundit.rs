//! Foundit (formerly Monster India) adapter.

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::adapters::{FetchContext, JobSource, element_text, encode_query, selector};
use crate::error::Result;
use crate::models::JobPosting;
use crate::utils::http::fetch_text;
use crate::utils::resolve_url;

const PLATFORM: &str = "Foundit";
const MAX_ROLES: usize = 2;
const MAX_ROWS: usize = 15;

pub struct Foundit;

#[async_trait]
impl JobSource for Foundit {
    fn platform(&self) -> &'static str {
        PLATFORM
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<JobPosting>> {
        let mut postings = Vec::new();

        for role in ctx.search.roles.iter().take(MAX_ROLES) {
            let url = format!(
                "https://www.foundit.in/srp/results?query={}&locations=India",
                encode_query(role)
            );

            match fetch_text(&ctx.client, &url).await {
                Ok(html) => postings.extend(parse_listing(&html, &url)?),
                Err(e) => log::warn!("Foundit search failed for '{}': {}", role, e),
            }
            ctx.pause().await;
        }

        Ok(postings)
    }
}

fn parse_listing(html: &str, page_url: &str) -> Result<Vec<JobPosting>> {
    let document = Html::parse_document(html);
    let row_sel = selector("div.srpResultCard, div.card-apply-content")?;
    let title_sel = selector("h3.jobTitle a, div.jobTitle a")?;
    let company_sel = selector("span.companyName, div.companyName")?;
    let location_sel = selector("span.details.location, div.location")?;

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing() {
        let html = r#"
            <div class="srpResultCard">
              <h3 class="jobTitle"><a href="/job/devops-engineer-initech-bengaluru-31224455">DevOps Engineer</a></h3>
              <span class="companyName">Initech</span>
              <span class="details location">Bengaluru / Hybrid</span>
            </div>
        "#;
        let postings =
            parse_listing(html, "https://www.foundit.in/srp/results?query=devops").unwrap();
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].title, "DevOps Engineer");
        assert_eq!(postings[0].id(), "Foundit:31224455");
        assert_eq!(
            postings[0].location_kind,
            crate::models::LocationKind::Hybrid
        );
    }
}
