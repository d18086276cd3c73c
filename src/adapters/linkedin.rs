//! LinkedIn jobs adapter.
//!
//! Best effort: LinkedIn aggressively rate-limits unauthenticated requests,
//! so failures here are common and are contained by the collect stage.

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::adapters::{FetchContext, JobSource, element_text, encode_query, selector};
use crate::error::Result;
use crate::models::JobPosting;
use crate::utils::http::fetch_text;
use crate::utils::resolve_url;

const PLATFORM: &str = "LinkedIn";
const MAX_ROLES: usize = 2;
const MAX_ROWS: usize = 15;

/// Locations searched on LinkedIn (broad regions rather than every city).
const SEARCH_LOCATIONS: [&str; 2] = ["India", "Remote"];

pub struct LinkedIn;

#[async_trait]
impl JobSource for LinkedIn {
    fn platform(&self) -> &'static str {
        PLATFORM
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<Vec<JobPosting>> {
        let mut postings = Vec::new();

        for role in ctx.search.roles.iter().take(MAX_ROLES) {
            for location in SEARCH_LOCATIONS {
                // f_TPR=r86400 limits results to the last 24 hours.
                let url = format!(
                    "https://www.linkedin.com/jobs/search/?keywords={}&location={}&f_TPR=r86400",
                    encode_query(role),
                    encode_query(location)
                );

                match fetch_text(&ctx.client, &url).await {
                    Ok(html) => postings.extend(parse_listing(&html, &url, location)?),
                    Err(e) => {
                        log::warn!("LinkedIn search failed for '{}' in '{}': {}", role, location, e);
                    }
                }
                ctx.pause().await;
            }
        }

        Ok(postings)
    }
}

/// Parse job cards from a LinkedIn search result page.
fn parse_listing(html: &str, page_url: &str, default_location: &str) -> Result<Vec<JobPosting>> {
    let document = Html::parse_document(html);
    let row_sel = selector("div.job-search-card, li.result-card")?;
    let link_sel = selector("a.base-card__full-link, h3 a")?;
    let title_sel = selector("h3.base-search-card__title, h3")?;
    let company_sel = selector("h4.base-search-card__subtitle")?;
    let location_sel = selector("span.job-search-card__location")?;

    let base = Url::parse(page_url)?;
    let mut postings = Vec::new();

    for row in document.select(&row_sel).take(MAX_ROWS) {
        let Some(link_elem) = row.select(&link_sel).next() else {
            continue;
        };

        let link = link_elem
            .value()
            .attr("href")
            .map(|href| resolve_url(&base, href))
            .unwrap_or_default();

        let title = row
            .select(&title_sel)
            .next()
            .map(|el| element_text(&el))
            .unwrap_or_else(|| element_text(&link_elem));

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

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <ul>
          <div class="job-search-card">
            <a class="base-card__full-link" href="https://www.linkedin.com/jobs/view/3981234567">
              Site Reliability Engineer
            </a>
            <h3 class="base-search-card__title">Site Reliability Engineer</h3>
            <h4 class="base-search-card__subtitle">Initech</h4>
            <span class="job-search-card__location">Hyderabad, Telangana</span>
          </div>
          <div class="job-search-card">
            <a class="base-card__full-link" href="/jobs/view/1112223334">DevOps Engineer</a>
            <h3>DevOps Engineer</h3>
          </div>
        </ul>
    "#;

    #[test]
    fn test_parse_listing() {
        let postings = parse_listing(
            LISTING,
            "https://www.linkedin.com/jobs/search/?keywords=sre",
            "Remote",
        )
        .unwrap();
        assert_eq!(postings.len(), 2);

        assert_eq!(postings[0].title, "Site Reliability Engineer");
        assert_eq!(postings[0].company, "Initech");
        assert_eq!(postings[0].location, "Hyderabad, Telangana");

        // Missing company and location fall back to defaults.
        assert_eq!(postings[1].company, "Not specified");
        assert_eq!(postings[1].location, "Remote");
        assert_eq!(
            postings[1].link,
            "https://www.linkedin.com/jobs/view/1112223334"
        );
    }
}
