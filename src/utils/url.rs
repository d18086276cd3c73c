// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Extract the domain from a URL string.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_lowercase()))
}

/// Extract a platform-native posting identifier from an apply URL.
///
/// Checks well-known query keys first, then keyed/numeric fallbacks,
/// then trailing path digits. Returns `None` when the URL carries no
/// recognizable identifier (caller falls back to a content hash).
pub fn extract_posting_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let mut fallback_keyed: Option<String> = None;
    let mut fallback_numeric: Option<String> = None;

    for (key, value) in parsed.query_pairs() {
        if value.is_empty() {
            continue;
        }

        let key_lower = key.to_lowercase();
        let value_string = value.to_string();

        if matches!(
            key_lower.as_str(),
            "jk" | "jobid"
                | "job_id"
                | "currentjobid"
                | "posting_id"
                | "postingid"
                | "refid"
                | "vacancyid"
                | "id"
        ) {
            return Some(value_string);
        }

        if fallback_keyed.is_none()
            && (key_lower.contains("job") || key_lower.contains("id") || key_lower.contains("ref"))
        {
            fallback_keyed = Some(value_string.clone());
        }

        if fallback_numeric.is_none() && value_string.chars().all(|c| c.is_ascii_digit()) {
            fallback_numeric = Some(value_string);
        }
    }

    if let Some(value) = fallback_keyed {
        return Some(value);
    }
    if let Some(value) = fallback_numeric {
        return Some(value);
    }

    // Many boards end apply URLs with a numeric slug, e.g. /jobs/devops-engineer-4128793
    if let Some(last) = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
    {
        let digits: String = last.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() >= 4 {
            return Some(digits);
        }
    }

    None
}
