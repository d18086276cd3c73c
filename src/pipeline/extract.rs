//! Keyword and skill extraction from job description text.
//!
//! Pure frequency analysis: no stemming, no scoring model. Output is
//! deterministic for identical input, with frequency ties broken by first
//! occurrence order.

use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

use crate::models::{Digest, DigestEntry, JobPosting};

/// Maximum keywords/skills reported per posting.
const MAX_TERMS: usize = 10;

/// Minimum token length for keyword candidates.
const MIN_TOKEN_LENGTH: usize = 3;

/// Technical skills matched against descriptions, in report order.
const TECHNICAL_SKILLS: &[&str] = &[
    "AWS",
    "GCP",
    "AZURE",
    "GOOGLE CLOUD",
    "AMAZON WEB SERVICES",
    "DOCKER",
    "KUBERNETES",
    "K8S",
    "TERRAFORM",
    "ANSIBLE",
    "PUPPET",
    "CHEF",
    "JENKINS",
    "GITLAB CI",
    "GITHUB ACTIONS",
    "CIRCLECI",
    "TRAVIS CI",
    "CI/CD",
    "PROMETHEUS",
    "GRAFANA",
    "DATADOG",
    "NEW RELIC",
    "CLOUDWATCH",
    "ELK STACK",
    "PYTHON",
    "BASH",
    "GOLANG",
    "RUBY",
    "PERL",
    "POWERSHELL",
    "LINUX",
    "UBUNTU",
    "CENTOS",
    "RHEL",
    "WINDOWS SERVER",
    "NGINX",
    "APACHE",
    "HAPROXY",
    "LOAD BALANCER",
    "MYSQL",
    "POSTGRESQL",
    "MONGODB",
    "REDIS",
    "ELASTICSEARCH",
    "HELM",
    "ISTIO",
    "LINKERD",
    "VAULT",
    "CONSUL",
    "GIT",
    "SVN",
    "JIRA",
    "CONFLUENCE",
];

/// Common words excluded from keyword ranking.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "with", "you", "this", "that", "will", "have", "been", "from",
    "they", "know", "want", "good", "much", "some", "time", "very", "when", "come", "here", "how",
    "just", "like", "long", "make", "many", "over", "such", "take", "than", "them", "well", "were",
    "work", "year", "years", "job", "role", "position", "company", "team", "our", "your", "their",
    "can", "all", "any", "has", "who", "what", "about",
];

fn is_stopword(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Extract the top keywords from description text, frequency-ranked.
///
/// Deterministic: identical input yields identical output. Ties are broken
/// by first occurrence order in the text.
pub fn extract_keywords(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let normalized = text.to_lowercase();

    // token -> (count, first occurrence index)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in normalized.unicode_words().enumerate() {
        if word.len() < MIN_TOKEN_LENGTH
            || !word.chars().all(|c| c.is_alphabetic())
            || is_stopword(word)
        {
            continue;
        }
        let entry = counts.entry(word).or_insert((0, position));
        entry.0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(MAX_TERMS)
        .map(|(word, _, _)| title_case(word))
        .collect()
}

/// Find technical skills mentioned in the text, in vocabulary order.
///
/// Single-token skills match whole tokens only; multi-word and symbolic
/// skills (e.g. "CI/CD") match as substrings of the uppercased text.
pub fn extract_skills(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let upper = text.to_uppercase();
    let tokens: std::collections::HashSet<&str> = upper.unicode_words().collect();

    let mut skills = Vec::new();
    for skill in TECHNICAL_SKILLS {
        let found = if skill.chars().all(|c| c.is_ascii_alphanumeric()) {
            tokens.contains(skill)
        } else {
            upper.contains(skill)
        };

        if found {
            skills.push(skill.to_string());
            if skills.len() >= MAX_TERMS {
                break;
            }
        }
    }

    skills
}

/// Annotate new postings with keywords and skills, building the digest.
pub fn annotate(postings: Vec<JobPosting>) -> Digest {
    let entries = postings
        .into_iter()
        .map(|posting| {
            // Fall back to the title when no description was fetched so
            // skill columns are never empty for skill-heavy titles.
            let text = if posting.description.is_empty() {
                posting.title.clone()
            } else {
                posting.description.clone()
            };

            DigestEntry {
                keywords: extract_keywords(&text),
                skills: extract_skills(&text),
                posting,
            }
        })
        .collect();

    Digest::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = "We are looking for a DevOps engineer with Kubernetes \
        experience. Kubernetes and Terraform pipelines, Docker containers, and AWS. \
        Kubernetes clusters at scale. Terraform modules.";

    #[test]
    fn test_extract_keywords_ranks_by_frequency() {
        let keywords = extract_keywords(DESCRIPTION);
        // "kubernetes" appears three times, "terraform" twice.
        assert_eq!(keywords[0], "Kubernetes");
        assert_eq!(keywords[1], "Terraform");
        assert!(keywords.len() <= 10);
    }

    #[test]
    fn test_extract_keywords_is_deterministic() {
        assert_eq!(extract_keywords(DESCRIPTION), extract_keywords(DESCRIPTION));
    }

    #[test]
    fn test_extract_keywords_tie_broken_by_first_occurrence() {
        let keywords = extract_keywords("alpha beta alpha beta gamma");
        assert_eq!(keywords, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_extract_keywords_skips_stopwords_and_short_tokens() {
        let keywords = extract_keywords("the and for a an it is of to in");
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_extract_keywords_empty_text() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("   ").is_empty());
    }

    #[test]
    fn test_extract_skills_in_vocabulary_order() {
        let skills = extract_skills(DESCRIPTION);
        assert_eq!(skills, vec!["AWS", "DOCKER", "KUBERNETES", "TERRAFORM"]);
    }

    #[test]
    fn test_extract_skills_whole_token_match() {
        // "GOOD" must not match the skill "GO"-like entries; "CHEF" must not
        // match inside "KITCHENCHEF".
        let skills = extract_skills("A good kitchenchef uses git daily");
        assert_eq!(skills, vec!["GIT"]);
    }

    #[test]
    fn test_extract_skills_substring_for_symbolic_entries() {
        let skills = extract_skills("Experience with CI/CD and GitHub Actions required");
        assert!(skills.contains(&"CI/CD".to_string()));
        assert!(skills.contains(&"GITHUB ACTIONS".to_string()));
    }

    #[test]
    fn test_extract_skills_caps_at_ten() {
        let text = "AWS GCP Azure Docker Kubernetes Terraform Ansible Puppet \
                    Chef Jenkins Prometheus Grafana";
        assert_eq!(extract_skills(text).len(), 10);
    }

    #[test]
    fn test_annotate_falls_back_to_title() {
        let posting = JobPosting::new(
            "Naukri",
            "DevOps Engineer - Kubernetes/AWS",
            "Acme",
            "Pune",
            "https://n.example/1",
        );
        let digest = annotate(vec![posting]);
        assert_eq!(digest.len(), 1);
        assert!(digest.entries[0].skills.contains(&"KUBERNETES".to_string()));
        assert!(digest.entries[0].skills.contains(&"AWS".to_string()));
    }
}
