//! HTML digest rendering.
//!
//! Pure string templating: given a digest, produce the full HTML document
//! sent as the email body.

use chrono::{DateTime, Utc};

use crate::models::Digest;

const STYLE: &str = r#"
      body { font-family: Arial, sans-serif; margin: 20px; }
      h2 { color: #2c3e50; }
      .job-table { border-collapse: collapse; width: 100%; margin-top: 20px; }
      .job-table th { background-color: #3498db; color: white; padding: 12px; text-align: left; border: 1px solid #ddd; }
      .job-table td { padding: 12px; border: 1px solid #ddd; vertical-align: top; }
      .job-table tr:nth-child(even) { background-color: #f2f2f2; }
      .job-table a { color: #3498db; text-decoration: none; }
      .job-table a:hover { text-decoration: underline; }
      .summary { background-color: #ecf0f1; padding: 15px; border-radius: 5px; margin-bottom: 20px; }
"#;

const COLUMNS: [&str; 6] = [
    "Job Title",
    "Company",
    "Location (Remote/Hybrid/Onsite)",
    "Apply Link",
    "Top Keywords",
    "Technical Skills",
];

/// Escape text for safe inclusion in HTML.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the digest as a complete HTML document.
pub fn render(digest: &Digest, now: DateTime<Utc>) -> String {
    if digest.is_empty() {
        return render_empty(now);
    }

    let mut rows = String::new();
    for entry in &digest.entries {
        let posting = &entry.posting;
        let location = if posting.location.trim().is_empty() {
            posting.location_kind.as_str().to_string()
        } else {
            format!("{} / {}", posting.location_kind.as_str(), posting.location)
        };

        rows.push_str("        <tr>\n");
        push_cell(&mut rows, &escape_html(&posting.title));
        push_cell(&mut rows, &escape_html(&posting.company));
        push_cell(&mut rows, &escape_html(&location));
        push_cell(
            &mut rows,
            &format!(
                r#"<a href="{}" target="_blank">Apply Now</a>"#,
                escape_html(&posting.link)
            ),
        );
        push_cell(&mut rows, &escape_html(&entry.keywords.join(", ")));
        push_cell(&mut rows, &escape_html(&entry.skills.join(", ")));
        rows.push_str("        </tr>\n");
    }

    let header_cells: String = COLUMNS
        .iter()
        .map(|c| format!("          <th>{c}</th>\n"))
        .collect();

    format!(
        r#"<html>
  <head>
    <style>{STYLE}    </style>
  </head>
  <body>
    <h2>Daily DevOps Job Digest - {date}</h2>
    <div class="summary">
      <strong>Found {count} new job opportunities!</strong><br>
      <small>Roles: DevOps Engineer, SRE and related | Locations: major Indian cities + Remote</small>
    </div>
    <table class="job-table">
      <thead>
        <tr>
{header_cells}        </tr>
      </thead>
      <tbody>
{rows}      </tbody>
    </table>
    <p><small>
      This digest was generated automatically. Postings sourced from LinkedIn,
      Naukri, Indeed, Wellfound, Hirist, Cutshort, Foundit, and company career pages.
    </small></p>
  </body>
</html>
"#,
        date = now.format("%B %d, %Y"),
        count = digest.len(),
    )
}

/// Document sent (or written) when a run finds nothing new.
fn render_empty(now: DateTime<Utc>) -> String {
    format!(
        r#"<html>
  <body>
    <h2>Daily DevOps Job Digest - {date}</h2>
    <p>No new jobs found in today's search.</p>
    <p><small>Searched roles: DevOps Engineer, SRE and related.</small></p>
  </body>
</html>
"#,
        date = now.format("%B %d, %Y"),
    )
}

fn push_cell(rows: &mut String, content: &str) {
    rows.push_str("          <td>");
    rows.push_str(content);
    rows.push_str("</td>\n");
}
