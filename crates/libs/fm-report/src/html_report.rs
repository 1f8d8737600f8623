//! HTML rendering of the failed-build report.

use fm_buildbot::FailedBuild;

use crate::SkippedBranch;

/// Mail-client friendly horizontal rule.
const SEPARATOR: &str = "<hr style='border:none;border-top:1px solid #ccc;margin:20px 0;'>";

const TABLE_OPEN: &str =
    "<table border='1' cellpadding='4' cellspacing='0' style='border-collapse:collapse'>";

/// Columns of each per-branch table.
pub const HTML_COLUMNS: [&str; 5] = ["Builder", "Build", "Commit", "Status", "URL"];

/// Shown instead of any table when nothing failed.
pub const NO_FAILURES_NOTICE: &str = "No failed builds on the monitored branches.";

/// Renders the report body.
///
/// One table per branch, in the order of `branches`. Records on branches
/// that are not configured are rendered after the configured ones, in the
/// order they first appear. Every piece of text coming from the CI server is
/// escaped.
pub fn render_html(
    records: &[FailedBuild],
    branches: &[String],
    skipped: &[SkippedBranch],
) -> String {
    let mut parts = vec![
        "<html>".to_string(),
        "<body style='font-family:sans-serif'>".to_string(),
        format!("<h2>Failed builds: {}</h2>", records.len()),
    ];

    if records.is_empty() {
        parts.push(format!("<p class='no-failures'>{NO_FAILURES_NOTICE}</p>"));
    }

    for branch in ordered_branches(records, branches) {
        parts.push(format!("<h3>Branch: {}</h3>", html_escape(branch)));
        parts.push(SEPARATOR.to_string());
        parts.push(render_table(records.iter().filter(|r| r.branch == branch)));
        parts.push(SEPARATOR.to_string());
    }

    if !skipped.is_empty() {
        parts.push("<h3>Skipped branches</h3>".to_string());
        parts.push("<p>These branches could not be fetched and are missing from this report:</p>".to_string());
        let items: String = skipped
            .iter()
            .map(|s| {
                format!(
                    "<li><b>{}</b>: {}</li>",
                    html_escape(&s.branch),
                    html_escape(&s.reason)
                )
            })
            .collect();
        parts.push(format!("<ul>{items}</ul>"));
    }

    parts.push("</body>".to_string());
    parts.push("</html>".to_string());
    parts.join("\n")
}

fn render_table<'a>(records: impl Iterator<Item = &'a FailedBuild>) -> String {
    let header: String = HTML_COLUMNS
        .iter()
        .map(|column| format!("<th>{column}</th>"))
        .collect();
    let mut rows = vec![format!("<tr>{header}</tr>")];
    for record in records {
        let url = html_escape(&record.url);
        rows.push(format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href=\"{url}\">{url}</a></td></tr>",
            html_escape(&record.builder),
            record.number,
            html_escape(&record.revision),
            html_escape(&record.status),
        ));
    }
    format!("{TABLE_OPEN}{}</table>", rows.concat())
}

/// Branches that have records, configured ones first.
pub(crate) fn ordered_branches<'a>(
    records: &'a [FailedBuild],
    branches: &'a [String],
) -> Vec<&'a str> {
    let mut ordered: Vec<&str> = branches
        .iter()
        .map(String::as_str)
        .filter(|branch| records.iter().any(|r| r.branch == *branch))
        .collect();
    for record in records {
        if !ordered.contains(&record.branch.as_str()) {
            ordered.push(&record.branch);
        }
    }
    ordered
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
