//! HTML report with Chart.js bar charts
//!
//! [`write_report`] writes a single page covering every test. [`export`]
//! lays results out as a small static site:
//!
//! ```text
//! <dir>/
//! ├── index.html                  latest pages and history dates
//! ├── struct_field_order_test.html
//! └── history/
//!     └── 2024-05-01/
//!         ├── index.html
//!         └── struct_field_order_test.html
//! ```

use chrono::NaiveDateTime;
use std::fmt::Write;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::LayoutDeltaError;
use crate::fmt::{format_bytes, format_signed_bytes};
use crate::infra::FileSystem;
use crate::memory::TestOutcome;

const HISTORY_DIR: &str = "history";
const INDEX_FILE: &str = "index.html";

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 20px; }
        .container { max-width: 1200px; margin: 0 auto; }
        .chart-container { height: 400px; margin-bottom: 40px; }
        table { border-collapse: collapse; width: 100%; margin: 20px 0; }
        th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
        th { background-color: #f2f2f2; }
        tr:nth-child(even) { background-color: #f9f9f9; }
        tr.suspect td { color: #a15c00; }
        tr.failed td { color: #b00020; }
        h1, h2 { color: #333; }
        .memory-cell { white-space: nowrap; }
        .bytes-value { color: #666; }
        .nav-links { margin: 20px 0; }
        .nav-links a { margin-right: 15px; }
        ul { list-style-type: none; padding: 0; }
        li { margin: 10px 0; padding: 8px; background-color: #f5f5f5; border-radius: 4px; }
        a { color: #0366d6; text-decoration: none; }
        .footer { margin-top: 30px; font-size: 0.8em; color: #666; border-top: 1px solid #ddd; padding-top: 10px; }
"#;

const SCRIPT_HELPERS: &str = r#"
        function formatBytes(bytes, decimals = 2) {
            if (bytes === 0) return '0 B';
            const k = 1024;
            const sizes = ['B', 'KB', 'MB', 'GB', 'TB'];
            const i = Math.floor(Math.log(Math.abs(bytes)) / Math.log(k));
            return parseFloat((bytes / Math.pow(k, i)).toFixed(decimals)) + ' ' + sizes[i];
        }
        const chartOptions = {
            responsive: true,
            maintainAspectRatio: false,
            scales: {
                y: {
                    beginAtZero: true,
                    title: { display: true, text: 'Memory Usage' },
                    ticks: { callback: (value) => formatBytes(value) }
                }
            },
            plugins: {
                tooltip: {
                    callbacks: {
                        label: (context) => (context.dataset.label || '') + ': ' + formatBytes(context.raw)
                    }
                }
            }
        };
"#;

/// Write the combined report for `outcomes` to `path`
///
/// # Errors
///
/// [`LayoutDeltaError::Io`] if the page cannot be written.
pub fn write_report<FS: FileSystem>(
    outcomes: &[TestOutcome],
    path: &Path,
    generated_at: &NaiveDateTime,
    fs: &FS,
) -> Result<(), LayoutDeltaError> {
    let page = render_page(outcomes, &timestamp(generated_at), None);
    write(fs, path, page)
}

/// Export one page per test under `dir`, copy each into the dated history
/// directory and regenerate the indexes; returns the main index path
///
/// # Errors
///
/// [`LayoutDeltaError::Io`] for the first file or directory that cannot be
/// written.
pub fn export<FS: FileSystem>(
    outcomes: &[TestOutcome],
    dir: &Path,
    generated_at: &NaiveDateTime,
    fs: &FS,
) -> Result<PathBuf, LayoutDeltaError> {
    let date = generated_at.format("%Y-%m-%d").to_string();
    let dated_dir = dir.join(HISTORY_DIR).join(&date);
    create_dir(fs, &dated_dir)?;

    for outcome in outcomes {
        let file_name = format!("{}.html", sanitize_filename(&outcome.name));
        let page_path = dir.join(&file_name);
        let page = render_page(
            std::slice::from_ref(outcome),
            &timestamp(generated_at),
            Some(INDEX_FILE),
        );
        write(fs, &page_path, page)?;

        let dated_path = dated_dir.join(&file_name);
        fs.copy(&page_path, &dated_path)
            .map_err(|source| io_error(&dated_path, source))?;
        log::debug!("exported {} and {}", page_path.display(), dated_path.display());
    }

    let history = list_history(fs, &dir.join(HISTORY_DIR))?;
    for date in &history {
        let day_dir = dir.join(HISTORY_DIR).join(date);
        let pages = list_pages(fs, &day_dir)?;
        write(fs, &day_dir.join(INDEX_FILE), render_history_index(date, &pages))?;
    }

    let index_path = dir.join(INDEX_FILE);
    let pages = list_pages(fs, dir)?;
    write(fs, &index_path, render_index(&pages, &history))?;

    Ok(index_path)
}

/// Lowercase file stem with every run of other characters collapsed to `_`
///
/// ```
/// use layout_delta::report::html::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Large Struct Field Order Test"), "large_struct_field_order_test");
/// assert_eq!(sanitize_filename("API -- Request"), "api_request");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out
}

/// Full report page for `outcomes`
///
/// `index_link`, when given, adds a navigation link back to an index page.
pub fn render_page(outcomes: &[TestOutcome], generated_at: &str, index_link: Option<&str>) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Memory Allocation Test Results</title>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>{STYLE}    </style>
</head>
<body>
    <div class="container">
        <h1>Memory Allocation Test Results</h1>
"#
    );
    if let Some(link) = index_link {
        let _ = writeln!(
            html,
            r#"        <div class="nav-links"><a href="{}">All Tests</a></div>"#,
            escape(link)
        );
    }
    let _ = writeln!(html, "        <p>Generated on: {}</p>", escape(generated_at));

    for (i, outcome) in outcomes.iter().enumerate() {
        render_section(&mut html, i, outcome);
    }

    let _ = writeln!(html, "        <script>{SCRIPT_HELPERS}");
    for (i, outcome) in outcomes.iter().enumerate() {
        render_chart(&mut html, i, outcome);
    }
    html.push_str(
        r#"        </script>
    </div>
</body>
</html>
"#,
    );

    html
}

fn render_section(html: &mut String, index: usize, outcome: &TestOutcome) {
    let _ = write!(
        html,
        r#"
        <h2>{name}</h2>
        <div class="chart-container">
            <canvas id="chart{index}"></canvas>
        </div>
        <table>
            <tr>
                <th>Type</th>
                <th>Objects</th>
                <th>Optimized Memory</th>
                <th>Unoptimized Memory</th>
                <th>Memory Saving</th>
                <th>Saving Percentage</th>
                <th>Saving per Object</th>
            </tr>
"#,
        name = escape(&outcome.name),
    );

    for entity in &outcome.entities {
        match &entity.savings {
            Ok(report) => {
                let class = if report.suspect { r#" class="suspect""# } else { "" };
                let _ = write!(
                    html,
                    r#"            <tr{class}>
                <td>{label}{mark}</td>
                <td>{count}</td>
                <td class="memory-cell">{opt} <span class="bytes-value">({opt_raw} bytes)</span></td>
                <td class="memory-cell">{base} <span class="bytes-value">({base_raw} bytes)</span></td>
                <td class="memory-cell">{saved} <span class="bytes-value">({saved_raw} bytes)</span></td>
                <td>{percent:.2}%</td>
                <td>{per_object:.2} B</td>
            </tr>
"#,
                    label = escape(&entity.label),
                    mark = if report.suspect { " (heap shrank, unreliable)" } else { "" },
                    count = report.object_count,
                    opt = format_bytes(report.optimized_bytes),
                    opt_raw = report.optimized_bytes,
                    base = format_bytes(report.baseline_bytes),
                    base_raw = report.baseline_bytes,
                    saved = format_signed_bytes(report.saved_bytes),
                    saved_raw = report.saved_bytes,
                    percent = report.saved_percent,
                    per_object = report.per_object_saved_bytes,
                );
            }
            Err(e) => {
                let _ = write!(
                    html,
                    r#"            <tr class="failed">
                <td>{}</td>
                <td colspan="6">Not measured: {}</td>
            </tr>
"#,
                    escape(&entity.label),
                    escape(&e.to_string())
                );
            }
        }
    }

    if outcome.entities.len() > 1 {
        let _ = write!(
            html,
            r#"            <tr style="font-weight: bold;">
                <td>Total</td>
                <td>-</td>
                <td>-</td>
                <td>-</td>
                <td class="memory-cell">{} <span class="bytes-value">({} bytes)</span></td>
                <td>{:.2}%</td>
                <td>-</td>
            </tr>
"#,
            format_signed_bytes(outcome.total_saved_bytes),
            outcome.total_saved_bytes,
            outcome.total_saved_percent()
        );
    }

    let excluded = outcome.excluded_from_total();
    if !excluded.is_empty() {
        let labels: Vec<_> = excluded.into_iter().map(escape).collect();
        let _ = write!(
            html,
            r#"            <tr class="suspect">
                <td colspan="7">Excluded from total: {}</td>
            </tr>
"#,
            labels.join(", ")
        );
    }

    html.push_str("        </table>\n");
}

fn render_chart(html: &mut String, index: usize, outcome: &TestOutcome) {
    let measured: Vec<_> = outcome
        .entities
        .iter()
        .filter_map(|e| e.savings.as_ref().ok().map(|r| (e.label.as_str(), r)))
        .collect();
    let labels: Vec<&str> = measured.iter().map(|(label, _)| *label).collect();
    let optimized: Vec<u64> = measured.iter().map(|(_, r)| r.optimized_bytes).collect();
    let baseline: Vec<u64> = measured.iter().map(|(_, r)| r.baseline_bytes).collect();

    let _ = write!(
        html,
        r#"
        new Chart(document.getElementById('chart{index}'), {{
            type: 'bar',
            data: {{
                labels: {labels},
                datasets: [
                    {{ label: 'Optimized', backgroundColor: 'rgba(54, 162, 235, 0.8)', data: {optimized} }},
                    {{ label: 'Unoptimized', backgroundColor: 'rgba(255, 99, 132, 0.8)', data: {baseline} }}
                ]
            }},
            options: chartOptions
        }});
"#,
        labels = json_array(&labels),
        optimized = json_array(&optimized),
        baseline = json_array(&baseline),
    );
}

fn render_index(pages: &[String], history: &[String]) -> String {
    let mut html = list_page_header("Memory Allocation Test Results", None);
    html.push_str("        <p>Click on a test to view detailed results.</p>\n");
    html.push_str("        <h2>Latest Test Results</h2>\n        <ul>\n");
    for page in pages {
        let _ = writeln!(
            html,
            r#"            <li><a href="{}">{}</a></li>"#,
            escape(page),
            escape(&title_from_file(page))
        );
    }
    html.push_str("        </ul>\n");

    if !history.is_empty() {
        html.push_str("        <h2>Historical Test Results</h2>\n        <ul>\n");
        for date in history.iter().rev() {
            let _ = writeln!(
                html,
                r#"            <li><a href="{HISTORY_DIR}/{date}/{INDEX_FILE}">{date}</a></li>"#,
                date = escape(date)
            );
        }
        html.push_str("        </ul>\n");
    }

    html.push_str(LIST_PAGE_FOOTER);
    html
}

fn render_history_index(date: &str, pages: &[String]) -> String {
    let title = format!("Memory Allocation Test Results - {}", date);
    let mut html = list_page_header(&title, Some("../../index.html"));
    html.push_str("        <h2>Test Results</h2>\n        <ul>\n");
    for page in pages {
        let _ = writeln!(
            html,
            r#"            <li><a href="{}">{}</a></li>"#,
            escape(page),
            escape(&title_from_file(page))
        );
    }
    html.push_str("        </ul>\n");
    html.push_str(LIST_PAGE_FOOTER);
    html
}

const LIST_PAGE_FOOTER: &str = r#"        <div class="footer">
            <p>Generated by layout-delta</p>
        </div>
    </div>
</body>
</html>
"#;

fn list_page_header(title: &str, back_link: Option<&str>) -> String {
    let mut html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title}</title>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>{STYLE}    </style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
"#,
        title = escape(title)
    );
    if let Some(link) = back_link {
        let _ = writeln!(
            html,
            r#"        <div class="nav-links"><a href="{}">Back to Main Index</a></div>"#,
            link
        );
    }
    html
}

/// Report pages in `dir`, by file name, excluding the index
fn list_pages<FS: FileSystem>(fs: &FS, dir: &Path) -> Result<Vec<String>, LayoutDeltaError> {
    let entries = fs.list_dir(dir).map_err(|source| io_error(dir, source))?;
    Ok(entries
        .iter()
        .filter(|p| p.extension().is_some_and(|ext| ext == "html"))
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .filter(|name| *name != INDEX_FILE)
        .map(str::to_string)
        .collect())
}

/// Dated history directories, oldest first
fn list_history<FS: FileSystem>(fs: &FS, dir: &Path) -> Result<Vec<String>, LayoutDeltaError> {
    let entries = match fs.list_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => return Err(io_error(dir, source)),
    };
    Ok(entries
        .iter()
        .filter(|p| p.extension().is_none())
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .map(str::to_string)
        .collect())
}

/// "struct_field_order_test.html" => "Struct Field Order Test"
fn title_from_file(file_name: &str) -> String {
    file_name
        .trim_end_matches(".html")
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn timestamp(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn json_array<T: serde::Serialize>(values: &[T]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn write<FS: FileSystem>(fs: &FS, path: &Path, contents: String) -> Result<(), LayoutDeltaError> {
    fs.write(path, contents).map_err(|source| io_error(path, source))
}

fn create_dir<FS: FileSystem>(fs: &FS, path: &Path) -> Result<(), LayoutDeltaError> {
    fs.create_dir_all(path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: io::Error) -> LayoutDeltaError {
    LayoutDeltaError::Io {
        context: path.display().to_string(),
        source,
    }
}
