// HTML rendering for the dashboard page and its year fragment
use crate::application::export::{CSV_CONTENT_TYPE, TOP5_FILE_NAME};
use crate::domain::report::{
    AllYearsSection, DayTypeSection, DeltaDirection, LabeledTable, Metric, Report, Section,
    TopRestaurantsSection, YearDetail, YearSections, YearSelector,
};
use crate::presentation::charts::{
    day_type_arc_chart, monthly_bar_chart, monthly_line_chart, ChartSpec,
};

/// Route that re-renders only the year-scoped sections.
pub const YEAR_SECTIONS_PATH: &str = "/sections/year";
const YEAR_SECTIONS_ID: &str = "year-sections";
const YEAR_SELECT_ID: &str = "year-select";
/// Everything in the year container below the selector. Failed year changes
/// replace only this, so the selector stays usable.
const YEAR_DETAIL_ID: &str = "year-detail";
const UNREACHABLE_MESSAGE: &str = "Could not reach the dashboard server.";

const VEGA_SCRIPTS: [&str; 3] = [
    "https://cdn.jsdelivr.net/npm/vega@5",
    "https://cdn.jsdelivr.net/npm/vega-lite@5",
    "https://cdn.jsdelivr.net/npm/vega-embed@6",
];

/// Full dashboard document, sections in their fixed order.
pub fn render_report(report: &Report) -> String {
    let mut sections = String::new();
    let mut year_block_rendered = false;

    for section in Section::ORDER {
        if section.is_year_scoped() {
            // One container holds every year-scoped section.
            if !year_block_rendered {
                sections.push_str(&format!(
                    r#"<div id="{YEAR_SECTIONS_ID}">{}</div>"#,
                    render_year_sections(&report.year)
                ));
                year_block_rendered = true;
            }
            continue;
        }

        let body = match section {
            Section::AllYearsKpis => render_all_years(&report.all_years),
            Section::DayTypeSplit => render_day_types(&report.day_types),
            Section::TopRestaurants => render_top_restaurants(&report.top_restaurants),
            Section::YearScorecard | Section::MonthlyTrend => continue,
        };
        sections.push_str(&section_block(section, &heading(section, None), &body));
    }

    document(
        &report.title,
        &format!(
            r#"<h1>📊 {title}</h1>
{sections}
<footer>Generated {generated}</footer>"#,
            title = html_escape(&report.title),
            sections = sections,
            generated = report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        ),
    )
}

/// The selector plus the scorecard and monthly trend for the selected year.
pub fn render_year_sections(year: &YearSections) -> String {
    let mut html = String::new();

    match &year.detail {
        Some(detail) => {
            for section in Section::ORDER.into_iter().filter(|s| s.is_year_scoped()) {
                let body = match section {
                    Section::YearScorecard => render_metrics(&detail.scorecard),
                    _ => render_monthly_trend(detail),
                };
                html.push_str(&section_block(
                    section,
                    &heading(section, Some(detail.year)),
                    &body,
                ));
            }
        }
        None => html.push_str(r#"<p class="empty">No yearly KPI data available.</p><hr>"#),
    }

    format!(
        r#"{selector}<div id="{YEAR_DETAIL_ID}">{html}</div>"#,
        selector = render_selector(&year.selector),
    )
}

/// Standalone page shown when a render pass fails.
pub fn render_error_page(title: &str, message: &str) -> String {
    document(
        title,
        &format!(
            r#"<h1>📊 {title}</h1>
{block}
<p><a href="/">Back to dashboard</a></p>"#,
            title = html_escape(title),
            block = render_error_block(message),
        ),
    )
}

pub fn render_error_block(message: &str) -> String {
    format!(
        r#"<div class="error" role="alert"><strong>Report unavailable.</strong> {}</div>"#,
        html_escape(message)
    )
}

fn heading(section: Section, year: Option<i32>) -> String {
    let year = year.map(|y| y.to_string()).unwrap_or_default();
    match section {
        Section::AllYearsKpis => "📈 Aggregate KPIs Across All Years".to_string(),
        Section::YearScorecard => format!("📊 KPI Scorecard for {year}"),
        Section::MonthlyTrend => format!("📅 {year} Monthly Revenue Trend"),
        Section::DayTypeSplit => "📆 Weekday vs Weekend Revenue Split".to_string(),
        Section::TopRestaurants => "🏆 Top 5 Restaurants by Revenue".to_string(),
    }
}

fn section_block(section: Section, heading: &str, body: &str) -> String {
    format!(
        r#"<section id="{anchor}">
    <h2>{heading}</h2>
    {body}
</section>
<hr>"#,
        anchor = section.anchor(),
        heading = html_escape(heading),
        body = body,
    )
}

fn render_all_years(section: &AllYearsSection) -> String {
    render_metrics(&section.metrics)
}

fn render_metrics(metrics: &[Metric]) -> String {
    let cards: String = metrics
        .iter()
        .map(|m| {
            let delta = m
                .delta
                .as_ref()
                .map(|d| {
                    let (class, arrow) = match d.direction {
                        DeltaDirection::Up => ("delta-up", "▲ "),
                        DeltaDirection::Down => ("delta-down", "▼ "),
                        DeltaDirection::Flat => ("delta-flat", ""),
                    };
                    format!(
                        r#"<div class="metric-delta {class}">{arrow}{}</div>"#,
                        html_escape(&d.text)
                    )
                })
                .unwrap_or_default();

            format!(
                r#"<div class="metric">
        <div class="metric-label">{label}</div>
        <div class="metric-value">{value}</div>
        {delta}
    </div>"#,
                label = html_escape(&m.label),
                value = html_escape(&m.value),
                delta = delta,
            )
        })
        .collect();

    format!(r#"<div class="metrics">{cards}</div>"#)
}

fn render_selector(selector: &YearSelector) -> String {
    let options: String = selector
        .years()
        .iter()
        .map(|&year| {
            let selected = if selector.selected() == Some(year) {
                " selected"
            } else {
                ""
            };
            format!(r#"<option value="{year}"{selected}>{year}</option>"#)
        })
        .collect();

    format!(
        r#"<form class="year-selector" method="get" action="/">
    <label for="{YEAR_SELECT_ID}">Select Year</label>
    <select id="{YEAR_SELECT_ID}" name="year">{options}</select>
    <noscript><button type="submit">Apply</button></noscript>
</form>"#
    )
}

fn render_monthly_trend(detail: &YearDetail) -> String {
    let mut html = String::new();
    if detail.monthly.is_empty() {
        html.push_str(&format!(
            r#"<p class="empty">No monthly revenue recorded for {}.</p>"#,
            detail.year
        ));
    }
    html.push_str(&render_chart(&monthly_bar_chart(&detail.monthly)));
    html.push_str(&render_chart(&monthly_line_chart(&detail.monthly)));
    html
}

fn render_day_types(section: &DayTypeSection) -> String {
    render_chart(&day_type_arc_chart(&section.rows))
}

fn render_top_restaurants(section: &TopRestaurantsSection) -> String {
    format!(
        r#"{table}
    <a class="download" download="{file}" href="data:{content_type};charset=utf-8,{csv}">Download Top 5 Restaurants CSV</a>"#,
        table = render_table(&section.table),
        file = TOP5_FILE_NAME,
        content_type = CSV_CONTENT_TYPE,
        csv = urlencoding::encode(&section.csv),
    )
}

fn render_chart(chart: &ChartSpec) -> String {
    format!(
        r#"<div class="chart" id="{id}" data-vega-spec="{spec}"></div>"#,
        id = chart.id,
        spec = html_escape(&chart.spec.to_string()),
    )
}

fn render_table(table: &LabeledTable) -> String {
    let headers: String = table
        .headers
        .iter()
        .map(|h| format!("<th>{}</th>", html_escape(h)))
        .collect();

    if table.is_empty() {
        return format!(
            r#"<table class="data-table">
        <thead><tr>{headers}</tr></thead>
        <tbody><tr><td class="empty" colspan="{span}">No rows returned.</td></tr></tbody>
    </table>"#,
            span = table.headers.len()
        );
    }

    let rows: String = table
        .shaded_rows()
        .map(|(shade, cells)| {
            let cells: String = cells
                .iter()
                .map(|c| format!("<td>{}</td>", html_escape(c)))
                .collect();
            format!(
                r#"<tr style="background-color: {}">{cells}</tr>"#,
                shade.background()
            )
        })
        .collect();

    format!(
        r#"<table class="data-table">
        <thead><tr>{headers}</tr></thead>
        <tbody>{rows}</tbody>
    </table>"#
    )
}

fn document(title: &str, body: &str) -> String {
    let scripts: String = VEGA_SCRIPTS
        .iter()
        .map(|src| format!(r#"<script src="{src}"></script>"#))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
    {scripts}
</head>
<body>
<main class="container">
{body}
</main>
<script>{js}</script>
</body>
</html>"#,
        title = html_escape(title),
        css = inline_css(),
        scripts = scripts,
        body = body,
        js = inline_javascript(),
    )
}

fn inline_css() -> &'static str {
    r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; background: #fafafa; color: #262730; }
.container { max-width: 1100px; margin: 0 auto; padding: 24px; }
h1 { font-size: 2rem; margin-bottom: 24px; }
h2 { font-size: 1.4rem; margin: 16px 0; }
hr { border: none; border-top: 1px solid #e6e6e6; margin: 24px 0; }
.metrics { display: flex; gap: 24px; flex-wrap: wrap; }
.metric { flex: 1; min-width: 200px; }
.metric-label { font-size: 0.9rem; color: #555; }
.metric-value { font-size: 2rem; font-weight: 600; }
.metric-delta { display: inline-block; margin-top: 4px; padding: 2px 8px; border-radius: 12px; font-size: 0.85rem; }
.delta-up { color: #09ab3b; background: #e8f6ec; }
.delta-down { color: #ff2b2b; background: #fdeaea; }
.delta-flat { color: #555; background: #f0f0f0; }
.year-selector { margin-bottom: 16px; }
.year-selector select { margin-left: 8px; padding: 4px 8px; }
.chart { width: 100%; min-height: 320px; margin-bottom: 16px; }
.data-table { border-collapse: collapse; width: 100%; margin-bottom: 16px; }
.data-table th, .data-table td { padding: 8px 12px; border: 1px solid #e6e6e6; text-align: left; }
.data-table th { background: #fff; }
.download { display: inline-block; padding: 8px 16px; border: 1px solid #ccc; border-radius: 6px; color: #262730; text-decoration: none; background: #fff; }
.empty { color: #777; font-style: italic; }
.error { padding: 16px; border-radius: 6px; background: #fdeaea; color: #7d1a1a; }
footer { color: #999; font-size: 0.8rem; margin-top: 32px; }
"#
}

fn inline_javascript() -> String {
    let unreachable = render_error_block(UNREACHABLE_MESSAGE);
    format!(
        r#"
function renderCharts(root) {{
    if (typeof vegaEmbed !== 'function') return;
    root.querySelectorAll('[data-vega-spec]').forEach(function (el) {{
        vegaEmbed(el, JSON.parse(el.dataset.vegaSpec), {{ actions: false }});
    }});
}}

function showYearError(container, html) {{
    var detail = container.querySelector('#{YEAR_DETAIL_ID}');
    if (detail) {{
        detail.innerHTML = html;
    }} else {{
        container.insertAdjacentHTML('beforeend', html);
    }}
}}

document.addEventListener('change', function (event) {{
    if (event.target.id !== '{YEAR_SELECT_ID}') return;
    var year = event.target.value;
    var container = document.getElementById('{YEAR_SECTIONS_ID}');
    fetch('{YEAR_SECTIONS_PATH}?year=' + encodeURIComponent(year))
        .then(function (response) {{
            return response.text().then(function (html) {{
                if (!response.ok) {{
                    showYearError(container, html);
                    return;
                }}
                container.innerHTML = html;
                renderCharts(container);
                history.replaceState(null, '', '?year=' + encodeURIComponent(year));
            }});
        }})
        .catch(function () {{
            showYearError(container, '{unreachable}');
        }});
}});

renderCharts(document);
"#
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
