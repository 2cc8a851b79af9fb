//! Server-side rendering of the catalog page.
//!
//! The page is a single GET form with one multi-select per category, so the
//! selection round-trips through repeated query parameters with no scripting.
//! Every piece of dynamic text passes through [`escape_html`].

use crate::catalog::FilterCriteria;
use crate::config::CatalogConfig;
use crate::tagging::Vocabulary;
use crate::types::ImageRecord;

/// Heading shown when a filter matches nothing.
pub const EMPTY_STATE_TITLE: &str = "No Collections Found";

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Inter', sans-serif; background: #fff; color: #000; line-height: 1.6; }
.header { text-align: center; padding: 40px 20px 25px; background: #000; color: #fff; margin-bottom: 25px; }
.header h1 { font-family: 'Bodoni Moda', serif; font-size: 2.5rem; letter-spacing: 2px; text-transform: uppercase; }
.container { max-width: 1400px; margin: 0 auto; padding: 0 20px 40px; }
.filters { display: flex; flex-wrap: wrap; gap: 20px; align-items: flex-end; margin-bottom: 30px; }
.filter-group { display: flex; flex-direction: column; }
.filter-label { font-size: 0.75rem; text-transform: uppercase; letter-spacing: 1px; margin-bottom: 6px; }
.filter-select { min-width: 180px; padding: 6px; border: 1px solid #000; }
.btn { padding: 10px 24px; border: 1px solid #000; background: #000; color: #fff; cursor: pointer; text-decoration: none; }
.btn-secondary { background: #fff; color: #000; }
.summary { margin-bottom: 20px; font-size: 0.85rem; color: #555; }
.image-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(250px, 1fr)); gap: 20px; }
.image-card img { width: 100%; display: block; }
.image-card figcaption { font-size: 0.75rem; padding: 6px 0; }
.placeholder { padding: 80px 10px; background: #f3f3f3; text-align: center; font-size: 0.8rem; }
.no-results { grid-column: 1 / -1; text-align: center; padding: 80px 20px; }
"#;

/// Option lists offered by the filter form.
#[derive(Debug, Clone, Copy)]
pub struct PageOptions<'a> {
    pub catalog: &'a CatalogConfig,
    pub vocabulary: &'a Vocabulary,
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the full catalog page for a filtered set of images.
pub fn render_page(
    options: PageOptions<'_>,
    criteria: &FilterCriteria,
    images: &[&ImageRecord],
) -> String {
    let payload: usize = images.iter().map(|r| r.thumbnail.len()).sum();
    let mut html = String::with_capacity(8192 + payload);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>RUNWAY TRENDS</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(
        "<div class=\"header\"><h1>Runway Trends</h1><p>Discover the Future of Fashion</p></div>\n",
    );
    html.push_str("<div class=\"container\">\n");

    html.push_str("<form class=\"filters\" method=\"get\" action=\"/\">\n");
    push_select(&mut html, "designer", "Brand", &options.catalog.designers, &criteria.designers);
    push_select(&mut html, "season", "Season", &options.catalog.seasons, &criteria.seasons);
    push_select(&mut html, "year", "Year", &options.catalog.years, &criteria.years);
    push_select(&mut html, "show", "Show", &options.catalog.shows, &criteria.shows);
    push_select(
        &mut html,
        "feature",
        "Features",
        options.vocabulary.labels(),
        &criteria.features,
    );
    html.push_str("<button class=\"btn\" type=\"submit\">Apply Filters</button>\n");
    html.push_str("<a class=\"btn btn-secondary\" href=\"/\">Clear All</a>\n");
    html.push_str("</form>\n");

    if !criteria.is_empty() {
        html.push_str(&format!(
            "<p class=\"summary\">{} looks &middot; <a href=\"/?{}\">Link to this selection</a></p>\n",
            images.len(),
            escape_html(&criteria.to_query_string())
        ));
    }

    html.push_str("<div class=\"image-grid\">\n");
    if images.is_empty() {
        html.push_str(&format!(
            "<div class=\"no-results\"><h3>{EMPTY_STATE_TITLE}</h3>\
             <p>Try adjusting your filters to discover more runway looks</p></div>\n"
        ));
    } else {
        for image in images {
            push_card(&mut html, image);
        }
    }
    html.push_str("</div>\n</div>\n</body>\n</html>\n");
    html
}

fn push_select(html: &mut String, name: &str, title: &str, values: &[String], selected: &[String]) {
    html.push_str(&format!(
        "<div class=\"filter-group\"><label class=\"filter-label\" for=\"{name}-select\">{title}</label>\
         <select id=\"{name}-select\" class=\"filter-select\" name=\"{name}\" multiple size=\"5\">\n"
    ));
    for value in values {
        let escaped = escape_html(value);
        let marker = if selected.contains(value) { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{escaped}\"{marker}>{escaped}</option>\n"
        ));
    }
    html.push_str("</select></div>\n");
}

fn push_card(html: &mut String, image: &ImageRecord) {
    let alt = escape_html(&image.file_name);
    html.push_str("<figure class=\"image-card\">");
    if image.thumbnail.is_empty() {
        html.push_str(&format!("<div class=\"placeholder\">{alt}</div>"));
    } else {
        // base64 output is already attribute-safe
        html.push_str(&format!(
            "<img src=\"data:image/jpeg;base64,{}\" alt=\"{alt}\">",
            image.thumbnail
        ));
    }
    html.push_str(&format!(
        "<figcaption>{} &middot; {} {} &middot; {}</figcaption></figure>\n",
        escape_html(&image.designer),
        escape_html(&image.season),
        escape_html(&image.year),
        escape_html(&image.show)
    ));
}
