//! HTML fixtures shaped like the digital library's listing and record pages.

#![allow(dead_code)]

/// One result row of a listing page.
pub struct Row<'a> {
    pub title: &'a str,
    pub href: &'a str,
    /// `None` leaves the brief-options block out of the row.
    pub brief: Option<&'a str>,
}

impl<'a> Row<'a> {
    pub fn new(title: &'a str, href: &'a str, brief: &'a str) -> Self {
        Self {
            title,
            href,
            brief: Some(brief),
        }
    }

    pub fn without_brief(title: &'a str, href: &'a str) -> Self {
        Self {
            title,
            href,
            brief: None,
        }
    }
}

pub fn listing_html(rows: &[Row<'_>]) -> String {
    let mut body = String::new();
    for row in rows {
        body.push_str("<div class=\"result-row\">\n");
        body.push_str(&format!(
            "  <div class=\"result-title\"><a href=\"{}\">\n    {}\n  </a></div>\n",
            row.href, row.title
        ));
        if let Some(brief) = row.brief {
            body.push_str(&format!("  <div class=\"brief-options\">{brief}</div>\n"));
        }
        body.push_str("</div>\n");
    }
    format!(
        "<!DOCTYPE html><html><head><title>Search results</title></head>\
         <body><div id=\"results\">{body}</div></body></html>"
    )
}

pub fn record_html(pdf_hrefs: &[&str]) -> String {
    let links: String = pdf_hrefs
        .iter()
        .map(|href| format!("<li><a href=\"{href}\">{href}</a></li>"))
        .collect();
    format!(
        "<!DOCTYPE html><html><body><h1>Record</h1>\
         <a href=\"/record/help\">Help</a><ul class=\"files\">{links}</ul></body></html>"
    )
}
