//! HTML report: the markdown text report rendered to a standalone page.

use pulldown_cmark::{html, Options, Parser};

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem;color:#1f2328}\
code{background:#f6f8fa;padding:.1em .3em;border-radius:4px}\
table{border-collapse:collapse}th,td{border:1px solid #d0d7de;padding:.3em .8em}";

/// HTML output formatter
pub struct HtmlOutput;

impl HtmlOutput {
    /// Render a markdown report into a complete HTML document.
    pub fn render(markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES);
        let mut body = String::with_capacity(markdown.len() * 2);
        html::push_html(&mut body, parser);

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>API Changelog</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
            STYLE, body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown() {
        let html = HtmlOutput::render("# Title\n\n- `GET /items`\n");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<code>GET /items</code>"));
    }

    #[test]
    fn test_render_table() {
        let html = HtmlOutput::render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }
}
