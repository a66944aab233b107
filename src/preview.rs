//! Markdown to HTML preview rendering using pulldown-cmark

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

use crate::encoding::PAGE_BREAK_TOKEN;

/// Colors used by the preview stylesheet
#[derive(Debug, Clone)]
pub struct PreviewTheme {
    pub background: String,
    pub text: String,
    pub heading: String,
    pub muted: String,
    pub border: String,
    pub code_background: String,
}

impl Default for PreviewTheme {
    fn default() -> Self {
        // paper-light
        Self {
            background: "#fdfdfb".to_string(),
            text: "#2b2b28".to_string(),
            heading: "#1a1a18".to_string(),
            muted: "#8a8a82".to_string(),
            border: "#e4e4dd".to_string(),
            code_background: "#f2f2ec".to_string(),
        }
    }
}

/// Convert markdown to a complete HTML document with styling
///
/// Page-break markers in prose are turned into a visible rule; inside
/// inline code and fenced blocks the literal characters are kept verbatim.
pub fn markdown_to_html(markdown: &str, theme: &PreviewTheme) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    // Prose text is coalesced before substitution: the parser may split a
    // run at the token's backslash, so the token can span adjacent Text
    // events.
    fn flush_text_run<'a>(run: &mut String, events: &mut Vec<Event<'a>>) {
        if run.is_empty() {
            return;
        }
        for (i, part) in run.split(PAGE_BREAK_TOKEN).enumerate() {
            if i > 0 {
                events.push(Event::Html(CowStr::Borrowed("<hr class=\"page-break\">")));
            }
            if !part.is_empty() {
                events.push(Event::Text(part.to_string().into()));
            }
        }
        run.clear();
    }

    let mut events: Vec<Event> = Vec::new();
    let mut text_run = String::new();
    let mut in_code_block = false;
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Text(text) if !in_code_block => text_run.push_str(&text),
            Event::Start(Tag::CodeBlock(kind)) => {
                flush_text_run(&mut text_run, &mut events);
                in_code_block = true;
                events.push(Event::Start(Tag::CodeBlock(kind)));
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                events.push(Event::End(TagEnd::CodeBlock));
            }
            other => {
                flush_text_run(&mut text_run, &mut events);
                events.push(other);
            }
        }
    }
    flush_text_run(&mut text_run, &mut events);

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>{}</style>
</head>
<body>
    <div id="content">{}</div>
</body>
</html>"#,
        generate_css(theme),
        html_output
    )
}

/// Generate CSS from theme colors
fn generate_css(theme: &PreviewTheme) -> String {
    format!(
        r#"
* {{
    box-sizing: border-box;
}}

body {{
    font-family: Georgia, "Times New Roman", serif;
    font-size: 16px;
    line-height: 1.7;
    color: {text};
    background: {background};
    padding: 32px 24px;
    max-width: 720px;
    margin: 0 auto;
}}

h1, h2, h3, h4, h5, h6 {{
    color: {heading};
    margin-top: 24px;
    margin-bottom: 16px;
    font-weight: 600;
    line-height: 1.25;
}}

h1 {{
    font-size: 2em;
    border-bottom: 1px solid {border};
    padding-bottom: 0.3em;
}}

h2 {{
    font-size: 1.5em;
    border-bottom: 1px solid {border};
    padding-bottom: 0.3em;
}}

h6 {{
    color: {muted};
}}

p {{
    margin-top: 0;
    margin-bottom: 16px;
}}

code {{
    background: {code_background};
    padding: 0.2em 0.4em;
    border-radius: 3px;
    font-family: "SF Mono", "Fira Code", Consolas, "Liberation Mono", Menlo, Courier, monospace;
    font-size: 0.9em;
}}

pre {{
    background: {code_background};
    padding: 16px;
    border-radius: 6px;
    overflow-x: auto;
}}

pre code {{
    background: none;
    padding: 0;
}}

blockquote {{
    margin: 0 0 16px 0;
    padding: 0 1em;
    color: {muted};
    border-left: 0.25em solid {border};
}}

table {{
    border-collapse: collapse;
    margin-bottom: 16px;
}}

th, td {{
    border: 1px solid {border};
    padding: 6px 13px;
}}

hr {{
    border: 0;
    border-top: 1px solid {border};
    margin: 24px 0;
}}

hr.page-break {{
    border-top: 1px dashed {muted};
    margin: 48px 0;
}}
"#,
        text = theme.text,
        background = theme.background,
        heading = theme.heading,
        muted = theme.muted,
        border = theme.border,
        code_background = theme.code_background,
    )
}
