use std::collections::HashMap;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Heading(u8),
    Paragraph,
    CodeBlock,
    Table,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentNode {
    pub kind: NodeKind,
    pub id: Option<String>,
    pub text: String,
}

impl ContentNode {
    pub fn heading(level: u8, id: Option<&str>, text: &str) -> Self {
        Self {
            kind: NodeKind::Heading(level),
            id: id.map(str::to_owned),
            text: text.to_owned(),
        }
    }

    pub fn paragraph(text: &str) -> Self {
        Self {
            kind: NodeKind::Paragraph,
            id: None,
            text: text.to_owned(),
        }
    }

    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            NodeKind::Heading(level) => Some(level),
            _ => None,
        }
    }
}

/// HTML plus the node outline the scroll-spy queries in place of a DOM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedContent {
    pub html: String,
    pub nodes: Vec<ContentNode>,
}

impl RenderedContent {
    pub fn from_nodes(nodes: Vec<ContentNode>) -> Self {
        Self {
            html: String::new(),
            nodes,
        }
    }

    /// Heading nodes of level `1..=max_level` in document order, anchored or not.
    pub fn query_headings(&self, max_level: u8) -> impl Iterator<Item = &ContentNode> {
        self.nodes
            .iter()
            .filter(move |node| node.heading_level().is_some_and(|level| level <= max_level))
    }
}

pub trait Highlighter {
    /// Returns a complete HTML block for `code`, with line numbers.
    fn highlight(&self, code: &str, language: Option<&str>) -> String;
}

/// Escapes each line and adds a line-number gutter; no token colouring.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, code: &str, language: Option<&str>) -> String {
        let mut out = String::new();
        match language {
            Some(language) => out.push_str(&format!(
                "<pre class=\"code-block\" data-language=\"{}\"><code>",
                html_escape(language)
            )),
            None => out.push_str("<pre class=\"code-block\"><code>"),
        }
        for (idx, line) in code.trim_end_matches('\n').lines().enumerate() {
            out.push_str(&format!(
                "<span class=\"line\"><span class=\"line-number\">{}</span>{}</span>\n",
                idx + 1,
                html_escape(line)
            ));
        }
        out.push_str("</code></pre>\n");
        out
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Assign slug ids to headings without an explicit `{#id}`.
    pub slug_headings: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            slug_headings: true,
        }
    }
}

pub struct MarkdownRenderer {
    options: RenderOptions,
    highlighter: Box<dyn Highlighter>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl std::fmt::Debug for MarkdownRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownRenderer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl MarkdownRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            highlighter: Box::new(PlainHighlighter),
        }
    }

    pub fn with_highlighter(mut self, highlighter: impl Highlighter + 'static) -> Self {
        self.highlighter = Box::new(highlighter);
        self
    }

    pub fn render(&self, markdown: &str) -> RenderedContent {
        let mut slugger = Slugger::default();
        let mut events: Vec<Event<'_>> = Vec::new();
        let mut nodes = Vec::new();

        let mut heading: Option<PendingHeading<'_>> = None;
        let mut code_block: Option<(Option<String>, String)> = None;
        let mut paragraph: Option<String> = None;

        for event in Parser::new_ext(markdown, markdown_options()) {
            if let Some((_, code)) = code_block.as_mut() {
                match event {
                    Event::Text(text) => code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let (language, code) = code_block.take().unwrap_or_default();
                        events.push(Event::Html(
                            self.render_code_block(&code, language.as_deref()).into(),
                        ));
                        nodes.push(ContentNode {
                            kind: NodeKind::CodeBlock,
                            id: None,
                            text: code,
                        });
                    }
                    _ => {}
                }
                continue;
            }

            if let Some(pending) = heading.as_mut() {
                match event {
                    Event::End(TagEnd::Heading(_)) => {
                        let pending = heading.take().unwrap_or_default();
                        let level = pending.level;
                        let text = pending.text.trim().to_owned();
                        let id = match pending.explicit_id {
                            Some(id) => Some(slugger.claim(id)),
                            None if self.options.slug_headings => Some(slugger.slug(&text)),
                            None => None,
                        }
                        .filter(|id| !id.is_empty());

                        let open = match &id {
                            Some(id) => format!(
                                "<h{level} id=\"{}\" class=\"heading-{level}\">",
                                html_escape(id)
                            ),
                            None => format!("<h{level} class=\"heading-{level}\">"),
                        };
                        events.push(Event::Html(open.into()));
                        events.extend(pending.inner);
                        events.push(Event::Html(format!("</h{level}>\n").into()));
                        nodes.push(ContentNode {
                            kind: NodeKind::Heading(level),
                            id,
                            text,
                        });
                    }
                    Event::Text(ref text) | Event::Code(ref text) => {
                        pending.text.push_str(text);
                        pending.inner.push(event);
                    }
                    other => pending.inner.push(other),
                }
                continue;
            }

            match event {
                Event::Start(Tag::Heading { level, id, .. }) => {
                    heading = Some(PendingHeading {
                        level: heading_level_number(level),
                        explicit_id: id.map(|id| id.to_string()),
                        ..PendingHeading::default()
                    });
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    let language = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .filter(|lang| !lang.is_empty())
                            .map(str::to_owned),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((language, String::new()));
                }
                Event::Start(Tag::Table(alignments)) => {
                    events.push(Event::Html("<div class=\"table-scroll\">\n".into()));
                    events.push(Event::Start(Tag::Table(alignments)));
                    nodes.push(ContentNode {
                        kind: NodeKind::Table,
                        id: None,
                        text: String::new(),
                    });
                }
                Event::End(TagEnd::Table) => {
                    events.push(Event::End(TagEnd::Table));
                    events.push(Event::Html("</div>\n".into()));
                }
                Event::Start(Tag::Paragraph) => {
                    paragraph = Some(String::new());
                    events.push(Event::Start(Tag::Paragraph));
                }
                Event::End(TagEnd::Paragraph) => {
                    if let Some(text) = paragraph.take() {
                        nodes.push(ContentNode::paragraph(text.trim()));
                    }
                    events.push(Event::End(TagEnd::Paragraph));
                }
                Event::Code(text) => {
                    if let Some(paragraph) = paragraph.as_mut() {
                        paragraph.push_str(&text);
                    }
                    events.push(Event::InlineHtml(
                        format!("<code class=\"inline-badge\">{}</code>", html_escape(&text))
                            .into(),
                    ));
                }
                Event::Text(text) => {
                    if let Some(paragraph) = paragraph.as_mut() {
                        paragraph.push_str(&text);
                    }
                    events.push(Event::Text(text));
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some(paragraph) = paragraph.as_mut() {
                        paragraph.push(' ');
                    }
                    events.push(event);
                }
                other => events.push(other),
            }
        }

        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, events.into_iter());
        RenderedContent { html, nodes }
    }

    fn render_code_block(&self, code: &str, language: Option<&str>) -> String {
        let multiline = code.trim_end_matches('\n').contains('\n');
        if language.is_some() || multiline {
            return self.highlighter.highlight(code, language);
        }
        format!(
            "<pre class=\"code-plain\"><code>{}</code></pre>\n",
            html_escape(code.trim_end_matches('\n'))
        )
    }
}

#[derive(Debug, Default)]
struct PendingHeading<'a> {
    level: u8,
    explicit_id: Option<String>,
    text: String,
    inner: Vec<Event<'a>>,
}

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

fn heading_level_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// GitHub-style heading slugs, unique within one document.
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    pub fn slug(&mut self, text: &str) -> String {
        let base = text
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
            .map(|c| if c == ' ' { '-' } else { c })
            .collect::<String>();
        if base.is_empty() {
            return base;
        }
        self.claim(base)
    }

    /// Registers `base`, suffixing `-1`, `-2`, … when it was already taken.
    pub fn claim(&mut self, base: String) -> String {
        let mut candidate = base.clone();
        while let Some(count) = self.seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{base}-{count}");
        }
        self.seen.insert(candidate.clone(), 0);
        candidate
    }
}

/// Terminal rendering: headings keep their `#` markers, code is indented.
pub fn render_plain(markdown: &str) -> String {
    let mut out = String::new();
    let mut line = String::new();
    let mut in_code = false;
    let mut list_depth = 0usize;

    for event in Parser::new_ext(markdown, markdown_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                line.push_str(&"#".repeat(usize::from(heading_level_number(level))));
                line.push(' ');
            }
            Event::Start(Tag::CodeBlock(_)) => in_code = true,
            Event::End(TagEnd::CodeBlock) => {
                in_code = false;
                out.push('\n');
            }
            Event::Start(Tag::List(_)) => list_depth += 1,
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    out.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                line.push_str(&"  ".repeat(list_depth.saturating_sub(1)));
                line.push_str("- ");
            }
            Event::End(TagEnd::Item) | Event::End(TagEnd::TableRow) | Event::End(TagEnd::TableHead) => {
                flush_line(&mut out, &mut line);
            }
            Event::End(TagEnd::Heading(_)) | Event::End(TagEnd::Paragraph) => {
                flush_line(&mut out, &mut line);
                if list_depth == 0 {
                    out.push('\n');
                }
            }
            Event::End(TagEnd::Table) => out.push('\n'),
            Event::End(TagEnd::TableCell) => line.push_str(" | "),
            Event::Text(text) if in_code => {
                for code_line in text.lines() {
                    out.push_str("    ");
                    out.push_str(code_line);
                    out.push('\n');
                }
            }
            Event::Text(text) => line.push_str(&text),
            Event::Code(text) => {
                line.push('`');
                line.push_str(&text);
                line.push('`');
            }
            Event::SoftBreak | Event::HardBreak => line.push(' '),
            _ => {}
        }
    }
    flush_line(&mut out, &mut line);

    let trimmed = out.trim_end();
    format!("{trimmed}\n")
}

fn flush_line(out: &mut String, line: &mut String) {
    let text = line.trim_end().trim_end_matches(" |");
    if !text.is_empty() {
        out.push_str(text);
        out.push('\n');
    }
    line.clear();
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading_ids(rendered: &RenderedContent) -> Vec<Option<&str>> {
        rendered
            .query_headings(6)
            .map(|node| node.id.as_deref())
            .collect()
    }

    #[test]
    fn headings_get_unique_slug_ids() {
        let rendered = MarkdownRenderer::default()
            .render("# Hello, World!\n\n## Setup\n\n## Setup\n\n### `var` and Types\n");

        assert_eq!(
            heading_ids(&rendered),
            vec![
                Some("hello-world"),
                Some("setup"),
                Some("setup-1"),
                Some("var-and-types"),
            ]
        );
        assert!(
            rendered
                .html
                .contains("<h1 id=\"hello-world\" class=\"heading-1\">Hello, World!</h1>")
        );
        assert!(rendered.html.contains("<h3 id=\"var-and-types\" class=\"heading-3\"><code>var</code> and Types</h3>"));
        assert_eq!(rendered.nodes[3].text, "var and Types");
    }

    #[test]
    fn explicit_heading_ids_win_over_slugs() {
        let rendered = MarkdownRenderer::default().render("# Intro {#a}\n\n## Intro\n");
        assert_eq!(heading_ids(&rendered), vec![Some("a"), Some("intro")]);
    }

    #[test]
    fn punctuation_only_heading_gets_no_id() {
        let rendered = MarkdownRenderer::default().render("# ???\n\n## ???\n\n## Next\n");

        assert_eq!(heading_ids(&rendered), vec![None, None, Some("next")]);
        assert!(rendered.html.contains("<h1 class=\"heading-1\">???</h1>"));
        assert!(!rendered.html.contains("id=\"\""));
    }

    #[test]
    fn unslugged_headings_have_no_id() {
        let rendered = MarkdownRenderer::new(RenderOptions {
            slug_headings: false,
        })
        .render("# Title\n\n## Anchored {#anchored}\n");

        assert_eq!(heading_ids(&rendered), vec![None, Some("anchored")]);
        assert!(rendered.html.contains("<h1 class=\"heading-1\">Title</h1>"));
    }

    #[test]
    fn code_blocks_use_highlighter_for_language_or_multiline() {
        let md = "```java\nint x = 1;\n```\n\n```\nplain one-liner\n```\n\n```\nline one\nline two\n```\n";
        let rendered = MarkdownRenderer::default().render(md);

        assert!(rendered.html.contains(
            "<pre class=\"code-block\" data-language=\"java\"><code><span class=\"line\"><span class=\"line-number\">1</span>int x = 1;</span>"
        ));
        assert!(
            rendered
                .html
                .contains("<pre class=\"code-plain\"><code>plain one-liner</code></pre>")
        );
        assert!(rendered.html.contains("<span class=\"line-number\">2</span>line two"));

        let code_nodes = rendered
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::CodeBlock)
            .count();
        assert_eq!(code_nodes, 3);
    }

    #[test]
    fn custom_highlighter_is_used() {
        struct Shout;
        impl Highlighter for Shout {
            fn highlight(&self, code: &str, _language: Option<&str>) -> String {
                format!("<pre>{}</pre>", code.to_uppercase())
            }
        }

        let rendered = MarkdownRenderer::default()
            .with_highlighter(Shout)
            .render("```kotlin\nval x = 1\n```\n");
        assert!(rendered.html.contains("<pre>VAL X = 1\n</pre>"));
    }

    #[test]
    fn inline_code_is_a_badge_and_tables_scroll() {
        let md = "Use `<T>` here.\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        let rendered = MarkdownRenderer::default().render(md);

        assert!(
            rendered
                .html
                .contains("<code class=\"inline-badge\">&lt;T&gt;</code>")
        );
        assert!(rendered.html.contains("<div class=\"table-scroll\">\n<table>"));
        assert!(rendered.html.contains("</table>\n</div>"));
        assert_eq!(rendered.nodes[0], ContentNode::paragraph("Use <T> here."));
        assert_eq!(rendered.nodes[1].kind, NodeKind::Table);
    }

    #[test]
    fn render_plain_keeps_structure() {
        let md = "# Title\n\nSome `code` text.\n\n- one\n- two\n\n```java\nint x;\n```\n";
        let plain = render_plain(md);
        assert_eq!(
            plain,
            "# Title\n\nSome `code` text.\n\n- one\n- two\n\n    int x;\n"
        );
    }
}
