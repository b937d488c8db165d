use pulldown_cmark::{html, Event, Options, Parser, Tag};

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Renders model Markdown to HTML. Tables are enabled; raw HTML blocks and
/// tags in the model output are emitted as escaped text. Links and images
/// pointing at any other scheme keep their text but lose the tag.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(markdown, options).filter_map(|event| match event {
        Event::Html(raw) => Some(Event::Text(raw)),
        Event::Start(Tag::Link(_, ref dest, _))
        | Event::End(Tag::Link(_, ref dest, _))
        | Event::Start(Tag::Image(_, ref dest, _))
        | Event::End(Tag::Image(_, ref dest, _))
            if !is_safe_destination(dest) =>
        {
            None
        }
        other => Some(other),
    });

    let mut output = String::with_capacity(markdown.len() + markdown.len() / 2);
    html::push_html(&mut output, events);
    output
}

/// Relative destinations and the schemes in `SAFE_SCHEMES` pass.
fn is_safe_destination(dest: &str) -> bool {
    // Browsers ignore ASCII whitespace and control characters inside a scheme
    let cleaned: String = dest
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect();

    match cleaned.find(|c: char| matches!(c, ':' | '/' | '?' | '#')) {
        Some(pos) if cleaned[pos..].starts_with(':') => {
            let scheme = cleaned[..pos].to_ascii_lowercase();
            SAFE_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}
