//! Tolerant HTML scanning
//!
//! Just enough to read table rows out of a server-rendered page: elements are
//! located by case-insensitive tag scanning, attributes parsed from the open
//! tag, text extracted by stripping markup. No DOM is built.

/// One element located in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a> {
    /// Raw attribute text of the open tag
    attributes: &'a str,
    /// Raw markup between the open and close tags
    pub inner: &'a str,
}

impl<'a> Element<'a> {
    /// Attribute value with entities decoded; names match case-insensitively
    pub fn attr(&self, name: &str) -> Option<String> {
        parse_attributes(self.attributes)
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| decode_entities(value))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Visible text, whitespace collapsed
    pub fn text(&self) -> String {
        text_content(self.inner)
    }

    /// Child elements with the given tag
    pub fn find_all(&self, tag: &str) -> Vec<Element<'a>> {
        find_all(self.inner, tag)
    }

    /// Descendant elements with the given tag, at any depth
    pub fn find_descendants(&self, tag: &str) -> Vec<Element<'a>> {
        find_descendants(self.inner, tag)
    }

    /// First descendant with the given tag and class
    pub fn find_by_class(&self, tag: &str, class: &str) -> Option<Element<'a>> {
        self.find_descendants(tag).into_iter().find(|e| e.has_class(class))
    }
}

/// All top-level `tag` elements in `html`, in document order
///
/// Nested elements of the same tag are included in their parent's `inner`
/// rather than returned separately. An unclosed element runs to the end of
/// the input.
pub fn find_all<'a>(html: &'a str, tag: &str) -> Vec<Element<'a>> {
    scan(html, tag, false)
}

/// Every `tag` element in `html` at any depth, in document order of the
/// open tags
pub fn find_descendants<'a>(html: &'a str, tag: &str) -> Vec<Element<'a>> {
    scan(html, tag, true)
}

fn scan<'a>(html: &'a str, tag: &str, descend: bool) -> Vec<Element<'a>> {
    let lower = html.to_ascii_lowercase();
    let tag = tag.to_ascii_lowercase();
    let open = format!("<{}", tag);
    let close = format!("</{}", tag);

    let mut elements = Vec::new();
    let mut cursor = 0;

    while let Some(start) = find_tag(&lower, &open, cursor) {
        let attrs_start = start + open.len();
        let Some(open_end) = find_tag_end(&lower, attrs_start) else {
            break;
        };
        let attributes = html[attrs_start..open_end].trim().trim_end_matches('/');
        let inner_start = open_end + 1;

        // Self-closing
        if html[attrs_start..open_end].trim_end().ends_with('/') {
            elements.push(Element {
                attributes,
                inner: "",
            });
            cursor = inner_start;
            continue;
        }

        let (inner_end, next) = match_close(&lower, &open, &close, inner_start);
        elements.push(Element {
            attributes,
            inner: &html[inner_start..inner_end],
        });
        cursor = if descend { inner_start } else { next };
    }

    elements
}

/// Next `<tag` that is a whole tag name (followed by whitespace, `>` or `/`)
fn find_tag(lower: &str, open: &str, from: usize) -> Option<usize> {
    let mut from = from;
    while let Some(offset) = lower.get(from..)?.find(open) {
        let start = from + offset;
        match lower.as_bytes().get(start + open.len()) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => return Some(start),
            None => return None,
            _ => from = start + open.len(),
        }
    }
    None
}

/// Index of the `>` closing an open tag, skipping quoted attribute values
fn find_tag_end(lower: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in lower.as_bytes().iter().enumerate().skip(from) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"') | (None, b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            _ => {}
        }
    }
    None
}

/// Returns (end of inner markup, index after the close tag)
fn match_close(lower: &str, open: &str, close: &str, from: usize) -> (usize, usize) {
    let mut depth = 1;
    let mut cursor = from;
    loop {
        let next_close = lower.get(cursor..).and_then(|s| s.find(close)).map(|i| cursor + i);
        let Some(close_at) = next_close else {
            return (lower.len(), lower.len());
        };
        match find_tag(lower, open, cursor) {
            Some(open_at) if open_at < close_at => {
                depth += 1;
                cursor = open_at + open.len();
            }
            _ => {
                depth -= 1;
                let after = lower[close_at..]
                    .find('>')
                    .map(|i| close_at + i + 1)
                    .unwrap_or(lower.len());
                if depth == 0 {
                    return (close_at, after);
                }
                cursor = after;
            }
        }
    }
}

/// (name, raw value) pairs; valueless attributes get an empty value
fn parse_attributes(raw: &str) -> Vec<(&str, &str)> {
    let mut attrs = Vec::new();
    let mut rest = raw.trim_start();

    while !rest.is_empty() {
        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (value, remaining) = match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    match body.find(q) {
                        Some(end) => (&body[..end], &body[end + 1..]),
                        None => (body, ""),
                    }
                }
                _ => {
                    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                    (&after_eq[..end], &after_eq[end..])
                }
            };
            attrs.push((name, value));
            rest = remaining.trim_start();
        } else {
            if !name.is_empty() {
                attrs.push((name, ""));
            }
            if name_end == 0 {
                // Stray character; skip it
                let skip = rest.chars().next().map(char::len_utf8).unwrap_or(0);
                rest = &rest[skip..];
            }
        }
    }

    attrs
}

/// Strip tags, decode entities, collapse whitespace
pub fn text_content(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode the named entities common in table markup plus numeric references
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let decoded = candidate
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&candidate[1..end]).map(|c| (c, end + 1)));
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &candidate[consumed..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_rows_with_attributes() {
        let html = r#"
            <TABLE>
              <tr><th>Name</th></tr>
              <tr data-href="jurisdiction/gb" class="row"><td class="name">United Kingdom</td></tr>
              <tr class='row' data-href='jurisdiction/fr'><td class="name">France</td></tr>
            </TABLE>
        "#;
        let rows = find_all(html, "tr");
        assert_eq!(rows.len(), 3);
        assert!(!rows[0].has_attr("data-href"));
        assert_eq!(rows[1].attr("data-href").as_deref(), Some("jurisdiction/gb"));
        assert_eq!(rows[2].attr("DATA-HREF").as_deref(), Some("jurisdiction/fr"));
        assert!(rows[2].has_class("row"));
    }

    #[test]
    fn test_tag_name_must_match_exactly() {
        let html = "<track src='a'></track><tr><td>x</td></tr>";
        let rows = find_all(html, "tr");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text(), "x");
    }

    #[test]
    fn test_nested_elements() {
        let html = "<div>outer <div>inner</div> tail</div><div>second</div>";
        let divs = find_all(html, "div");
        assert_eq!(divs.len(), 2);
        assert_eq!(divs[0].text(), "outer inner tail");
        assert_eq!(divs[1].text(), "second");
    }

    #[test]
    fn test_find_descendants_includes_nested() {
        let html = "<div>outer <div>inner</div> tail</div><div>second</div>";
        let divs = find_descendants(html, "div");
        let texts: Vec<_> = divs.iter().map(|d| d.text()).collect();
        assert_eq!(texts, vec!["outer inner tail", "inner", "second"]);
    }

    #[test]
    fn test_find_by_class_searches_nested_cells() {
        let html = r#"<tr data-href="x"><td class="wrap"><table><tr><td class="name">Peru</td></tr></table></td></tr>"#;
        let row = &find_all(html, "tr")[0];
        assert_eq!(row.find_by_class("td", "name").unwrap().text(), "Peru");
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let html = r#"<td title="a > b" class="score">42/100</td>"#;
        let cells = find_all(html, "td");
        assert_eq!(cells[0].attr("title").as_deref(), Some("a > b"));
        assert_eq!(cells[0].text(), "42/100");
    }

    #[test]
    fn test_find_by_class() {
        let html = r#"<tr><td class="flag"></td><td class="name wide"> Côte d&#39;Ivoire </td><td class="score">10/100</td></tr>"#;
        let row = &find_all(html, "tr")[0];
        assert_eq!(row.find_by_class("td", "name").unwrap().text(), "Côte d'Ivoire");
        assert_eq!(row.find_by_class("td", "score").unwrap().text(), "10/100");
        assert!(row.find_by_class("td", "missing").is_none());
    }

    #[test]
    fn test_unclosed_element_runs_to_end() {
        let cells = find_all("<td>open", "td");
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].inner, "open");
    }

    #[test]
    fn test_text_content() {
        assert_eq!(text_content("  Bosnia &amp;\n <b>Herzegovina</b> "), "Bosnia & Herzegovina");
        assert_eq!(text_content("S&#227;o Tom&#xE9;"), "São Tomé");
    }

    #[test]
    fn test_decode_entities_leaves_unknown() {
        assert_eq!(decode_entities("AT&T"), "AT&T");
        assert_eq!(decode_entities("&bogus; &lt;"), "&bogus; <");
    }

    #[test]
    fn test_valueless_attributes() {
        let html = "<tr hidden data-href=x/y><td>a</td></tr>";
        let row = &find_all(html, "tr")[0];
        assert!(row.has_attr("hidden"));
        assert_eq!(row.attr("data-href").as_deref(), Some("x/y"));
    }
}
