use crate::tokenizer::{tokenize, HtmlToken, StartTag};

/// Re-emits `html` token by token in a single fixed shape.
///
/// Start tags come out as `<tag attr name="value">`, self-closing tags as
/// `<tag attr/>`, end tags as `</tag>`. An attribute with an empty value is
/// written as its bare name. Text is re-escaped, except inside raw-text
/// elements. Tokens are joined without separators. Comments and declarations
/// are dropped.
pub fn pretty_print(html: &str) -> String {
    let mut out = String::with_capacity(html.len());

    for token in tokenize(html) {
        match token {
            HtmlToken::StartTag(tag) => push_start_tag(&mut out, &tag),
            HtmlToken::EndTag { name, .. } => {
                out.push_str("</");
                out.push_str(&name);
                out.push('>');
            }
            HtmlToken::Text { text, raw: true } => out.push_str(&text),
            HtmlToken::Text { text, raw: false } => out.push_str(&html_escape::encode_text(&text)),
        }
    }

    out
}

fn push_start_tag(out: &mut String, tag: &StartTag) {
    out.push('<');
    out.push_str(&tag.name);
    for (name, value) in &tag.attrs {
        out.push(' ');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }
    }
    out.push_str(if tag.self_closing { "/>" } else { ">" });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fixed_shape() {
        assert_eq!(
            pretty_print("<DIV  Class='a'   hidden >x</DIV >"),
            "<div class=\"a\" hidden>x</div>"
        );
        assert_eq!(pretty_print("<br /><img src=x>"), "<br/><img src=\"x\">");
        assert_eq!(pretty_print("<a download=\"\">x</a>"), "<a download>x</a>");
    }

    #[test]
    fn test_text_layout_is_kept() {
        assert_eq!(
            pretty_print("<p>  a &amp; b\n</p>"),
            "<p>  a &amp; b\n</p>"
        );
        assert_eq!(pretty_print("<p>&#60;&quot;</p>"), "<p>&lt;\"</p>");
    }

    #[test]
    fn test_script_text_is_verbatim() {
        assert_eq!(
            pretty_print("<script>a && b</script>"),
            "<script>a && b</script>"
        );
    }

    #[test]
    fn test_comments_and_doctype_dropped() {
        assert_eq!(
            pretty_print("<!DOCTYPE html><!-- c --><p>x</p>"),
            "<p>x</p>"
        );
    }

    #[test]
    fn test_quote_in_single_quoted_value() {
        assert_eq!(
            pretty_print("<a title='say \"hi\"'>x</a>"),
            "<a title=\"say &quot;hi&quot;\">x</a>"
        );
    }

    #[test]
    fn test_stable_on_own_output() {
        let once = pretty_print("<ul><li class='a'>1<li>2<br></ul>");
        assert_eq!(pretty_print(&once), once);
    }
}
