use std::borrow::Cow;

use crate::error::AssertElementError;

/// Raw body of something holding HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

/// Anything an element can be looked up in: an HTML string, or a response
/// type exposing its body.
///
/// ```ignore
/// struct Response { content: Vec<u8> }
///
/// impl HtmlSource for Response {
///     fn body(&self) -> Body<'_> {
///         Body::Bytes(&self.content)
///     }
/// }
/// ```
pub trait HtmlSource {
    fn body(&self) -> Body<'_>;

    /// The body as text, decoding bytes as UTF-8.
    fn html(&self) -> Result<Cow<'_, str>, AssertElementError> {
        match self.body() {
            Body::Text(text) => Ok(Cow::Borrowed(text)),
            Body::Bytes(bytes) => Ok(Cow::Borrowed(std::str::from_utf8(bytes)?)),
        }
    }
}

impl HtmlSource for str {
    fn body(&self) -> Body<'_> {
        Body::Text(self)
    }
}

impl HtmlSource for String {
    fn body(&self) -> Body<'_> {
        Body::Text(self)
    }
}

impl HtmlSource for Cow<'_, str> {
    fn body(&self) -> Body<'_> {
        Body::Text(self)
    }
}

impl HtmlSource for [u8] {
    fn body(&self) -> Body<'_> {
        Body::Bytes(self)
    }
}

impl HtmlSource for Vec<u8> {
    fn body(&self) -> Body<'_> {
        Body::Bytes(self)
    }
}

impl<T: HtmlSource + ?Sized> HtmlSource for &T {
    fn body(&self) -> Body<'_> {
        (**self).body()
    }
}
