/// A parsed field tag such as `"created by,omitempty"`.
///
/// The part before the first comma is the dictionary key. Modifiers follow;
/// only `omitempty` is understood, anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub key: &'a str,
    /// A missing key leaves the field at its default instead of failing.
    pub omit_empty: bool,
}

impl<'a> Tag<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let mut parts = raw.split(',');
        let key = parts.next().unwrap_or_default();
        let omit_empty = parts.any(|modifier| modifier.trim() == "omitempty");
        Self { key, omit_empty }
    }
}
