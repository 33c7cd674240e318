use unicode_segmentation::UnicodeSegmentation;

const MAX_DETAIL_LENGTH: usize = 256;

/// Optional free text a subscriber can add about themselves, such as the
/// organization they work for or their job title.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SubscriberDetail(String);

impl SubscriberDetail {
    /// A blank value means the field was left empty, so it parses to `None`
    /// rather than to an empty detail.
    pub fn parse(detail: String) -> Result<Option<SubscriberDetail>, String> {
        if detail.trim().is_empty() {
            return Ok(None);
        }

        if detail.graphemes(true).count() > MAX_DETAIL_LENGTH {
            return Err(format!(
                "cannot be longer than {} characters",
                MAX_DETAIL_LENGTH
            ));
        }

        if detail.chars().any(char::is_control) {
            return Err(String::from("cannot contain line breaks or control characters"));
        }

        Ok(Some(Self(detail)))
    }
}

impl AsRef<str> for SubscriberDetail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
