use unicode_segmentation::UnicodeSegmentation;

const MAX_CHAR_LENGHT: usize = 256;
const FORBIDDEN_CHARS: [char; 9] = ['/', '{', '}', '"', '>', '<', '\\', '(', ')'];

/// A first or last name as typed into the signup form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SubscriberName(String);

impl SubscriberName {
    pub fn parse(name: String) -> Result<SubscriberName, String> {
        if name.trim().is_empty() {
            return Err(String::from("name cannot be empty"));
        }

        if name.graphemes(true).count() > MAX_CHAR_LENGHT {
            return Err(format!(
                "name cannot be longer than {} characters",
                MAX_CHAR_LENGHT
            ));
        }

        if name.chars().any(|char| FORBIDDEN_CHARS.contains(&char)) {
            return Err(format!("{} contains forbidden characters", name));
        }

        if name.chars().any(char::is_control) {
            return Err(String::from("name cannot contain line breaks or control characters"));
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for SubscriberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
