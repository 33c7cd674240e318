use serde::Deserialize;

use crate::domain::subscriber_detail::SubscriberDetail;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_name::SubscriberName;

/// A validated record ready to be inserted into the mailing list.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub first_name: SubscriberName,
    pub last_name: SubscriberName,
    pub organization: Option<SubscriberDetail>,
    pub title: Option<SubscriberDetail>,
}

/// The raw values of the signup form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubscriptionFields {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub title: String,
}

impl SubscriptionFields {
    pub fn is_empty(&self) -> bool {
        self == &SubscriptionFields::default()
    }
}

impl TryFrom<&SubscriptionFields> for NewSubscriber {
    type Error = String;

    fn try_from(fields: &SubscriptionFields) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(fields.email.clone())?;
        let first_name = SubscriberName::parse(fields.first_name.clone())
            .map_err(|err| format!("first {}", err))?;
        let last_name = SubscriberName::parse(fields.last_name.clone())
            .map_err(|err| format!("last {}", err))?;
        let organization = SubscriberDetail::parse(fields.organization.clone())
            .map_err(|err| format!("organization {}", err))?;
        let title = SubscriberDetail::parse(fields.title.clone())
            .map_err(|err| format!("title {}", err))?;

        Ok(NewSubscriber {
            email,
            first_name,
            last_name,
            organization,
            title,
        })
    }
}
