use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::subscriber::Subscriber;

pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Column layouts the mailing list can be exported with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    /// Download offered by the admin panel.
    AdminPanel,
    /// File produced by the `export_subscribers` tool for report distribution.
    Distribution,
}

impl CsvLayout {
    pub fn header(&self) -> [&'static str; 6] {
        match self {
            CsvLayout::AdminPanel => [
                "Email",
                "First Name",
                "Last Name",
                "Organization",
                "Title",
                "Subscribed Date",
            ],
            CsvLayout::Distribution => [
                "First Name",
                "Last Name",
                "Email Address",
                "Organization",
                "Title",
                "Subscription Date",
            ],
        }
    }

    fn row<'a>(&self, subscriber: &'a Subscriber) -> [std::borrow::Cow<'a, str>; 6] {
        let organization = subscriber.organization.as_deref().unwrap_or_default();
        let title = subscriber.title.as_deref().unwrap_or_default();

        match self {
            CsvLayout::AdminPanel => [
                subscriber.email.as_str().into(),
                subscriber.first_name.as_str().into(),
                subscriber.last_name.as_str().into(),
                organization.into(),
                title.into(),
                subscriber.created_at.format("%-m/%-d/%Y").to_string().into(),
            ],
            CsvLayout::Distribution => [
                subscriber.first_name.as_str().into(),
                subscriber.last_name.as_str().into(),
                subscriber.email.as_str().into(),
                organization.into(),
                title.into(),
                subscriber.created_at.format("%Y-%m-%d").to_string().into(),
            ],
        }
    }
}

/// A rendered CSV file ready to be handed out as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

impl CsvExport {
    pub fn content_type(&self) -> &'static str {
        CSV_CONTENT_TYPE
    }
}

/// Renders the header line followed by one line per subscriber, in the given
/// order. Every field is quoted and lines are separated by `\n`.
pub fn render_csv(layout: CsvLayout, subscribers: &[Subscriber]) -> String {
    let header = layout.header().map(std::borrow::Cow::Borrowed);
    let rows = subscribers.iter().map(|subscriber| layout.row(subscriber));

    std::iter::once(header)
        .chain(rows)
        .map(|fields| {
            fields
                .iter()
                .map(|field| quote(field))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn admin_panel_filename(exported_on: NaiveDate) -> String {
    format!("csrr_mailing_list_{}.csv", exported_on.format("%Y-%m-%d"))
}

pub fn distribution_filename(exported_at: DateTime<Utc>) -> String {
    format!(
        "CSRR_Mailing_List_Subscribers_{}.csv",
        exported_at.format("%Y%m%d_%H%M")
    )
}

// RFC 4180: embedded quotes are doubled.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
