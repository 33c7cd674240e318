use chrono::NaiveDate;

use crate::domain::subscriber::Subscriber;
use crate::export::{admin_panel_filename, render_csv, CsvExport, CsvLayout};
use crate::store::{StoreError, SubscriberOrder, SubscriberStore};

/// The subscriber list shown to administrators on demand.
///
/// The list is a snapshot of the store taken by the last successful
/// `load_all` and is never cached across openings of the panel.
#[derive(Debug, Default)]
pub struct AdminPanel {
    visible: bool,
    subscribers: Vec<Subscriber>,
    load_error: Option<String>,
}

impl AdminPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn subscribers(&self) -> &[Subscriber] {
        &self.subscribers
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Shows or hides the list. Showing it always fetches a fresh copy.
    pub async fn toggle_list<S>(&mut self, store: &S) -> Result<(), StoreError>
    where
        S: SubscriberStore,
    {
        self.visible = !self.visible;

        if self.visible {
            self.load_all(store).await
        } else {
            Ok(())
        }
    }

    /// Replaces the list with every subscriber, newest first. A failed load
    /// keeps the previous list and records the error for display.
    #[tracing::instrument(name = "Loading the subscriber list", skip(self, store))]
    pub async fn load_all<S>(&mut self, store: &S) -> Result<(), StoreError>
    where
        S: SubscriberStore,
    {
        match store.select_all(SubscriberOrder::NewestFirst).await {
            Ok(subscribers) => {
                tracing::info!("Loaded {} subscribers", subscribers.len());
                self.subscribers = subscribers;
                self.load_error = None;
                Ok(())
            }
            Err(err) => {
                tracing::error!("Error fetching subscribers: {:?}", err);
                self.load_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn export_csv(&self, exported_on: NaiveDate) -> CsvExport {
        CsvExport {
            filename: admin_panel_filename(exported_on),
            body: render_csv(CsvLayout::AdminPanel, &self.subscribers),
        }
    }
}
