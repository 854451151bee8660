//! Dashboard statistics

use serde::Serialize;

use crate::Result;
use crate::models::{ClientStatus, DeliveryStatus};
use crate::store::PracticeStore;

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardStats {
    pub total_clients: usize,
    pub active_clients: usize,
    /// Outgoing records with status Sent
    pub emails_sent: usize,
    /// Clients still in Pending status
    pub pending_tasks: usize,
}

impl DashboardStats {
    pub fn from_store(store: &PracticeStore) -> Self {
        let clients = store.clients();
        let with_status = |status: ClientStatus| clients.iter().filter(|c| c.status == status).count();

        Self {
            total_clients: clients.len(),
            active_clients: with_status(ClientStatus::Active),
            emails_sent: store
                .scheduled_emails()
                .iter()
                .filter(|e| e.status == DeliveryStatus::Sent)
                .count(),
            pending_tasks: with_status(ClientStatus::Pending),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&PracticeStore> for DashboardStats {
    fn from(store: &PracticeStore) -> Self {
        Self::from_store(store)
    }
}
