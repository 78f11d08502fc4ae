use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tokio::sync::broadcast;
use ts_rs::TS;
use uuid::Uuid;

/// Tables that emit change notifications.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Table {
    Projects,
    Testimonials,
    ClientLogos,
    SoftwareLogos,
    SiteSettings,
    Profiles,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RowOp {
    Insert,
    Update,
    Delete,
}

/// One notification per successful write. Consumers do not patch local state
/// from it; any event for a table they watch triggers a full refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct RecordEvent {
    pub table: Table,
    pub op: RowOp,
    pub row_id: Uuid,
}

/// In-process change-notification channel standing in for the hosted realtime
/// transport. Sends are fire-and-forget; with no subscribers they are dropped.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<RecordEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, table: Table, op: RowOp, row_id: Uuid) {
        let event = RecordEvent { table, op, row_id };
        tracing::debug!(table = %table, op = %op, row_id = %row_id, "record event");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecordEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        let id = Uuid::new_v4();

        bus.publish(Table::Projects, RowOp::Insert, id);

        let event = rx.recv().await.unwrap();
        assert_eq!(event, RecordEvent { table: Table::Projects, op: RowOp::Insert, row_id: id });
    }

    #[test]
    fn publish_without_subscribers_is_a_noop() {
        let bus = EventBus::default();
        bus.publish(Table::Testimonials, RowOp::Delete, Uuid::new_v4());
    }

    #[test]
    fn table_parses_from_route_segment() {
        use std::str::FromStr;
        assert_eq!(Table::from_str("client_logos").unwrap(), Table::ClientLogos);
        assert!(Table::from_str("nope").is_err());
    }
}
