use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Domain events emitted by the services. Consumed by an in-process logging
/// task; the channel seam is where an outbound integration would attach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    PurchaseOrderCreated {
        po_header_id: i64,
        po_number: String,
    },
    PurchaseOrderLinesCancelled {
        po_header_id: i64,
        po_number: String,
        status: String,
    },
    ShipmentCreated {
        shipment_id: i64,
        shipment_no: String,
    },
    InvoiceCreated {
        invoice_id: i64,
        invoice_no: String,
    },
    InvoiceRevised {
        root_invoice_id: i64,
        invoice_id: i64,
        revision_no: i32,
    },
    InvoiceConfirmed {
        invoice_id: i64,
        confirmed_by: String,
    },
    PackingLineSplit {
        packing_list_id: i64,
        source_line_id: i64,
        new_line_id: i64,
    },
    ImageAttached {
        style_id: i64,
        url: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event; a full or closed channel is logged and swallowed so
    /// event delivery never fails a business operation.
    pub async fn send(&self, event: Event) {
        if let Err(e) = self.sender.send(event).await {
            warn!("Failed to send event: {}", e);
        }
    }
}

/// Consumes events off the channel and logs them.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "domain event");
    }
    info!("Event channel closed; processor exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_event() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender
            .send(Event::InvoiceConfirmed {
                invoice_id: 7,
                confirmed_by: "ops".into(),
            })
            .await;

        match rx.recv().await {
            Some(Event::InvoiceConfirmed { invoice_id, .. }) => assert_eq!(invoice_id, 7),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_on_closed_channel_is_swallowed() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        // Must not panic or error out
        sender
            .send(Event::ShipmentCreated {
                shipment_id: 1,
                shipment_no: "SH-1".into(),
            })
            .await;
    }
}
