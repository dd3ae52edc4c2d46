use tokio::sync::watch;

/// Owner side of a cancellation pair. Dropping it never cancels.
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

/// Observer side of a cancellation pair, handed to request-scoped operations.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    receiver: Option<watch::Receiver<bool>>,
}

pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (sender, receiver) = watch::channel(false);
    (
        CancelHandle { sender },
        CancelSignal {
            receiver: Some(receiver),
        },
    )
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl CancelSignal {
    /// A signal that is never raised.
    pub fn never() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.receiver.as_ref().is_some_and(|r| *r.borrow())
    }

    /// Completes once cancellation is requested; pends forever otherwise.
    pub async fn cancelled(&self) {
        let Some(receiver) = &self.receiver else {
            return std::future::pending().await;
        };
        let mut receiver = receiver.clone();
        let result = receiver.wait_for(|&cancelled| cancelled).await.map(|_| ());
        if result.is_err() {
            // handle dropped without cancelling
            std::future::pending::<()>().await;
        }
    }
}
