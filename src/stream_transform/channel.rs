//! Outward FIFO channel between the encoder and the wire writer.

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::{ReceiverStream, UnboundedReceiverStream};

use crate::error::RelayError;
use crate::types::OutboundFrame;

/// Producer half of the outward channel.
#[derive(Debug, Clone)]
pub enum OutboundSender {
    Bounded(mpsc::Sender<OutboundFrame>),
    Unbounded(mpsc::UnboundedSender<OutboundFrame>),
}

/// Consumer half of the outward channel.
#[derive(Debug)]
pub enum OutboundReceiver {
    Bounded(mpsc::Receiver<OutboundFrame>),
    Unbounded(mpsc::UnboundedReceiver<OutboundFrame>),
}

/// Create an outward channel. `Some(n)` with `n > 0` is bounded, anything
/// else is unbounded.
pub fn outbound_channel(capacity: Option<usize>) -> (OutboundSender, OutboundReceiver) {
    match capacity.filter(|n| *n > 0) {
        Some(capacity) => {
            let (tx, rx) = mpsc::channel(capacity);
            (OutboundSender::Bounded(tx), OutboundReceiver::Bounded(rx))
        }
        None => {
            let (tx, rx) = mpsc::unbounded_channel();
            (OutboundSender::Unbounded(tx), OutboundReceiver::Unbounded(rx))
        }
    }
}

impl OutboundSender {
    /// Push a frame, waiting for capacity on a bounded channel.
    pub async fn push(&self, frame: OutboundFrame) -> Result<(), RelayError> {
        match self {
            Self::Bounded(tx) => tx.send(frame).await.map_err(|_| RelayError::ChannelClosed),
            Self::Unbounded(tx) => tx.send(frame).map_err(|_| RelayError::ChannelClosed),
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            Self::Bounded(tx) => tx.is_closed(),
            Self::Unbounded(tx) => tx.is_closed(),
        }
    }
}

impl OutboundReceiver {
    pub async fn recv(&mut self) -> Option<OutboundFrame> {
        match self {
            Self::Bounded(rx) => rx.recv().await,
            Self::Unbounded(rx) => rx.recv().await,
        }
    }

    pub fn into_stream(self) -> BoxStream<'static, OutboundFrame> {
        match self {
            Self::Bounded(rx) => ReceiverStream::new(rx).boxed(),
            Self::Unbounded(rx) => UnboundedReceiverStream::new(rx).boxed(),
        }
    }
}
