//! Outward stream shaping: fixed-width slicing, chunk encoding, SSE framing.

pub mod channel;
pub mod encoder;

pub use channel::{outbound_channel, OutboundReceiver, OutboundSender};
pub use encoder::DeltaEncoder;

use futures::stream::BoxStream;
use futures::StreamExt;

use crate::error::RelayError;

/// Characters per outward content fragment.
pub const DEFAULT_CHUNK_WIDTH: usize = 200;

/// Split `text` into consecutive pieces of at most `width` characters.
///
/// Splits only on char boundaries. A `width` of zero is treated as one.
pub fn slice_text(text: &str, width: usize) -> Vec<&str> {
    let width = width.max(1);
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == width {
            pieces.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Render the receiver as `data: ...\n\n` frames.
///
/// The stream ends after the terminal frame or when every sender is gone.
pub fn sse_frames(receiver: OutboundReceiver) -> BoxStream<'static, Result<String, RelayError>> {
    let frames = async_stream::stream! {
        let mut inner = receiver.into_stream();
        while let Some(frame) = inner.next().await {
            let done = frame.is_done();
            yield frame.to_sse().map_err(RelayError::from);
            if done {
                break;
            }
        }
    };
    Box::pin(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_text_handles_multibyte_and_short_input() {
        assert_eq!(slice_text("äöüß", 3), vec!["äöü", "ß"]);
        assert_eq!(slice_text("ab", 200), vec!["ab"]);
        assert!(slice_text("", 200).is_empty());
        assert_eq!(slice_text("abc", 0), vec!["a", "b", "c"]);
    }
}
