//! STOMP frames
//!
//! A frame is a command line, `key:value` header lines, a blank line, the
//! body and a terminating NUL byte:
//!
//! ```text
//! COMMAND\n(key:value\n)*\nBODY\0
//! ```

use std::fmt;

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::listener::ListenerError;

/// Frame terminator
pub const FRAME_END: u8 = 0;

/// Commands sent by the client
pub mod client_commands {
    pub const CONNECT: &str = "CONNECT";
    pub const DISCONNECT: &str = "DISCONNECT";
    pub const SUBSCRIBE: &str = "SUBSCRIBE";
    pub const UNSUBSCRIBE: &str = "UNSUBSCRIBE";
    pub const SEND: &str = "SEND";
}

/// Commands sent by the server
pub mod server_commands {
    pub const CONNECTED: &str = "CONNECTED";
    pub const MESSAGE: &str = "MESSAGE";
    pub const ERROR: &str = "ERROR";
}

const CONTENT_LENGTH: &str = "content-length";
const ID: &str = "id";
const DESTINATION: &str = "destination";

/// A STOMP frame with headers kept in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StompFrame {
    command: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl StompFrame {
    /// A frame with an empty body
    pub fn new(command: &str) -> Self {
        Self::with_body(command, "")
    }

    /// A frame with a body; `content-length` is set from it
    pub fn with_body(command: &str, body: &str) -> Self {
        let mut frame = Self {
            command: command.to_string(),
            headers: Vec::new(),
            body: body.to_string(),
        };
        frame.set_header(CONTENT_LENGTH, &body.len().to_string());
        frame
    }

    /// CONNECT frame opening a session
    pub fn connect() -> Self {
        let mut frame = Self::new(client_commands::CONNECT);
        frame.set_header("accept-version", "1.1,1.0");
        frame
    }

    /// SUBSCRIBE frame for subscription number `id`
    pub fn subscribe(id: u32, destination: &str) -> Self {
        let mut frame = Self::new(client_commands::SUBSCRIBE);
        frame.set_subscription_id(id);
        frame.set_header(DESTINATION, destination);
        frame
    }

    pub fn unsubscribe(id: &str) -> Self {
        let mut frame = Self::new(client_commands::UNSUBSCRIBE);
        frame.set_header(ID, id);
        frame
    }

    /// SEND frame posting `body` to `destination`
    pub fn send(destination: &str, body: &str) -> Self {
        let mut frame = Self::with_body(client_commands::SEND, body);
        frame.set_header(DESTINATION, destination);
        frame
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set a header, replacing an existing value in place
    pub fn set_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Set the `id` header to `sub-<id>`
    pub fn set_subscription_id(&mut self, id: u32) {
        self.set_header(ID, &subscription_id(id));
    }

    pub fn subscription_id(&self) -> Option<&str> {
        self.header(ID)
    }

    pub fn destination(&self) -> Option<&str> {
        self.header(DESTINATION)
    }

    /// Serialize including the terminating NUL
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.command.len() + self.body.len() + 64);
        out.push_str(&self.command);
        out.push('\n');
        for (key, value) in &self.headers {
            out.push_str(key);
            out.push(':');
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push(FRAME_END as char);
        out
    }

    /// Parse one frame, with or without its terminator
    ///
    /// Header keys and values are trimmed; lines without a colon are skipped.
    /// Trailing line breaks and NULs are stripped from the body.
    pub fn decode(text: &str) -> Result<Self, ListenerError> {
        let text = text.trim_start_matches(['\r', '\n']);
        let (head, body) = match text.split_once("\n\n") {
            Some((head, body)) => (head, body),
            None => match text.split_once("\r\n\r\n") {
                Some((head, body)) => (head, body),
                None => (text, ""),
            },
        };

        let mut lines = head.lines();
        let command = lines
            .next()
            .map(str::trim)
            .filter(|command| !command.is_empty())
            .ok_or_else(|| ListenerError::MalformedFrame("missing command".to_string()))?;

        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect();

        Ok(Self {
            command: command.to_string(),
            headers,
            body: body.trim_end_matches(['\r', '\n', '\0']).to_string(),
        })
    }
}

impl fmt::Display for StompFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<String> = self
            .headers
            .iter()
            .map(|(key, value)| format!("{}:{}", key, value))
            .collect();
        write!(f, "{} [{}] {}", self.command, headers.join(";"), self.body)
    }
}

/// Subscription identifier for counter value `id`
pub fn subscription_id(id: u32) -> String {
    format!("sub-{}", id)
}

/// Codec splitting a byte stream into NUL-terminated frames
#[derive(Debug, Default, Clone, Copy)]
pub struct StompCodec;

impl Encoder<StompFrame> for StompCodec {
    type Error = ListenerError;

    fn encode(&mut self, item: StompFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let data = item.encode();
        dst.reserve(data.len());
        dst.put_slice(data.as_bytes());
        Ok(())
    }
}

impl Decoder for StompCodec {
    type Item = StompFrame;
    type Error = ListenerError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Heart-beats are bare line breaks between frames
        let leading = src
            .iter()
            .take_while(|b| **b == b'\n' || **b == b'\r')
            .count();
        src.advance(leading);

        let Some(end) = src.iter().position(|b| *b == FRAME_END) else {
            return Ok(None);
        };

        let data = src.split_to(end + 1);
        let text = std::str::from_utf8(&data[..end])
            .map_err(|e| ListenerError::MalformedFrame(e.to_string()))?;
        StompFrame::decode(text).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_subscribe() {
        let frame = StompFrame::subscribe(3, "/blocks/new");
        assert_eq!(
            frame.encode(),
            "SUBSCRIBE\ncontent-length:0\nid:sub-3\ndestination:/blocks/new\n\n\0"
        );
    }

    #[test]
    fn test_send_sets_content_length() {
        let frame = StompFrame::send("/w/api/account/get", "{\"account\":\"X\"}");
        assert_eq!(frame.header("content-length"), Some("15"));
        assert_eq!(frame.destination(), Some("/w/api/account/get"));
        assert!(frame.encode().ends_with("{\"account\":\"X\"}\0"));
    }

    #[test]
    fn test_decode_message() {
        let text = "MESSAGE\ndestination: /blocks/new\nsubscription:sub-1\nmessage-id:7\n\n{\"height\":1516704}\n\0";
        let frame = StompFrame::decode(text).unwrap();
        assert_eq!(frame.command(), server_commands::MESSAGE);
        assert_eq!(frame.destination(), Some("/blocks/new"));
        assert_eq!(frame.header("message-id"), Some("7"));
        assert_eq!(frame.body(), "{\"height\":1516704}");
    }

    #[test]
    fn test_decode_header_value_with_colon() {
        let frame = StompFrame::decode("ERROR\nmessage:bad: thing\n\n\0").unwrap();
        assert_eq!(frame.header("message"), Some("bad: thing"));
        assert_eq!(frame.body(), "");
    }

    #[test]
    fn test_decode_without_headers_or_body() {
        let frame = StompFrame::decode("CONNECTED\n\n\0").unwrap();
        assert_eq!(frame.command(), server_commands::CONNECTED);
        assert!(frame.headers().is_empty());

        assert!(StompFrame::decode("\n\n").is_err());
    }

    #[test]
    fn test_codec_splits_frames() {
        let mut codec = StompCodec;
        let mut buf = BytesMut::new();
        codec.encode(StompFrame::connect(), &mut buf).unwrap();
        codec
            .encode(StompFrame::send("/w/api/account/get", "{}"), &mut buf)
            .unwrap();
        buf.put_slice(b"\nMESS");

        let first = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first.command(), client_commands::CONNECT);
        assert_eq!(first.header("accept-version"), Some("1.1,1.0"));

        let second = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(second.body(), "{}");

        // partial frame waits for more data
        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.put_slice(b"AGE\ndestination:/errors\n\noops\0");
        let third = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(third.command(), server_commands::MESSAGE);
        assert_eq!(third.body(), "oops");
        assert!(buf.is_empty());
    }
}
