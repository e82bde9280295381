use super::types::*;
use crate::utils::error_handling::{CraftError, CraftResult};
use log::{debug, error};
use std::io::{BufRead, Write};

/// Line-delimited JSON protocol spoken with the front end
pub struct JsonProtocol<W: Write> {
    writer: W,
}

impl<W: Write> JsonProtocol<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Serialize a message to JSON string
    pub fn serialize_message(&self, message: &Message) -> CraftResult<String> {
        let json = serde_json::to_string(message)?;
        debug!("Serialized message: {}", json);
        Ok(json)
    }

    /// Deserialize a JSON string to a message
    pub fn deserialize_message(&self, json: &str) -> CraftResult<Message> {
        serde_json::from_str::<Message>(json)
            .map_err(|e| CraftError::protocol(&format!("Could not parse message: {}", e)))
    }

    /// Write one message as a line and flush
    pub fn send_message(&mut self, message: Message) -> CraftResult<()> {
        let json = self.serialize_message(&message)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;

        debug!("Sent message: {}", message.id);
        Ok(())
    }

    /// Feed every non-empty line of `reader` to `handler` until input ends or
    /// `handler` asks to stop. Bad lines (including ones that are not UTF-8)
    /// and handler errors are answered with an error notification and the
    /// loop continues.
    pub fn read_messages<R, F>(&mut self, mut reader: R, mut handler: F) -> CraftResult<()>
    where
        R: BufRead,
        F: FnMut(Message) -> CraftResult<(Option<Message>, bool)>,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let json_line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim_end_matches(['\n', '\r']).to_string(),
                Err(e) => {
                    error!("Dropping line that is not valid UTF-8: {}", e);
                    self.send_error(
                        "Invalid message format: line is not valid UTF-8".to_string(),
                        Some(String::from_utf8_lossy(&buf).trim_end().to_string()),
                    )?;
                    continue;
                }
            };
            if json_line.trim().is_empty() {
                continue;
            }

            let message = match self.deserialize_message(&json_line) {
                Ok(message) => message,
                Err(e) => {
                    error!("Failed to deserialize message: {}", e);
                    self.send_error(format!("Invalid message format: {}", e), Some(json_line))?;
                    continue;
                }
            };

            debug!("Received message: {}", message.id);
            match handler(message) {
                Ok((response, keep_going)) => {
                    if let Some(response) = response {
                        self.send_message(response)?;
                    }
                    if !keep_going {
                        break;
                    }
                }
                Err(e) => {
                    error!("Handler error: {}", e);
                    self.send_error(format!("Handler error: {}", e), None)?;
                }
            }
        }

        Ok(())
    }

    fn send_error(&mut self, message: String, details: Option<String>) -> CraftResult<()> {
        self.send_message(Message::new_notification(MessagePayload::Error { message, details }))
    }
}
