// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this file,
// You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2019, Olof Kraigher olof.kraigher@gmail.com

use std::path::Path;
use strum::IntoStaticStr;

#[derive(Debug, PartialEq, Eq, Clone, Copy, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum MessageType {
    Error,
    Warning,
    Info,
    Log,
}

/// A message about the environment of a design, such as a configuration file
/// that could not be read. Problems in the design itself are diagnostics.
#[must_use]
#[derive(Debug, PartialEq, Eq)]
pub struct Message {
    pub message_type: MessageType,
    pub message: String,
}

impl Message {
    fn new(message_type: MessageType, message: impl Into<String>) -> Message {
        Message {
            message_type,
            message: message.into(),
        }
    }

    pub fn log(message: impl Into<String>) -> Message {
        Self::new(MessageType::Log, message)
    }

    pub fn info(message: impl Into<String>) -> Message {
        Self::new(MessageType::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Message {
        Self::new(MessageType::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Message {
        Self::new(MessageType::Error, message)
    }

    pub fn file_error(message: impl Into<String>, file_name: &Path) -> Message {
        Self::error(format!(
            "{} (In file {})",
            message.into(),
            file_name.to_string_lossy()
        ))
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message_type: &str = self.message_type.into();
        write!(f, "{}: {}", message_type, self.message)
    }
}

pub trait MessageHandler {
    fn push(&mut self, message: Message);
}

impl MessageHandler for Vec<Message> {
    fn push(&mut self, message: Message) {
        self.push(message)
    }
}

/// Forwards messages to the `log` facade
#[derive(Default)]
pub struct MessageLogger;

impl MessageHandler for MessageLogger {
    fn push(&mut self, message: Message) {
        match message.message_type {
            MessageType::Error => log::error!("{}", message.message),
            MessageType::Warning => log::warn!("{}", message.message),
            MessageType::Info => log::info!("{}", message.message),
            MessageType::Log => log::debug!("{}", message.message),
        }
    }
}

#[derive(Default)]
pub struct NullMessages;

impl MessageHandler for NullMessages {
    fn push(&mut self, _message: Message) {
        // Ignore
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_message() {
        assert_eq!(
            Message::warning("Re-defined library foo").to_string(),
            "warning: Re-defined library foo"
        );
        assert_eq!(
            Message::file_error("Could not read", Path::new("cfg.toml")).to_string(),
            "error: Could not read (In file cfg.toml)"
        );
    }
}
