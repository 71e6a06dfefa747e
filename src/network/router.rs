//! Handler table and frame dispatch
//!
//! The router holds at most one handler per [`Channel`]. Incoming MESSAGE
//! frames are matched to a channel by destination prefix and delivered to
//! that handler; ERROR frames go to the error handler.

use std::collections::HashMap;

use serde::Deserialize;

use super::channel::Channel;
use super::listener::ListenerError;
use super::message::{server_commands, StompFrame};
use crate::account::Address;

pub type ErrorHandler = Box<dyn Fn(&str) + Send + Sync>;
pub type BlockHandler = Box<dyn Fn(u64) + Send + Sync>;
pub type AccountHandler = Box<dyn Fn(&Address, &str) + Send + Sync>;

/// A callback for one channel
pub enum Handler {
    /// Receives error text
    Error(ErrorHandler),
    /// Receives the height of each new block
    Block(BlockHandler),
    /// Receives the account a message is about and the raw JSON body
    Account(AccountHandler),
}

impl Handler {
    pub fn error<F>(handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Handler::Error(Box::new(handler))
    }

    pub fn block<F>(handler: F) -> Self
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        Handler::Block(Box::new(handler))
    }

    pub fn account<F>(handler: F) -> Self
    where
        F: Fn(&Address, &str) + Send + Sync + 'static,
    {
        Handler::Account(Box::new(handler))
    }

    fn accepts(&self, channel: Channel) -> bool {
        match self {
            Handler::Error(_) => channel == Channel::Errors,
            Handler::Block(_) => channel == Channel::Blocks,
            Handler::Account(_) => channel.is_per_account(),
        }
    }
}

/// A handler installed for a subscription
pub struct Registration {
    subscription_id: String,
    handler: Handler,
}

impl Registration {
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }
}

#[derive(Deserialize)]
struct NewBlock {
    height: u64,
}

/// Channel to handler table
#[derive(Default)]
pub struct Router {
    routes: HashMap<Channel, Registration>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the handler for a channel
    ///
    /// Returns the registration it displaced, if any.
    pub fn register(
        &mut self,
        channel: Channel,
        subscription_id: impl Into<String>,
        handler: Handler,
    ) -> Result<Option<Registration>, ListenerError> {
        if !handler.accepts(channel) {
            return Err(ListenerError::HandlerMismatch(channel));
        }
        let registration = Registration {
            subscription_id: subscription_id.into(),
            handler,
        };
        Ok(self.routes.insert(channel, registration))
    }

    /// Put back what a [`Router::register`] call displaced
    pub fn restore(&mut self, channel: Channel, previous: Option<Registration>) {
        match previous {
            Some(registration) => {
                self.routes.insert(channel, registration);
            }
            None => {
                self.routes.remove(&channel);
            }
        }
    }

    /// Remove the handler for a channel if it still belongs to `subscription_id`
    pub fn unregister(&mut self, channel: Channel, subscription_id: &str) -> bool {
        match self.routes.get(&channel) {
            Some(registration) if registration.subscription_id == subscription_id => {
                self.routes.remove(&channel);
                true
            }
            _ => false,
        }
    }

    pub fn is_registered(&self, channel: Channel) -> bool {
        self.routes.contains_key(&channel)
    }

    /// Subscription id currently owning a channel
    pub fn subscription_id(&self, channel: Channel) -> Option<&str> {
        self.routes
            .get(&channel)
            .map(|registration| registration.subscription_id.as_str())
    }

    /// Pass error text to the error handler, if any
    pub fn report_error(&self, message: &str) -> bool {
        match self.routes.get(&Channel::Errors) {
            Some(Registration {
                handler: Handler::Error(handler),
                ..
            }) => {
                handler(message);
                true
            }
            _ => {
                log::warn!("Listener error with no error handler: {}", message);
                false
            }
        }
    }

    /// Deliver a frame to its handler
    ///
    /// Returns the channel whose handler ran, or `None` if the frame was
    /// dropped.
    pub fn dispatch(&self, frame: &StompFrame) -> Result<Option<Channel>, ListenerError> {
        match frame.command() {
            server_commands::ERROR => {
                let message = match frame.body() {
                    "" => frame.header("message").unwrap_or_default(),
                    body => body,
                };
                Ok(self.report_error(message).then_some(Channel::Errors))
            }
            server_commands::MESSAGE => self.dispatch_message(frame),
            other => {
                log::debug!("Dropping {} frame", other);
                Ok(None)
            }
        }
    }

    fn dispatch_message(&self, frame: &StompFrame) -> Result<Option<Channel>, ListenerError> {
        let destination = frame
            .destination()
            .ok_or_else(|| ListenerError::MalformedFrame("MESSAGE without destination".into()))?;

        let Some(channel) = Channel::route(destination) else {
            log::debug!("No channel for destination {}", destination);
            return Ok(None);
        };
        let Some(registration) = self.routes.get(&channel) else {
            log::debug!("No handler for {}", destination);
            return Ok(None);
        };

        match &registration.handler {
            Handler::Error(handler) => handler(frame.body()),
            Handler::Block(handler) => {
                let block: NewBlock = serde_json::from_str(frame.body())?;
                handler(block.height);
            }
            Handler::Account(handler) => {
                let address = Address::from_text(&destination[channel.path().len()..])?;
                handler(&address, frame.body());
            }
        }
        Ok(Some(channel))
    }
}
