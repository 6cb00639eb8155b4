//! Dispatch of routed utterances.
//!
//! The capability registry decides which domain owns an utterance; this
//! module turns that decision into a response. Custom command requests and
//! unmatched utterances go to the [`CommandResolver`], everything else to the
//! registered [`DomainHandler`].

use std::collections::HashMap;
use std::sync::Arc;

use aura_core::capability::{CapabilityKey, CapabilityRegistry, DomainHandler};
use aura_core::command::{CommandRequest, CommandResolver, Prompter, Resolution};
use aura_core::error::Result;
use tracing::{debug, warn};

/// Outcome of dispatching one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// The capability the utterance was routed to (`None` = unmatched)
    pub capability: Option<CapabilityKey>,
    /// Text to speak back
    pub response: String,
    /// Present when the command resolver handled the utterance
    pub resolution: Option<Resolution>,
}

pub struct Router {
    registry: CapabilityRegistry,
    handlers: HashMap<CapabilityKey, Arc<dyn DomainHandler>>,
    resolver: CommandResolver,
}

impl Router {
    pub fn new(registry: CapabilityRegistry, resolver: CommandResolver) -> Self {
        Self {
            registry,
            handlers: HashMap::new(),
            resolver,
        }
    }

    /// Registers the handler for its capability, replacing any earlier one.
    ///
    /// The custom capability always goes to the command resolver, so a
    /// handler claiming it is ignored.
    pub fn with_handler(mut self, handler: Arc<dyn DomainHandler>) -> Self {
        let key = handler.capability();
        if key.is_custom() {
            warn!("Ignoring domain handler registered for the custom capability");
            return self;
        }
        self.handlers.insert(key, handler);
        self
    }

    pub fn route(&self, utterance: &str) -> Option<CapabilityKey> {
        self.registry.route(utterance)
    }

    /// Routes and handles one utterance.
    ///
    /// Handler failures become a spoken error. Only a capture failure while
    /// the resolver is asking questions is returned as `Err`.
    pub async fn dispatch(&self, utterance: &str, prompter: &dyn Prompter) -> Result<Dispatch> {
        let capability = self.route(utterance);
        debug!(capability = ?capability, utterance, "routed utterance");

        match capability {
            Some(CapabilityKey::Custom) => {
                self.resolve(capability, CommandRequest::explicit(utterance), prompter)
                    .await
            }
            None => {
                self.resolve(capability, CommandRequest::implicit(utterance), prompter)
                    .await
            }
            Some(key) => Ok(Dispatch {
                capability,
                response: self.handle(key, utterance).await,
                resolution: None,
            }),
        }
    }

    async fn resolve(
        &self,
        capability: Option<CapabilityKey>,
        request: CommandRequest,
        prompter: &dyn Prompter,
    ) -> Result<Dispatch> {
        let resolution = self.resolver.resolve(&request, prompter).await?;
        Ok(Dispatch {
            capability,
            response: resolution.response(),
            resolution: Some(resolution),
        })
    }

    async fn handle(&self, key: CapabilityKey, utterance: &str) -> String {
        let Some(handler) = self.handlers.get(&key) else {
            debug!(capability = %key, "no handler registered");
            return format!("The {key} module is not available yet.");
        };

        match handler.handle(utterance).await {
            Ok(response) => response,
            Err(e) => {
                warn!(capability = %key, error = %e, "domain handler failed");
                format!("Sorry, the {key} module ran into a problem.")
            }
        }
    }
}
