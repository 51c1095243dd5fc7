#![forbid(unsafe_code)]

//! Synchronization with the server-held configuration.
//!
//! # Delivery semantics
//!
//! [`RemoteSync::pull`] reads the payload already embedded in the page; there
//! is no extra round trip. [`RemoteSync::push`] hands a [`PushRequest`] to a
//! [`PushTransport`] and returns immediately. Delivery is at-most-once and
//! unordered: two pushes in quick succession may land out of order. Each push
//! carries the complete local state, so the collaborator converges as soon as
//! it applies the latest one.

use tracing::{debug, trace, warn};

use crate::config::RemoteConfig;
use crate::document::PagePayload;
use crate::ids::{HiddenSet, ItemId, ItemOrder};

/// Preference pair delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteState {
    pub ordering: ItemOrder,
    pub hidden: HiddenSet,
}

/// Form-encoded write to the configuration endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    pub endpoint: String,
    /// `(name, value)` pairs in submission order.
    pub fields: Vec<(String, String)>,
}

impl PushRequest {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Outbound channel for [`PushRequest`]s.
///
/// Implementations must not block and have no way to report failure back;
/// errors are theirs to log.
pub trait PushTransport {
    fn dispatch(&self, request: PushRequest);
}

/// Parse a comma-joined id list. The empty string is the empty list.
///
/// Whitespace around tokens and empty tokens are tolerated; any other
/// non-integer token rejects the whole list.
pub fn parse_id_list(raw: &str) -> Option<Vec<ItemId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ItemId::parse)
        .collect()
}

/// Pull/push endpoint state for one page session.
#[derive(Debug, Clone)]
pub struct RemoteSync<T> {
    transport: T,
    config: RemoteConfig,
    authenticated: bool,
    token: Option<String>,
}

impl<T: PushTransport> RemoteSync<T> {
    #[must_use]
    pub fn new(transport: T, config: RemoteConfig) -> Self {
        Self {
            transport,
            config,
            authenticated: false,
            token: None,
        }
    }

    /// Request-forgery token attached to every push.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Read server-held state from the page payload.
    ///
    /// Also latches the session's authentication flag, which gates
    /// [`Self::push`].
    pub fn pull(&mut self, payload: &PagePayload) -> Option<RemoteState> {
        self.authenticated = payload.authenticated;
        if !payload.authenticated || !payload.config_available {
            trace!(
                target: "mensa_core::remote",
                authenticated = payload.authenticated,
                config_available = payload.config_available,
                "no server-held preferences"
            );
            return None;
        }

        let (Some(raw_ordering), Some(raw_hidden)) = (&payload.ordering, &payload.hidden) else {
            warn!(target: "mensa_core::remote", "payload flags set but lists are missing");
            return None;
        };
        let (Some(ordering), Some(hidden)) =
            (parse_id_list(raw_ordering), parse_id_list(raw_hidden))
        else {
            warn!(
                target: "mensa_core::remote",
                ordering = raw_ordering.as_str(),
                hidden = raw_hidden.as_str(),
                "ignoring malformed server-held preferences"
            );
            return None;
        };

        let state = RemoteState {
            ordering: ItemOrder::from_ids(ordering),
            hidden: HiddenSet::from_ids(hidden),
        };
        debug!(
            target: "mensa_core::remote",
            ordering_len = state.ordering.len(),
            hidden_len = state.hidden.len(),
            "pulled server-held preferences"
        );
        Some(state)
    }

    /// Fire-and-forget write of the full preference pair.
    ///
    /// Anonymous sessions have nowhere to write to and are skipped.
    pub fn push(&self, ordering: &ItemOrder, hidden: &HiddenSet) {
        if !self.authenticated {
            return;
        }
        let mut fields = Vec::with_capacity(3);
        if let Some(token) = &self.token {
            fields.push((self.config.token_field.clone(), token.clone()));
        }
        fields.push((self.config.order_field.clone(), ordering.to_csv()));
        fields.push((self.config.hidden_field.clone(), hidden.to_csv()));

        debug!(
            target: "mensa_core::remote",
            endpoint = self.config.endpoint.as_str(),
            ordering_len = ordering.len(),
            hidden_len = hidden.len(),
            "dispatching preference push"
        );
        self.transport.dispatch(PushRequest {
            endpoint: self.config.endpoint.clone(),
            fields,
        });
    }
}
