//! Module holding the logic for resolving a tracked redirect link.

use std::collections::HashMap;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

use crate::store::HitRecorder;
use crate::store::RedirectStore;
use crate::track::hit::Hit;
use crate::track::token;
use crate::utils::url;

/// The query parameter a clickthrough token travels under.
pub const CLICKTHROUGH_PARAM: &str = "ct";

const CONTACT_FIELD_PATTERN: &str = r"\{contactfield=([A-Za-z0-9_]+)\}";

/// A redirect resolution request, decoupled from any transport.
#[derive(Clone, Debug, Default)]
pub struct RedirectRequest {
    /// The tracking token from the link.
    pub token: String,

    /// Query parameters that arrived on the tracked link, clickthrough
    /// included.
    pub query: Vec<(String, String)>,

    /// Whether the click came from a trackable source. Untrackable clicks
    /// (do-not-track addresses, link scanners) resolve the URL but record
    /// nothing and substitute no contact fields.
    pub trackable: bool,

    /// Profile fields of the attributed contact, for `{contactfield=...}`
    /// substitution.
    pub contact_fields: HashMap<String, String>,
}

/// A successfully resolved redirect.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Resolved {
    /// The final URL to send the visitor to.
    pub url: String,

    /// The contact the click was attributed to, if any.
    pub contact: Option<u64>,
}

/// Errors that terminate a redirect resolution.
#[derive(Debug, Error)]
pub enum RedirectError {
    /// No published redirect matched the tracking token.
    #[error("no published redirect found for token '{0}'")]
    NotFound(String),

    /// The destination did not survive sanitization.
    #[error("destination resolved to an invalid URL: '{0}'")]
    InvalidDestination(String),
}

/// Resolves a tracked link to its destination, recording the click when the
/// source is trackable.
///
/// A malformed clickthrough token is a soft failure: attribution is dropped
/// with a warning and resolution continues. A missing or unpublished
/// redirect, or a destination that fails validation, is a hard failure.
pub fn resolve<S>(store: &mut S, request: &RedirectRequest) -> Result<Resolved, RedirectError>
where
    S: RedirectStore + HitRecorder,
{
    debug!("Attempting to load redirect with token '{}'.", request.token);

    let redirect = store
        .redirect_by_token(&request.token)
        .filter(|r| r.is_published)
        .ok_or_else(|| RedirectError::NotFound(request.token.clone()))?;

    let mut destination = url::decode_entity_ampersands(&redirect.url);

    let passthrough: Vec<(String, String)> = request
        .query
        .iter()
        .filter(|(key, _)| key != CLICKTHROUGH_PARAM)
        .cloned()
        .collect();
    destination = url::append_query(&destination, &passthrough);

    let mut contact = None;

    if request.trackable {
        let clickthrough = request
            .query
            .iter()
            .find(|(key, _)| key == CLICKTHROUGH_PARAM)
            .map(|(_, value)| value.as_str());

        if let Some(raw) = clickthrough {
            match token::decode(raw) {
                Ok(decoded) => contact = decoded.contact,
                Err(e) => warn!("Invalid clickthrough value '{}': {}", raw, e),
            }
        }

        store.bump_redirect(&request.token);
        store.record(
            Hit::new(None, 200)
                .with_contact(contact)
                .with_url(destination.clone()),
        );

        destination = substitute_contact_fields(&destination, &request.contact_fields);
    }

    let destination = url::sanitize_absolute_url(&destination);

    if !url::is_valid_url(&destination) {
        return Err(RedirectError::InvalidDestination(destination));
    }

    Ok(Resolved {
        url: destination,
        contact,
    })
}

fn substitute_contact_fields(destination: &str, fields: &HashMap<String, String>) -> String {
    let pattern = Regex::new(CONTACT_FIELD_PATTERN).expect("contact field pattern compiles");

    pattern
        .replace_all(destination, |captures: &regex::Captures<'_>| {
            fields.get(&captures[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}
