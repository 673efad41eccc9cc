//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The session holds three things: the authenticated user id, a queue of
//! one-shot flash messages, and the path an anonymous client was denied so
//! it can be sent back there after logging in.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const FLASH_KEY: &str = "flash";
pub(crate) const RETURN_TO_KEY: &str = "return_to";

/// Most flash messages kept for a client that never reads them.
///
/// The session lives in a single cookie, so an unread queue must not grow
/// past the browser's size limit; the oldest messages are dropped first.
pub const MAX_FLASH_MESSAGES: usize = 8;

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// One-shot notification shown once and then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub message: String,
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

fn write_error(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to persist session: {error}"))
}

fn read_error(error: impl std::fmt::Display) -> Error {
    Error::internal(format!("failed to read session: {error}"))
}

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id.
    ///
    /// The session is renewed first so a pre-login cookie cannot be reused
    /// to ride the new identity.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(write_error)
    }

    /// Forget the authenticated identity. Flash messages survive.
    pub fn clear_user(&self) {
        self.0.remove(USER_ID_KEY);
        self.0.remove(RETURN_TO_KEY);
    }

    /// Current user id, if any. A tampered id counts as anonymous.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let Some(raw) = self.0.get::<String>(USER_ID_KEY).map_err(read_error)? else {
            return Ok(None);
        };
        match UserId::new(raw) {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                tracing::warn!(%error, "invalid user id in session cookie");
                Ok(None)
            }
        }
    }

    /// Current user id; when absent, remember the request path as the
    /// post-login destination.
    ///
    /// Returns `None` rather than failing so the domain service reports the
    /// missing identity with its own message.
    pub fn actor_or_remember(&self, request: &HttpRequest) -> Result<Option<UserId>, Error> {
        let actor = self.user_id()?;
        if actor.is_none() {
            self.0
                .insert(RETURN_TO_KEY, request.path())
                .map_err(write_error)?;
        }
        Ok(actor)
    }

    /// Take the stored post-login destination, clearing it.
    pub fn take_return_to(&self) -> Result<Option<String>, Error> {
        let target = self.0.get::<String>(RETURN_TO_KEY).map_err(read_error)?;
        self.0.remove(RETURN_TO_KEY);
        Ok(target)
    }

    /// Queue a flash message for the next read, keeping at most
    /// [`MAX_FLASH_MESSAGES`].
    pub fn flash(&self, kind: FlashKind, message: impl Into<String>) -> Result<(), Error> {
        let mut queue = self
            .0
            .get::<Vec<FlashMessage>>(FLASH_KEY)
            .map_err(read_error)?
            .unwrap_or_default();
        queue.push(FlashMessage {
            kind,
            message: message.into(),
        });
        let overflow = queue.len().saturating_sub(MAX_FLASH_MESSAGES);
        if overflow > 0 {
            queue = queue.split_off(overflow);
        }
        self.0.insert(FLASH_KEY, queue).map_err(write_error)
    }

    pub fn flash_success(&self, message: impl Into<String>) -> Result<(), Error> {
        self.flash(FlashKind::Success, message)
    }

    /// Drain every queued flash message.
    pub fn take_flash(&self) -> Result<Vec<FlashMessage>, Error> {
        let queue = self
            .0
            .remove_as::<Vec<FlashMessage>>(FLASH_KEY)
            .transpose()
            .map_err(|raw| read_error(format!("undecodable flash queue {raw}")))?;
        Ok(queue.unwrap_or_default())
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
