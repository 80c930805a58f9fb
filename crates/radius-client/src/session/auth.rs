use super::{load_dictionary, RequestKind, Session, SessionCore};
use crate::config::ClientConfig;
use crate::error::ClientError;
use radius_proto::Dictionary;
use std::sync::Arc;

/// A reply attribute as reported to callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyAttribute {
    pub name: String,
    pub operator: &'static str,
    pub value: String,
}

/// Session sending Access-Requests
#[derive(Debug)]
pub struct AuthSession {
    core: SessionCore,
}

impl AuthSession {
    /// Session over the process-wide dictionary
    pub fn new() -> Result<Self, ClientError> {
        Ok(Self::with_dictionary(Dictionary::global()?))
    }

    pub fn with_dictionary(dictionary: Arc<Dictionary>) -> Self {
        AuthSession {
            core: SessionCore::new(RequestKind::Auth, dictionary),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut session = Self::with_dictionary(load_dictionary(config)?);
        session.apply_config(config)?;
        Ok(session)
    }

    pub fn set_username(&mut self, username: &str) -> Result<(), ClientError> {
        self.set_attribute("User-Name", username)
    }

    pub fn set_password(&mut self, password: &str) -> Result<(), ClientError> {
        self.set_attribute("User-Password", password)
    }

    /// Look up `name` in the reply of the last exchange
    pub fn get_attribute(&mut self, name: &str) -> Result<ReplyAttribute, ClientError> {
        let result = self.core.reply_attribute(name);
        self.core.record(result)
    }
}

impl Session for AuthSession {
    fn core(&self) -> &SessionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SessionCore {
        &mut self.core
    }
}
