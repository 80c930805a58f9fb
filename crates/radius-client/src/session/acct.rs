use super::{load_dictionary, RequestKind, Session, SessionCore};
use crate::config::ClientConfig;
use crate::error::ClientError;
use radius_proto::Dictionary;
use std::sync::Arc;

/// Session sending Accounting-Requests.
///
/// Replies are verified and kept but there is no attribute getter.
#[derive(Debug)]
pub struct AcctSession {
    core: SessionCore,
}

impl AcctSession {
    pub fn new() -> Result<Self, ClientError> {
        Ok(Self::with_dictionary(Dictionary::global()?))
    }

    pub fn with_dictionary(dictionary: Arc<Dictionary>) -> Self {
        AcctSession {
            core: SessionCore::new(RequestKind::Acct, dictionary),
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
}

impl Session for AcctSession {
    fn core(&self) -> &SessionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SessionCore {
        &mut self.core
    }
}
