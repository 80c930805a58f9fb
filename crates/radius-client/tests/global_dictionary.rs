//! Process-wide dictionary installed before any session exists
//!
//! Kept in its own test binary: the global instance is set once per process.

use radius_client::{AcctSession, AuthSession, ErrorKind, Session};
use radius_proto::{Dictionary, DictionaryError};
use std::sync::Arc;

#[test]
fn test_sessions_share_installed_dictionary() {
    let dict = Dictionary::parse_str(
        "ATTRIBUTE\tUser-Name\t1\tstring\n\
         ATTRIBUTE\tUser-Password\t2\tstring\tencrypt=1\n\
         ATTRIBUTE\tSite-Code\t230\tinteger\n\
         VALUE\tSite-Code\tLab\t3\n",
        "site",
    )
    .unwrap();
    let installed = Dictionary::install_global(dict).unwrap();

    let mut auth = AuthSession::new().unwrap();
    let acct = AcctSession::new().unwrap();
    assert!(Arc::ptr_eq(auth.dictionary(), &installed));
    assert!(Arc::ptr_eq(acct.dictionary(), &installed));

    auth.set_attribute("Site-Code", "Lab").unwrap();
    assert_eq!(auth.request().pairs()[0].code(), 230);
    assert_eq!(
        auth.set_attribute("NAS-Port", "1").unwrap_err().kind(),
        ErrorKind::UnknownAttribute
    );

    let again = Dictionary::install_global(Dictionary::builtin().unwrap());
    assert!(matches!(again, Err(DictionaryError::AlreadyInitialized)));
    assert!(Arc::ptr_eq(&Dictionary::global().unwrap(), &installed));
}
