//! Client sessions
//!
//! A session owns one request packet and at most one reply. Each
//! [`Session::send`] is a single blocking exchange:
//!
//! 1. open a fresh ephemeral socket
//! 2. draw a new request authenticator and identifier
//! 3. sign and transmit the request
//! 4. wait up to the timeout for one datagram
//! 5. parse, verify and decode it
//! 6. classify the reply code
//!
//! The socket is closed before `send` returns, whatever the outcome.
//!
//! [`AuthSession`] and [`AcctSession`] share this contract and differ only
//! in the extra operations they expose.

mod acct;
mod auth;

pub use acct::AcctSession;
pub use auth::{AuthSession, ReplyAttribute};

use crate::config::{ClientConfig, MAX_HOST_LENGTH};
use crate::error::{ClientError, NO_ERRORS};
use crate::services::{lookup_udp_port, DEFAULT_SERVICES_FILE};
use crate::transport::{AddressFamily, Transport};
use radius_proto::auth::{generate_identifier, generate_request_authenticator};
use radius_proto::dump::{format_packet, format_pairs};
use radius_proto::{token_for, Code, Codec, CodecMode, Dictionary, Operator, Packet};
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Longest shared secret kept; longer secrets are truncated
pub const MAX_SECRET_LENGTH: usize = 255;

/// Reply timeout of a new session
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Which exchange a session performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Auth,
    Acct,
}

impl RequestKind {
    pub fn code(self) -> Code {
        match self {
            RequestKind::Auth => Code::AccessRequest,
            RequestKind::Acct => Code::AccountingRequest,
        }
    }

    /// Services database name of the destination port
    pub fn service_name(self) -> &'static str {
        match self {
            RequestKind::Auth => "radius",
            RequestKind::Acct => "radacct",
        }
    }

    /// Port used when the services lookup fails
    pub fn default_port(self) -> u16 {
        match self {
            RequestKind::Auth => 1812,
            RequestKind::Acct => 1813,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Initialized,
    Configured,
    Sent,
    Completed,
    Failed,
}

/// State shared by every session variant
#[derive(Debug)]
pub struct SessionCore {
    kind: RequestKind,
    dictionary: Arc<Dictionary>,
    request: Packet,
    reply: Option<Packet>,
    server: Option<IpAddr>,
    port: u16,
    secret: Vec<u8>,
    family: AddressFamily,
    timeout: Duration,
    debug: bool,
    mode: CodecMode,
    services_file: PathBuf,
    state: SessionState,
    last_error: String,
}

impl SessionCore {
    pub fn new(kind: RequestKind, dictionary: Arc<Dictionary>) -> Self {
        SessionCore {
            kind,
            dictionary,
            request: Packet::new(kind.code(), 0, [0u8; 16]),
            reply: None,
            server: None,
            port: 0,
            secret: Vec::new(),
            family: AddressFamily::default(),
            timeout: DEFAULT_TIMEOUT,
            debug: false,
            mode: CodecMode::default(),
            services_file: PathBuf::from(DEFAULT_SERVICES_FILE),
            state: SessionState::Initialized,
            last_error: NO_ERRORS.to_string(),
        }
    }

    /// Remember the message of a failed operation
    fn record<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(e) = &result {
            debug!(kind = ?e.kind(), error = %e, "Session operation failed");
            self.last_error = e.to_string();
        }
        result
    }

    fn configure_server(&mut self, host: &str, port: u16, secret: &[u8]) -> Result<(), ClientError> {
        let addr = resolve_host(host, self.family)?;
        self.server = Some(addr);
        if port > 0 {
            self.port = port;
        }
        self.secret = secret[..secret.len().min(MAX_SECRET_LENGTH)].to_vec();
        self.state = SessionState::Configured;
        debug!(server = %addr, port = self.port, "Server configured");
        Ok(())
    }

    fn add_request_pair(&mut self, name: &str, operator: Operator, value: &str) -> Result<(), ClientError> {
        let codec = Codec::new(&self.dictionary, self.mode);
        if let Some(pair) = codec.encode(name, operator, value)? {
            self.request.add_pair(pair);
        }
        Ok(())
    }

    fn destination_port(&self) -> u16 {
        if self.port != 0 {
            return self.port;
        }
        lookup_udp_port(self.kind.service_name(), &self.services_file)
            .unwrap_or_else(|| self.kind.default_port())
    }

    fn run_exchange(&mut self) -> Result<(), ClientError> {
        let started = Instant::now();
        let result = self.exchange();
        self.state = match &result {
            Ok(()) => SessionState::Completed,
            Err(_) => SessionState::Failed,
        };

        match &result {
            Ok(()) => info!(
                identifier = self.request.identifier(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Request completed"
            ),
            Err(e) => warn!(
                identifier = self.request.identifier(),
                kind = ?e.kind(),
                error = %e,
                "Request failed"
            ),
        }
        result
    }

    fn exchange(&mut self) -> Result<(), ClientError> {
        let server = self
            .server
            .ok_or_else(|| ClientError::InvalidAddress("no server configured".to_string()))?;
        self.state = SessionState::Sent;

        let transport = Transport::open(self.family).map_err(ClientError::Socket)?;

        self.request.set_authenticator(generate_request_authenticator());
        let dest = SocketAddr::new(server, self.destination_port());
        let identifier = generate_identifier();
        self.request.set_code(self.kind.code());
        self.request.set_identifier(identifier);

        let bytes = self
            .request
            .sign(&self.secret)
            .map_err(|e| ClientError::Send(e.to_string()))?;
        transport
            .send_to(bytes, dest)
            .map_err(|e| ClientError::Send(e.to_string()))?;

        debug!(
            server = %dest,
            identifier,
            code = ?self.kind.code(),
            length = bytes.len(),
            "Request sent"
        );
        if self.debug {
            print!("=== Sent =======\n{}", format_packet(bytes));
        }

        let (datagram, from) = transport
            .recv_within(self.timeout)
            .map_err(|e| ClientError::TimeoutOrSocket(Some(e)))?;
        debug!(from = %from, length = datagram.len(), "Datagram received");

        let mut reply = Packet::parse(&datagram).map_err(ClientError::InvalidReplyPacket)?;

        if from.ip() != dest.ip() || from.port() != dest.port() {
            return Err(ClientError::VerificationFailed(format!(
                "reply from {} instead of {}",
                from, dest
            )));
        }
        reply
            .verify_reply(&self.request, &self.secret)
            .map_err(|e| ClientError::VerificationFailed(e.to_string()))?;

        let codec = Codec::new(&self.dictionary, self.mode);
        reply.decode_pairs(&codec).map_err(ClientError::DecodeFailed)?;

        if self.debug {
            print!("=== Received ===\n{}", format_packet(&datagram));
            print!("=== Reply ======\n{}", format_pairs(reply.pairs(), &self.dictionary));
        }

        let code = reply.code();
        self.reply = Some(reply);
        debug!(code = ?code, "Reply verified");

        if code.is_success_reply() {
            Ok(())
        } else {
            Err(ClientError::ProtocolRejected(code))
        }
    }

    fn reply_attribute(&self, name: &str) -> Result<ReplyAttribute, ClientError> {
        let reply = self.reply.as_ref().ok_or(ClientError::NoReply)?;
        let def = self
            .dictionary
            .lookup_by_name(name)
            .ok_or_else(|| ClientError::UnknownAttribute(name.to_string()))?;
        let pair = reply
            .find_pair(def.code)
            .ok_or_else(|| ClientError::AttributeNotFound(name.to_string()))?;

        let operator = token_for(pair.operator().as_u8());
        let value = pair.render(&self.dictionary);
        if value.is_empty() {
            return Err(ClientError::ValueRender(name.to_string()));
        }

        if self.debug {
            println!("Get attribute: {} {} {}", name, operator, value);
        }

        Ok(ReplyAttribute {
            name: name.to_string(),
            operator,
            value,
        })
    }
}

/// Resolve a host, plain or as a bracketed literal like `[::1]`, to an
/// address of `family`
fn resolve_host(host: &str, family: AddressFamily) -> Result<IpAddr, ClientError> {
    if host.is_empty() {
        return Err(ClientError::InvalidArgument);
    }
    let invalid = || ClientError::InvalidAddress(host.to_string());
    if host.len() > MAX_HOST_LENGTH {
        return Err(invalid());
    }

    let name = match host.strip_prefix('[') {
        Some(rest) => rest.split_once(']').map(|(inner, _)| inner).ok_or_else(invalid)?,
        None => host,
    };

    if let Ok(ip) = name.parse::<IpAddr>() {
        return if family.matches(&SocketAddr::new(ip, 0)) {
            Ok(ip)
        } else {
            Err(invalid())
        };
    }

    (name, 0)
        .to_socket_addrs()
        .map_err(|_| invalid())?
        .find(|addr| family.matches(addr))
        .map(|addr| addr.ip())
        .ok_or_else(invalid)
}

/// Dictionary named by `config`, or the process-wide one
pub fn load_dictionary(config: &ClientConfig) -> Result<Arc<Dictionary>, ClientError> {
    match &config.dictionary {
        Some(path) => Ok(Arc::new(Dictionary::from_file(path)?)),
        None => Ok(Dictionary::global()?),
    }
}

/// Operations common to every session variant.
///
/// Every failing operation updates [`last_error`](Session::last_error);
/// successful ones leave it alone.
pub trait Session {
    fn core(&self) -> &SessionCore;
    fn core_mut(&mut self) -> &mut SessionCore;

    /// Set the server address, port (0 keeps the current one) and shared
    /// secret
    fn set_server(&mut self, host: &str, port: u16, secret: &[u8]) -> Result<(), ClientError> {
        let core = self.core_mut();
        let result = core.configure_server(host, port, secret);
        core.record(result)
    }

    /// Add `name = value` to the request
    fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), ClientError> {
        self.set_attribute_with(name, Operator::Eq, value)
    }

    fn set_attribute_with(
        &mut self,
        name: &str,
        operator: Operator,
        value: &str,
    ) -> Result<(), ClientError> {
        let core = self.core_mut();
        let result = core.add_request_pair(name, operator, value);
        core.record(result)
    }

    /// Perform one request/reply exchange.
    ///
    /// A verified reply is kept even when its code is not a success; the
    /// call then fails with [`ClientError::ProtocolRejected`].
    fn send(&mut self) -> Result<(), ClientError> {
        let core = self.core_mut();
        let result = core.run_exchange();
        core.record(result)
    }

    /// Dump packets to stdout from now on
    fn set_debug(&mut self) {
        self.core_mut().debug = true;
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.core_mut().timeout = timeout;
    }

    fn set_address_family(&mut self, family: AddressFamily) {
        self.core_mut().family = family;
    }

    fn set_strict_values(&mut self, strict: bool) {
        self.core_mut().mode = if strict {
            CodecMode::Strict
        } else {
            CodecMode::Lenient
        };
    }

    fn set_services_file(&mut self, path: &Path) {
        self.core_mut().services_file = path.to_path_buf();
    }

    /// Push settings, server and request attributes from a configuration
    fn apply_config(&mut self, config: &ClientConfig) -> Result<(), ClientError> {
        self.set_timeout(config.timeout());
        self.set_address_family(config.address_family);
        self.set_strict_values(config.strict_values);
        self.set_services_file(&config.services_file);
        if config.debug {
            self.set_debug();
        }
        if let Some(server) = &config.server {
            self.set_server(server, config.port, config.secret.as_bytes())?;
        }
        for attr in &config.attributes {
            self.set_attribute(&attr.name, &attr.value)?;
        }
        Ok(())
    }

    fn last_error(&self) -> &str {
        &self.core().last_error
    }

    fn state(&self) -> SessionState {
        self.core().state
    }

    fn request(&self) -> &Packet {
        &self.core().request
    }

    fn reply(&self) -> Option<&Packet> {
        self.core().reply.as_ref()
    }

    fn server(&self) -> Option<IpAddr> {
        self.core().server
    }

    /// Configured port, 0 when it will be looked up at send time
    fn port(&self) -> u16 {
        self.core().port
    }

    fn timeout(&self) -> Duration {
        self.core().timeout
    }

    fn is_debug(&self) -> bool {
        self.core().debug
    }

    fn dictionary(&self) -> &Arc<Dictionary> {
        &self.core().dictionary
    }
}
