//! One-shot UDP transport
//!
//! Each exchange opens its own ephemeral socket; dropping the [`Transport`]
//! closes it.

use serde::{Deserialize, Serialize};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

/// Room for one byte past the largest legal packet so oversized datagrams
/// are detected instead of silently truncated
const RECV_BUFFER_SIZE: usize = 4097;

/// Address family used for resolution and for the client socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    #[default]
    Inet,
    Inet6,
}

impl AddressFamily {
    pub fn matches(self, addr: &SocketAddr) -> bool {
        match self {
            AddressFamily::Inet => addr.is_ipv4(),
            AddressFamily::Inet6 => addr.is_ipv6(),
        }
    }

    fn unspecified(self) -> SocketAddr {
        match self {
            AddressFamily::Inet => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            AddressFamily::Inet6 => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        }
    }
}

#[derive(Debug)]
pub struct Transport {
    socket: UdpSocket,
}

impl Transport {
    /// Bind an ephemeral socket on the wildcard address of `family`
    pub fn open(family: AddressFamily) -> io::Result<Self> {
        let socket = UdpSocket::bind(family.unspecified())?;
        Ok(Transport { socket })
    }

    /// Send one datagram; a short write is an error
    pub fn send_to(&self, data: &[u8], dest: SocketAddr) -> io::Result<()> {
        let sent = self.socket.send_to(data, dest)?;
        if sent != data.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("sent {} of {} bytes", sent, data.len()),
            ));
        }
        Ok(())
    }

    /// Receive one datagram, waiting at most `timeout`.
    ///
    /// Never gives up before `timeout` has elapsed. A zero timeout polls
    /// once without blocking. Expiry is reported as
    /// [`io::ErrorKind::TimedOut`].
    pub fn recv_within(&self, timeout: Duration) -> io::Result<(Vec<u8>, SocketAddr)> {
        let mut buffer = vec![0u8; RECV_BUFFER_SIZE];

        if timeout.is_zero() {
            self.socket.set_nonblocking(true)?;
            let received = self.socket.recv_from(&mut buffer);
            self.socket.set_nonblocking(false)?;
            return match received {
                Ok((len, from)) => {
                    buffer.truncate(len);
                    Ok((buffer, from))
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => Err(timed_out()),
                Err(e) => Err(e),
            };
        }

        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(timed_out());
            }

            self.socket.set_read_timeout(Some(remaining))?;
            match self.socket.recv_from(&mut buffer) {
                Ok((len, from)) => {
                    buffer.truncate(len);
                    return Ok((buffer, from));
                }
                // the OS timer may fire a little early; the deadline decides
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock
                            | io::ErrorKind::TimedOut
                            | io::ErrorKind::Interrupted
                    ) => {}
                Err(e) => return Err(e),
            }
        }
    }
}

fn timed_out() -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, "no datagram within timeout")
}
