use std::fmt;

use crate::protocol::Request;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyType {
    Http,
    Https,
    Socks4,
    Socks5,
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProxyType::Http => "HTTP",
            ProxyType::Https => "HTTPS",
            ProxyType::Socks4 => "SOCKS4",
            ProxyType::Socks5 => "SOCKS5",
        };
        f.write_str(name)
    }
}

/// Proxy the service's workers should load the target page through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    pub kind: ProxyType,
    /// `login:password@host:port` or `host:port`.
    pub address: String,
}

impl Proxy {
    pub fn new(kind: ProxyType, address: impl Into<String>) -> Self {
        Self {
            kind,
            address: address.into(),
        }
    }
}

impl Request {
    pub fn set_proxy(&mut self, proxy: &Proxy) {
        self.params
            .insert("proxytype".to_string(), proxy.kind.to_string());
        self.params
            .insert("proxy".to_string(), proxy.address.clone());
    }

    pub fn with_proxy(mut self, proxy: &Proxy) -> Self {
        self.set_proxy(proxy);
        self
    }
}
