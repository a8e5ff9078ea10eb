//! HTTP server configuration object.

use std::net::SocketAddr;

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) log_queries: bool,
}

impl ServerConfig {
    /// Bind to `bind_addr` with query logging enabled.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            log_queries: true,
        }
    }

    /// Toggle the query notification middleware on the API scope.
    #[must_use]
    pub fn with_query_logging(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Read by the bootstrap tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
