//! Redis implementation of the `Transport` trait.

use fierymud_events_core::config::PublisherConfig;
use fierymud_events_core::error::TransportError;
use fierymud_events_core::transport::{ConnectionStatus, Transport};
use redis::{Client, Connection, ConnectionAddr, ConnectionInfo, RedisConnectionInfo, Value};
use tracing::info;

/// Redis-backed transport issuing one `PUBLISH` per message.
///
/// Owned by the publisher worker; the connection is opened and dropped
/// repeatedly as the broker comes and goes.
#[derive(Default)]
pub struct RedisTransport {
    connection: Option<Connection>,
    status: ConnectionStatus,
}

impl RedisTransport {
    /// Creates a disconnected transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Addresses the broker by host and port directly, so IPv6 literals such
    /// as `::1` need no URL bracketing.
    fn connection_info(config: &PublisherConfig) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(config.host.clone(), config.port),
            redis: RedisConnectionInfo::default(),
        }
    }

    fn open(config: &PublisherConfig) -> Result<Connection, TransportError> {
        let client = Client::open(Self::connection_info(config))
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let mut connection = client
            .get_connection_with_timeout(config.connect_timeout)
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        // Bound every later command by the same timeout.
        connection
            .set_read_timeout(Some(config.connect_timeout))
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        connection
            .set_write_timeout(Some(config.connect_timeout))
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        if let Some(password) = config.auth_password() {
            redis::cmd("AUTH")
                .arg(password)
                .query::<()>(&mut connection)
                .map_err(|e| TransportError::Auth(e.to_string()))?;
        }

        Ok(connection)
    }
}

impl Transport for RedisTransport {
    fn connect(&mut self, config: &PublisherConfig) -> Result<(), TransportError> {
        self.disconnect();

        // On error the half-open connection is dropped inside `open`.
        let connection = Self::open(config)?;
        self.connection = Some(connection);
        self.status.set_connected(true);

        info!(host = %config.host, port = config.port, "connected to event broker");
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connection = None;
        self.status.set_connected(false);
    }

    fn publish(&mut self, channel: &str, payload: &str) -> Result<(), TransportError> {
        let connection = self
            .connection
            .as_mut()
            .ok_or(TransportError::NotConnected)?;

        let reply: Value = redis::cmd("PUBLISH")
            .arg(channel)
            .arg(payload)
            .query(connection)
            .map_err(|e| TransportError::Publish(e.to_string()))?;

        match reply {
            Value::Int(_) => Ok(()),
            other => Err(TransportError::UnexpectedReply(format!("{other:?}"))),
        }
    }

    fn status(&self) -> &ConnectionStatus {
        &self.status
    }
}

impl std::fmt::Debug for RedisTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisTransport")
            .field("connected", &self.status.is_connected())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn unreachable_config() -> PublisherConfig {
        PublisherConfig {
            host: "127.0.0.1".to_owned(),
            port: 1,
            connect_timeout: Duration::from_millis(200),
            ..PublisherConfig::default()
        }
    }

    #[test]
    fn test_connect_to_unreachable_broker_fails_and_stays_disconnected() {
        // Arrange
        let mut transport = RedisTransport::new();

        // Act
        let result = transport.connect(&unreachable_config());

        // Assert
        assert!(matches!(result, Err(TransportError::Connect(_))));
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_connection_info_keeps_ipv6_host_verbatim() {
        let config = PublisherConfig {
            host: "::1".to_owned(),
            port: 6390,
            ..PublisherConfig::default()
        };

        let info = RedisTransport::connection_info(&config);

        assert_eq!(info.addr, ConnectionAddr::Tcp("::1".to_owned(), 6390));
    }

    #[test]
    fn test_connect_to_ipv6_host_attempts_a_connection() {
        // Arrange
        let mut transport = RedisTransport::new();
        let config = PublisherConfig {
            host: "::1".to_owned(),
            ..unreachable_config()
        };

        // Act
        let result = transport.connect(&config);

        // Assert
        match result {
            Err(TransportError::Connect(reason)) => {
                assert!(!reason.contains("InvalidClientConfig"), "{reason}");
            }
            other => panic!("expected a connect error, got {other:?}"),
        }
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_publish_without_connection_reports_not_connected() {
        let mut transport = RedisTransport::new();

        let result = transport.publish("fierymud:events:chat", "{}");

        assert!(matches!(result, Err(TransportError::NotConnected)));
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let mut transport = RedisTransport::new();

        transport.disconnect();
        transport.disconnect();

        assert!(!transport.is_connected());
    }
}
