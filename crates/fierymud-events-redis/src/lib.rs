//! Redis pub/sub transport for the FieryMUD event relay.

pub mod redis_transport;

pub use redis_transport::RedisTransport;
