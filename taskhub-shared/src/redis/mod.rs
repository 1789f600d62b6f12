/// Redis client shared by the task listing cache and the notification stream
///
/// Both collaborators ride on one connection manager; the cache uses plain
/// GET/SET/DEL and the notification publisher/consumer use Redis Streams.

pub mod client;

pub use client::{RedisClient, RedisClientError, RedisConfig};
