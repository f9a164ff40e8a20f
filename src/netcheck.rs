// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TCP reachability checks with an optional resolver cache.

use parking_lot::RwLock;
use std::{
    collections::HashMap,
    io,
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    time::{Duration, Instant},
};
use tracing::{debug, trace};

pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);
/// Entry count at which [ResolveCache::resolve] starts sweeping stale entries.
pub const DEFAULT_SWEEP_THRESHOLD: usize = 1024;

/// Resolve `host:port`. IPv6 literals are accepted with or without brackets.
fn lookup(host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
    let host: &str = host.trim_start_matches('[').trim_end_matches(']');
    Ok((host, port).to_socket_addrs()?.collect())
}

/// Try each address in turn; true on the first successful connect.
fn dial_any(addrs: &[SocketAddr], timeout: Duration) -> bool {
    for addr in addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(_) => {
                trace!("dial {addr}: connected");
                return true;
            }
            Err(e) => debug!("dial {addr}: {e}"),
        }
    }
    false
}

/**
Whether a TCP connection to `host:port` can be established within `timeout`
(per resolved address). The connection is closed right away.

Resolution failures count as unreachable and are logged at debug level.
*/
pub fn can_dial(host: &str, port: u16, timeout: Duration) -> bool {
    match lookup(host, port) {
        Ok(addrs) => dial_any(&addrs, timeout),
        Err(e) => {
            debug!("resolve {host}:{port}: {e}");
            false
        }
    }
}

/* ---------------------------------- */

struct CacheEntry {
    addrs: Vec<SocketAddr>,
    upd: Instant,
}

/**
Caller-owned cache of resolved socket addresses, keyed by `(host, port)`.

Entries older than the TTL are resolved again on next use. Once the cache
reaches the sweep threshold, every insert also drops stale entries,
so keys that are never looked up again do not pile up. [evict_expired]
sweeps on demand.

The cache is `Sync`; share it by reference between threads.

[evict_expired]: ResolveCache::evict_expired
*/
pub struct ResolveCache {
    ttl: Duration,
    sweep_at: usize,
    inner: RwLock<HashMap<(String, u16), CacheEntry>>,
}

impl ResolveCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_sweep_threshold(ttl, DEFAULT_SWEEP_THRESHOLD)
    }

    pub fn with_sweep_threshold(ttl: Duration, sweep_at: usize) -> Self {
        Self {
            ttl,
            sweep_at,
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Resolved addresses for `host:port`, from the cache while still fresh.
    pub fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        let key: (String, u16) = (host.to_owned(), port);
        if let Some(entry) = self.inner.read().get(&key) {
            if entry.upd.elapsed() < self.ttl {
                return Ok(entry.addrs.clone());
            }
        }

        let addrs: Vec<SocketAddr> = lookup(host, port)?;
        trace!("resolved {host}:{port} -> {addrs:?}");

        let mut map = self.inner.write();
        if map.len() >= self.sweep_at {
            let before: usize = map.len();
            map.retain(|_, e| e.upd.elapsed() < self.ttl);
            debug!("resolve cache swept {} stale entries", before - map.len());
        }
        map.insert(
            key,
            CacheEntry {
                addrs: addrs.clone(),
                upd: Instant::now(),
            },
        );
        Ok(addrs)
    }

    /// Like [can_dial], but resolves through the cache.
    pub fn can_dial(&self, host: &str, port: u16, timeout: Duration) -> bool {
        match self.resolve(host, port) {
            Ok(addrs) => dial_any(&addrs, timeout),
            Err(e) => {
                debug!("resolve {host}:{port}: {e}");
                false
            }
        }
    }

    /// Drop stale entries. Returns how many were removed.
    pub fn evict_expired(&self) -> usize {
        let mut map = self.inner.write();
        let before: usize = map.len();
        map.retain(|_, e| e.upd.elapsed() < self.ttl);
        before - map.len()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl Default for ResolveCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

/* -------------------------------------------------------------------------- */
