// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    addresses::parse_range,
    arith::{canonical, increment, ip_to_u128},
    collapsing::{cidr_to_span, int_to_ip},
    strings::*,
    AddressError, IPV4_BITS, IPV6_BITS,
};
use ipnet::IpNet;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, net::IpAddr, str::FromStr};

/// IP address family
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum IpFam {
    V4,
    V6,
}

impl IpFam {
    pub fn of(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => IpFam::V4,
            IpAddr::V6(_) => IpFam::V6,
        }
    }

    /// Address width in bits.
    pub fn bits(&self) -> u8 {
        match self {
            IpFam::V4 => IPV4_BITS,
            IpFam::V6 => IPV6_BITS,
        }
    }
}

/// Inclusive span of IP addresses as integers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Range {
    pub fam: IpFam,
    pub beg: u128,
    /// inclusive
    pub end: u128,
}

impl Range {
    /// The length of the range. Cannot be an [usize] due to IPv6. Saturating.
    pub fn len(&self) -> u128 {
        let diff: u128 = self.end.saturating_sub(self.beg);
        if diff == u128::MAX {
            return u128::MAX;
        }
        diff.saturating_add(1)
    }
}

/* -------------------------------------------------------------------------- */

/// A CIDR block. `addr` is always the network address.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Cidr {
    /// network address
    addr: IpAddr,
    /// **v4**: `0..=32`, **v6**: `0..=128`
    prefix: u8,
}

impl Cidr {
    /// Build a block from any address inside it, masking down to the network address.
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, AddressError> {
        format!("{addr}{SLASH}{prefix}").parse::<Cidr>()
    }

    /// Caller guarantees `addr` is already masked to `prefix`.
    #[inline]
    pub(crate) fn from_parts(addr: IpAddr, prefix: u8) -> Self {
        Cidr { addr, prefix }
    }

    /// Single-host block (/32 or /128).
    pub fn host(ip: IpAddr) -> Self {
        Cidr::from_parts(ip, IpFam::of(ip).bits())
    }

    /// Network address.
    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn fam(&self) -> IpFam {
        IpFam::of(self.addr)
    }

    /// Number of IP addresses contained by this [Cidr].
    /// Cannot be an [usize] due to IPv6. Saturating.
    pub fn len(&self) -> u128 {
        let bits: u8 = self.fam().bits();
        let host_bits: u8 = bits.saturating_sub(self.prefix);

        // 2^128 does not fit in u128
        if host_bits == IPV6_BITS {
            return u128::MAX;
        }

        1u128 << host_bits
    }

    /// Returns true if the CIDR represents a single host address.
    pub fn is_host(&self) -> bool {
        self.prefix == self.fam().bits()
    }

    pub fn is_ipv4(&self) -> bool {
        matches!(self.addr, IpAddr::V4(_))
    }

    pub fn is_ipv6(&self) -> bool {
        matches!(self.addr, IpAddr::V6(_))
    }

    /// Last address of the block.
    pub fn broadcast(&self) -> IpAddr {
        let span: Range = cidr_to_span(*self);
        int_to_ip(span.fam, span.end)
    }

    /// Whether `ip` falls inside the block. v4-mapped IPv6 counts as IPv4.
    pub fn contains(&self, ip: IpAddr) -> bool {
        let ip: IpAddr = if self.is_ipv4() { canonical(ip) } else { ip };
        if IpFam::of(ip) != self.fam() {
            return false;
        }
        let span: Range = cidr_to_span(*self);
        let n: u128 = ip_to_u128(ip);
        span.beg <= n && n <= span.end
    }

    /// Whether `other` lies entirely inside this block.
    pub fn covers(&self, other: &Cidr) -> bool {
        self.fam() == other.fam() && self.prefix <= other.prefix && self.contains(other.addr)
    }

    /**
    Returns an iterator over all [IpAddr]s in the CIDR block, network and
    broadcast addresses included.

    NOTE: For large CIDRs (e.g., /0), this can produce a very large number of
    addresses, especially for IPv6. Use with caution. You have been warned.
    */
    pub fn iter(&self) -> CidrIterator {
        CidrIterator::new(*self)
    }
}

impl From<IpNet> for Cidr {
    fn from(net: IpNet) -> Self {
        Cidr::from_parts(net.network(), net.prefix_len())
    }
}

impl IntoIterator for Cidr {
    type Item = IpAddr;
    type IntoIter = CidrIterator;

    fn into_iter(self) -> Self::IntoIter {
        CidrIterator::new(self)
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SLASH}{}", self.addr, self.prefix)
    }
}

impl FromStr for Cidr {
    type Err = AddressError;

    /// Parses `addr/prefix`, masking the address down to the network address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let net: IpNet = s
            .trim()
            .parse::<IpNet>()
            .map_err(|source| AddressError::InvalidCidr {
                cidr: s.into(),
                source,
            })?;
        Ok(Cidr::from(net))
    }
}

impl Serialize for Cidr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<Cidr>().map_err(de::Error::custom)
    }
}

/* ---------------------------------- */

/// Iterator over all [IpAddr]s in a CIDR block, driven by [increment].
pub struct CidrIterator {
    cidr: Cidr,
    current: Option<IpAddr>,
}

impl CidrIterator {
    pub fn new(cidr: Cidr) -> Self {
        CidrIterator {
            cidr,
            current: Some(cidr.addr),
        }
    }
}

impl Iterator for CidrIterator {
    type Item = IpAddr;

    fn next(&mut self) -> Option<Self::Item> {
        let ip: IpAddr = self.current.take()?;
        self.current = match increment(ip) {
            (_, true) => None,
            (next, false) if self.cidr.contains(next) => Some(next),
            _ => None,
        };
        Some(ip)
    }
}

/* -------------------------------------------------------------------------- */

/// Inclusive range of IP addresses (endpoints are included).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct IpRange {
    beg: IpAddr,
    end: IpAddr,
}

impl IpRange {
    /// Create a new [IpRange]. Ensures that IP families match and order is correct.
    pub fn new(beg: IpAddr, end: IpAddr) -> Result<Self, AddressError> {
        // Validate same IP version
        if IpFam::of(beg) != IpFam::of(end) {
            return Err(AddressError::Mismatch(beg, end));
        }

        // Validate order
        if beg > end {
            return Err(AddressError::RangeOrder(beg, end));
        }

        Ok(Self { beg, end })
    }

    /// First address (inclusive).
    pub fn beg(&self) -> IpAddr {
        self.beg
    }

    /// Last address (inclusive).
    pub fn end(&self) -> IpAddr {
        self.end
    }

    pub fn fam(&self) -> IpFam {
        IpFam::of(self.beg)
    }

    /// Number of addresses in the range. Saturating for the full IPv6 space.
    pub fn len(&self) -> u128 {
        self.span().len()
    }

    pub(crate) fn span(&self) -> Range {
        Range {
            fam: self.fam(),
            beg: ip_to_u128(self.beg),
            end: ip_to_u128(self.end),
        }
    }

    /// Structural membership test, no enumeration.
    pub fn contains(&self, ip: IpAddr) -> bool {
        let ip: IpAddr = match self.fam() {
            IpFam::V4 => canonical(ip),
            IpFam::V6 => ip,
        };
        IpFam::of(ip) == self.fam() && self.beg <= ip && ip <= self.end
    }

    /// Return an iterator over all [IpAddr]s in the range.
    pub fn iter(&self) -> IpRangeIterator {
        IpRangeIterator {
            current: Some(self.beg),
            end: self.end,
        }
    }
}

impl IntoIterator for IpRange {
    type Item = IpAddr;
    type IntoIter = IpRangeIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{RANGE_SEP}{}", self.beg, self.end)
    }
}

impl FromStr for IpRange {
    type Err = AddressError;

    /// Accepts `start-end` and the abbreviated `start-N` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_range(s)
    }
}

impl Serialize for IpRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{}{DASH}{}", self.beg, self.end))
    }
}

impl<'de> Deserialize<'de> for IpRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<IpRange>().map_err(de::Error::custom)
    }
}

/* ---------------------------------- */

/// Iterator over an IP range.
pub struct IpRangeIterator {
    current: Option<IpAddr>,
    end: IpAddr,
}

impl Iterator for IpRangeIterator {
    type Item = IpAddr;

    fn next(&mut self) -> Option<Self::Item> {
        let ip: IpAddr = self.current.take()?;
        if ip != self.end {
            self.current = match increment(ip) {
                (next, false) => Some(next),
                (_, true) => None,
            };
        }
        Some(ip)
    }
}

/* -------------------------------------------------------------------------- */
