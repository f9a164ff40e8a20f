// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! IP address, CIDR and range parsing, enumeration, conversion and classification.

mod addresses;
mod arith;
mod classify;
mod collapsing;
mod convert;
mod strings;
mod structs;
mod trie;

use std::{
    error, fmt,
    net::{AddrParseError, IpAddr},
    num::ParseIntError,
};
use strings::*;

pub use addresses::*;
pub use arith::*;
pub use classify::*;
pub use collapsing::compact_range;
pub use convert::*;
pub use structs::{Cidr, CidrIterator, IpFam, IpRange, IpRangeIterator};
pub use trie::PrefixTrie;

pub const IPV4_BITS: u8 = 32;
pub const IPV6_BITS: u8 = 128;
/// Max number of addresses a materializing call will produce (one IPv4 /8).
pub const MAX_RANGE_SIZE: u128 = 1u128 << 24;

/// Coarse classification of an [AddressError].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// input does not match the expected textual grammar
    Format,
    /// well-formed endpoints, but start > end
    RangeOrder,
    /// arithmetic would leave the address space
    Overflow,
}

#[rustfmt::skip]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddressError {
    /// not a valid IP address literal
    Invalid       { ip: String, source: AddrParseError },
    /// range format is invalid
    InvalidRangeFmt(String),
    InvalidRangeBegIp  { beg: String, source: AddrParseError },
    InvalidRangeEndIp  { end: String, source: AddrParseError },
    InvalidRangeEndVal { val: String, source: ParseIntError },
    InvalidCidr   { cidr: String, source: ipnet::AddrParseError },
    /// last octet plus the abbreviated count exceeds 255
    OctetOverflow(u64),
    /// incrementing walked off the top of the address space
    EnumerationOverflow(IpAddr),
    RangeTooLarge(u128),
    RangeOrder(IpAddr, IpAddr),
    /// start and end are not the same IP family (v4 vs v6).
    Mismatch(IpAddr, IpAddr),
    /// block too small to drop network and broadcast addresses
    NoUsableHosts(Cidr),
    Empty,
}

impl AddressError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AddressError::RangeOrder(..) => ErrorKind::RangeOrder,
            AddressError::OctetOverflow(_)
            | AddressError::EnumerationOverflow(_)
            | AddressError::RangeTooLarge(_) => ErrorKind::Overflow,
            _ => ErrorKind::Format,
        }
    }
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::Invalid { ip, source } => {
                write!(f, "{ERR_INVALID_IP}: '{ip}': {source}")
            }
            AddressError::InvalidRangeFmt(rng) => {
                write!(f, "{ERR_RNG_FMT}: '{rng}'")
            }
            AddressError::InvalidRangeBegIp { beg, source } => {
                write!(f, "{ERR_START}: '{beg}': {source}")
            }
            AddressError::InvalidRangeEndIp { end, source } => {
                write!(f, "{ERR_END}: '{end}': {source}")
            }
            AddressError::InvalidRangeEndVal { val, source } => {
                write!(f, "{ERR_RNG_END}: '{val}': {source}")
            }
            AddressError::InvalidCidr { cidr, source } => {
                write!(f, "{ERR_CIDR}: '{cidr}': {source}")
            }
            AddressError::OctetOverflow(val) => {
                write!(f, "{ERR_V4_OCTET} {val}")
            }
            AddressError::EnumerationOverflow(ip) => {
                write!(f, "{ERR_ENUM_OVERFLOW} {ip}")
            }
            AddressError::RangeTooLarge(size) => {
                write!(f, "{ERR_RNG_TOOLARGE}: {size} (max {MAX_RANGE_SIZE})")
            }
            AddressError::RangeOrder(beg, end) => {
                write!(f, "{ERR_RNG_ORDER} ({beg} > {end})")
            }
            AddressError::Mismatch(a, b) => {
                write!(f, "{ERR_MISMATCH}: {a} - {b}")
            }
            AddressError::NoUsableHosts(cidr) => {
                write!(f, "{ERR_NO_HOSTS}: {cidr}")
            }
            AddressError::Empty => f.write_str(ERR_EMPTY),
        }
    }
}

impl error::Error for AddressError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            AddressError::Invalid { source, .. }
            | AddressError::InvalidRangeBegIp { source, .. }
            | AddressError::InvalidRangeEndIp { source, .. } => Some(source),
            AddressError::InvalidRangeEndVal { source, .. } => Some(source),
            AddressError::InvalidCidr { source, .. } => Some(source),
            _ => None,
        }
    }
}

/* -------------------------------------------------------------------------- */
