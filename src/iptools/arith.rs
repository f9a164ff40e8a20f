// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::AddressError;
use std::{
    cmp::Ordering,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
};

/// Parse a single IPv4 or IPv6 literal. No trimming, no partial parses.
pub fn parse_address(text: impl AsRef<str>) -> Result<IpAddr, AddressError> {
    text.as_ref()
        .parse::<IpAddr>()
        .map_err(|source| AddressError::Invalid {
            ip: text.as_ref().into(),
            source,
        })
}

/**
Add one to the address, seen as a big-endian unsigned integer.

Returns the incremented address and whether the most significant byte
rolled over. On overflow the returned address is all zeroes; callers
must check the flag rather than infer overflow from the value.
*/
pub fn increment(ip: IpAddr) -> (IpAddr, bool) {
    match ip {
        IpAddr::V4(v4) => {
            let mut octets: [u8; 4] = v4.octets();
            let overflowed: bool = increment_bytes(&mut octets);
            (IpAddr::V4(Ipv4Addr::from(octets)), overflowed)
        }
        IpAddr::V6(v6) => {
            let mut octets: [u8; 16] = v6.octets();
            let overflowed: bool = increment_bytes(&mut octets);
            (IpAddr::V6(Ipv6Addr::from(octets)), overflowed)
        }
    }
}

/// Increment a big-endian byte buffer in place. Returns `true` on overflow.
#[inline]
fn increment_bytes(buf: &mut [u8]) -> bool {
    for byte in buf.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            return false;
        }
    }
    true
}

/// Byte-lexicographic comparison. Both addresses must be of the same family.
pub fn compare(a: IpAddr, b: IpAddr) -> Result<Ordering, AddressError> {
    match (a, b) {
        (IpAddr::V4(x), IpAddr::V4(y)) => Ok(x.octets().cmp(&y.octets())),
        (IpAddr::V6(x), IpAddr::V6(y)) => Ok(x.octets().cmp(&y.octets())),
        _ => Err(AddressError::Mismatch(a, b)),
    }
}

/// 4-byte form of the address, if it has one (plain v4 or v4-mapped v6).
#[inline]
pub fn to_v4(ip: IpAddr) -> Option<Ipv4Addr> {
    match ip {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped(),
    }
}

/// Normalize v4-mapped IPv6 addresses to plain IPv4.
#[inline]
pub fn canonical(ip: IpAddr) -> IpAddr {
    match to_v4(ip) {
        Some(v4) => IpAddr::V4(v4),
        None => ip,
    }
}

/// IPv4 address as a u32. `None` for addresses without a 4-byte form.
#[inline]
pub fn ip_to_u32(ip: IpAddr) -> Option<u32> {
    to_v4(ip).map(|v4| u32::from_be_bytes(v4.octets()))
}

#[inline]
pub fn u32_to_ip(n: u32) -> IpAddr {
    IpAddr::V4(Ipv4Addr::from(n.to_be_bytes()))
}

/// Address as an integer in the family's own width.
#[inline]
pub(crate) fn ip_to_u128(ip: IpAddr) -> u128 {
    match ip {
        IpAddr::V4(v4) => u32::from_be_bytes(v4.octets()) as u128,
        IpAddr::V6(v6) => u128::from_be_bytes(v6.octets()),
    }
}

/// Whether `b` directly follows `a` (same family, no wrap-around).
pub fn is_adjacent(a: IpAddr, b: IpAddr) -> bool {
    match increment(a) {
        (_, true) => false,
        (next, false) => next == b,
    }
}

/* -------------------------------------------------------------------------- */
