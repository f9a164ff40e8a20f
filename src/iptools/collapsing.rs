// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    structs::{Cidr, IpFam, IpRange, Range},
    IPV6_BITS,
};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/**
Decompose an inclusive [IpRange] into the minimal set of CIDRs covering
exactly the same addresses.

Unlike [range_to_cidr_list](super::range_to_cidr_list) this does *not*
enumerate IPs and hence scales to very large ranges.
*/
pub fn compact_range(range: IpRange) -> Vec<Cidr> {
    range_to_cidrs(range.span())
}

/// Convert a CIDR to an inclusive integer span.
pub(crate) fn cidr_to_span(c: Cidr) -> Range {
    let fam: IpFam = c.fam();
    let bits: u8 = fam.bits();
    let pre: u8 = c.prefix().min(bits);
    let ip: u128 = match c.addr() {
        IpAddr::V4(a) => u32::from_be_bytes(a.octets()) as u128,
        IpAddr::V6(a) => u128::from_be_bytes(a.octets()),
    };
    let mask: u128 = mask_u128(bits, pre);
    let net: u128 = ip & mask;
    let end: u128 = net | (!mask & width_mask(bits));
    Range { fam, beg: net, end }
}

/**
Greedy decomposition: at each step emit the largest block that both starts
at `start` on its own boundary and still fits before `end`.
*/
fn range_to_cidrs(r: Range) -> Vec<Cidr> {
    let bits: u8 = r.fam.bits();

    // 2^128 addresses do not fit the length arithmetic below
    if bits == IPV6_BITS && r.beg == 0 && r.end == u128::MAX {
        return vec![Cidr::from_parts(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0)];
    }

    let mut out: Vec<Cidr> = Vec::new();
    let mut start: u128 = r.beg;
    while start <= r.end {
        let aligned: u8 = start.trailing_zeros().min(bits as u32) as u8;
        let fits: u8 = floor_log2_u128(r.end - start + 1);
        let host_bits: u8 = aligned.min(fits);

        out.push(Cidr::from_parts(int_to_ip(r.fam, start), bits - host_bits));

        match start.checked_add(1u128 << host_bits) {
            Some(next) => start = next,
            None => break,
        }
    }
    out
}

/* ---------------------------------- */

/// Netmask with the top `prefix` of `bits` set. `prefix` is clamped to `bits`.
#[inline]
pub(crate) fn mask_u128(bits: u8, prefix: u8) -> u128 {
    let all: u128 = width_mask(bits);
    let hosts: u128 = all.checked_shr(prefix.min(bits) as u32).unwrap_or(0);
    all ^ hosts
}

/// All ones in a `bits` wide integer.
#[inline]
fn width_mask(bits: u8) -> u128 {
    u128::MAX >> (u128::BITS - bits as u32)
}

/// Index of the highest set bit. `x` must be non-zero.
#[inline]
fn floor_log2_u128(x: u128) -> u8 {
    debug_assert!(x != 0);
    (u128::BITS - 1 - x.leading_zeros()) as u8
}

#[inline]
pub(crate) fn int_to_ip(fam: IpFam, v: u128) -> IpAddr {
    match fam {
        IpFam::V4 => IpAddr::V4(Ipv4Addr::from((v as u32).to_be_bytes())),
        IpFam::V6 => IpAddr::V6(Ipv6Addr::from(v.to_be_bytes())),
    }
}

/* -------------------------------------------------------------------------- */
