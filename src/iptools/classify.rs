// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    addresses::parse_range,
    arith::{canonical, parse_address, to_v4},
    structs::{Cidr, IpRange},
    AddressError,
};
use ipnet::IpNet;
use lazy_static::lazy_static;
use regex::Regex;
use std::net::IpAddr;
use url::{Host, Url};

// Tables and patterns are built once, on first use.
lazy_static! {
    static ref RE_IP: Regex =
        Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}(:\d+)?$").unwrap();
    static ref RE_CIDR: Regex =
        Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}/\d{1,2}$").unwrap();
    static ref RE_RANGE: Regex =
        Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}-\d{1,3}(\.\d{1,3}){0,3}$").unwrap();

    /// RFC 1918 private blocks.
    static ref PRIVATE_BLOCKS: Vec<IpNet> = blocks(&[
        "10.0.0.0/8",
        "172.16.0.0/12",
        "192.168.0.0/16",
    ]);

    /// Everything that is not publicly routable: private, loopback,
    /// link-local, multicast and reserved blocks.
    static ref NON_PUBLIC_BLOCKS: Vec<IpNet> = blocks(&[
        "10.0.0.0/8",
        "172.16.0.0/12",
        "192.168.0.0/16",
        "127.0.0.0/8",
        "169.254.0.0/16",
        "224.0.0.0/4",
        "240.0.0.0/4",
        "::/128",
        "::1/128",
        "fe80::/10",
        "fc00::/7",
        "ff00::/8",
    ]);
}

fn blocks(list: &[&str]) -> Vec<IpNet> {
    list.iter()
        .map(|s| s.parse::<IpNet>().unwrap())
        .collect()
}

/* ---------------------------------- */

/// Shape check: dotted quad with an optional `:port`. `999.999.999.999` passes.
pub fn is_ip(s: &str) -> bool {
    RE_IP.is_match(s)
}

/// Shape check: dotted quad followed by `/` and one or two digits.
pub fn is_cidr(s: &str) -> bool {
    RE_CIDR.is_match(s)
}

/// Shape check: dotted quad, `-`, then one to four dot-separated numbers.
pub fn is_ip_range_shape(s: &str) -> bool {
    RE_RANGE.is_match(s)
}

/// Whether the string is shaped like an IP, a CIDR or an IP range.
pub fn is_valid_network_input(s: &str) -> bool {
    is_ip(s) || is_cidr(s) || is_ip_range_shape(s)
}

/**
Semantic check: the standard parser accepts the literal and, for dotted
quads, every segment is a plain decimal in `0..=255`.
*/
pub fn is_valid_ip(s: &str) -> bool {
    if parse_address(s).is_err() {
        return false;
    }
    if !s.contains(':') {
        return s.split('.').all(valid_octet);
    }
    true
}

#[inline]
fn valid_octet(seg: &str) -> bool {
    let no_leading_zero: bool = seg == "0" || !seg.starts_with('0');
    no_leading_zero && seg.parse::<u8>().is_ok()
}

/// True for IPv4 literals, including v4-mapped IPv6 (`::ffff:a.b.c.d`).
pub fn is_ipv4(s: &str) -> bool {
    matches!(parse_address(s), Ok(ip) if to_v4(ip).is_some())
}

/// True for IPv6 literals that have no 4-byte form.
pub fn is_ipv6(s: &str) -> bool {
    matches!(parse_address(s), Ok(ip) if to_v4(ip).is_none())
}

/// Whether the address is in one of the RFC 1918 private blocks. Invalid input is not private.
pub fn is_private_ip(s: &str) -> bool {
    match parse_address(s) {
        Ok(ip) => in_table(&PRIVATE_BLOCKS, ip),
        Err(_) => false,
    }
}

/**
Whether the address is publicly routable, i.e. in none of the private,
loopback, link-local, multicast or reserved blocks. Invalid input is not public.

NOTE: this is *not* `!is_private_ip()`; `127.0.0.1` is neither.
*/
pub fn is_public_ip(s: &str) -> bool {
    match parse_address(s) {
        Ok(ip) => !in_table(&NON_PUBLIC_BLOCKS, ip),
        Err(_) => false,
    }
}

#[inline]
fn in_table(table: &[IpNet], ip: IpAddr) -> bool {
    let ip: IpAddr = canonical(ip);
    table.iter().any(|net| net.contains(&ip))
}

/// Whether `ip` lies inside `cidr`. Errors if either does not parse.
pub fn is_ip_in_cidr(ip: &str, cidr: &str) -> Result<bool, AddressError> {
    let addr: IpAddr = parse_address(ip)?;
    let block: Cidr = cidr.parse()?;
    Ok(block.contains(addr))
}

/// Whether `ip` lies inside the range (`start-end` or `start-N`). Errors if either does not parse.
pub fn is_ip_in_range(ip: &str, range: &str) -> Result<bool, AddressError> {
    let addr: IpAddr = parse_address(ip)?;
    let range: IpRange = parse_range(range)?;
    Ok(range.contains(addr))
}

/**
Whether the host part of a URL is an IP literal (IPv4, or bracketed IPv6),
with or without a port: `http://1.2.3.4:8080/x` and `http://[::1]/` are,
`https://example.com/` is not. Unparsable URLs and URLs without a host are not.
*/
pub fn is_url_ip(s: &str) -> bool {
    let url: Url = match Url::parse(s.trim()) {
        Ok(url) => url,
        Err(_) => return false,
    };
    match url.host() {
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
        // non-special schemes keep the host opaque
        Some(Host::Domain(host)) => host.parse::<IpAddr>().is_ok(),
        None => false,
    }
}

/// Semantic check: parses as `addr/prefix` with a prefix valid for the family.
pub fn is_valid_cidr(s: &str) -> bool {
    s.parse::<Cidr>().is_ok()
}

/// Semantic check: parses as a range with start <= end.
pub fn is_valid_ip_range(s: &str) -> bool {
    parse_range(s).is_ok()
}

/* -------------------------------------------------------------------------- */
