// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    addresses::parse_ip_range,
    arith::{canonical, is_adjacent},
    collapsing::{cidr_to_span, int_to_ip},
    strings::*,
    structs::{Cidr, IpFam, IpRange, Range},
    trie::PrefixTrie,
    AddressError,
};
use crate::slices::unique;
use std::net::{IpAddr, Ipv4Addr};
use tracing::{debug, warn};

/// Smallest block that still has addresses left after dropping network and broadcast.
const MIN_HOST_BLOCK: u128 = 4;

/**
Convert an IP range (`start-end` or `start-N`) into one host CIDR per address.

This is a naive, non-aggregating conversion: `10.0.0.1-3` gives three `/32`
blocks. Use [compact_range](super::compact_range) for a minimal cover.
*/
pub fn range_to_cidr_list(arg: impl AsRef<str>) -> Result<Vec<Cidr>, AddressError> {
    let ips: Vec<IpAddr> = parse_ip_range(arg)?;
    Ok(ips.into_iter().map(Cidr::host).collect())
}

/**
Convert a CIDR block into its usable host range, i.e. without the network
and broadcast addresses: `192.168.1.0/30` gives `192.168.1.1 - 192.168.1.2`.

Blocks with fewer than 4 addresses (IPv4 /31 and /32, IPv6 /127 and /128)
have no such range and yield [AddressError::NoUsableHosts].
*/
pub fn cidr_to_range(arg: impl AsRef<str>) -> Result<IpRange, AddressError> {
    let cidr: Cidr = arg.as_ref().parse()?;
    if cidr.len() < MIN_HOST_BLOCK {
        return Err(AddressError::NoUsableHosts(cidr));
    }

    let span: Range = cidr_to_span(cidr);
    IpRange::new(
        int_to_ip(span.fam, span.beg + 1),
        int_to_ip(span.fam, span.end - 1),
    )
}

/**
Convert a list of IPv4 address strings into CIDR blocks through a [PrefixTrie].

Every address is stored as a `/32` entry and the result is the trie's
covered networks within `0.0.0.0/0`: each distinct address once, ascending.
Entries that do not parse as IPv4 addresses are skipped with a warning
instead of failing the whole call.

See [addresses_to_aggregated_cidr_list] for the merged form.
*/
pub fn addresses_to_cidr_list(input: &[impl AsRef<str>]) -> Vec<Cidr> {
    build_v4_trie(input).covered_networks(all_v4())
}

/**
Like [addresses_to_cidr_list], but returns the maximal aggregated blocks:
sibling blocks that are both fully present merge into their parent, so
`192.168.1.0` through `192.168.1.3` give a single `192.168.1.0/30`.
*/
pub fn addresses_to_aggregated_cidr_list(input: &[impl AsRef<str>]) -> Vec<Cidr> {
    build_v4_trie(input).aggregated(all_v4())
}

fn build_v4_trie(input: &[impl AsRef<str>]) -> PrefixTrie {
    let mut trie: PrefixTrie = PrefixTrie::new(IpFam::V4);

    for s in input {
        let s: &str = s.as_ref();
        let ip: IpAddr = match s.trim().parse::<IpAddr>() {
            Ok(ip) => canonical(ip),
            Err(e) => {
                warn!("{WARN_SKIP}: '{s}': {e}");
                continue;
            }
        };
        if !ip.is_ipv4() {
            warn!("{WARN_SKIP_V6}: '{s}'");
            continue;
        }
        // same family as the trie, cannot fail
        if let Err(e) = trie.insert(Cidr::host(ip)) {
            warn!("{WARN_SKIP}: '{s}': {e}");
        }
    }

    debug!("built prefix trie with {} entries from {} inputs", trie.len(), input.len());
    trie
}

#[inline]
fn all_v4() -> Cidr {
    Cidr::from_parts(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)
}

/**
Group a list of IP address strings into ranges of consecutive addresses.

Addresses are de-duplicated and sorted; each run of arithmetically adjacent
addresses becomes one [IpRange] (a lone address is a range of one). The
ranges display as `"start - end"`.

Fails on the first unparsable entry, and on empty input.
*/
pub fn addresses_to_range_list(input: &[impl AsRef<str>]) -> Result<Vec<IpRange>, AddressError> {
    if input.is_empty() {
        return Err(AddressError::Empty);
    }

    let mut ips: Vec<IpAddr> = input
        .iter()
        .map(|s| {
            s.as_ref()
                .trim()
                .parse::<IpAddr>()
                .map(canonical)
                .map_err(|source| AddressError::Invalid {
                    ip: s.as_ref().into(),
                    source,
                })
        })
        .collect::<Result<Vec<IpAddr>, AddressError>>()?;
    ips = unique(&ips);
    ips.sort();

    let mut out: Vec<IpRange> = Vec::new();
    let mut beg: IpAddr = ips[0];
    let mut end: IpAddr = ips[0];
    for &ip in &ips[1..] {
        if !is_adjacent(end, ip) {
            out.push(IpRange::new(beg, end)?);
            beg = ip;
        }
        end = ip;
    }
    out.push(IpRange::new(beg, end)?);

    Ok(out)
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iptools::{arith::ip_to_u128, increment, parse_cidr};

    const CIDR_30: &str = "192.168.1.0/30";
    const HOSTS: [&str; 4] = ["192.168.1.0", "192.168.1.1", "192.168.1.2", "192.168.1.3"];
    const UNORDERED: [&str; 4] = ["192.168.1.3", "192.168.1.1", "192.168.1.5", "192.168.1.2"];

    /// Host range of a block plus its network and broadcast addresses, in order.
    fn reassemble_block(range: IpRange) -> Vec<IpAddr> {
        let mut out: Vec<IpAddr> = vec![int_to_ip(range.fam(), ip_to_u128(range.beg()) - 1)];
        out.extend(range.iter());
        let (last, overflowed) = increment(range.end());
        assert!(!overflowed);
        out.push(last);
        out
    }

    fn strings<T: ToString>(list: &[T]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_range_to_cidr_list() {
        let out = range_to_cidr_list("192.168.1.1-192.168.1.3").unwrap();
        assert_eq!(strings(&out), ["192.168.1.1/32", "192.168.1.2/32", "192.168.1.3/32"]);

        let out = range_to_cidr_list("10.0.0.0-4").unwrap();
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|c| c.is_host()));

        assert!(range_to_cidr_list("10.0.0.3-10.0.0.1").is_err());
    }

    #[test]
    fn test_cidr_to_range() {
        let r: IpRange = cidr_to_range(CIDR_30).unwrap();
        assert_eq!(r.to_string(), "192.168.1.1 - 192.168.1.2");

        let r: IpRange = cidr_to_range("10.0.0.0/8").unwrap();
        assert_eq!(r.to_string(), "10.0.0.1 - 10.255.255.254");

        let r: IpRange = cidr_to_range("2001:db8::/126").unwrap();
        assert_eq!(r.to_string(), "2001:db8::1 - 2001:db8::2");
    }

    #[test]
    fn test_cidr_to_range_tiny_blocks() {
        for cidr in ["10.0.0.0/31", "10.0.0.1/32", "::/127", "::1/128"] {
            assert!(
                matches!(cidr_to_range(cidr), Err(AddressError::NoUsableHosts(_))),
                "{cidr}"
            );
        }
        assert!(cidr_to_range("10.0.0.0/30").is_ok());
        assert!(cidr_to_range("10.0.0.0/33").is_err());
    }

    #[test]
    fn test_cidr_range_round_trip() {
        for cidr in [CIDR_30, "10.1.2.0/24", "172.16.0.0/20", "0.0.0.0/22", "255.255.255.0/24"] {
            let range: IpRange = cidr_to_range(cidr).unwrap();
            assert_eq!(reassemble_block(range), parse_cidr(cidr).unwrap(), "{cidr}");
        }
    }

    #[test]
    fn test_addresses_to_cidr_list_flat() {
        let out = addresses_to_cidr_list(&HOSTS);
        assert_eq!(
            strings(&out),
            ["192.168.1.0/32", "192.168.1.1/32", "192.168.1.2/32", "192.168.1.3/32"]
        );
    }

    #[test]
    fn test_addresses_to_cidr_list_skips_invalid() {
        let input = ["10.0.0.2", "bogus", "10.0.0.1", "::1", "10.0.0.2", "::ffff:10.0.0.3"];
        let out = addresses_to_cidr_list(&input);
        assert_eq!(strings(&out), ["10.0.0.1/32", "10.0.0.2/32", "10.0.0.3/32"]);

        let none: [&str; 0] = [];
        assert!(addresses_to_cidr_list(&none).is_empty());
    }

    #[test]
    fn test_addresses_to_aggregated_cidr_list() {
        let out = addresses_to_aggregated_cidr_list(&HOSTS);
        assert_eq!(strings(&out), [CIDR_30]);

        let out = addresses_to_aggregated_cidr_list(&["10.0.0.1", "10.0.0.2", "10.0.0.3", "x"]);
        assert_eq!(strings(&out), ["10.0.0.1/32", "10.0.0.2/31"]);
    }

    #[test]
    fn test_aggregated_matches_compaction() {
        let ips: Vec<String> = parse_ip_range("10.0.0.3-10.0.0.29")
            .unwrap()
            .iter()
            .map(|ip| ip.to_string())
            .collect();
        let via_trie = addresses_to_aggregated_cidr_list(ips.as_slice());
        let via_span = crate::iptools::compact_range("10.0.0.3-10.0.0.29".parse().unwrap());
        assert_eq!(via_trie, via_span);
    }

    #[test]
    fn test_addresses_to_range_list() {
        let out = addresses_to_range_list(&UNORDERED).unwrap();
        assert_eq!(
            strings(&out),
            ["192.168.1.1 - 192.168.1.3", "192.168.1.5 - 192.168.1.5"]
        );
    }

    #[test]
    fn test_addresses_to_range_list_edges() {
        let out = addresses_to_range_list(&["10.0.0.255", "10.0.1.0", "10.0.0.255"]).unwrap();
        assert_eq!(strings(&out), ["10.0.0.255 - 10.0.1.0"]);

        let out = addresses_to_range_list(&["::2", "10.0.0.1", "::1"]).unwrap();
        assert_eq!(strings(&out), ["10.0.0.1 - 10.0.0.1", "::1 - ::2"]);

        let none: [&str; 0] = [];
        assert_eq!(addresses_to_range_list(&none), Err(AddressError::Empty));
        assert!(matches!(
            addresses_to_range_list(&["10.0.0.1", "nope"]),
            Err(AddressError::Invalid { .. })
        ));
    }
}
