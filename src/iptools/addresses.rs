// Copyright (c) 2025 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    arith::{canonical, increment, parse_address},
    strings::*,
    structs::{Cidr, IpRange},
    AddressError, MAX_RANGE_SIZE,
};
use std::net::{IpAddr, Ipv4Addr};
use tracing::trace;

static IP_DELIMS: &[char] = &['.', ':'];

/**
Parse an IP address, CIDR, or IP range from a string and return all individual IPs.

Supported formats:
- Single IP: 10.10.10.1
- CIDR: 10.10.10.0/28 (whole block, network and broadcast included)
- Short range: 10.10.10.1-10 (10 addresses starting at .1)
- Full range: 10.10.10.1-10.10.10.10

NOTE: refuses to generate more than [MAX_RANGE_SIZE] addresses.
*/
pub fn parse_ip_or_range(arg: impl AsRef<str>) -> Result<Vec<IpAddr>, AddressError> {
    let arg: &str = arg.as_ref().trim();

    if let Ok(ip) = arg.parse::<IpAddr>() {
        return Ok(vec![ip]);
    }

    if arg.contains(SLASH) {
        return parse_cidr(arg);
    }

    if arg.contains(DASH) {
        return parse_ip_range(arg);
    }

    parse_address(arg).map(|ip| vec![ip])
}

/**
Parse an IP range in the format:
- 10.10.10.1-5 (short form: 5 addresses starting at the start IP, last octet only)
- 10.10.10.1-10.10.10.10 (full form)

v4-mapped IPv6 endpoints are normalized to IPv4. The short form is IPv4 only.

### Returns
- [IpRange] struct with start and end IP addresses (inclusive).
*/
pub fn parse_range(arg: impl AsRef<str>) -> Result<IpRange, AddressError> {
    let parts: Vec<&str> = arg.as_ref().split(DASH).collect();
    if parts.len() != 2 {
        return Err(AddressError::InvalidRangeFmt(arg.as_ref().into()));
    }

    let beg_str: &str = parts[0].trim();
    let end_str: &str = parts[1].trim();

    let beg_ip: IpAddr = beg_str
        .parse::<IpAddr>()
        .map(canonical)
        .map_err(|source| AddressError::InvalidRangeBegIp {
            beg: beg_str.into(),
            source,
        })?;

    // Determine if this is short form (just a number) or full IP
    let end_ip: IpAddr = if end_str.contains(IP_DELIMS) {
        end_str
            .parse::<IpAddr>()
            .map(canonical)
            .map_err(|source| AddressError::InvalidRangeEndIp {
                end: end_str.into(),
                source,
            })?
    } else {
        parse_short_range_end(arg.as_ref(), beg_ip, end_str)?
    };

    IpRange::new(beg_ip, end_ip)
}

/// Parse short-form range end (e.g., "10" in "192.168.1.1-10"): `N` addresses from start.
fn parse_short_range_end(arg: &str, beg_ip: IpAddr, end_str: &str) -> Result<IpAddr, AddressError> {
    let count: u32 = end_str
        .parse()
        .map_err(|source| AddressError::InvalidRangeEndVal {
            val: end_str.into(),
            source,
        })?;

    let start_v4: Ipv4Addr = match beg_ip {
        IpAddr::V4(v4) => v4,
        IpAddr::V6(_) => {
            trace!("{ERR_ABBREV_V6}: {arg}");
            return Err(AddressError::InvalidRangeFmt(arg.into()));
        }
    };
    if count == 0 {
        return Err(AddressError::InvalidRangeFmt(arg.into()));
    }

    // the octet bumped by N must itself stay within 0..=255
    let octets: [u8; 4] = start_v4.octets();
    let bumped: u64 = octets[3] as u64 + count as u64;
    if bumped > u8::MAX as u64 {
        return Err(AddressError::OctetOverflow(bumped));
    }
    let last: u8 = (bumped - 1) as u8;
    Ok(IpAddr::V4(Ipv4Addr::new(octets[0], octets[1], octets[2], last)))
}

/**
Parse an IP range and enumerate every address in it, start and end included.

Errors on malformed input, start > end, or ranges larger than [MAX_RANGE_SIZE].
For larger ranges use [IpRange::iter] instead.
*/
pub fn parse_ip_range(arg: impl AsRef<str>) -> Result<Vec<IpAddr>, AddressError> {
    enumerate_range(parse_range(arg)?)
}

/// Materialize `[beg, end]` by repeated [increment].
pub fn enumerate_range(range: IpRange) -> Result<Vec<IpAddr>, AddressError> {
    let count: u128 = range.len();
    if count > MAX_RANGE_SIZE {
        return Err(AddressError::RangeTooLarge(count));
    }

    let mut out: Vec<IpAddr> = Vec::with_capacity(count as usize);
    let mut ip: IpAddr = range.beg();
    loop {
        out.push(ip);
        if ip == range.end() {
            break;
        }
        ip = match increment(ip) {
            (next, false) => next,
            (_, true) => return Err(AddressError::EnumerationOverflow(ip)),
        };
    }

    trace!("enumerated {} addresses in {range}", out.len());
    Ok(out)
}

/**
Parse a CIDR block and enumerate every address in it, network and
broadcast addresses included.

Errors on malformed input or blocks larger than [MAX_RANGE_SIZE].
For larger blocks use [Cidr::iter] instead.
*/
pub fn parse_cidr(arg: impl AsRef<str>) -> Result<Vec<IpAddr>, AddressError> {
    let cidr: Cidr = arg.as_ref().parse()?;
    let count: u128 = cidr.len();
    if count > MAX_RANGE_SIZE {
        return Err(AddressError::RangeTooLarge(count));
    }

    let out: Vec<IpAddr> = cidr.iter().collect();
    trace!("enumerated {} addresses in {cidr}", out.len());
    Ok(out)
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iptools::ErrorKind;

    const TEST_1: &str = "192.168.1.1";
    const TEST_3: &str = "10.0.0.1";
    const TEST_4: &str = "10.0.0.5";
    const CIDR_1: &str = "192.168.1.0/30";
    const RANGE_1: &str = "10.0.0.1-5";
    const RANGE_2: &str = "10.0.0.1-10.0.0.5";
    const BAD_RANGE: &str = "10.0.0.5-10.0.0.1";
    const BIG_RANGE_V4: &str = "10.0.0.0/16";

    const TEST_V6_1: &str = "::1";
    const TEST_V6_3: &str = "::ffff";
    const RANGE_V6: &str = "::1-5";
    const BAD_RANGE_V6: &str = "::5-::1";
    const BIG_RANGE_V6: &str = "::1-::ffff";
    const TOOBIG_V6: &str = "::-::1:0:0"; // 2^32 + 1 addresses
    const TOOBIG_CIDR_V6: &str = "2001:db8::/64";

    fn ips(list: &[&str]) -> Vec<IpAddr> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_parse_single_ip() {
        let result: Vec<IpAddr> = parse_ip_or_range(TEST_1).unwrap();
        assert_eq!(result, ips(&[TEST_1]));
    }

    #[test]
    fn test_parse_cidr() {
        let result: Vec<IpAddr> = parse_cidr(CIDR_1).unwrap();
        let expected = ips(&["192.168.1.0", "192.168.1.1", "192.168.1.2", "192.168.1.3"]);
        assert_eq!(result, expected);
        assert_eq!(parse_ip_or_range(CIDR_1).unwrap(), expected);
    }

    #[test]
    fn test_parse_cidr_sizes() {
        for prefix in [24u8, 28, 30, 31, 32] {
            let cidr: String = format!("172.16.5.0/{prefix}");
            let result: Vec<IpAddr> = parse_cidr(&cidr).unwrap();
            assert_eq!(result.len(), 1usize << (32 - prefix), "{cidr}");
        }
        assert_eq!(parse_cidr("10.9.8.7/32").unwrap(), ips(&["10.9.8.7"]));
        assert_eq!(parse_cidr("::/120").unwrap().len(), 256);
    }

    #[test]
    fn test_parse_cidr_errors() {
        assert!(matches!(
            parse_cidr("10.0.0.0/40"),
            Err(AddressError::InvalidCidr { .. })
        ));
        assert!(parse_cidr("not-a-cidr").is_err());
        assert_eq!(
            parse_cidr(TOOBIG_CIDR_V6).unwrap_err().kind(),
            ErrorKind::Overflow
        );
    }

    #[test]
    fn test_parse_short_range() {
        let result: Vec<IpAddr> = parse_ip_range(RANGE_1).unwrap();
        assert_eq!(result.len(), 5);
        assert_eq!(result[0], TEST_3.parse::<IpAddr>().unwrap());
        assert_eq!(result[4], TEST_4.parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_short_and_full_forms_agree() {
        let expected = ips(&["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4", "10.0.0.5"]);
        assert_eq!(parse_ip_range(RANGE_1).unwrap(), expected);
        assert_eq!(parse_ip_range(RANGE_2).unwrap(), expected);
        assert_eq!(parse_ip_or_range(RANGE_2).unwrap(), expected);
    }

    #[test]
    fn test_short_range_is_inclusive_of_n() {
        assert_eq!(parse_ip_range("10.0.0.10-3").unwrap(), ips(&["10.0.0.10", "10.0.0.11", "10.0.0.12"]));
        assert_eq!(parse_ip_range("10.0.0.254-1").unwrap(), ips(&["10.0.0.254"]));
        assert_eq!(parse_ip_range("10.0.0.250-5").unwrap().len(), 5);
    }

    #[test]
    fn test_single_ip_range() {
        assert_eq!(parse_ip_range("10.0.0.1-10.0.0.1").unwrap(), ips(&[TEST_3]));
    }

    #[test]
    fn test_range_across_octets() {
        let result = parse_ip_range("10.0.0.254-10.0.1.1").unwrap();
        assert_eq!(result, ips(&["10.0.0.254", "10.0.0.255", "10.0.1.0", "10.0.1.1"]));
    }

    #[test]
    fn test_big_v4() {
        let result: Vec<IpAddr> = parse_ip_or_range(BIG_RANGE_V4).unwrap();
        assert_eq!(result.len(), 2usize.pow(16));
    }

    #[test]
    fn test_ipv6_full_range() {
        let result: Vec<IpAddr> = parse_ip_range(BIG_RANGE_V6).unwrap();
        assert_eq!(result.len(), 65535);
        assert_eq!(result[0], TEST_V6_1.parse::<IpAddr>().unwrap());
        assert_eq!(result[65534], TEST_V6_3.parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_ipv6_short_range_rejected() {
        assert!(matches!(
            parse_range(RANGE_V6),
            Err(AddressError::InvalidRangeFmt(_))
        ));
    }

    #[test]
    fn test_mapped_endpoints_normalized() {
        let r: IpRange = parse_range("::ffff:10.0.0.1-10.0.0.3").unwrap();
        assert_eq!(r.beg(), TEST_3.parse::<IpAddr>().unwrap());
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn test_invalid_range_order() {
        let result = parse_ip_range(BAD_RANGE);
        assert!(matches!(result, Err(AddressError::RangeOrder(_, _))));
        let result = parse_ip_range(BAD_RANGE_V6);
        assert!(matches!(result, Err(AddressError::RangeOrder(_, _))));
    }

    #[rustfmt::skip]
    #[test]
    fn test_malformed_ranges() {
        assert!(matches!(parse_range("10.0.0.256-10.0.0.260"), Err(AddressError::InvalidRangeBegIp { .. })));
        assert!(matches!(parse_range("10.0.0.1-10.0.0.260"),   Err(AddressError::InvalidRangeEndIp { .. })));
        assert!(matches!(parse_range("10.0.0.1-XYZ"),          Err(AddressError::InvalidRangeEndVal { .. })));
        assert!(matches!(parse_range("10.0.0.1--1"),           Err(AddressError::InvalidRangeFmt(_))));
        assert!(matches!(parse_range("10.0.0.1--10.0.0.5"),    Err(AddressError::InvalidRangeFmt(_))));
        assert!(matches!(parse_range("10.0.0.1"),              Err(AddressError::InvalidRangeFmt(_))));
        assert!(matches!(parse_range("10.0.0.1-0"),            Err(AddressError::InvalidRangeFmt(_))));
        assert!(matches!(parse_range("10.0.0.1-::5"),          Err(AddressError::Mismatch(_, _))));
    }

    #[test]
    fn test_short_range_octet_overflow() {
        assert_eq!(parse_range("10.0.0.1-300"), Err(AddressError::OctetOverflow(301)));
        assert_eq!(parse_range("10.0.0.250-7"), Err(AddressError::OctetOverflow(257)));
        // last octet + N reaching 256 is rejected even when the end would be .255
        assert_eq!(parse_range("10.0.0.255-1"), Err(AddressError::OctetOverflow(256)));
        assert_eq!(parse_range("10.0.0.250-6"), Err(AddressError::OctetOverflow(256)));
    }

    #[test]
    fn test_toobig_v4() {
        for input in ["0.0.0.0/0", "10.0.0.0/7", "0.0.0.0-255.255.255.255"] {
            let err = parse_ip_or_range(input).unwrap_err();
            assert!(matches!(err, AddressError::RangeTooLarge(_)), "{input}");
        }
        assert_eq!(
            parse_cidr("0.0.0.0/0"),
            Err(AddressError::RangeTooLarge(1u128 << 32))
        );
        let whole: IpRange = parse_range("0.0.0.0-255.255.255.255").unwrap();
        assert!(enumerate_range(whole).is_err());
    }

    #[test]
    fn test_toobig_v6() {
        let result = parse_ip_range(TOOBIG_V6);
        assert!(matches!(result, Err(AddressError::RangeTooLarge(_))));
        // the lazy iterator has no such limit
        let r: IpRange = parse_range(TOOBIG_V6).unwrap();
        assert_eq!(r.iter().take(3).count(), 3);
    }

    #[test]
    fn test_parse_ip_or_range_invalid() {
        assert!(matches!(
            parse_ip_or_range("bogus"),
            Err(AddressError::Invalid { .. })
        ));
    }
}
