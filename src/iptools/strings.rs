// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

pub(crate) static DASH: &str = "-";
pub(crate) static SLASH: &str = "/";
pub(crate) static RANGE_SEP: &str = " - ";

// mod.rs
pub(crate) static ERR_INVALID_IP: &str = "invalid IP address";
pub(crate) static ERR_RNG_FMT: &str = "invalid range format";
pub(crate) static ERR_START: &str = "invalid start IP in range";
pub(crate) static ERR_END: &str = "invalid end IP in range";
pub(crate) static ERR_RNG_END: &str = "invalid range end value";
pub(crate) static ERR_V4_OCTET: &str = "abbreviated range end overflows the last octet:";
pub(crate) static ERR_RNG_ORDER: &str = "start IP is greater than end IP";
pub(crate) static ERR_RNG_TOOLARGE: &str = "range too large - addresses";
pub(crate) static ERR_MISMATCH: &str = "cannot mix IPv4 and IPv6";
pub(crate) static ERR_ENUM_OVERFLOW: &str = "IP address overflowed while incrementing past";
pub(crate) static ERR_CIDR: &str = "invalid CIDR";
pub(crate) static ERR_NO_HOSTS: &str = "block has no usable host range";
pub(crate) static ERR_EMPTY: &str = "no IP addresses provided";
pub(crate) static ERR_ABBREV_V6: &str = "abbreviated range end is IPv4 only";

// convert.rs
pub(crate) static WARN_SKIP: &str = "skipping invalid IP";
pub(crate) static WARN_SKIP_V6: &str = "skipping non-IPv4 address";
