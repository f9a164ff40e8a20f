// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
IP address space utilities: parse addresses, CIDR blocks and ranges (both
`a.b.c.d-e.f.g.h` and the abbreviated `a.b.c.d-N`), enumerate them, convert
between the forms, aggregate address lists, and classify addresses as
private or publicly routable.

```ignore
use ipspace::{cidr_to_range, parse_ip_range, is_public_ip};

assert_eq!(parse_ip_range("10.0.0.1-3")?.len(), 3);
assert_eq!(cidr_to_range("192.168.1.0/30")?.to_string(), "192.168.1.1 - 192.168.1.2");
assert!(!is_public_ip("127.0.0.1"));
```
*/

pub mod iptools;
pub mod netcheck;
pub mod slices;

pub use iptools::*;
pub use netcheck::{can_dial, ResolveCache};
