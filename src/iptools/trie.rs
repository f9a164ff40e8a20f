// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    arith::{canonical, ip_to_u128},
    collapsing::{cidr_to_span, int_to_ip},
    structs::{Cidr, IpFam},
    AddressError,
};
use std::net::IpAddr;

/**
A binary prefix trie over the bits of one IP family.

Each inserted [Cidr] marks the node at depth `prefix` along the path of its
network bits. Besides membership, the trie answers two queries over a block:
- [PrefixTrie::covered_networks]: every stored entry inside the block
- [PrefixTrie::aggregated]: the maximal blocks fully covered by stored entries,
  merging sibling `/n` blocks into their `/(n-1)` parent whenever both are full
*/
pub struct PrefixTrie {
    fam: IpFam,
    root: TrieNode,
    len: usize,
}

#[derive(Default)]
struct TrieNode {
    children: [Option<Box<TrieNode>>; 2],
    is_terminal: bool,
}

impl PrefixTrie {
    pub fn new(fam: IpFam) -> Self {
        Self {
            fam,
            root: TrieNode::default(),
            len: 0,
        }
    }

    pub fn fam(&self) -> IpFam {
        self.fam
    }

    /// Number of distinct entries inserted.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /**
    Insert a block. Returns `false` if the very same block was already present.

    Errors if the block belongs to the other IP family.
    */
    pub fn insert(&mut self, cidr: Cidr) -> Result<bool, AddressError> {
        if cidr.fam() != self.fam {
            return Err(AddressError::Mismatch(int_to_ip(self.fam, 0), cidr.addr()));
        }

        let bits: u8 = self.fam.bits();
        let value: u128 = cidr_to_span(cidr).beg;

        let mut current: &mut TrieNode = &mut self.root;
        for depth in 0..cidr.prefix() {
            let idx: usize = bit_at(value, depth, bits);
            current = current.children[idx].get_or_insert_with(Box::default);
        }

        if current.is_terminal {
            return Ok(false);
        }
        current.is_terminal = true;
        self.len += 1;
        Ok(true)
    }

    /// Whether any stored entry contains `ip`.
    pub fn contains(&self, ip: IpAddr) -> bool {
        let ip: IpAddr = match self.fam {
            IpFam::V4 => canonical(ip),
            IpFam::V6 => ip,
        };
        if IpFam::of(ip) != self.fam {
            return false;
        }

        let bits: u8 = self.fam.bits();
        let value: u128 = ip_to_u128(ip);

        let mut current: &TrieNode = &self.root;
        if current.is_terminal {
            return true;
        }
        for depth in 0..bits {
            match &current.children[bit_at(value, depth, bits)] {
                Some(node) => {
                    current = node;
                    if current.is_terminal {
                        return true;
                    }
                }
                None => return false,
            }
        }
        false
    }

    /**
    All stored entries lying inside `within`, ascending by network address
    (a shorter prefix sorts before its own sub-blocks).

    Entries larger than `within` are not reported even if they overlap it.
    */
    pub fn covered_networks(&self, within: Cidr) -> Vec<Cidr> {
        let mut out: Vec<Cidr> = Vec::new();
        if let (Some((node, value)), _) = self.descend(within) {
            self.collect(node, value, within.prefix(), &mut out);
        }
        out
    }

    /**
    Minimal set of maximal blocks inside `within` whose union equals the
    stored coverage inside `within`. Sibling blocks that are both fully
    covered are merged into their parent, recursively.
    */
    pub fn aggregated(&self, within: Cidr) -> Vec<Cidr> {
        let mut out: Vec<Cidr> = Vec::new();
        match self.descend(within) {
            (_, true) => out.push(within),
            (Some((node, value)), false) => {
                self.aggregate(node, value, within.prefix(), &mut out);
            }
            (None, false) => {}
        }
        out
    }

    /* ---------------------------------- */

    /**
    Walk down to the node standing for `within`. The flag tells whether a
    stored entry strictly above that node already covers all of `within`.
    */
    fn descend(&self, within: Cidr) -> (Option<(&TrieNode, u128)>, bool) {
        if within.fam() != self.fam {
            return (None, false);
        }

        let bits: u8 = self.fam.bits();
        let value: u128 = cidr_to_span(within).beg;

        let mut covered: bool = false;
        let mut current: &TrieNode = &self.root;
        for depth in 0..within.prefix() {
            covered |= current.is_terminal;
            match &current.children[bit_at(value, depth, bits)] {
                Some(node) => current = node,
                None => return (None, covered),
            }
        }
        (Some((current, value)), covered)
    }

    /// Pre-order walk emitting every terminal node.
    fn collect(&self, node: &TrieNode, value: u128, depth: u8, out: &mut Vec<Cidr>) {
        if node.is_terminal {
            out.push(self.cidr_at(value, depth));
        }
        for (idx, child) in node.children.iter().enumerate() {
            if let Some(child) = child {
                let child_value: u128 = self.child_value(value, depth, idx);
                self.collect(child, child_value, depth + 1, out);
            }
        }
    }

    /// Post-order merge. Returns whether the subtree at `node` is fully covered.
    fn aggregate(&self, node: &TrieNode, value: u128, depth: u8, out: &mut Vec<Cidr>) -> bool {
        if node.is_terminal {
            out.push(self.cidr_at(value, depth));
            return true;
        }

        let mark: usize = out.len();
        let mut full: [bool; 2] = [false, false];
        for (idx, child) in node.children.iter().enumerate() {
            if let Some(child) = child {
                let child_value: u128 = self.child_value(value, depth, idx);
                full[idx] = self.aggregate(child, child_value, depth + 1, out);
            }
        }

        if full[0] && full[1] {
            out.truncate(mark);
            out.push(self.cidr_at(value, depth));
            return true;
        }
        false
    }

    #[inline]
    fn child_value(&self, value: u128, depth: u8, idx: usize) -> u128 {
        let shift: u8 = self.fam.bits() - 1 - depth;
        value | ((idx as u128) << shift)
    }

    #[inline]
    fn cidr_at(&self, value: u128, depth: u8) -> Cidr {
        Cidr::from_parts(int_to_ip(self.fam, value), depth)
    }
}

/// Bit `depth` of `value`, counted from the most significant of `bits`.
#[inline]
fn bit_at(value: u128, depth: u8, bits: u8) -> usize {
    ((value >> (bits - 1 - depth)) & 1) as usize
}

/* -------------------------------------------------------------------------- */
