// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small generic helpers over slices and vectors.

use std::{collections::HashSet, hash::Hash};

/// Whether `item` is present in `list`.
#[inline]
pub fn contains<T: PartialEq>(list: &[T], item: &T) -> bool {
    list.iter().any(|x| x == item)
}

/// Distinct elements of `items`, keeping the order of first occurrence.
pub fn unique<T: Eq + Hash + Clone>(items: &[T]) -> Vec<T> {
    let mut seen: HashSet<&T> = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|item| seen.insert(*item))
        .cloned()
        .collect()
}

/**
Append those `elems` which are not yet in `list` (nor earlier in `elems`).

Elements already in `list` are left alone, duplicates included.
*/
pub fn append_unique<T: Eq + Hash + Clone>(list: &mut Vec<T>, elems: &[T]) {
    let mut seen: HashSet<T> = list.iter().cloned().collect();
    for e in elems {
        if seen.insert(e.clone()) {
            list.push(e.clone());
        }
    }
}

/// Remove the first element equal to `item`. Returns whether anything was removed.
pub fn remove_first<T: PartialEq>(list: &mut Vec<T>, item: &T) -> bool {
    match list.iter().position(|x| x == item) {
        Some(idx) => {
            list.remove(idx);
            true
        }
        None => false,
    }
}

/// Drop every element equal to `T::default()`, e.g. empty strings or zeroes.
pub fn delete_empty<T: Default + PartialEq>(list: Vec<T>) -> Vec<T> {
    let empty: T = T::default();
    list.into_iter().filter(|x| *x != empty).collect()
}

/* -------------------------------------------------------------------------- */
