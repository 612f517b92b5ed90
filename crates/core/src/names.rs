// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Random human-readable project names

const LEFT: &[&str] = &[
    "admiring", "agitated", "amazing", "bold", "brave", "busy", "calm", "clever", "cool",
    "dazzling", "eager", "elastic", "festive", "focused", "gallant", "happy", "hungry", "jolly",
    "keen", "lucid", "modest", "nifty", "quirky", "serene", "sharp", "stoic", "tender", "vivid",
    "wizardly", "zealous",
];

const RIGHT: &[&str] = &[
    "albattani", "babbage", "bardeen", "bohr", "curie", "darwin", "einstein", "euclid", "fermat",
    "galileo", "goodall", "hopper", "hypatia", "kepler", "lamport", "lovelace", "mccarthy",
    "meitner", "newton", "noether", "pascal", "ritchie", "shannon", "thompson", "torvalds",
    "turing", "wozniak", "yalow",
];

/// Generate a name such as `brave_turing3`
///
/// The numeric suffix (0..=9) widens the name space; collisions are still
/// possible and are caught by the project name check.
pub fn random_name() -> String {
    let bytes = *uuid::Uuid::new_v4().as_bytes();
    pick(bytes[0], bytes[1], bytes[2])
}

fn pick(left: u8, right: u8, suffix: u8) -> String {
    format!(
        "{}_{}{}",
        LEFT[left as usize % LEFT.len()],
        RIGHT[right as usize % RIGHT.len()],
        suffix % 10
    )
}
