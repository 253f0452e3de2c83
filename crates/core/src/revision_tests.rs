// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

#[test]
fn known_vector() {
    // echo -n "hello\n" | sha256sum
    let rev = Revision::of("hello\n");
    assert_eq!(
        rev.as_str(),
        "sha256:5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
    );
}

#[test]
fn deterministic() {
    assert_eq!(Revision::of("same"), Revision::of("same"));
}

#[test]
fn distinguishes_content() {
    assert_ne!(Revision::of("a"), Revision::of("b"));
}

#[test]
fn empty_string_has_a_revision() {
    let rev = Revision::of("");
    assert!(rev.as_str().starts_with("sha256:"));
}

#[test]
fn display_matches_as_str() {
    let rev = Revision::of("x");
    assert_eq!(rev.to_string(), rev.as_str());
}

proptest::proptest! {
    #[test]
    fn revision_identity_is_total_and_deterministic(s in ".*") {
        let a = Revision::of(&s);
        let b = Revision::of(&s);
        prop_assert_eq!(a, b);
    }
}
