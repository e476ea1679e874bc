// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

crate::define_id! {
    /// Test-only id type.
    pub struct TestId("tst-");
}

#[test]
fn generated_ids_carry_prefix() {
    let id = TestId::new();
    assert!(id.as_str().starts_with("tst-"));
}

#[test]
fn generated_ids_are_unique() {
    assert_ne!(TestId::new(), TestId::new());
}

#[test]
fn from_string_round_trips() {
    let id = TestId::from_string("tst-abc123");
    assert_eq!(id.as_str(), "tst-abc123");
    assert_eq!(id.to_string(), "tst-abc123");
}
