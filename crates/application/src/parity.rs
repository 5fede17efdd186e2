//! Equivalence relations for comparing two resolvers' answers.
//!
//! Address-like results are compared as multisets, singletons for equality
//! and priority-significant results position by position on the ordering
//! key only, since equal keys may legitimately come back in any order.

use ferrous_resolver_domain::{AddressRecord, MxRecord, SrvLookup};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation}: {detail}")]
pub struct ParityMismatch {
    pub operation: &'static str,
    pub detail: String,
}

impl ParityMismatch {
    fn new(operation: &'static str, detail: String) -> Self {
        Self { operation, detail }
    }
}

/// True when both slices hold the same elements with the same
/// multiplicities, in any order.
pub fn consist_of<T: Eq + Hash>(ours: &[T], reference: &[T]) -> bool {
    if ours.len() != reference.len() {
        return false;
    }
    let mut counts: HashMap<&T, isize> = HashMap::new();
    for item in ours {
        *counts.entry(item).or_default() += 1;
    }
    for item in reference {
        *counts.entry(item).or_default() -= 1;
    }
    counts.values().all(|&n| n == 0)
}

/// Reverse, host, NS and TXT lookups.
pub fn check_consist_of<T: Eq + Hash + Debug>(
    operation: &'static str,
    ours: &[T],
    reference: &[T],
) -> Result<(), ParityMismatch> {
    if consist_of(ours, reference) {
        Ok(())
    } else {
        Err(ParityMismatch::new(
            operation,
            format!("{:?} is not a permutation of {:?}", ours, reference),
        ))
    }
}

/// Canonical name and port lookups.
pub fn check_equal<T: PartialEq + Debug>(
    operation: &'static str,
    ours: &T,
    reference: &T,
) -> Result<(), ParityMismatch> {
    if ours == reference {
        Ok(())
    } else {
        Err(ParityMismatch::new(
            operation,
            format!("{:?} != {:?}", ours, reference),
        ))
    }
}

/// IP address lookups compare addresses in order. TTLs are ignored, they
/// count down between two queries.
pub fn check_ip_addrs(
    ours: &[AddressRecord],
    reference: &[AddressRecord],
) -> Result<(), ParityMismatch> {
    let ours: Vec<_> = ours.iter().map(|r| r.ip).collect();
    let reference: Vec<_> = reference.iter().map(|r| r.ip).collect();
    check_equal("ip", &ours, &reference)
}

/// MX lookups: same length and the same preference at every position.
pub fn check_mx(ours: &[MxRecord], reference: &[MxRecord]) -> Result<(), ParityMismatch> {
    if ours.len() != reference.len() {
        return Err(ParityMismatch::new(
            "mx",
            format!("{} records, expected {}", ours.len(), reference.len()),
        ));
    }
    for (index, (a, b)) in ours.iter().zip(reference).enumerate() {
        if a.preference != b.preference {
            return Err(ParityMismatch::new(
                "mx",
                format!(
                    "preference {} at position {}, expected {}",
                    a.preference, index, b.preference
                ),
            ));
        }
    }
    Ok(())
}

/// SRV lookups: equal canonical names, the same record multiset and the same
/// priority at every position.
pub fn check_srv(ours: &SrvLookup, reference: &SrvLookup) -> Result<(), ParityMismatch> {
    check_equal("srv", &ours.canonical_name, &reference.canonical_name)?;
    check_consist_of("srv", &ours.records, &reference.records)?;
    for (index, (a, b)) in ours.records.iter().zip(&reference.records).enumerate() {
        if a.priority != b.priority {
            return Err(ParityMismatch::new(
                "srv",
                format!(
                    "priority {} at position {}, expected {}",
                    a.priority, index, b.priority
                ),
            ));
        }
    }
    Ok(())
}
