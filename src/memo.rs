//! Outcome memo: a chained hash table of (syscall, argument vector)
//! combinations that are already known to crash the test child or to
//! return zero despite the deliberately invalid input.
//!
//! The supervisor owns one long-lived memo holding only `Crashed`
//! entries; every test generation starts from a [`snapshot`] of it.
//! The generation worker may add private `ErrnoZero` entries to its
//! snapshot, which die with the worker. Only the supervisor inserts
//! `Crashed` records, after reaping a worker that died mid-call.
//!
//! [`snapshot`]: OutcomeMemo::snapshot

/// Bucket count of the memo table. Prime.
pub const MEMO_BUCKETS: u64 = 10007;

pub const ARGS_LEN: usize = 6;

/// How one tested combination ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The call returned control normally (with or without an error code).
    Fail,
    /// The process died while this call was in flight.
    Crashed,
    /// The call returned 0 despite the invalid arguments.
    ErrnoZero,
}

impl Outcome {
    pub(crate) fn as_u64(self) -> u64 {
        match self {
            Outcome::Fail => 0,
            Outcome::Crashed => 1,
            Outcome::ErrnoZero => 2,
        }
    }

    pub(crate) fn from_u64(v: u64) -> Option<Outcome> {
        match v {
            0 => Some(Outcome::Fail),
            1 => Some(Outcome::Crashed),
            2 => Some(Outcome::ErrnoZero),
            _ => None,
        }
    }
}

/// Unreduced hash: seed with the syscall number, then per argument word
/// rotate right by two bit positions and xor the word in.
#[inline]
pub fn combo_hash_raw(nr: u64, args: &[u64; ARGS_LEN]) -> u64 {
    let mut hash = nr;
    for &arg in args {
        hash = hash.rotate_right(2) ^ arg;
    }
    hash
}

/// Bucket index of a (syscall, argument vector) combination.
#[inline]
pub fn combo_hash(nr: u64, args: &[u64; ARGS_LEN]) -> u64 {
    combo_hash_raw(nr, args) % MEMO_BUCKETS
}

#[derive(Debug, Clone)]
struct MemoEntry {
    nr: u64,
    args: [u64; ARGS_LEN],
    outcome: Outcome,
}

#[derive(Debug, Clone)]
pub struct OutcomeMemo {
    buckets: Box<[Vec<MemoEntry>]>,
}

impl Default for OutcomeMemo {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeMemo {
    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); MEMO_BUCKETS as usize].into_boxed_slice(),
        }
    }

    /// Classification of a combination, or `None` if it was never recorded.
    /// Stops at the first structural match of syscall number plus argument
    /// vector, independent of how many times the combination was added.
    pub fn lookup(&self, nr: u64, args: &[u64; ARGS_LEN]) -> Option<Outcome> {
        let bucket = &self.buckets[combo_hash(nr, args) as usize];
        bucket
            .iter()
            .find(|e| e.nr == nr && e.args == *args)
            .map(|e| e.outcome)
    }

    /// Prepends a new record to its bucket chain. No dedup on insert.
    pub fn insert(&mut self, hash: u64, nr: u64, args: [u64; ARGS_LEN], outcome: Outcome) {
        let bucket = &mut self.buckets[(hash % MEMO_BUCKETS) as usize];
        bucket.insert(0, MemoEntry { nr, args, outcome });
    }

    /// Drops every record. The generation worker calls this once per full
    /// catalog pass so memory stays bounded within a long-lived worker.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }
    }

    /// Deep copy handed to a freshly forked generation worker. Entries the
    /// worker adds afterwards are never observed by the owner of `self`.
    pub fn snapshot(&self) -> OutcomeMemo {
        self.clone()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARGS: [u64; ARGS_LEN] = [1, 0xdead_c0de, u64::MAX, 0, 4096, 2];

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(combo_hash(39, &ARGS), combo_hash(39, &ARGS));
        assert_eq!(combo_hash_raw(39, &ARGS), combo_hash_raw(39, &ARGS));
        assert!(combo_hash(39, &ARGS) < MEMO_BUCKETS);
    }

    #[test]
    fn hash_changes_with_every_word() {
        let base = combo_hash(39, &ARGS);
        let base_raw = combo_hash_raw(39, &ARGS);
        for slot in 0..ARGS_LEN {
            let mut changed = ARGS;
            changed[slot] ^= 1 << (slot * 7);
            // A single-bit change differs from the base by a power of two,
            // which the prime bucket count can never absorb.
            assert_ne!(combo_hash_raw(39, &changed), base_raw, "slot {}", slot);
            assert_ne!(combo_hash(39, &changed), base, "slot {}", slot);
        }
        assert_ne!(combo_hash_raw(40, &ARGS), base_raw);
    }

    #[test]
    fn lookup_matches_exact_combination_only() {
        let mut memo = OutcomeMemo::new();
        let hash = combo_hash(39, &ARGS);
        memo.insert(hash, 39, ARGS, Outcome::Crashed);

        assert_eq!(memo.lookup(39, &ARGS), Some(Outcome::Crashed));
        assert_eq!(memo.lookup(40, &ARGS), None);
        let mut other = ARGS;
        other[5] += 1;
        assert_eq!(memo.lookup(39, &other), None);
    }

    #[test]
    fn duplicate_inserts_are_tolerated() {
        let mut memo = OutcomeMemo::new();
        let hash = combo_hash(2, &ARGS);
        memo.insert(hash, 2, ARGS, Outcome::ErrnoZero);
        memo.insert(hash, 2, ARGS, Outcome::ErrnoZero);
        assert_eq!(memo.len(), 2);
        assert_eq!(memo.lookup(2, &ARGS), Some(Outcome::ErrnoZero));
    }

    #[test]
    fn clear_releases_everything() {
        let mut memo = OutcomeMemo::new();
        memo.insert(combo_hash(2, &ARGS), 2, ARGS, Outcome::ErrnoZero);
        assert!(!memo.is_empty());
        memo.clear();
        assert!(memo.is_empty());
        assert_eq!(memo.lookup(2, &ARGS), None);
    }

    #[test]
    fn snapshot_isolates_worker_entries() {
        let mut parent = OutcomeMemo::new();
        parent.insert(combo_hash(39, &ARGS), 39, ARGS, Outcome::Crashed);

        // The worker inherits crash records...
        let mut worker = parent.snapshot();
        assert_eq!(worker.lookup(39, &ARGS), Some(Outcome::Crashed));

        // ...but its own zero-errno records never flow back.
        let zeroed = [7, 7, 7, 7, 7, 7];
        worker.insert(combo_hash(2, &zeroed), 2, zeroed, Outcome::ErrnoZero);
        assert_eq!(parent.lookup(2, &zeroed), None);

        // The next generation starts from the parent state again.
        let next = parent.snapshot();
        assert_eq!(next.lookup(2, &zeroed), None);
        assert_eq!(next.lookup(39, &ARGS), Some(Outcome::Crashed));
    }
}
