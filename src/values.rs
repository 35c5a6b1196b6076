//! Invalid argument value tables.
//!
//! Every argument tag maps to a small list of values known to exercise kernel
//! argument validation: boundary integers, addresses at the edge of mapped
//! memory, fds that were never opened. Resolution walks a fixed priority
//! order and the first table whose tag bits are fully present in the slot's
//! mask wins, so `ARG_PTR | ARG_STRUCT_SOCKADDR` resolves to sockaddr values
//! rather than generic pointers.

use std::os::unix::io::RawFd;

use rand::rngs::SmallRng;
use rand::Rng;

use crate::catalog::*;
use crate::guard::GuardPages;

const INT_MAX: u64 = i32::MAX as u64;
const INT_MIN: u64 = i32::MIN as u64;

static EMPTY_FILENAME: &[u8] = b"\0";
static DEVZERO_FILENAME: &[u8] = b"/dev/zero\0";
static DEVNULL_FILENAME: &[u8] = b"/dev/null\0";

// Jump target for function-pointer slots. Must terminate the caller at once
// if the kernel ever transfers control to it.
extern "C" fn clean_exit() {
    unsafe { libc::_exit(0) }
}

/// Number of fresh values drawn for an `ARG_RND` slot per recursion step.
pub const RND_DRAWS: usize = 4;

struct TaggedValues {
    tag: ArgKind,
    values: Vec<u64>,
}

pub struct ValueTable {
    tables: Vec<TaggedValues>,
    edge_addr: u64,
    fenced_addr: u64,
}

impl ValueTable {
    pub fn new(guard: &GuardPages, probe_sockfd: RawFd) -> Self {
        let edge = guard.edge_addr();
        let fenced = guard.fenced_addr();
        let sockfd = probe_sockfd as i64 as u64;

        // Priority order. Earlier rows shadow later ones when a slot mask
        // carries several tag bits.
        let tables = vec![
            tag(ARG_MODE, vec![neg(1), INT_MAX, INT_MIN, !0, 1 << 20]),
            tag(ARG_SOCKFD, vec![sockfd, 0, neg(1), INT_MAX, INT_MIN, !0]),
            tag(ARG_FD, vec![neg(1), INT_MAX, INT_MIN, !0]),
            tag(ARG_DIRFD, vec![neg(1), libc::AT_FDCWD as i64 as u64, INT_MIN, !0]),
            tag(ARG_CLOCKID, vec![neg(1), INT_MAX, INT_MIN, !0, 0xfe23 << 18]),
            tag(ARG_PID, vec![INT_MIN, neg(1), INT_MAX, !0]),
            tag(
                ARG_PTR | ARG_STRUCT_SOCKADDR,
                vec![edge, fenced, 0, neg(1), INT_MAX, INT_MIN],
            ),
            tag(ARG_BRK_ADDR, vec![0, neg(1), INT_MAX, INT_MIN, !0, 4096]),
            tag(ARG_EMPTY_FILENAME, vec![EMPTY_FILENAME.as_ptr() as u64, 0]),
            tag(ARG_DEVZERO_FILENAME, vec![DEVZERO_FILENAME.as_ptr() as u64]),
            tag(ARG_DEVNULL_FILENAME, vec![DEVNULL_FILENAME.as_ptr() as u64]),
            tag(ARG_FLAG, vec![neg(1), neg(2), INT_MIN, 0xffff << 20]),
            tag(ARG_SOCKLEN, vec![0, neg(1), INT_MAX, INT_MIN, 8192]),
            tag(ARG_TIMEOUT, vec![0]),
            tag(ARG_LEN, vec![neg(1), neg(2), INT_MIN, INT_MAX, !0, neg(1 << 31)]),
            tag(ARG_GID, vec![!0, INT_MAX]),
            tag(ARG_UID, vec![!0, INT_MAX]),
            tag(
                ARG_INT,
                vec![
                    0,
                    neg(1),
                    neg(2),
                    INT_MIN,
                    INT_MAX,
                    0xff << 30,
                    1 << 30,
                    neg(0xff << 30),
                    neg(1 << 30),
                ],
            ),
            tag(ARG_UINT, vec![INT_MAX, 0xff << 30, neg(0xff << 30), !0]),
            tag(ARG_FUNC_PTR, vec![clean_exit as u64]),
            tag(
                ARG_NON_NULL_PTR,
                vec![edge, fenced, neg(1), INT_MAX, INT_MIN, !4096],
            ),
            tag(ARG_FUTEX_PTR, vec![edge, fenced]),
            tag(ARG_PTR, vec![edge, fenced, 0, neg(1), INT_MAX, INT_MIN, !4096]),
        ];

        Self {
            tables,
            edge_addr: edge,
            fenced_addr: fenced,
        }
    }

    /// First table whose tag bits are all set in `kind`, or `None` for a
    /// mask no table covers.
    pub fn resolve(&self, kind: ArgKind) -> Option<&[u64]> {
        self.tables
            .iter()
            .find(|t| kind & t.tag == t.tag)
            .map(|t| t.values.as_slice())
    }

    /// Fresh values for an `ARG_RND` slot: two random integers of different
    /// magnitude and both guard addresses.
    pub fn random_values(&self, rng: &mut SmallRng) -> [u64; RND_DRAWS] {
        [
            rng.gen::<u64>(),
            (rng.gen::<u32>() as u64) << 20,
            self.edge_addr,
            self.fenced_addr,
        ]
    }
}

fn tag(tag: ArgKind, values: Vec<u64>) -> TaggedValues {
    TaggedValues { tag, values }
}

// Sign-extended negative constant as a raw argument word.
const fn neg(v: u64) -> u64 {
    v.wrapping_neg()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn table() -> (GuardPages, ValueTable) {
        let guard = GuardPages::new().unwrap();
        let values = ValueTable::new(&guard, -1);
        (guard, values)
    }

    #[test]
    fn every_catalog_tag_resolves() {
        let (_guard, values) = table();
        for spec in SYSCALLS.iter() {
            for &kind in spec.args() {
                if kind == ARG_NONE || kind & ARG_RND == ARG_RND {
                    continue;
                }
                assert!(
                    values.resolve(kind).map_or(false, |v| !v.is_empty()),
                    "unresolvable slot in {}",
                    spec.name()
                );
            }
        }
    }

    #[test]
    fn sockaddr_shadows_plain_pointer() {
        let (guard, values) = table();
        let addrs = values.resolve(ARG_PTR | ARG_STRUCT_SOCKADDR).unwrap();
        assert_eq!(addrs[0], guard.edge_addr());
        assert_eq!(addrs.len(), 6);
        // Plain pointers carry an extra !4096 entry.
        assert_eq!(values.resolve(ARG_PTR).unwrap().len(), 7);
    }

    #[test]
    fn dirfd_list_contains_at_fdcwd() {
        let (_guard, values) = table();
        let dirfds = values.resolve(ARG_DIRFD).unwrap();
        assert!(dirfds.contains(&(libc::AT_FDCWD as i64 as u64)));
    }

    #[test]
    fn filename_values_point_at_nul_terminated_paths() {
        let (_guard, values) = table();
        let empty = values.resolve(ARG_EMPTY_FILENAME).unwrap();
        assert_eq!(unsafe { *(empty[0] as *const u8) }, 0);
        assert_eq!(empty[1], 0);
        let zero = values.resolve(ARG_DEVZERO_FILENAME).unwrap();
        let s = unsafe { std::ffi::CStr::from_ptr(zero[0] as *const libc::c_char) };
        assert_eq!(s.to_bytes(), b"/dev/zero");
    }

    #[test]
    fn random_values_include_guard_addresses() {
        let (guard, values) = table();
        let mut rng = SmallRng::seed_from_u64(7);
        let drawn = values.random_values(&mut rng);
        assert_eq!(drawn[2], guard.edge_addr());
        assert_eq!(drawn[3], guard.fenced_addr());
    }

    #[test]
    fn unknown_mask_does_not_resolve() {
        let (_guard, values) = table();
        assert!(values.resolve(ARG_RND).is_none());
    }
}
