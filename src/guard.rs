//! Guard-page regions handed out as pointer argument values.
//!
//! Two mappings are kept for the whole run:
//!   * a two-page region whose second page is `PROT_NONE`; `edge_addr` points
//!     at the last readable byte, so any multi-byte access through it faults,
//!   * a single `PROT_NONE` page, where even a one-byte access faults.

use std::os::unix::io::RawFd;
use std::ptr;

use nix::sys::mman::{mmap, mprotect, munmap, MapFlags, ProtFlags};

use crate::util::page_size;

pub struct GuardPages {
    small: *mut libc::c_void,
    fenced: *mut libc::c_void,
    page_size: usize,
}

impl GuardPages {
    pub fn new() -> nix::Result<Self> {
        let page_size = page_size();
        let rw = ProtFlags::PROT_READ | ProtFlags::PROT_WRITE;
        let flags = MapFlags::MAP_PRIVATE | MapFlags::MAP_ANONYMOUS;

        let small = unsafe { mmap(ptr::null_mut(), page_size * 2, rw, flags, -1 as RawFd, 0)? };
        if let Err(e) = unsafe {
            mprotect(
                (small as usize + page_size) as *mut libc::c_void,
                page_size,
                ProtFlags::PROT_NONE,
            )
        } {
            unsafe { munmap(small, page_size * 2).ok() };
            return Err(e);
        }

        let fenced = match unsafe {
            mmap(
                ptr::null_mut(),
                page_size,
                ProtFlags::PROT_NONE,
                flags,
                -1 as RawFd,
                0,
            )
        } {
            Ok(p) => p,
            Err(e) => {
                unsafe { munmap(small, page_size * 2).ok() };
                return Err(e);
            }
        };

        Ok(Self {
            small,
            fenced,
            page_size,
        })
    }

    /// Last readable byte of the two-page region.
    #[inline]
    pub fn edge_addr(&self) -> u64 {
        (self.small as u64) + (self.page_size as u64) - 1
    }

    /// Start of the fully inaccessible page.
    #[inline]
    pub fn fenced_addr(&self) -> u64 {
        self.fenced as u64
    }
}

impl Drop for GuardPages {
    fn drop(&mut self) {
        unsafe {
            munmap(self.small, self.page_size * 2).ok();
            munmap(self.fenced, self.page_size).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_byte_is_readable() {
        let guard = GuardPages::new().unwrap();
        let byte = unsafe { std::ptr::read_volatile(guard.edge_addr() as *const u8) };
        // Anonymous mappings are zero-filled.
        assert_eq!(byte, 0);
    }

    #[test]
    fn regions_are_page_aligned_and_distinct() {
        let guard = GuardPages::new().unwrap();
        let ps = page_size() as u64;
        assert_eq!(guard.fenced_addr() % ps, 0);
        assert_eq!((guard.edge_addr() + 1) % ps, 0);
        assert_ne!(guard.fenced_addr(), guard.edge_addr() + 1);
    }
}
