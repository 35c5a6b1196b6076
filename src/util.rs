use nix::unistd::{sysconf, SysconfVar};
use std::sync::atomic::{AtomicBool, Ordering};

static STOP_SOON: AtomicBool = AtomicBool::new(false);

pub fn stop_soon() -> bool {
    STOP_SOON.load(Ordering::Relaxed)
}

pub fn stop_req() {
    STOP_SOON.store(true, Ordering::Relaxed)
}

const DEFAULT_PAGE_SIZE: usize = 4096;

pub fn page_size() -> usize {
    match sysconf(SysconfVar::PAGE_SIZE) {
        Ok(Some(sz)) if sz > 0 => sz as usize,
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// Rounds `len` up to a whole number of pages.
pub fn page_align(len: usize) -> usize {
    let page = page_size();
    (len + page - 1) & !(page - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_align_rounds_up() {
        let page = page_size();
        assert_eq!(page_align(1), page);
        assert_eq!(page_align(page), page);
        assert_eq!(page_align(page + 1), page * 2);
    }
}
