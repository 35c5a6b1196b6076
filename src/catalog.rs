//! Catalog of target system calls.
//!
//! Each entry names one syscall plus a semantic tag per argument slot; the
//! tags select which invalid values get substituted during a permutation
//! sweep. A syscall number may appear more than once with different tag
//! interpretations (e.g. `getrlimit` once with a random resource id, once
//! with plain integers) to probe alternate calling conventions.
//!
//! Deliberately absent: calls that would take down the test child or its
//! session in uninteresting ways (exit, kill, reboot, rmdir, munmap, ...).

use iota::iota;

/// Bitmask classifying what an argument slot represents.
pub type ArgKind = u64;

/// Reserved: slot carries no argument, substitute a single zero.
pub const ARG_NONE: ArgKind = 0;

iota! {
    pub const ARG_PTR: ArgKind = 1 << (iota);
    , ARG_INT
    , ARG_UINT
    , ARG_SOCKFD
    , ARG_STRUCT_SOCKADDR
    , ARG_SOCKLEN
    , ARG_FLAG
    , ARG_BRK_ADDR
    , ARG_MODE
    , ARG_LEN
    , ARG_BPF_ATTR
    , ARG_EMPTY_FILENAME
    , ARG_DEVZERO_FILENAME
    , ARG_DEVNULL_FILENAME
    , ARG_CLOCKID
    , ARG_FUNC_PTR
    , ARG_FD
    , ARG_TIMEOUT
    , ARG_DIRFD
    , ARG_RND              // reserved: draw fresh values per recursive entry
    , ARG_PID
    , ARG_NON_NULL_PTR
    , ARG_GID
    , ARG_UID
    , ARG_FUTEX_PTR
}

pub const MAX_ARGS: usize = 6;

/// One catalog entry: syscall number, display name and per-slot tags.
#[derive(Debug, Clone)]
pub struct SyscallSpec {
    nr: u64,
    name: &'static str,
    args: &'static [ArgKind],
}

impl SyscallSpec {
    pub const fn new(nr: u64, name: &'static str, args: &'static [ArgKind]) -> Self {
        Self { nr, name, args }
    }

    #[inline(always)]
    pub fn nr(&self) -> u64 {
        self.nr
    }

    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub fn args(&self) -> &'static [ArgKind] {
        self.args
    }

    #[inline(always)]
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }
}

macro_rules! sys {
    ($nr:ident, $name:literal $(, $arg:expr)* $(,)?) => {
        SyscallSpec::new(libc::$nr as u64, $name, &[$($arg),*])
    };
}

lazy_static! {
    /// The full target catalog, populated once at start-up.
    pub static ref SYSCALLS: Vec<SyscallSpec> = build_catalog();
}

#[rustfmt::skip]
fn build_catalog() -> Vec<SyscallSpec> {
    let mut calls = vec![
        sys!(SYS_accept, "accept", ARG_SOCKFD, ARG_PTR | ARG_STRUCT_SOCKADDR, ARG_PTR),
        sys!(SYS_accept4, "accept4", ARG_SOCKFD, ARG_PTR | ARG_STRUCT_SOCKADDR, ARG_PTR, ARG_FLAG),
        sys!(SYS_acct, "acct", ARG_PTR | ARG_EMPTY_FILENAME),
        sys!(SYS_add_key, "add_key", ARG_PTR, ARG_PTR, ARG_PTR, ARG_LEN, ARG_UINT),
        sys!(SYS_adjtimex, "adjtimex", ARG_PTR),
        sys!(SYS_bind, "bind", ARG_SOCKFD, ARG_PTR | ARG_STRUCT_SOCKADDR, ARG_SOCKLEN),
        sys!(SYS_bpf, "bpf", ARG_INT, ARG_PTR | ARG_BPF_ATTR, ARG_LEN),
        sys!(SYS_brk, "brk", ARG_PTR | ARG_BRK_ADDR),
        sys!(SYS_capget, "capget", ARG_INT, ARG_PTR),
        sys!(SYS_capset, "capset", ARG_INT, ARG_PTR),
        sys!(SYS_chdir, "chdir", ARG_PTR | ARG_EMPTY_FILENAME),
        sys!(SYS_chdir, "chdir", ARG_PTR | ARG_DEVZERO_FILENAME),
        sys!(SYS_chroot, "chroot", ARG_PTR | ARG_EMPTY_FILENAME),
        sys!(SYS_chroot, "chroot", ARG_PTR | ARG_DEVZERO_FILENAME),
        sys!(SYS_clock_getres, "clock_getres", ARG_CLOCKID, ARG_PTR),
        sys!(SYS_clock_gettime, "clock_gettime", ARG_CLOCKID, ARG_PTR),
        sys!(SYS_clock_nanosleep, "clock_nanosleep", ARG_CLOCKID, ARG_UINT, ARG_PTR, ARG_PTR),
        sys!(SYS_clock_settime, "clock_settime", ARG_CLOCKID, ARG_PTR),
        sys!(SYS_clone, "clone", ARG_FUNC_PTR, ARG_PTR, ARG_INT, ARG_PTR, ARG_PTR, ARG_PTR),
        sys!(SYS_clone3, "clone3", ARG_PTR, ARG_LEN),
        sys!(SYS_close, "close", ARG_FD),
        sys!(SYS_connect, "connect", ARG_SOCKFD, ARG_PTR, ARG_LEN),
        sys!(SYS_copy_file_range, "copy_file_range", ARG_FD, ARG_PTR, ARG_FD, ARG_PTR, ARG_LEN, ARG_FLAG),
        sys!(SYS_dup, "dup", ARG_FD),
        sys!(SYS_dup3, "dup3", ARG_FD, ARG_FD, ARG_FLAG),
        sys!(SYS_epoll_create1, "epoll_create1", ARG_FLAG),
        sys!(SYS_epoll_ctl, "epoll_ctl", ARG_FD, ARG_INT, ARG_FD, ARG_PTR),
        sys!(SYS_epoll_pwait, "epoll_pwait", ARG_FD, ARG_PTR, ARG_INT, ARG_TIMEOUT, ARG_PTR),
        sys!(SYS_eventfd2, "eventfd2", ARG_INT, ARG_FLAG),
        sys!(SYS_faccessat, "faccessat", ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_MODE, ARG_FLAG),
        sys!(SYS_faccessat, "faccessat", ARG_DIRFD, ARG_DEVNULL_FILENAME, ARG_MODE, ARG_FLAG),
        sys!(SYS_fallocate, "fallocate", ARG_FD, ARG_MODE, ARG_INT, ARG_INT),
        sys!(SYS_fanotify_init, "fanotify_init", ARG_FLAG, ARG_FLAG),
        sys!(SYS_fanotify_mark, "fanotify_mark", ARG_FD, ARG_FLAG, ARG_UINT, ARG_FD, ARG_EMPTY_FILENAME),
        sys!(SYS_fchdir, "fchdir", ARG_FD),
        sys!(SYS_fchmod, "fchmod", ARG_FD, ARG_MODE),
        sys!(SYS_fchmodat, "fchmodat", ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_MODE, ARG_FLAG),
        sys!(SYS_fchownat, "fchownat", ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_UINT, ARG_UINT, ARG_UINT),
        sys!(SYS_fcntl, "fcntl", ARG_FD, ARG_RND, ARG_RND, ARG_RND, ARG_RND, ARG_RND),
        sys!(SYS_fdatasync, "fdatasync", ARG_FD),
        sys!(SYS_fgetxattr, "fgetxattr", ARG_FD, ARG_PTR, ARG_PTR, ARG_LEN),
        sys!(SYS_finit_module, "finit_module", ARG_PTR, ARG_LEN, ARG_PTR),
        sys!(SYS_flock, "flock", ARG_FD, ARG_INT),
        sys!(SYS_fstat, "fstat", ARG_FD, ARG_PTR),
        sys!(SYS_fstatfs, "fstatfs", ARG_FD, ARG_PTR),
        sys!(SYS_fsync, "fsync", ARG_FD),
        sys!(SYS_ftruncate, "ftruncate", ARG_FD, ARG_LEN),
        sys!(SYS_futex, "futex", ARG_FUTEX_PTR, ARG_INT, ARG_INT, ARG_FUTEX_PTR, ARG_FUTEX_PTR, ARG_INT),
        sys!(SYS_get_mempolicy, "get_mempolicy", ARG_PTR, ARG_PTR, ARG_UINT, ARG_PTR, ARG_FLAG),
        sys!(SYS_get_robust_list, "get_robust_list", ARG_PID, ARG_PTR, ARG_PTR),
        sys!(SYS_getcpu, "getcpu", ARG_NON_NULL_PTR, ARG_NON_NULL_PTR, ARG_PTR),
        sys!(SYS_getcwd, "getcwd", ARG_PTR, ARG_LEN),
        sys!(SYS_getdents64, "getdents64", ARG_FD, ARG_PTR, ARG_LEN),
        sys!(SYS_getgroups, "getgroups", ARG_INT, ARG_PTR),
        sys!(SYS_getpeername, "getpeername", ARG_SOCKFD, ARG_PTR, ARG_PTR),
        sys!(SYS_getpgid, "getpgid", ARG_PID),
        sys!(SYS_getrandom, "getrandom", ARG_PTR, ARG_INT, ARG_FLAG),
        sys!(SYS_getresgid, "getresgid", ARG_PTR, ARG_PTR, ARG_PTR),
        sys!(SYS_getresuid, "getresuid", ARG_PTR, ARG_PTR, ARG_PTR),
        sys!(SYS_getrlimit, "getrlimit", ARG_RND, ARG_PTR),
        sys!(SYS_getrlimit, "getrlimit", ARG_INT, ARG_PTR),
        sys!(SYS_getrusage, "getrusage", ARG_RND, ARG_PTR),
        sys!(SYS_getrusage, "getrusage", ARG_INT, ARG_PTR),
        sys!(SYS_getsid, "getsid", ARG_PID),
        sys!(SYS_getsockname, "getsockname", ARG_SOCKFD, ARG_PTR | ARG_STRUCT_SOCKADDR, ARG_PTR),
        sys!(SYS_gettimeofday, "gettimeofday", ARG_NON_NULL_PTR, ARG_NON_NULL_PTR),
        sys!(SYS_getxattr, "getxattr", ARG_EMPTY_FILENAME, ARG_PTR, ARG_PTR, ARG_LEN),
        sys!(SYS_getxattr, "getxattr", ARG_DEVNULL_FILENAME, ARG_PTR, ARG_PTR, ARG_LEN),
        sys!(SYS_inotify_add_watch, "inotify_add_watch", ARG_FD, ARG_EMPTY_FILENAME, ARG_UINT),
        sys!(SYS_inotify_add_watch, "inotify_add_watch", ARG_FD, ARG_DEVNULL_FILENAME, ARG_UINT),
        sys!(SYS_inotify_init1, "inotify_init1", ARG_FLAG),
        sys!(SYS_io_cancel, "io_cancel", ARG_INT, ARG_PTR, ARG_PTR),
        sys!(SYS_io_destroy, "io_destroy", ARG_INT),
        sys!(SYS_io_getevents, "io_getevents", ARG_INT, ARG_INT, ARG_INT, ARG_PTR, ARG_PTR),
        sys!(SYS_io_setup, "io_setup", ARG_UINT, ARG_PTR),
        sys!(SYS_io_submit, "io_submit", ARG_UINT, ARG_INT, ARG_PTR),
        sys!(SYS_ioctl, "ioctl", ARG_FD, ARG_UINT, ARG_PTR, ARG_PTR),
        sys!(SYS_ioprio_get, "ioprio_get", ARG_INT, ARG_INT),
        sys!(SYS_ioprio_set, "ioprio_set", ARG_INT, ARG_INT, ARG_INT),
        sys!(SYS_kcmp, "kcmp", ARG_PID, ARG_PID, ARG_INT, ARG_UINT, ARG_UINT),
        sys!(SYS_keyctl, "keyctl", ARG_INT, ARG_UINT, ARG_UINT, ARG_UINT, ARG_UINT, ARG_UINT),
        sys!(SYS_linkat, "linkat", ARG_FD, ARG_EMPTY_FILENAME, ARG_FD, ARG_EMPTY_FILENAME, ARG_INT),
        sys!(SYS_listen, "listen", ARG_SOCKFD, ARG_INT),
        sys!(SYS_listxattr, "listxattr", ARG_EMPTY_FILENAME, ARG_PTR, ARG_LEN),
        sys!(SYS_llistxattr, "llistxattr", ARG_EMPTY_FILENAME, ARG_PTR, ARG_LEN),
        sys!(SYS_lookup_dcookie, "lookup_dcookie", ARG_UINT, ARG_PTR, ARG_LEN),
        sys!(SYS_lremovexattr, "lremovexattr", ARG_EMPTY_FILENAME, ARG_PTR),
        sys!(SYS_lseek, "lseek", ARG_FD, ARG_UINT, ARG_INT),
        sys!(SYS_lsetxattr, "lsetxattr", ARG_EMPTY_FILENAME, ARG_PTR, ARG_PTR, ARG_LEN, ARG_INT),
        sys!(SYS_madvise, "madvise", ARG_PTR, ARG_LEN, ARG_INT),
        sys!(SYS_mbind, "mbind", ARG_PTR, ARG_UINT, ARG_INT, ARG_PTR, ARG_UINT, ARG_UINT),
        sys!(SYS_membarrier, "membarrier", ARG_INT, ARG_FLAG),
        sys!(SYS_memfd_create, "memfd_create", ARG_EMPTY_FILENAME, ARG_UINT),
        sys!(SYS_migrate_pages, "migrate_pages", ARG_PID, ARG_UINT, ARG_PTR, ARG_PTR),
        sys!(SYS_mincore, "mincore", ARG_PTR, ARG_LEN, ARG_PTR),
        sys!(SYS_mkdirat, "mkdirat", ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_MODE),
        sys!(SYS_mknodat, "mknodat", ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_MODE, ARG_UINT),
        sys!(SYS_mlock, "mlock", ARG_PTR, ARG_LEN),
        sys!(SYS_mlock2, "mlock2", ARG_PTR, ARG_LEN, ARG_FLAG),
        sys!(SYS_mlockall, "mlockall", ARG_FLAG),
        sys!(SYS_mmap, "mmap", ARG_PTR, ARG_LEN, ARG_INT, ARG_FLAG, ARG_FD, ARG_UINT),
        sys!(SYS_mount, "mount", ARG_EMPTY_FILENAME, ARG_EMPTY_FILENAME, ARG_PTR, ARG_UINT, ARG_UINT),
        sys!(SYS_move_pages, "move_pages", ARG_PID, ARG_UINT, ARG_PTR, ARG_PTR, ARG_PTR, ARG_FLAG),
        sys!(SYS_mprotect, "mprotect", ARG_PTR, ARG_LEN, ARG_UINT),
        sys!(SYS_mq_getsetattr, "mq_getsetattr", ARG_INT, ARG_PTR, ARG_PTR),
        sys!(SYS_mq_notify, "mq_notify", ARG_INT, ARG_PTR),
        sys!(SYS_mq_open, "mq_open", ARG_EMPTY_FILENAME, ARG_FLAG, ARG_MODE, ARG_PTR),
        sys!(SYS_mq_timedreceive, "mq_timedreceive", ARG_INT, ARG_PTR, ARG_LEN, ARG_PTR),
        sys!(SYS_mq_timedsend, "mq_timedsend", ARG_INT, ARG_PTR, ARG_LEN, ARG_INT),
        sys!(SYS_mq_unlink, "mq_unlink", ARG_EMPTY_FILENAME),
        sys!(SYS_mremap, "mremap", ARG_PTR, ARG_LEN, ARG_PTR, ARG_LEN, ARG_FLAG, ARG_PTR),
        sys!(SYS_msgctl, "msgctl", ARG_INT, ARG_INT, ARG_PTR),
        sys!(SYS_msgget, "msgget", ARG_INT, ARG_INT),
        sys!(SYS_msgrcv, "msgrcv", ARG_INT, ARG_PTR, ARG_LEN, ARG_INT, ARG_INT),
        sys!(SYS_msgsnd, "msgsnd", ARG_INT, ARG_PTR, ARG_LEN, ARG_INT),
        sys!(SYS_msync, "msync", ARG_PTR, ARG_LEN, ARG_FLAG),
        sys!(SYS_munlock, "munlock", ARG_PTR, ARG_LEN),
        sys!(SYS_munlockall, "munlockall", ARG_INT),
        sys!(SYS_name_to_handle_at, "name_to_handle_at", ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_PTR, ARG_PTR, ARG_FLAG),
        sys!(SYS_nanosleep, "nanosleep", ARG_PTR, ARG_PTR),
        sys!(SYS_open_by_handle_at, "open_by_handle_at", ARG_FD, ARG_PTR, ARG_FLAG),
        sys!(SYS_openat, "openat", ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_FLAG, ARG_MODE),
        sys!(SYS_openat2, "openat2", ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_PTR, ARG_LEN),
        sys!(SYS_perf_event_open, "perf_event_open", ARG_PTR, ARG_PID, ARG_INT, ARG_INT, ARG_FLAG),
        sys!(SYS_personality, "personality", ARG_UINT),
        sys!(SYS_pidfd_getfd, "pidfd_getfd", ARG_INT, ARG_INT, ARG_FLAG),
        sys!(SYS_pidfd_open, "pidfd_open", ARG_PID, ARG_FLAG),
        sys!(SYS_pidfd_send_signal, "pidfd_send_signal", ARG_INT, ARG_INT, ARG_PTR, ARG_FLAG),
        sys!(SYS_pipe2, "pipe2", ARG_PTR, ARG_FLAG),
        sys!(SYS_pivot_root, "pivot_root", ARG_EMPTY_FILENAME, ARG_EMPTY_FILENAME),
        sys!(SYS_pkey_alloc, "pkey_alloc", ARG_FLAG, ARG_UINT),
        sys!(SYS_pkey_free, "pkey_free", ARG_INT),
        sys!(SYS_pkey_mprotect, "pkey_mprotect", ARG_PTR, ARG_LEN, ARG_INT),
        sys!(SYS_ppoll, "ppoll", ARG_PTR, ARG_INT, ARG_PTR, ARG_PTR),
        sys!(SYS_prctl, "prctl", ARG_INT, ARG_UINT, ARG_UINT, ARG_UINT, ARG_UINT),
        sys!(SYS_pread64, "pread64", ARG_FD, ARG_PTR, ARG_LEN, ARG_UINT),
        sys!(SYS_preadv, "preadv", ARG_FD, ARG_PTR, ARG_INT, ARG_UINT),
        sys!(SYS_preadv2, "preadv2", ARG_FD, ARG_PTR, ARG_INT, ARG_UINT, ARG_FLAG),
        sys!(SYS_prlimit64, "prlimit64", ARG_INT, ARG_PTR),
        sys!(SYS_process_madvise, "process_madvise", ARG_INT, ARG_PID, ARG_PTR, ARG_LEN, ARG_INT, ARG_FLAG),
        sys!(SYS_process_vm_readv, "process_vm_readv", ARG_PID, ARG_PTR, ARG_UINT, ARG_PTR, ARG_UINT, ARG_UINT),
        sys!(SYS_process_vm_writev, "process_vm_writev", ARG_PID, ARG_PTR, ARG_UINT, ARG_PTR, ARG_UINT, ARG_UINT),
        sys!(SYS_pselect6, "pselect6", ARG_INT, ARG_PTR, ARG_PTR, ARG_PTR, ARG_PTR, ARG_PTR),
        sys!(SYS_ptrace, "ptrace", ARG_INT, ARG_PID, ARG_PTR, ARG_PTR),
        sys!(SYS_pwrite64, "pwrite64", ARG_FD, ARG_PTR, ARG_LEN, ARG_UINT),
        sys!(SYS_pwritev, "pwritev", ARG_FD, ARG_PTR, ARG_INT, ARG_UINT),
        sys!(SYS_pwritev2, "pwritev2", ARG_FD, ARG_PTR, ARG_INT, ARG_UINT, ARG_FLAG),
        sys!(SYS_quotactl, "quotactl", ARG_INT, ARG_PTR, ARG_INT, ARG_PTR),
        sys!(SYS_read, "read", ARG_FD, ARG_PTR, ARG_LEN),
        sys!(SYS_readahead, "readahead", ARG_FD, ARG_UINT, ARG_LEN),
        sys!(SYS_readlinkat, "readlinkat", ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_PTR, ARG_LEN),
        sys!(SYS_readv, "readv", ARG_FD, ARG_PTR, ARG_INT),
        sys!(SYS_recvfrom, "recvfrom", ARG_SOCKFD, ARG_PTR, ARG_LEN, ARG_FLAG, ARG_PTR, ARG_PTR),
        sys!(SYS_recvmmsg, "recvmmsg", ARG_SOCKFD, ARG_PTR, ARG_LEN, ARG_FLAG, ARG_PTR),
        sys!(SYS_recvmsg, "recvmsg", ARG_SOCKFD, ARG_PTR, ARG_FLAG),
        sys!(SYS_remap_file_pages, "remap_file_pages", ARG_PTR, ARG_LEN, ARG_INT, ARG_UINT, ARG_FLAG),
        sys!(SYS_removexattr, "removexattr", ARG_EMPTY_FILENAME, ARG_PTR),
        sys!(SYS_renameat, "renameat", ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_DIRFD, ARG_EMPTY_FILENAME),
        sys!(SYS_renameat2, "renameat2", ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_FLAG),
        sys!(SYS_request_key, "request_key", ARG_PTR, ARG_PTR, ARG_PTR, ARG_INT),
        sys!(SYS_rseq, "rseq", ARG_PTR, ARG_LEN, ARG_FLAG, ARG_UINT),
        sys!(SYS_rt_sigaction, "rt_sigaction", ARG_INT, ARG_PTR, ARG_PTR),
        sys!(SYS_rt_sigpending, "rt_sigpending", ARG_PTR),
        sys!(SYS_rt_sigprocmask, "rt_sigprocmask", ARG_INT, ARG_PTR, ARG_PTR, ARG_LEN),
        sys!(SYS_rt_sigqueueinfo, "rt_sigqueueinfo", ARG_PID, ARG_INT, ARG_PTR),
        sys!(SYS_rt_sigsuspend, "rt_sigsuspend", ARG_PTR),
        sys!(SYS_rt_sigtimedwait, "rt_sigtimedwait", ARG_PTR, ARG_PTR, ARG_PTR),
        sys!(SYS_rt_tgsigqueueinfo, "rt_tgsigqueueinfo", ARG_PID, ARG_PID, ARG_INT, ARG_PTR),
        sys!(SYS_sched_get_priority_max, "sched_get_priority_max", ARG_INT),
        sys!(SYS_sched_get_priority_min, "sched_get_priority_min", ARG_INT),
        sys!(SYS_sched_getaffinity, "sched_getaffinity", ARG_PID, ARG_LEN, ARG_PTR),
        sys!(SYS_sched_getattr, "sched_getattr", ARG_PID, ARG_PTR, ARG_FLAG),
        sys!(SYS_sched_getscheduler, "sched_getscheduler", ARG_PID),
        sys!(SYS_sched_rr_get_interval, "sched_rr_get_interval", ARG_PID, ARG_PTR),
        sys!(SYS_sched_setaffinity, "sched_setaffinity", ARG_PID, ARG_LEN, ARG_PTR),
        sys!(SYS_sched_setattr, "sched_setattr", ARG_PID, ARG_PTR, ARG_FLAG),
        sys!(SYS_sched_setparam, "sched_setparam", ARG_PID, ARG_PTR),
        sys!(SYS_seccomp, "seccomp", ARG_UINT, ARG_FLAG, ARG_PTR),
        sys!(SYS_semctl, "semctl", ARG_INT, ARG_INT, ARG_INT, ARG_PTR, ARG_PTR, ARG_PTR),
        sys!(SYS_semget, "semget", ARG_INT, ARG_INT, ARG_FLAG),
        sys!(SYS_semop, "semop", ARG_INT, ARG_PTR, ARG_LEN),
        sys!(SYS_semtimedop, "semtimedop", ARG_INT, ARG_PTR, ARG_LEN, ARG_PTR),
        sys!(SYS_sendfile, "sendfile", ARG_FD, ARG_FD, ARG_UINT, ARG_LEN),
        sys!(SYS_sendmmsg, "sendmmsg", ARG_SOCKFD, ARG_PTR, ARG_INT, ARG_FLAG),
        sys!(SYS_sendmsg, "sendmsg", ARG_SOCKFD, ARG_PTR, ARG_FLAG),
        sys!(SYS_sendto, "sendto", ARG_SOCKFD, ARG_PTR, ARG_LEN, ARG_FLAG, ARG_PTR, ARG_LEN),
        sys!(SYS_set_mempolicy, "set_mempolicy", ARG_INT, ARG_PTR, ARG_UINT),
        sys!(SYS_set_robust_list, "set_robust_list", ARG_PTR, ARG_LEN),
        sys!(SYS_set_tid_address, "set_tid_address", ARG_PTR),
        sys!(SYS_setfsgid, "setfsgid", ARG_GID),
        sys!(SYS_setfsuid, "setfsuid", ARG_UID),
        sys!(SYS_setgid, "setgid", ARG_GID),
        sys!(SYS_setgroups, "setgroups", ARG_LEN, ARG_PTR),
        sys!(SYS_sethostname, "sethostname", ARG_PTR, ARG_LEN),
        sys!(SYS_setitimer, "setitimer", ARG_INT, ARG_NON_NULL_PTR, ARG_NON_NULL_PTR),
        sys!(SYS_setns, "setns", ARG_FD, ARG_INT),
        sys!(SYS_setpgid, "setpgid", ARG_PID, ARG_PID),
        sys!(SYS_setpriority, "setpriority", ARG_INT, ARG_INT, ARG_INT),
        sys!(SYS_setregid, "setregid", ARG_GID, ARG_GID),
        sys!(SYS_setresgid, "setresgid", ARG_GID, ARG_GID, ARG_GID),
        sys!(SYS_setresuid, "setresuid", ARG_UID, ARG_UID, ARG_UID),
        sys!(SYS_setreuid, "setreuid", ARG_UID, ARG_UID),
        sys!(SYS_setrlimit, "setrlimit", ARG_INT, ARG_PTR),
        sys!(SYS_setsockopt, "setsockopt", ARG_SOCKFD, ARG_INT, ARG_INT, ARG_PTR, ARG_LEN),
        sys!(SYS_settimeofday, "settimeofday", ARG_PTR, ARG_PTR),
        sys!(SYS_setuid, "setuid", ARG_UID),
        sys!(SYS_setxattr, "setxattr", ARG_EMPTY_FILENAME, ARG_PTR, ARG_PTR, ARG_LEN, ARG_FLAG),
        sys!(SYS_shmat, "shmat", ARG_INT, ARG_PTR, ARG_FLAG),
        sys!(SYS_shmctl, "shmctl", ARG_INT, ARG_INT, ARG_PTR),
        sys!(SYS_shmdt, "shmdt", ARG_INT, ARG_PTR, ARG_FLAG),
        sys!(SYS_shmget, "shmget", ARG_INT, ARG_LEN, ARG_FLAG),
        sys!(SYS_shutdown, "shutdown", ARG_SOCKFD, ARG_INT),
        sys!(SYS_sigaltstack, "sigaltstack", ARG_NON_NULL_PTR, ARG_NON_NULL_PTR),
        sys!(SYS_signalfd4, "signalfd4", ARG_FD, ARG_PTR, ARG_FLAG),
        sys!(SYS_socket, "socket", ARG_INT, ARG_INT, ARG_INT),
        sys!(SYS_socketpair, "socketpair", ARG_INT, ARG_INT, ARG_INT, ARG_PTR),
        sys!(SYS_splice, "splice", ARG_FD, ARG_PTR, ARG_FD, ARG_PTR, ARG_LEN, ARG_FLAG),
        sys!(SYS_statfs, "statfs", ARG_EMPTY_FILENAME, ARG_PTR),
        sys!(SYS_statx, "statx", ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_FLAG, ARG_UINT, ARG_PTR),
        sys!(SYS_swapoff, "swapoff", ARG_EMPTY_FILENAME),
        sys!(SYS_swapon, "swapon", ARG_EMPTY_FILENAME, ARG_INT),
        sys!(SYS_symlinkat, "symlinkat", ARG_EMPTY_FILENAME, ARG_FD, ARG_EMPTY_FILENAME),
        sys!(SYS_sync_file_range, "sync_file_range", ARG_FD, ARG_UINT, ARG_UINT, ARG_FLAG),
        sys!(SYS_syncfs, "syncfs", ARG_FD),
        sys!(SYS_sysinfo, "sysinfo", ARG_PTR),
        sys!(SYS_syslog, "syslog", ARG_INT, ARG_PTR, ARG_PTR),
        sys!(SYS_tee, "tee", ARG_FD, ARG_FD, ARG_LEN, ARG_FLAG),
        sys!(SYS_timer_create, "timer_create", ARG_CLOCKID, ARG_PTR, ARG_PTR),
        sys!(SYS_timer_delete, "timer_delete", ARG_UINT),
        sys!(SYS_timer_getoverrun, "timer_getoverrun", ARG_UINT),
        sys!(SYS_timer_gettime, "timer_gettime", ARG_UINT, ARG_PTR),
        sys!(SYS_timer_settime, "timer_settime", ARG_UINT, ARG_FLAG, ARG_PTR, ARG_PTR),
        sys!(SYS_times, "times", ARG_PTR),
        sys!(SYS_truncate, "truncate", ARG_EMPTY_FILENAME, ARG_LEN),
        sys!(SYS_umask, "umask", ARG_UINT),
        sys!(SYS_umount2, "umount2", ARG_EMPTY_FILENAME, ARG_FLAG),
        sys!(SYS_uname, "uname", ARG_PTR),
        sys!(SYS_unlinkat, "unlinkat", ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_FLAG),
        sys!(SYS_unshare, "unshare", ARG_INT),
        sys!(SYS_userfaultfd, "userfaultfd", ARG_FLAG),
        sys!(SYS_utimensat, "utimensat", ARG_DIRFD, ARG_EMPTY_FILENAME, ARG_PTR, ARG_FLAG),
        sys!(SYS_vmsplice, "vmsplice", ARG_FD, ARG_PTR, ARG_UINT, ARG_FLAG),
        sys!(SYS_wait4, "wait4", ARG_PID, ARG_PTR, ARG_INT, ARG_PTR),
        sys!(SYS_waitid, "waitid", ARG_INT, ARG_INT, ARG_PTR, ARG_INT),
        sys!(SYS_write, "write", ARG_FD, ARG_PTR, ARG_LEN),
        sys!(SYS_writev, "writev", ARG_FD, ARG_PTR, ARG_LEN),
    ];

    // Legacy and arch-specific calls absent from the generic syscall table.
    #[cfg(target_arch = "x86_64")]
    calls.extend(vec![
        sys!(SYS_access, "access", ARG_PTR | ARG_EMPTY_FILENAME, ARG_MODE),
        sys!(SYS_access, "access", ARG_PTR | ARG_DEVZERO_FILENAME, ARG_MODE),
        sys!(SYS_alarm, "alarm", ARG_UINT),
        sys!(SYS_chmod, "chmod", ARG_PTR | ARG_EMPTY_FILENAME, ARG_INT),
        sys!(SYS_chown, "chown", ARG_PTR | ARG_EMPTY_FILENAME, ARG_INT),
        sys!(SYS_creat, "creat", ARG_EMPTY_FILENAME, ARG_FLAG, ARG_MODE),
        sys!(SYS_dup2, "dup2", ARG_FD, ARG_FD),
        sys!(SYS_epoll_create, "epoll_create", ARG_LEN),
        sys!(SYS_epoll_wait, "epoll_wait", ARG_FD, ARG_PTR, ARG_INT, ARG_TIMEOUT),
        sys!(SYS_eventfd, "eventfd", ARG_INT, ARG_FLAG),
        sys!(SYS_get_thread_area, "get_thread_area", ARG_PTR),
        sys!(SYS_ioperm, "ioperm", ARG_UINT, ARG_UINT, ARG_INT),
        sys!(SYS_iopl, "iopl", ARG_INT),
        sys!(SYS_lchown, "lchown", ARG_EMPTY_FILENAME, ARG_INT, ARG_INT),
        sys!(SYS_link, "link", ARG_EMPTY_FILENAME, ARG_PTR),
        sys!(SYS_lstat, "lstat", ARG_EMPTY_FILENAME, ARG_PTR),
        sys!(SYS_mkdir, "mkdir", ARG_EMPTY_FILENAME, ARG_MODE),
        sys!(SYS_mknod, "mknod", ARG_EMPTY_FILENAME, ARG_MODE, ARG_UINT),
        sys!(SYS_modify_ldt, "modify_ldt", ARG_INT, ARG_PTR, ARG_LEN),
        sys!(SYS_open, "open", ARG_EMPTY_FILENAME, ARG_FLAG, ARG_MODE),
        sys!(SYS_pipe, "pipe", ARG_PTR),
        sys!(SYS_poll, "poll", ARG_PTR, ARG_INT, ARG_INT),
        sys!(SYS_readlink, "readlink", ARG_EMPTY_FILENAME, ARG_PTR, ARG_LEN),
        sys!(SYS_rename, "rename", ARG_EMPTY_FILENAME, ARG_EMPTY_FILENAME),
        sys!(SYS_select, "select", ARG_FD, ARG_PTR, ARG_PTR, ARG_PTR, ARG_PTR),
        sys!(SYS_set_thread_area, "set_thread_area", ARG_PTR),
        sys!(SYS_signalfd, "signalfd", ARG_FD, ARG_PTR, ARG_FLAG),
        sys!(SYS_stat, "stat", ARG_EMPTY_FILENAME, ARG_PTR),
        sys!(SYS_symlink, "symlink", ARG_EMPTY_FILENAME, ARG_EMPTY_FILENAME),
        sys!(SYS_sysfs, "sysfs", ARG_INT, ARG_PTR),
        sys!(SYS_sysfs, "sysfs", ARG_INT, ARG_UINT, ARG_PTR),
        sys!(SYS_sysfs, "sysfs", ARG_INT),
        sys!(SYS_time, "time", ARG_PTR),
        sys!(SYS_unlink, "unlink", ARG_EMPTY_FILENAME),
        sys!(SYS_uselib, "uselib", ARG_EMPTY_FILENAME),
        sys!(SYS_ustat, "ustat", ARG_UINT, ARG_PTR),
        sys!(SYS_utime, "utime", ARG_EMPTY_FILENAME, ARG_PTR),
    ]);

    calls.shrink_to_fit();
    calls
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn catalog_is_populated() {
        assert!(SYSCALLS.len() > 100);
        assert!(SYSCALLS.len() <= crate::context::MAX_CATALOG);
    }

    #[test]
    fn arities_stay_within_call_convention() {
        for spec in SYSCALLS.iter() {
            assert!(spec.arg_count() <= MAX_ARGS, "{}", spec.name());
            assert!(!spec.name().is_empty());
        }
    }

    #[test]
    fn no_entry_is_listed_twice_with_same_interpretation() {
        let mut seen = FxHashSet::default();
        for spec in SYSCALLS.iter() {
            assert!(
                seen.insert((spec.nr(), spec.args())),
                "duplicate row: {}",
                spec.name()
            );
        }
    }
}
