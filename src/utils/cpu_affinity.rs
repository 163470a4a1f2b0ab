//! Pin worker threads to cores for the whole run.
//!
//! Linux uses `sched_setaffinity` through libc. Other platforms never pin,
//! so callers do not need to special-case them.

#[cfg(target_os = "linux")]
mod platform {
    fn affinity() -> Option<libc::cpu_set_t> {
        unsafe {
            let mut set: libc::cpu_set_t = std::mem::zeroed();
            let rc = libc::sched_getaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &mut set);
            (rc == 0).then_some(set)
        }
    }

    pub fn allowed_cores() -> Vec<usize> {
        let Some(set) = affinity() else {
            return Vec::new();
        };
        (0..libc::CPU_SETSIZE as usize)
            .filter(|&cpu| unsafe { libc::CPU_ISSET(cpu, &set) })
            .collect()
    }

    pub fn pin(core_id: usize) -> bool {
        unsafe {
            let mut set: libc::cpu_set_t = std::mem::zeroed();
            libc::CPU_ZERO(&mut set);
            libc::CPU_SET(core_id, &mut set);
            libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) == 0
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    pub fn allowed_cores() -> Vec<usize> {
        Vec::new()
    }
    pub fn pin(_core_id: usize) -> bool {
        false
    }
}

/// Cores the calling thread may run on, ascending. Empty when unknown.
pub fn allowed_cores() -> Vec<usize> {
    platform::allowed_cores()
}

/// Core the calling thread is restricted to, if its mask holds exactly one.
pub fn pinned_core() -> Option<usize> {
    match allowed_cores().as_slice() {
        [core] => Some(*core),
        _ => None,
    }
}

/// Restrict the calling thread to `core_id`. Returns false if refused.
pub fn pin_current_thread(core_id: usize) -> bool {
    platform::pin(core_id)
}

/// Round-robin assignment of pool workers to the cores the process may use.
///
/// Captured once on the thread that builds the pool, then moved into the
/// pool's start handler, so worker `i` lands on `cores[i % cores.len()]`.
///
/// # Example
/// ```
/// use aligned_dot::utils::WorkerPinning;
///
/// let pinning = WorkerPinning::new();
/// let pool = rayon::ThreadPoolBuilder::new()
///     .num_threads(2)
///     .start_handler(move |index| {
///         pinning.pin_worker(index);
///     })
///     .build()
///     .unwrap();
/// pool.install(|| ());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerPinning {
    cores: Vec<usize>,
}

impl WorkerPinning {
    pub fn new() -> Self {
        Self {
            cores: allowed_cores(),
        }
    }

    /// Pin over an explicit core list.
    pub fn with_cores(cores: Vec<usize>) -> Self {
        Self { cores }
    }

    pub fn cores(&self) -> &[usize] {
        &self.cores
    }

    /// Core assigned to worker `index`, `None` when no core is known.
    pub fn core_for(&self, index: usize) -> Option<usize> {
        (!self.cores.is_empty()).then(|| self.cores[index % self.cores.len()])
    }

    /// Pin the calling thread as worker `index`. Returns the core on success.
    pub fn pin_worker(&self, index: usize) -> Option<usize> {
        let core = self.core_for(index)?;
        if pin_current_thread(core) {
            Some(core)
        } else {
            eprintln!("Warning: could not pin worker {} to core {}", index, core);
            None
        }
    }
}

impl Default for WorkerPinning {
    fn default() -> Self {
        Self::new()
    }
}
