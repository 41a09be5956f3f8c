use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared dirty-flag storage.
///
/// The flags live behind an `Arc` so that every [`Signaller`] handed out to a
/// body refers to storage that is guaranteed to outlive it.
#[derive(Debug)]
struct StateFlags {
    externally_modified: Vec<AtomicBool>,
    internally_modified: Vec<AtomicBool>,
    symmetry_modified: Vec<Vec<AtomicBool>>,
    hydration_modified: AtomicBool,
    modified: AtomicBool,
}

impl StateFlags {
    fn new(size: usize, symmetry_sizes: &[usize]) -> StateFlags {
        let flags = |n: usize, v: bool| (0..n).map(|_| AtomicBool::new(v)).collect::<Vec<_>>();
        StateFlags {
            externally_modified: flags(size, true),
            internally_modified: flags(size, true),
            symmetry_modified: symmetry_sizes.iter().map(|&n| flags(n, false)).collect(),
            hydration_modified: AtomicBool::new(true),
            modified: AtomicBool::new(true),
        }
    }
}

/// Announces mutations of a body to the [`StateManager`] that tracks it.
///
/// A body holds a signaller and triggers it whenever it is moved
/// ([`Signaller::modified_external`]) or its atom set changes
/// ([`Signaller::modified_internal`]). The default [`Signaller::Unbound`]
/// variant is a no-op used by bodies that are not part of a managed molecule.
#[derive(Clone, Debug, Default)]
pub enum Signaller {
    /// placeholder for bodies without a state manager
    #[default]
    Unbound,
    /// connected to the flag storage of a [`StateManager`]
    Bound {
        /// index of the signalling body within the managed molecule
        index: usize,
        flags: Arc<StateFlagsHandle>,
    },
}

/// Opaque wrapper so the flag storage stays private to this module.
#[derive(Debug)]
pub struct StateFlagsHandle(StateFlags);

impl Signaller {
    /// Signals that the body was moved: its position or orientation changed
    pub fn modified_external(&self) {
        if let Signaller::Bound { index, flags } = self {
            flags.0.externally_modified[*index].store(true, Ordering::Relaxed);
            flags.0.modified.store(true, Ordering::Relaxed);
        }
    }

    /// Signals that the body's atom set or internal state changed
    pub fn modified_internal(&self) {
        if let Signaller::Bound { index, flags } = self {
            flags.0.internally_modified[*index].store(true, Ordering::Relaxed);
            flags.0.modified.store(true, Ordering::Relaxed);
        }
    }

    /// Signals that the `j`-th symmetry slot of the body changed
    pub fn modified_symmetry(&self, j: usize) {
        if let Signaller::Bound { index, flags } = self {
            flags.0.symmetry_modified[*index][j].store(true, Ordering::Relaxed);
            flags.0.modified.store(true, Ordering::Relaxed);
        }
    }
}

/// Tracks which parts of a molecule changed since the last histogram update.
///
/// The manager owns one dirty flag pair per body (externally / internally
/// modified), a hydration flag, and per-symmetry-slot flags. Bodies report
/// changes through [`Signaller`] probes obtained from [`StateManager::probe`].
/// All flags start raised so that a fresh manager forces a full calculation.
///
/// # Example
/// ```
/// use saxskit_data::StateManager;
/// let manager = StateManager::new(2);
/// manager.reset_to_false();
/// manager.probe(1).modified_external();
/// assert!(!manager.is_externally_modified(0));
/// assert!(manager.is_externally_modified(1));
/// ```
#[derive(Debug)]
pub struct StateManager {
    size: usize,
    flags: Arc<StateFlagsHandle>,
}

impl StateManager {
    /// Creates a manager tracking `size` bodies without symmetries
    pub fn new(size: usize) -> StateManager {
        StateManager::with_symmetries(size, &vec![0; size])
    }

    /// Creates a manager tracking `size` bodies, the `i`-th of which has
    /// `symmetry_sizes[i]` symmetry slots
    pub fn with_symmetries(size: usize, symmetry_sizes: &[usize]) -> StateManager {
        assert_eq!(symmetry_sizes.len(), size, "symmetry_sizes length must match the body count");
        StateManager { size, flags: Arc::new(StateFlagsHandle(StateFlags::new(size, symmetry_sizes))) }
    }

    /// The number of tracked bodies
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns a signaller bound to the `i`-th body
    pub fn probe(&self, i: usize) -> Signaller {
        assert!(i < self.size, "body index out of range");
        Signaller::Bound { index: i, flags: Arc::clone(&self.flags) }
    }

    /// Marks every body as externally modified
    pub fn externally_modified_all(&self) {
        for flag in &self.flags.0.externally_modified {
            flag.store(true, Ordering::Relaxed);
        }
        self.flags.0.modified.store(true, Ordering::Relaxed);
    }

    /// Marks every body as internally modified
    pub fn internally_modified_all(&self) {
        for flag in &self.flags.0.internally_modified {
            flag.store(true, Ordering::Relaxed);
        }
        self.flags.0.modified.store(true, Ordering::Relaxed);
    }

    /// Marks the hydration layer as modified
    pub fn modified_hydration_layer(&self) {
        self.flags.0.hydration_modified.store(true, Ordering::Relaxed);
        self.flags.0.modified.store(true, Ordering::Relaxed);
    }

    /// Whether anything has changed since the last reset
    pub fn is_modified(&self) -> bool {
        self.flags.0.modified.load(Ordering::Relaxed)
    }

    /// Whether the `i`-th body was moved
    pub fn is_externally_modified(&self, i: usize) -> bool {
        self.flags.0.externally_modified[i].load(Ordering::Relaxed)
    }

    /// Whether the `i`-th body's atom set changed
    pub fn is_internally_modified(&self, i: usize) -> bool {
        self.flags.0.internally_modified[i].load(Ordering::Relaxed)
    }

    /// Whether the `j`-th symmetry slot of the `i`-th body changed
    pub fn is_modified_symmetry(&self, i: usize, j: usize) -> bool {
        self.flags.0.symmetry_modified[i][j].load(Ordering::Relaxed)
    }

    /// Whether the hydration layer changed
    pub fn is_modified_hydration(&self) -> bool {
        self.flags.0.hydration_modified.load(Ordering::Relaxed)
    }

    /// Clears all flags; called at the end of a recalculation
    pub fn reset_to_false(&self) {
        for flag in &self.flags.0.externally_modified {
            flag.store(false, Ordering::Relaxed);
        }
        for flag in &self.flags.0.internally_modified {
            flag.store(false, Ordering::Relaxed);
        }
        for body in &self.flags.0.symmetry_modified {
            for flag in body {
                flag.store(false, Ordering::Relaxed);
            }
        }
        self.flags.0.hydration_modified.store(false, Ordering::Relaxed);
        self.flags.0.modified.store(false, Ordering::Relaxed);
    }
}
