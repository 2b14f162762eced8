use crate::result::{GridError, GridResult};
use slab::Slab;
use std::{cell::Cell, fmt, rc::Rc};
use tracing::debug;

/// A view into a buffer served by a [`Pool`].
///
/// Every view keeps the underlying memory alive.
/// Aliasing is explicit: the only way to obtain a second view of the same
/// storage is [`Buffer::share`].
pub struct Buffer<T> {
    key: usize,
    cells: Rc<[Cell<T>]>,
}

impl<T> Buffer<T> {
    /// The slab key of the buffer inside of its pool.
    #[inline]
    pub fn key(&self) -> usize {
        self.key
    }

    /// The number of cells the buffer can hold.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The number of live views bound to this buffer, including this one.
    pub fn views(&self) -> usize {
        // the pool keeps one reference while it still tracks the buffer
        Rc::strong_count(&self.cells) - Rc::weak_count(&self.cells).min(1)
    }

    /// Creates another view aliasing the same storage.
    pub fn share(&self) -> Self {
        Self {
            key: self.key,
            cells: self.cells.clone(),
        }
    }

    /// Whether both views alias the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cells, &other.cells)
    }

    #[inline]
    pub(crate) fn cells(&self) -> &[Cell<T>] {
        &self.cells
    }
}

impl<T> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("key", &self.key)
            .field("len", &self.len())
            .field("views", &self.views())
            .finish()
    }
}

struct Entry<T> {
    cells: Rc<[Cell<T>]>,
    // keeps the weak count at one, so views can tell whether the pool still tracks them
    _tracker: std::rc::Weak<[Cell<T>]>,
}

impl<T> Entry<T> {
    fn new(cells: Rc<[Cell<T>]>) -> Self {
        let tracker = Rc::downgrade(&cells);
        Self {
            cells,
            _tracker: tracker,
        }
    }

    /// Views handed out to grids, not counting the reference held by the pool.
    fn views(&self) -> usize {
        Rc::strong_count(&self.cells) - 1
    }

    fn len(&self) -> usize {
        self.cells.len()
    }
}

/// A shared memory arena that serves fixed capacity cell buffers to grids.
///
/// The pool tracks every buffer it allocated.
/// Buffers without any bound view are reused by later requests or freed by
/// [`Pool::trim`], [`Pool::release`] and by requests that would otherwise
/// exceed the capacity.
pub struct Pool<T> {
    capacity: usize,
    buffers: Slab<Entry<T>>,
}

impl<T> Pool<T> {
    /// Creates an empty pool, that may hold up to `capacity` cells at once.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffers: Slab::new(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of cells currently allocated by the pool.
    pub fn allocated(&self) -> usize {
        self.buffers.iter().map(|(_, entry)| entry.len()).sum()
    }

    /// The number of buffers with at least one bound view.
    pub fn bound(&self) -> usize {
        self.buffers
            .iter()
            .filter(|(_, entry)| entry.views() > 0)
            .count()
    }

    /// Releases a view.
    /// If it was the last view of its buffer, the buffer is freed.
    pub fn release(&mut self, buffer: Buffer<T>) {
        let key = buffer.key;
        let owned = self
            .buffers
            .get(key)
            .is_some_and(|entry| Rc::ptr_eq(&entry.cells, &buffer.cells));

        drop(buffer);

        if owned && self.buffers[key].views() == 0 {
            let entry = self.buffers.remove(key);
            debug!("Released buffer {key} with {} cells.", entry.len());
        }
    }

    /// Frees all buffers that have no bound view and returns the number of freed cells.
    pub fn trim(&mut self) -> usize {
        let mut freed = 0;

        self.buffers.retain(|key, entry| {
            if entry.views() == 0 {
                debug!("Freed unbound buffer {key} with {} cells.", entry.len());
                freed += entry.len();
                false
            } else {
                true
            }
        });

        freed
    }

    fn unbound_fit(&self, capacity: usize) -> Option<usize> {
        self.buffers
            .iter()
            .filter(|(_, entry)| entry.views() == 0 && entry.len() >= capacity)
            .min_by_key(|(_, entry)| entry.len())
            .map(|(key, _)| key)
    }
}

impl<T: Copy + Default> Pool<T> {
    /// Requests a buffer able to hold `capacity` cells.
    ///
    /// An unbound buffer of sufficient size is reused and reset to default cells.
    /// Otherwise a new buffer is allocated, freeing unbound buffers if necessary.
    pub fn request(&mut self, capacity: usize) -> GridResult<Buffer<T>> {
        if let Some(key) = self.unbound_fit(capacity) {
            let entry = &self.buffers[key];
            entry.cells.iter().for_each(|cell| cell.set(T::default()));
            debug!("Reused buffer {key} with {} cells.", entry.len());

            return Ok(Buffer {
                key,
                cells: entry.cells.clone(),
            });
        }

        let exceeds = self
            .allocated()
            .checked_add(capacity)
            .is_none_or(|total| total > self.capacity);

        if exceeds {
            self.trim();
        }

        let available = self.capacity.saturating_sub(self.allocated());

        if capacity > available {
            return Err(GridError::AllocationFailure {
                requested: capacity,
                available,
            });
        }

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(capacity)
            .map_err(|_| GridError::AllocationFailure {
                requested: capacity,
                available,
            })?;
        cells.resize_with(capacity, || Cell::new(T::default()));

        let cells: Rc<[Cell<T>]> = cells.into();
        let key = self.buffers.insert(Entry::new(cells.clone()));

        debug!("Allocated buffer {key} with {capacity} cells.");

        Ok(Buffer { key, cells })
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("capacity", &self.capacity)
            .field("allocated", &self.allocated())
            .field("buffers", &self.buffers.len())
            .finish()
    }
}
