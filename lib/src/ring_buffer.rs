/// Fixed-capacity FIFO with overwrite-on-full semantics.
///
/// Used as the engine's event queue: the physics step pushes, the
/// presentation layer drains once per frame. No allocation after creation.
#[derive(Debug, Clone)]
pub struct RingBuffer<T, const N: usize> {
    data: [T; N],
    head: u32,
    tail: u32,
    count: u32,
}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    /// Create an empty buffer whose unused slots hold `filler`.
    #[inline(always)]
    pub const fn new_with(filler: T) -> Self {
        Self {
            data: [filler; N],
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    #[inline(always)]
    pub const fn len(&self) -> u32 {
        self.count
    }

    #[inline(always)]
    pub const fn capacity(&self) -> u32 {
        N as u32
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline(always)]
    pub const fn is_full(&self) -> bool {
        self.count >= N as u32
    }

    #[inline(always)]
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    /// Push, discarding the oldest element when full. Returns `true` if an
    /// element was dropped.
    pub fn push_overwrite(&mut self, value: T) -> bool {
        let dropped = self.is_full();
        if dropped {
            self.tail = (self.tail + 1) % self.capacity();
            self.count -= 1;
        }
        self.data[self.head as usize] = value;
        self.head = (self.head + 1) % self.capacity();
        self.count += 1;
        dropped
    }

    /// Push without overwrite; returns false if full.
    pub fn try_push(&mut self, value: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.data[self.head as usize] = value;
        self.head = (self.head + 1) % self.capacity();
        self.count += 1;
        true
    }

    /// Pop the oldest element.
    pub fn try_pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let value = self.data[self.tail as usize];
        self.tail = (self.tail + 1) % self.capacity();
        self.count -= 1;
        Some(value)
    }

    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        Some(&self.data[self.tail as usize])
    }

    /// Pop everything, oldest first.
    pub fn drain(&mut self) -> Drain<'_, T, N> {
        Drain { ring: self }
    }
}

pub struct Drain<'a, T, const N: usize> {
    ring: &'a mut RingBuffer<T, N>,
}

impl<T: Copy, const N: usize> Iterator for Drain<'_, T, N> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.ring.try_pop()
    }
}
