use crate::core::color::Color;
use nalgebra::Vector3;
use std::cell::UnsafeCell;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

const LOCK_STRIPES: usize = 1024;

/// Colour and depth storage for one frame, optionally supersampled.
///
/// Rows are rasterized in parallel: depth is kept as atomic `f32` bits and
/// colour writes go through striped locks.
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub sample_count: usize,
    pub buffer_width: usize,
    pub buffer_height: usize,

    /// Guarded by `locks`; only written after a successful depth test.
    color_buffer: UnsafeCell<Vec<Color>>,

    /// Depth in [0, 1] stored as `f32` bits.
    depth_buffer: Vec<AtomicU32>,

    locks: Vec<Mutex<()>>,
}

// Interior writes are serialized per stripe by `locks`, depth by atomics.
unsafe impl Sync for FrameBuffer {}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        let sample_count = sample_count.max(1);
        let buffer_width = width * sample_count;
        let buffer_height = height * sample_count;
        let size = buffer_width * buffer_height;

        let inf_bits = f32::INFINITY.to_bits();
        let depth_buffer = (0..size).map(|_| AtomicU32::new(inf_bits)).collect();
        let locks = (0..LOCK_STRIPES).map(|_| Mutex::new(())).collect();

        Self {
            width,
            height,
            sample_count,
            buffer_width,
            buffer_height,
            color_buffer: UnsafeCell::new(vec![Vector3::zeros(); size]),
            depth_buffer,
            locks,
        }
    }

    /// Resets every sample to `color` and infinite depth.
    pub fn clear(&mut self, color: Color) {
        self.color_buffer.get_mut().fill(color);
        let inf_bits = f32::INFINITY.to_bits();
        for depth in &mut self.depth_buffer {
            *depth.get_mut() = inf_bits;
        }
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.buffer_width && y < self.buffer_height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.buffer_width + x
    }

    /// Writes `new_depth` if it is closer than the stored value.
    /// Returns whether the test passed.
    #[inline]
    pub fn depth_test_and_update(&self, x: usize, y: usize, new_depth: f32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let depth_atomic = &self.depth_buffer[self.index(x, y)];
        let new_bits = new_depth.to_bits();

        let mut current_bits = depth_atomic.load(Ordering::Relaxed);
        loop {
            if new_depth >= f32::from_bits(current_bits) {
                return false;
            }
            match depth_atomic.compare_exchange_weak(
                current_bits,
                new_bits,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(updated_bits) => current_bits = updated_bits,
            }
        }
    }

    /// Stores a colour sample. Call only after `depth_test_and_update` passed.
    #[inline]
    pub fn set_pixel_safe(&self, x: usize, y: usize, color: Color) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        let _guard = match self.locks[idx % self.locks.len()].lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // The stripe lock is held, so no other writer touches `idx`.
        unsafe {
            let buffer = &mut *self.color_buffer.get();
            buffer[idx] = color;
        }
    }

    /// Depth stored at a sample position, if in bounds.
    pub fn depth_at(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(f32::from_bits(
            self.depth_buffer[self.index(x, y)].load(Ordering::Relaxed),
        ))
    }

    /// Resolved (sample-averaged) colour of an output pixel.
    ///
    /// Meant for after rasterization has finished.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let buffer = unsafe { &*self.color_buffer.get() };

        if self.sample_count == 1 {
            return Some(buffer[self.index(x, y)]);
        }

        let start_x = x * self.sample_count;
        let start_y = y * self.sample_count;
        let mut sum_color = Vector3::zeros();
        for dy in 0..self.sample_count {
            for dx in 0..self.sample_count {
                sum_color += buffer[self.index(start_x + dx, start_y + dy)];
            }
        }

        let samples = (self.sample_count * self.sample_count) as f32;
        Some(sum_color / samples)
    }
}
