use std::sync::Mutex;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::thread;
use std::time::{ Duration, Instant };

use log::{ debug, info };

use crate::color::Color;

/// Hands out the pixels of an image, each exactly once.
///
/// Pixels are claimed in row-major order through a single atomic counter, so
/// any number of workers can share one manager without locking. Completed
/// pixels are counted separately for progress reports.
#[derive(Debug)]
pub struct PixelManager {
    nx: usize,
    total: usize,
    next: AtomicUsize,
    done: AtomicUsize,

    print_interval: Option<Duration>,
    last_print: Mutex<Instant>,
}

impl PixelManager {
    /// Creates a manager for an `nx` by `ny` image. Progress is logged every
    /// `print_interval` seconds; 0 disables it.
    pub fn new(nx: usize, ny: usize, print_interval: f64) -> PixelManager {
        let print_interval = if print_interval > 0.0 {
            Some(Duration::from_secs_f64(print_interval))
        } else {
            None
        };

        PixelManager {
            nx,
            total: nx * ny,
            next: AtomicUsize::new(0),
            done: AtomicUsize::new(0),
            print_interval,
            last_print: Mutex::new(Instant::now()),
        }
    }

    /// Claims the next pixel as `(column, row)`, or `None` once every pixel
    /// has been handed out.
    pub fn next_pixel(&self) -> Option<(usize, usize)> {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        if index >= self.total {
            return None;
        }

        Some((index % self.nx, index / self.nx))
    }

    /// Records a finished pixel and reports progress when it is due.
    pub fn pixel_done(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;

        let interval = match self.print_interval {
            Some(interval) => interval,
            None => return,
        };

        // Whoever holds the lock is already reporting.
        if let Ok(mut last) = self.last_print.try_lock() {
            if last.elapsed() >= interval {
                info!("{:.1}%", 100.0 * done as f64 / self.total as f64);
                *last = Instant::now();
            }
        }
    }

    pub fn completed(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Computes a color for every pixel of an `nx` by `ny` image.
///
/// With `threads == 0` all pixels are computed on the calling thread.
/// Otherwise `threads` workers claim pixels from a shared `PixelManager` until
/// none are left. Each worker keeps its own results and the caller collects
/// them after every worker has finished. The returned `(column, row, color)`
/// triples are in no particular order.
pub fn render_pixels<F>(nx: usize, ny: usize, threads: usize, print_interval: f64, render: F)
    -> Vec<(usize, usize, Color)>
where
    F: Fn(usize, usize) -> Color + Sync,
{
    let manager = PixelManager::new(nx, ny, print_interval);
    let start = Instant::now();

    let work = || {
        let mut pixels = Vec::new();
        while let Some((x, y)) = manager.next_pixel() {
            pixels.push((x, y, render(x, y)));
            manager.pixel_done();
        }
        pixels
    };

    let pixels = if threads == 0 {
        work()
    } else {
        thread::scope(|s| {
            let workers: Vec<_> = (0..threads).map(|_| s.spawn(&work)).collect();

            workers.into_iter()
                .flat_map(|w| w.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    };

    debug!("{} of {} pixels done", manager.completed(), manager.total());
    info!("rendered {} pixels in {:.2?}", pixels.len(), start.elapsed());

    pixels
}

#[test]
fn every_pixel_claimed_once() {
    let manager = PixelManager::new(3, 2, 0.0);
    let mut claimed = Vec::new();
    while let Some(p) = manager.next_pixel() {
        claimed.push(p);
    }

    assert_eq!(claimed, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    assert_eq!(manager.next_pixel(), None);
}

#[test]
fn empty_image_has_no_pixels() {
    let manager = PixelManager::new(0, 5, 0.0);
    assert_eq!(manager.next_pixel(), None);
}

#[test]
fn threads_share_the_claims() {
    let (nx, ny) = (17, 13);
    let color = |x: usize, y: usize| Color::rgb(x as f64, y as f64, 0.0);

    for threads in [0, 1, 4] {
        let mut pixels = render_pixels(nx, ny, threads, 0.0, color);
        pixels.sort_by_key(|&(x, y, _)| (y, x));

        assert_eq!(pixels.len(), nx * ny);
        for (index, (x, y, c)) in pixels.into_iter().enumerate() {
            assert_eq!((x, y), (index % nx, index / nx));
            assert_eq!(c, color(x, y));
        }
    }
}
