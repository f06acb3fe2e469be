use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use rand::Rng;

/// Small, fast, reproducible generator (mulberry32). Not for anything secret.
#[derive(Clone, Debug)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self { Self { state: seed } }

    pub fn reseed(&mut self, seed: u32) { self.state = seed; }

    /// Uniform in [0, 1).
    pub fn draw(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut x = self.state;
        x = (x ^ (x >> 15)).wrapping_mul(x | 1);
        x ^= x.wrapping_add((x ^ (x >> 7)).wrapping_mul(x | 61));
        (x ^ (x >> 14)) as f64 / 4_294_967_296.0
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = (self.draw() * items.len() as f64) as usize;
        items.get(idx.min(items.len() - 1))
    }
}

/// Where per-call seeds come from. Swap in [`FixedSeed`] to pin caption selection.
pub trait SeedSource: Send {
    fn next_seed(&mut self) -> u32;
}

/// `yyyymmddhh` of the local clock plus a perturbation in [0, 100000).
#[derive(Clone, Copy, Debug, Default)]
pub struct ClockSeed;

impl SeedSource for ClockSeed {
    fn next_seed(&mut self) -> u32 {
        let jitter: u32 = rand::thread_rng().gen_range(0..100_000);
        time_seed(&Local::now()).wrapping_add(jitter)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedSeed(pub u32);

impl SeedSource for FixedSeed {
    fn next_seed(&mut self) -> u32 { self.0 }
}

/// year·10⁶ + month·10⁴ + day·100 + hour
pub fn time_seed<Tz: TimeZone>(t: &DateTime<Tz>) -> u32 {
    (t.year() as u32)
        .wrapping_mul(1_000_000)
        .wrapping_add(t.month() * 10_000)
        .wrapping_add(t.day() * 100)
        .wrapping_add(t.hour())
}
