use std::io::{self, Write};
use crate::seed::SeedSource;

pub const MULTIPLIER: u64 = 6364136223846793005;

// XSH RR: xorshift the high bits down, then rotate by the top 5 bits
pub fn xsh_rr(old: u64) -> u32 {
    let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
    let rot        = (old >> 59) as u32;
    xorshifted.rotate_right(rot)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pcg32 {
    state:      u64,
    increment:  u64,
}

impl Pcg32 {
    // Increment is stored as drawn, the low bit is forced on every advance
    pub fn new(state: u64, increment: u64) -> Self {
        Self { state, increment }
    }

    // First draw is the state, second the increment. Order matters.
    pub fn from_source<S: SeedSource + ?Sized>(source: &mut S) -> Self {
        let state     = source.next_seed();
        let increment = source.next_seed();
        Self::new(state, increment)
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    pub fn increment(&self) -> u64 {
        self.increment
    }

    // Output is taken from the old state so both halves can run in parallel
    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = old
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(self.increment | 1);
        xsh_rr(old)
    }

    pub fn write_report(&self, w: &mut impl Write) -> io::Result<()> {
        writeln!(w, ">> PCG INITIAL STATE = {:016x}", self.state())?;
        writeln!(w, ">> PCG INCREMENT     = {:016x}", self.increment())
    }
}

// Never runs dry
impl Iterator for Pcg32 {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        Some(self.next_u32())
    }
}
