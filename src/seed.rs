use std::time::{Duration, SystemTime, SystemTimeError, UNIX_EPOCH};
use zeroize::Zeroize;

pub const CHUNK_COUNT:    usize = 4;
pub const CHUNK_BITS:     u32   = 16;

// Classic C library rand() constants, 31 bit state
const COARSE_MUL:         u32 = 1103515245;
const COARSE_ADD:         u32 = 12345;
const COARSE_MASK:        u32 = 0x7fff_ffff;
// Low bits of the state cycle with short periods, hand out the top 16
const COARSE_SHIFT:       u32 = 15;
// srand() default, used when the clock can't be read
const FALLBACK_SEED:      u32 = 1;

/// Anything that can hand out 64-bit seed words.
///
/// Plain closures qualify, which keeps seeding swappable in tests.
pub trait SeedSource {
    fn next_seed(&mut self) -> u64;
}

impl<F: FnMut() -> u64> SeedSource for F {
    fn next_seed(&mut self) -> u64 {
        self()
    }
}

// Chunk i goes to bits [16i, 16i + 16), each draw reduced mod 65536
pub fn pack_chunks(draws: [u32; CHUNK_COUNT]) -> u64 {
    draws.iter()
        .enumerate()
        .fold(0_u64, |seed, (i, &d)| {
            seed | (u64::from(d) % (1 << CHUNK_BITS)) << (CHUNK_BITS * i as u32)
        })
}

/// Low quality 31-bit LCG. Only good enough to spread a clock reading
/// over a few seed words. Draws are in [0, 65536).
#[derive(Clone, Debug)]
pub struct CoarseRand {
    next: u32,
}

impl CoarseRand {
    pub fn new(seed: u32) -> Self {
        Self { next: seed }
    }

    pub fn draw(&mut self) -> u32 {
        self.next = self.next
            .wrapping_mul(COARSE_MUL)
            .wrapping_add(COARSE_ADD)
            & COARSE_MASK;
        self.next >> COARSE_SHIFT
    }
}

/// Seeds a [`CoarseRand`] from the wall clock once, then packs four draws
/// per seed word.
pub struct ClockSeedSource {
    coarse: CoarseRand,
}

impl ClockSeedSource {
    pub fn new() -> Self {
        let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH);
        Self::with_coarse(CoarseRand::new(coarse_seed(since_epoch)))
    }

    pub fn with_coarse(coarse: CoarseRand) -> Self {
        Self { coarse }
    }
}

impl SeedSource for ClockSeedSource {
    fn next_seed(&mut self) -> u64 {
        let mut draws = [0_u32; CHUNK_COUNT];
        draws.iter_mut().for_each(|d| *d = self.coarse.draw());
        pack_chunks(draws)
    }
}

// Condense seconds, nanos and pid into the coarse seed, so two runs in
// the same second still diverge
fn coarse_seed(since_epoch: Result<Duration, SystemTimeError>) -> u32 {
    let now = match since_epoch {
        Ok(now) => now,
        Err(_)  => return FALLBACK_SEED,
    };

    let mut mix = blake3::Hasher::new();
    mix.update(&now.as_secs().to_le_bytes());
    mix.update(&now.subsec_nanos().to_le_bytes());
    mix.update(&std::process::id().to_le_bytes());
    let mut digest: [u8; 32] = mix.finalize().into();
    mix.zeroize();

    let seed = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]);
    digest.zeroize();
    seed
}

pub type EntropyFill = fn(&mut [u8]) -> Result<(), getrandom::Error>;

/// Draws seed words from the OS entropy pool. Falls back to the clock
/// if the OS refuses, so seeding can't fail.
pub struct OsSeedSource {
    fill:     EntropyFill,
    fallback: Option<ClockSeedSource>,
}

impl OsSeedSource {
    pub fn new() -> Self {
        Self::with_fill(getrandom::getrandom, None)
    }

    // Fallback is created from the clock on first failure when None
    pub fn with_fill(fill: EntropyFill, fallback: Option<ClockSeedSource>) -> Self {
        Self { fill, fallback }
    }
}

impl SeedSource for OsSeedSource {
    fn next_seed(&mut self) -> u64 {
        let mut buf = [0_u8; 2 * CHUNK_COUNT];
        if (self.fill)(&mut buf).is_err() {
            return self.fallback
                .get_or_insert_with(ClockSeedSource::new)
                .next_seed();
        }

        let mut draws = [0_u32; CHUNK_COUNT];
        draws.iter_mut()
            .zip(buf.chunks_exact(2))
            .for_each(|(d, b)| *d = u32::from(u16::from_le_bytes([b[0], b[1]])));
        let seed = pack_chunks(draws);

        buf.zeroize();
        draws.zeroize();
        seed
    }
}
