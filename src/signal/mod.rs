//! Raw signal interpretation
//!
//! Turns the edges captured in asynchronous serial mode into a logical bitstream
//! and decodes the line codes commonly found on sub-GHz remotes. Everything here is
//! pure: the same edge list always yields the same bits.
//!
//! The interval between two consecutive edges is attributed to the later edge:
//! its duration is measured against the mean one-bit pulse of that edge's level,
//! and it contributes `1 - level` bits, repeated once per bit period it spans.

pub mod manchester;
pub mod princeton;

use alloc::vec::Vec;

use crate::pins::{Edge, Level};
use crate::Error;

/// Fewest edges [`estimate_bit_period`] accepts
pub const MIN_EDGES: usize = 21;

/// Number of shortest pulses averaged into the provisional minimum
const SHORTEST_PULSES: usize = 5;

/// Mean duration of a one-bit pulse, kept as a fraction to avoid rounding twice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseMean {
    /// Sum of the averaged durations in microseconds
    pub total: u64,
    /// Number of averaged durations
    pub count: u64,
}

impl PulseMean {
    /// Mean in microseconds, rounded
    pub fn micros(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        (self.total + self.count / 2) / self.count
    }

    /// Number of bit periods `duration` spans, rounded to nearest
    fn repeats(&self, duration: u64) -> u64 {
        if self.total == 0 {
            return 0;
        }
        (2 * duration * self.count + self.total) / (2 * self.total)
    }
}

/// Per-level bit period of a captured signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitPeriod {
    pub low: PulseMean,
    pub high: PulseMean,
}

impl BitPeriod {
    /// The same period of `total / count` microseconds for both levels
    pub const fn uniform(total: u64, count: u64) -> Self {
        let mean = PulseMean { total, count };
        Self {
            low: mean,
            high: mean,
        }
    }

    pub fn for_level(&self, level: Level) -> &PulseMean {
        match level {
            Level::Low => &self.low,
            Level::High => &self.high,
        }
    }
}

/// Estimates the one-bit pulse duration of each level from the pulses themselves.
///
/// For each level the five shortest pulses give a provisional minimum; every pulse
/// up to 1.5 times that minimum is then averaged. Longer pulses span several bits
/// and are left out. A level without any pulse borrows the other level's estimate.
///
/// # Errors
/// * `Error::InsufficientData` - fewer than [`MIN_EDGES`] edges
pub fn estimate_bit_period(edges: &[Edge]) -> Result<BitPeriod, Error> {
    if edges.len() < MIN_EDGES {
        return Err(Error::InsufficientData {
            needed: MIN_EDGES,
            got: edges.len(),
        });
    }

    let mut low = Vec::new();
    let mut high = Vec::new();
    for pair in edges.windows(2) {
        let duration = pair[1].timestamp.saturating_sub(pair[0].timestamp);
        match pair[1].level {
            Level::Low => low.push(duration),
            Level::High => high.push(duration),
        }
    }

    let period = match (short_pulse_mean(low), short_pulse_mean(high)) {
        (Some(low), Some(high)) => BitPeriod { low, high },
        (Some(mean), None) | (None, Some(mean)) => BitPeriod {
            low: mean,
            high: mean,
        },
        (None, None) => {
            return Err(Error::InsufficientData {
                needed: MIN_EDGES,
                got: edges.len(),
            })
        }
    };
    log::debug!(
        "Estimated bit period: low {} us, high {} us",
        period.low.micros(),
        period.high.micros()
    );
    Ok(period)
}

fn short_pulse_mean(mut durations: Vec<u64>) -> Option<PulseMean> {
    if durations.is_empty() {
        return None;
    }
    durations.sort_unstable();

    let shortest = SHORTEST_PULSES.min(durations.len()) as u64;
    let sum: u64 = durations.iter().take(shortest as usize).sum();

    // d <= 1.5 * sum / shortest
    let (total, count) = durations
        .iter()
        .take_while(|&&d| 2 * d * shortest <= 3 * sum)
        .fold((0, 0), |(total, count), &d| (total + d, count + 1));
    Some(PulseMean { total, count })
}

/// Expands `edges` into one bit per bit period
pub fn reconstruct(edges: &[Edge], period: &BitPeriod) -> Vec<u8> {
    let mut bits = Vec::new();
    for pair in edges.windows(2) {
        let duration = pair[1].timestamp.saturating_sub(pair[0].timestamp);
        let level = pair[1].level;
        let repeats = period.for_level(level).repeats(duration);
        let bit = 1 - level.bit();
        bits.extend(core::iter::repeat(bit).take(repeats as usize));
    }
    bits
}

/// [`estimate_bit_period`] followed by [`reconstruct`]
pub fn bitstream(edges: &[Edge]) -> Result<Vec<u8>, Error> {
    let period = estimate_bit_period(edges)?;
    Ok(reconstruct(edges, &period))
}

/// Packs `bits` MSB first, a trailing partial byte is dropped
pub fn pack_bits(bits: &[u8]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |byte, &bit| (byte << 1) | (bit & 1)))
        .collect()
}

/// Unpacks `bytes` into bits, MSB first
pub fn unpack_bits(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Edges for a sequence of (held level, duration) pulses starting at t = 0
    pub(crate) fn edges_from_pulses(pulses: &[(Level, u64)]) -> Vec<Edge> {
        let mut edges = Vec::new();
        let mut t = 0;
        let Some(&(first, _)) = pulses.first() else {
            return edges;
        };
        edges.push(Edge::new(first, t));
        for window in pulses.windows(2) {
            t += window[0].1;
            edges.push(Edge::new(window[1].0, t));
        }
        t += pulses[pulses.len() - 1].1;
        edges.push(Edge::new(!pulses[pulses.len() - 1].0, t));
        edges
    }

    #[test]
    fn too_few_edges() {
        let edges: Vec<_> = (0..20)
            .map(|i| Edge::new(Level::from(i % 2 == 0), i * 100))
            .collect();
        assert_eq!(
            estimate_bit_period(&edges),
            Err(Error::InsufficientData {
                needed: MIN_EDGES,
                got: 20
            })
        );
    }

    #[test]
    fn long_pulses_do_not_skew_the_estimate() {
        let mut pulses = Vec::new();
        for i in 0..12 {
            pulses.push((Level::High, if i % 3 == 0 { 300 } else { 100 }));
            pulses.push((Level::Low, if i % 4 == 0 { 200 } else { 100 }));
        }
        let edges = edges_from_pulses(&pulses);
        let period = estimate_bit_period(&edges).unwrap();
        assert_eq!(period.low.micros(), 100);
        assert_eq!(period.high.micros(), 100);
    }

    #[test]
    fn jittered_pulses_round_to_whole_bits() {
        let pulses = [
            (Level::High, 98),
            (Level::Low, 205),
            (Level::High, 310),
            (Level::Low, 97),
            (Level::High, 103),
            (Level::Low, 101),
            (Level::High, 99),
            (Level::Low, 296),
            (Level::High, 102),
            (Level::Low, 100),
            (Level::High, 104),
            (Level::Low, 96),
            (Level::High, 201),
            (Level::Low, 99),
            (Level::High, 100),
            (Level::Low, 103),
            (Level::High, 97),
            (Level::Low, 100),
            (Level::High, 101),
            (Level::Low, 102),
        ];
        let edges = edges_from_pulses(&pulses);
        let bits = bitstream(&edges).unwrap();

        let mut expected = Vec::new();
        for (level, duration) in pulses {
            let n = ((duration + 50) / 100) as usize;
            expected.extend(core::iter::repeat(level.bit()).take(n));
        }
        assert_eq!(bits, expected);
    }

    #[test]
    fn reconstruction_is_deterministic() {
        let pulses: Vec<_> = (0..30)
            .map(|i| (Level::from(i % 2 == 0), 250 * (1 + (i % 3) as u64)))
            .collect();
        let edges = edges_from_pulses(&pulses);
        assert_eq!(bitstream(&edges).unwrap(), bitstream(&edges).unwrap());
    }

    #[test]
    fn uniform_period() {
        let period = BitPeriod::uniform(1_000_000, 2_000);
        let edges = [
            Edge::new(Level::High, 0),
            Edge::new(Level::Low, 1_000),
            Edge::new(Level::High, 1_500),
        ];
        assert_eq!(reconstruct(&edges, &period), [1, 1, 0]);
    }

    #[test]
    fn bit_packing() {
        assert_eq!(pack_bits(&[1, 0, 1, 0, 0, 1, 0, 1, 1, 1]), [0xA5]);
        assert_eq!(unpack_bits(&[0xA5]), [1, 0, 1, 0, 0, 1, 0, 1]);
    }
}
