//! Runtime statistics.

use crate::error::Error;

/// Tracks stats for an error correction code.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct CodeStats {
    /// Number of symbols per word.
    size: usize,
    /// Total number of received words.
    words: usize,
    /// Number of corrected symbols.
    fixed: usize,
    /// Number of unrecoverable words.
    err: usize,
}

impl CodeStats {
    /// Create a new `CodeStats` with empty counters for the code with the given number of
    /// symbols per word.
    fn new(size: usize) -> Self {
        CodeStats {
            size,
            words: 0,
            err: 0,
            fixed: 0,
        }
    }

    /// Record that a word was received with the given amount of corrected symbols.
    pub fn record_fixes(&mut self, err: usize) {
        debug_assert!(err <= self.size);

        self.words += 1;
        self.fixed += err;
    }

    /// Record that a word was received with an unrecoverable error.
    pub fn record_err(&mut self) {
        self.words += 1;
        self.err += 1;
    }

    /// Total number of received words.
    pub fn words(&self) -> usize { self.words }

    /// Number of corrected symbols.
    pub fn fixed(&self) -> usize { self.fixed }

    /// Number of unrecoverable words.
    pub fn err(&self) -> usize { self.err }

    /// Merge in the stats from the given object.
    fn merge(&mut self, other: &CodeStats) {
        debug_assert!(self.size == other.size);

        self.words += other.words;
        self.err += other.err;
        self.fixed += other.fixed;
    }
}

/// Records various runtime statistics.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    /// Stats for the (10, 6, 3) Hamming code.
    pub hamming: CodeStats,
    /// Stats for the LDU Reed-Solomon words, counted in symbols.
    pub reed_solomon: CodeStats,
    /// Stats for CRC-protected blocks, counted in bits.
    pub crc: CodeStats,
    /// Stats for the low speed data cyclic code.
    pub cyclic: CodeStats,
    /// Number of messages constructed.
    pub messages: usize,
    /// Number of constructed messages marked invalid.
    pub invalid: usize,
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            hamming: CodeStats::new(10),
            reed_solomon: CodeStats::new(24),
            crc: CodeStats::new(64),
            cyclic: CodeStats::new(16),
            messages: 0,
            invalid: 0,
        }
    }
}

impl Stats {
    /// Merge in the stats from the given object.
    pub fn merge<T: HasStats>(&mut self, other: &T) {
        let stats = other.stats();

        self.hamming.merge(&stats.hamming);
        self.reed_solomon.merge(&stats.reed_solomon);
        self.crc.merge(&stats.crc);
        self.cyclic.merge(&stats.cyclic);
        self.messages += stats.messages;
        self.invalid += stats.invalid;
    }

    /// Clear all stats.
    pub fn clear(&mut self) {
        *self = Stats::default();
    }

    /// Record the given error into the current stats.
    pub fn record_err(&mut self, err: &Error) {
        match *err {
            Error::HammingUncorrectable { .. } => self.hamming.record_err(),
            Error::ReedSolomonIrrecoverable => self.reed_solomon.record_err(),
            Error::CrcFailedParity { .. } => self.crc.record_err(),
            Error::CyclicUnrecoverable { .. } => self.cyclic.record_err(),
            _ => {},
        }
    }

    /// Record that a message was constructed with the given validity.
    pub fn record_message(&mut self, valid: bool) {
        self.messages += 1;

        if !valid {
            self.invalid += 1;
        }
    }
}

/// Indicates that a type captures statistics.
pub trait HasStats {
    /// Retrieve captured statistics.
    fn stats(&self) -> &Stats;
}

impl HasStats for Stats {
    fn stats(&self) -> &Stats { self }
}
