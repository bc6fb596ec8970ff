//! Encoding and decoding of Reed-Solomon codes over GF(2<sup>6</sup>) with caller-chosen
//! correction capability.
//!
//! Codewords are held in a 63-symbol array where index i is the coefficient of
//! x<sup>i</sup>. The first transmitted symbol maps to the highest index of the code, so
//! a shortened code carries its transmitted symbols in the low indexes and implicit zero
//! symbols above them. Parity symbols occupy indexes 0 through n-k-1.

use crate::coding::bmcf;
use crate::coding::galois::{Polynomial, Symbol};
use crate::error::{Error, Result};

/// Number of symbols in a full-length codeword.
pub const FULL_LENGTH: usize = 63;

/// Result of decoding one word.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RsDecoded {
    /// Corrected symbols, or the unmodified input if the word was irrecoverable.
    pub symbols: [u8; FULL_LENGTH],
    /// Number of corrected symbols.
    pub errors: usize,
    /// Whether the errors in the word exceeded the correction capability.
    pub irrecoverable: bool,
}

/// Decoder for an RS(n, k, d) code with generator roots α<sup>1</sup>, ...,
/// α<sup>n-k</sup>.
///
/// The decoder holds no state between words, so a single instance can be shared across
/// threads.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ReedSolomonDecoder {
    n: usize,
    k: usize,
    d: usize,
}

impl ReedSolomonDecoder {
    /// Construct a new `ReedSolomonDecoder` for a code with codeword length `n`, message
    /// length `k`, and minimum distance `d`.
    pub fn new(n: usize, k: usize, d: usize) -> Result<Self> {
        if n > FULL_LENGTH || k == 0 || k >= n || d == 0 || d > n - k + 1 {
            return Err(Error::InvalidCode { n, k, d });
        }

        Ok(ReedSolomonDecoder { n, k, d })
    }

    /// Codeword length.
    pub fn n(&self) -> usize { self.n }

    /// Message length.
    pub fn k(&self) -> usize { self.k }

    /// Minimum distance.
    pub fn d(&self) -> usize { self.d }

    /// Largest t the code supports, ⌊(d-1)/2⌋.
    pub fn max_errors(&self) -> usize { (self.d - 1) / 2 }

    /// Try to correct up to `t` symbol errors in the given word, using the first 2t
    /// syndromes.
    ///
    /// Symbols must be 6-bit values. Panic if `t` is larger than the code supports.
    pub fn decode(&self, input: &[u8; FULL_LENGTH], t: usize) -> RsDecoded {
        self.decode_shortened(input, t, self.n)
    }

    /// Like `decode`, for a word of which only the low `len` symbols were received. The
    /// remaining symbols are known to be zero, so an error located among them means the
    /// word is irrecoverable.
    pub fn decode_shortened(&self, input: &[u8; FULL_LENGTH], t: usize, len: usize)
        -> RsDecoded
    {
        assert!(t <= self.max_errors() && 2 * t <= self.n - self.k);
        assert!(len <= self.n);

        let mut word = Polynomial::new(input[..self.n].iter().map(|&b| Symbol::new(b)));
        let nsyn = 2 * t;
        let syn = syndromes(&word, nsyn);

        let failed = RsDecoded {
            symbols: *input,
            errors: 0,
            irrecoverable: true,
        };

        if syn.degree().is_none() {
            return RsDecoded {
                symbols: *input,
                errors: 0,
                irrecoverable: false,
            };
        }

        let (errors, errs) = match bmcf::Errors::new(syn, nsyn) {
            Some((errors, errs)) if errors <= t => (errors, errs),
            _ => return failed,
        };

        for err in errs {
            match err {
                Some((loc, val)) if loc < len => word[loc] = word[loc] + val,
                _ => return failed,
            }
        }

        // Miscorrections beyond the code's capability can still leave a nonzero
        // syndrome.
        if syndromes(&word, nsyn).degree().is_some() {
            return failed;
        }

        let mut symbols = [0; FULL_LENGTH];

        for (s, coef) in symbols.iter_mut().zip(word.iter()) {
            *s = coef.bits();
        }

        RsDecoded {
            symbols,
            errors,
            irrecoverable: false,
        }
    }

    /// Encode the given `k` data symbols into a systematic codeword, with `data[0]` at
    /// index n-1 and parity at indexes 0 through n-k-1.
    pub fn encode(&self, data: &[u8]) -> [u8; FULL_LENGTH] {
        assert_eq!(data.len(), self.k);

        let parity = self.n - self.k;
        let gen = generator(parity);

        let mut word = Polynomial::default();

        for (i, &d) in data.iter().enumerate() {
            word[self.n - 1 - i] = Symbol::new(d);
        }

        // Long division by the monic generator, leaving the remainder in the low terms.
        let mut rem = word;

        for deg in (parity..self.n).rev() {
            let lead = rem[deg];

            if lead.zero() {
                continue;
            }

            for (i, &g) in gen.iter().take(parity + 1).enumerate() {
                let pos = deg - parity + i;
                rem[pos] = rem[pos] + g * lead;
            }
        }

        let mut out = [0; FULL_LENGTH];

        for (i, o) in out.iter_mut().take(self.n).enumerate() {
            *o = if i < parity { rem[i] } else { word[i] }.bits();
        }

        out
    }
}

/// Construct the generator polynomial g(x) = (x + α<sup>1</sup>) ··· (x +
/// α<sup>p</sup>) for the given number of parity symbols p.
fn generator(parity: usize) -> Polynomial {
    (1..=parity).fold(Polynomial::unit_power(0), |g, pow| {
        g * Polynomial::new([Symbol::for_power(pow), Symbol::for_power(0)].iter().cloned())
    })
}

/// Calculate the syndrome polynomial s<sub>1</sub> + s<sub>2</sub>x + ··· for the given
/// word and number of syndromes.
fn syndromes(word: &Polynomial, nsyn: usize) -> Polynomial {
    Polynomial::new((1..=nsyn).map(|pow| word.eval(Symbol::for_power(pow))))
}

#[cfg(test)]
mod test {
    use super::*;

    use rand::rngs::StdRng;
    use rand::seq::index::sample;
    use rand::{Rng, SeedableRng};

    fn random_data(rng: &mut StdRng, k: usize) -> Vec<u8> {
        (0..k).map(|_| rng.gen_range(0..64)).collect()
    }

    /// Corrupt `count` distinct symbols among the first `len` with nonzero patterns.
    fn corrupt(rng: &mut StdRng, word: &mut [u8; FULL_LENGTH], len: usize, count: usize) {
        for pos in sample(rng, len, count).into_iter() {
            word[pos] ^= rng.gen_range(1..64);
        }
    }

    #[test]
    fn test_new() {
        assert!(ReedSolomonDecoder::new(63, 47, 17).is_ok());
        assert!(ReedSolomonDecoder::new(24, 12, 13).is_ok());
        assert_eq!(ReedSolomonDecoder::new(64, 47, 17),
                   Err(Error::InvalidCode { n: 64, k: 47, d: 17 }));
        assert!(ReedSolomonDecoder::new(63, 63, 1).is_err());
        assert!(ReedSolomonDecoder::new(63, 0, 17).is_err());
        assert!(ReedSolomonDecoder::new(63, 47, 18).is_err());
        assert_eq!(ReedSolomonDecoder::new(63, 47, 17).unwrap().max_errors(), 8);
    }

    #[test]
    fn verify_gen() {
        let p = generator(8);

        assert_eq!(p.degree().unwrap(), 8);
        assert_eq!(p.coef(0).bits(), 0o26);
        assert_eq!(p.coef(1).bits(), 0o06);
        assert_eq!(p.coef(2).bits(), 0o24);
        assert_eq!(p.coef(3).bits(), 0o57);
        assert_eq!(p.coef(4).bits(), 0o60);
        assert_eq!(p.coef(5).bits(), 0o45);
        assert_eq!(p.coef(6).bits(), 0o75);
        assert_eq!(p.coef(7).bits(), 0o67);
        assert_eq!(p.coef(8).bits(), 0o01);

        let p = generator(12);

        assert_eq!(p.degree().unwrap(), 12);
        assert_eq!(p.coef(0).bits(), 0o50);
        assert_eq!(p.coef(1).bits(), 0o41);
        assert_eq!(p.coef(2).bits(), 0o02);
        assert_eq!(p.coef(3).bits(), 0o74);
        assert_eq!(p.coef(4).bits(), 0o11);
        assert_eq!(p.coef(5).bits(), 0o60);
        assert_eq!(p.coef(6).bits(), 0o34);
        assert_eq!(p.coef(7).bits(), 0o71);
        assert_eq!(p.coef(8).bits(), 0o03);
        assert_eq!(p.coef(9).bits(), 0o55);
        assert_eq!(p.coef(10).bits(), 0o05);
        assert_eq!(p.coef(11).bits(), 0o71);
        assert_eq!(p.coef(12).bits(), 0o01);
    }

    #[test]
    fn test_encode_layout() {
        let rs = ReedSolomonDecoder::new(24, 12, 13).unwrap();
        let data = (1..13).collect::<Vec<u8>>();
        let word = rs.encode(&data);

        for (i, &d) in data.iter().enumerate() {
            assert_eq!(word[23 - i], d);
        }

        assert!(word[24..].iter().all(|&s| s == 0));

        let poly = Polynomial::new(word.iter().map(|&b| Symbol::new(b)));
        assert!(syndromes(&poly, 12).degree().is_none());
    }

    #[test]
    fn test_shortened() {
        let enc = ReedSolomonDecoder::new(24, 16, 9).unwrap();
        let rs = ReedSolomonDecoder::new(63, 47, 17).unwrap();
        let clean = enc.encode(&(1..17).collect::<Vec<u8>>());

        let mut word = clean;

        for &(pos, err) in &[(4, 42), (10, 44), (16, 48), (19, 4), (22, 30)] {
            word[pos] ^= err;
        }

        // Five errors decode as four, two of them in the untransmitted symbols.
        let dec = rs.decode(&word, 4);
        assert!(!dec.irrecoverable);
        assert_eq!(dec.errors, 4);
        assert!(dec.symbols[24] != 0 && dec.symbols[48] != 0);

        let dec = rs.decode_shortened(&word, 4, 24);
        assert!(dec.irrecoverable);
        assert_eq!(dec.symbols, word);

        let mut word = clean;
        word[3] ^= 0o17;
        word[20] ^= 0o01;

        let dec = rs.decode_shortened(&word, 4, 24);
        assert!(!dec.irrecoverable);
        assert_eq!(dec.errors, 2);
        assert_eq!(dec.symbols, clean);
    }

    #[test]
    fn test_round_trip() {
        let mut rng = StdRng::seed_from_u64(0x2547);
        let rs = ReedSolomonDecoder::new(63, 47, 17).unwrap();

        for _ in 0..50 {
            let word = rs.encode(&random_data(&mut rng, 47));
            let dec = rs.decode(&word, 8);

            assert_eq!(dec.symbols, word);
            assert_eq!(dec.errors, 0);
            assert!(!dec.irrecoverable);
        }
    }

    #[test]
    fn test_correct_within_bound() {
        let mut rng = StdRng::seed_from_u64(63);
        let rs = ReedSolomonDecoder::new(63, 47, 17).unwrap();

        for count in 1..=6 {
            for _ in 0..40 {
                let word = rs.encode(&random_data(&mut rng, 47));
                let mut recv = word;
                corrupt(&mut rng, &mut recv, 63, count);

                let dec = rs.decode(&recv, 6);

                assert!(!dec.irrecoverable);
                assert_eq!(dec.errors, count);
                assert_eq!(dec.symbols, word);
            }
        }
    }

    #[test]
    fn test_beyond_bound() {
        let mut rng = StdRng::seed_from_u64(7);
        let rs = ReedSolomonDecoder::new(63, 47, 17).unwrap();
        let mut failures = 0;

        for _ in 0..100 {
            let word = rs.encode(&random_data(&mut rng, 47));
            let mut recv = word;
            corrupt(&mut rng, &mut recv, 63, 7);

            let dec = rs.decode(&recv, 6);

            if dec.irrecoverable {
                assert_eq!(dec.symbols, recv);
                assert_eq!(dec.errors, 0);
                failures += 1;
            }
        }

        assert!(failures > 0);
    }

    #[test]
    fn test_decode_shortened() {
        // RS(24,12,13) word carried by the (63,47,17) decoder.
        let enc = ReedSolomonDecoder::new(63, 51, 13).unwrap();
        let rs = ReedSolomonDecoder::new(63, 47, 17).unwrap();

        let mut data = [0; 51];
        data[39] = 1;

        let word = enc.encode(&data);
        assert!(word[24..].iter().all(|&s| s == 0));

        let mut recv = word;
        recv[23] = 0o00;
        recv[21] = 0o60;
        recv[16] = 0o42;
        recv[10] ^= 0o14;
        recv[5] ^= 0o56;
        recv[0] ^= 0o72;

        let dec = rs.decode(&recv, 6);
        assert!(!dec.irrecoverable);
        assert_eq!(dec.errors, 6);
        assert_eq!(dec.symbols, word);
    }

    #[test]
    fn test_reduced_t() {
        // RS(24,16,9) word decoded with t = 4.
        let enc = ReedSolomonDecoder::new(63, 55, 9).unwrap();
        let rs = ReedSolomonDecoder::new(63, 47, 17).unwrap();
        let mut rng = StdRng::seed_from_u64(24);

        let mut data = [0; 55];
        for d in data[39..].iter_mut() {
            *d = rng.gen_range(0..64);
        }

        let word = enc.encode(&data);
        let mut recv = word;
        corrupt(&mut rng, &mut recv, 24, 4);

        let dec = rs.decode(&recv, 4);
        assert!(!dec.irrecoverable);
        assert_eq!(dec.errors, 4);
        assert_eq!(dec.symbols, word);
    }

    #[test]
    #[should_panic]
    fn test_t_too_large() {
        let rs = ReedSolomonDecoder::new(63, 55, 9).unwrap();
        rs.decode(&[0; FULL_LENGTH], 5);
    }
}
