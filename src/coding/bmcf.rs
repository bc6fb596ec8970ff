//! Decodes Reed-Solomon codes using the Berlekamp-Massey, Chien Search, and Forney
//! algorithms.
//!
//! # Decoding Procedure
//!
//! For a code with 2t syndromes starting at α<sup>1</sup>:
//!
//! 1. Generate the syndrome polynomial s(x) = s<sub>1</sub> + s<sub>2</sub>x + ··· +
//!    s<sub>2t</sub>x<sup>2t-1</sup>, where s<sub>i</sub> = r(α<sup>i</sup>) using the
//!    received word polynomial r(x).
//! 2. Use s(x) to build the error locator polynomial Λ(x) = (1 + a<sub>1</sub>x) ··· (1 +
//!    a<sub>e</sub>x), where e is the LFSR length found for the syndromes.
//! 3. Find the roots a<sub>i</sub><sup>-1</sup> of Λ(x). If a<sub>i</sub><sup>-1</sup> =
//!    α<sup>k</sup>, the error location is m ≡ -k (modulo the field).
//! 4. Verify that e equals the number of roots found.
//! 5. Construct the error evaluator polynomial Ω(x) = Λ(x)s(x) mod x<sup>2t</sup> and
//!    compute each error pattern b<sub>i</sub> = Ω(a<sub>i</sub><sup>-1</sup>) /
//!    Λ'(a<sub>i</sub><sup>-1</sup>).
//!
//! This module implements steps 2 through 5. Step 1 and applying the corrections are left
//! to the caller, which also decides whether e is within the code's correction bound.
//!
//! # Berlekamp-Massey Algorithm
//!
//! Massey's formulation views Λ(x) as the connection polynomial of the shortest linear
//! feedback shift register that generates s<sub>1</sub>, ..., s<sub>2t</sub>. Each step
//! computes the discrepancy between the next syndrome and the register's prediction, and
//! when it's nonzero, cancels it using a scaled and shifted copy of the last register
//! that changed length.
//!
//! # Chien Search
//!
//! With Λ(x) = Λ<sub>0</sub> + Λ<sub>1</sub>x + ··· + Λ<sub>e</sub>x<sup>e</sup>, keep a
//! list of terms P<sub>i</sub>[k], starting with P<sub>0</sub>[k] = Λ<sub>k</sub> so that
//! Λ(α<sup>0</sup>) = sum(P<sub>0</sub>). Then P<sub>i</sub>[k] =
//! P<sub>i-1</sub>[k]⋅α<sup>k</sup> gives Λ(α<sup>i</sup>) = sum(P<sub>i</sub>) with one
//! multiplication per term.

use collect_slice::CollectSlice;

use crate::coding::galois::{GaloisField, Gf64, Polynomial, Symbol};

/// Finds the error locator polynomial Λ(x) from the syndrome polynomial s(x).
pub struct ErrorLocator {
    /// Syndromes s<sub>1</sub>, ..., s<sub>2t</sub> stored at indexes 0, ..., 2t-1.
    syn: Polynomial,
    /// Number of syndromes, 2t.
    nsyn: usize,
    /// Current connection polynomial: C(x).
    conn: Polynomial,
    /// Connection polynomial before the last length change: B(x).
    prev: Polynomial,
    /// Current LFSR length: L.
    len: usize,
    /// Steps since the last length change.
    shift: usize,
    /// Discrepancy at the last length change.
    disc: Symbol,
}

impl ErrorLocator {
    /// Construct a new `ErrorLocator` from the given syndrome polynomial s(x) with the
    /// given number of syndromes.
    pub fn new(syn: Polynomial, nsyn: usize) -> ErrorLocator {
        ErrorLocator {
            syn,
            nsyn,
            conn: Polynomial::unit_power(0),
            prev: Polynomial::unit_power(0),
            len: 0,
            shift: 1,
            disc: Symbol::for_power(0),
        }
    }

    /// Construct the error locator polynomial Λ(x), returned along with the LFSR length
    /// e, which is the number of errors Λ(x) claims to locate.
    pub fn build(mut self) -> (Polynomial, usize) {
        for step in 0..self.nsyn {
            self.step(step);
        }

        (self.conn, self.len)
    }

    /// Perform one iteration, consuming syndrome s<sub>step+1</sub>.
    fn step(&mut self, step: usize) {
        let disc = self.discrepancy(step);

        if disc.zero() {
            self.shift += 1;
            return;
        }

        // C(x) - (d/b)x^m B(x)
        let next = self.conn + self.prev.shift_up(self.shift) * (disc / self.disc);

        if 2 * self.len <= step {
            self.prev = self.conn;
            self.len = step + 1 - self.len;
            self.disc = disc;
            self.shift = 1;
        } else {
            self.shift += 1;
        }

        self.conn = next;
    }

    /// Compute the discrepancy between s<sub>step+1</sub> and the register output.
    fn discrepancy(&self, step: usize) -> Symbol {
        (1..=self.len).fold(self.syn.coef(step), |sum, i| {
            sum + self.conn.coef(i) * self.syn.coef(step - i)
        })
    }
}

/// Finds the roots of the given error locator polynomial Λ(x).
///
/// This performs the standard brute force method, evaluating each Λ(α<sup>i</sup>) for 0
/// ≤ i < 63, with the Chien Search optimization.
pub struct PolynomialRoots {
    /// Terms A = [Λ<sub>0</sub>α<sup>0⋅i</sup>, ..., Λ<sub>e</sub>α<sup>e⋅i</sup>] such
    /// that Λ(α<sup>i</sup>) = sum(A) for the current power i.
    loc: Polynomial,
    /// Current codeword power the polynomial is being evaluated with.
    pow: std::ops::Range<usize>,
}

impl PolynomialRoots {
    /// Construct a new `PolynomialRoots` from the given error locator polynomial Λ(x).
    pub fn new(loc: Polynomial) -> Self {
        PolynomialRoots {
            loc,
            pow: 0..Gf64::size(),
        }
    }

    /// Update each term's coefficient to its value when evaluated for the next codeword
    /// power.
    fn update_terms(&mut self) {
        for (pow, term) in self.loc.iter_mut().enumerate() {
            *term = *term * Symbol::for_power(pow);
        }
    }

    /// Compute Λ(α<sup>i</sup>), where i is the current power.
    fn eval(&self) -> Symbol {
        self.loc.iter().fold(Symbol::default(), |sum, &x| sum + x)
    }
}

/// Iterate over all roots α<sup>i</sup> of Λ(x).
impl Iterator for PolynomialRoots {
    type Item = Symbol;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pow = self.pow.next()?;

            let eval = self.eval();
            self.update_terms();

            if eval.zero() {
                return Some(Symbol::for_power(pow));
            }
        }
    }
}

/// Computes error locations and patterns from the roots of Λ(x) using the Forney
/// algorithm.
pub struct ErrorDescriptions {
    /// Derivative of error locator polynomial: Λ'(x).
    deriv: Polynomial,
    /// Error evaluator polynomial: Ω(x) = Λ(x)s(x) mod x<sup>2t</sup>.
    vals: Polynomial,
}

impl ErrorDescriptions {
    /// Create a new `ErrorDescriptions` from the given syndrome polynomial s(x), number
    /// of syndromes, and error locator polynomial Λ(x).
    pub fn new(syn: Polynomial, nsyn: usize, loc: Polynomial) -> Self {
        ErrorDescriptions {
            deriv: loc.deriv(),
            vals: (loc * syn).truncate(nsyn - 1),
        }
    }

    /// Compute the error location and pattern for the given root of Λ(x). Return `None`
    /// if Λ'(x) vanishes at the root, which can't happen for a true error locator.
    pub fn for_root(&self, root: Symbol) -> Option<(usize, Symbol)> {
        let deriv = self.deriv.eval(root);

        if deriv.zero() {
            return None;
        }

        // If Λ(α^i) = 0, then the error location is m ≡ -i (modulo the field.)
        let loc = (Gf64::size() - root.power()?) % Gf64::size();

        Some((loc, self.vals.eval(root) / deriv))
    }
}

/// Decodes and iterates over codeword errors.
pub struct Errors {
    /// Buffer of roots of the error locator polynomial.
    roots: Polynomial,
    /// Computes location and pattern for each error.
    descs: ErrorDescriptions,
    /// Current error being evaluated in iteration.
    pos: std::ops::Range<usize>,
}

impl Errors {
    /// Create a new `Errors` decoder from the given syndrome polynomial s(x) with the
    /// given number of syndromes.
    ///
    /// If the locator is consistent, return `Some((nerr, errs))`, where `nerr` is the
    /// number of detected errors and `errs` is the error iterator. Otherwise, return
    /// `None` to indicate an unrecoverable error. The caller must still check `nerr`
    /// against the code's correction bound.
    pub fn new(syn: Polynomial, nsyn: usize) -> Option<(usize, Self)> {
        let (loc, errors) = ErrorLocator::new(syn, nsyn).build();

        // Roots are buffered before processing, since a root count unequal to e means
        // all of them are invalid.
        let mut roots = Polynomial::default();
        let nroots = PolynomialRoots::new(loc).collect_slice_exhaust(&mut roots[..]);

        if nroots != errors {
            return None;
        }

        Some((errors, Errors {
            roots,
            descs: ErrorDescriptions::new(syn, nsyn, loc),
            pos: 0..errors,
        }))
    }
}

/// Iterate over detected errors, yielding `Some((location, pattern))` for each error, or
/// `None` for a root that doesn't describe a valid error.
impl Iterator for Errors {
    type Item = Option<(usize, Symbol)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pos.next().map(|i| self.descs.for_root(self.roots[i]))
    }
}
