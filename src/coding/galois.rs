//! Galois field arithmetic for codewords and polynomials.


use collect_slice::CollectSlice;

/// Primitive polynomial h(x) = x<sup>6</sup> + x + 1 generating the field, with the MSB
/// being the coefficient of highest degree.
const PRIMITIVE: u8 = 0b1000011;

/// Antilog table: maps power i to the bit pattern of α<sup>i</sup>.
const EXP: [u8; 63] = build_exp();

/// Log table: maps a nonzero bit pattern α<sup>i</sup> to i. Index 0 is unused.
const LOG: [u8; 64] = build_log(&EXP);

const fn build_exp() -> [u8; 63] {
    let mut table = [0; 63];
    let mut x: u8 = 1;
    let mut i = 0;

    while i < 63 {
        table[i] = x;

        // Multiply by α and reduce modulo h(x).
        x <<= 1;

        if x & 0b1000000 != 0 {
            x ^= PRIMITIVE;
        }

        i += 1;
    }

    table
}

const fn build_log(exp: &[u8; 63]) -> [u8; 64] {
    let mut table = [0; 64];
    let mut i = 0;

    while i < 63 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }

    table
}

/// GF(2<sup>6</sup>) field characterized by α<sup>6</sup>+α+1, as used by the P25
/// Reed-Solomon codes.
#[derive(Copy, Clone, Debug)]
pub struct Gf64;

impl GaloisField for Gf64 {
    fn size() -> usize { 63 }
    fn valid_codeword(bits: u8) -> bool { bits >> 6 == 0 }
    fn codeword(pow: usize) -> u8 { EXP[pow] }
    fn power(codeword: usize) -> usize { LOG[codeword] as usize }
}

/// Codeword (symbol) in GF(2<sup>6</sup>).
pub type Symbol = Codeword<Gf64>;

/// A GF(2<sup>r</sup>) Galois field.
pub trait GaloisField {
    /// Number of unique nonzero codewords in the field: 2<sup>r</sup> - 1.
    fn size() -> usize;
    /// Check if the given bit pattern is a valid codeword in the field.
    fn valid_codeword(bits: u8) -> bool;
    /// Map the given power i, 0 ≤ i < size, to codeword α<sup>i</sup>.
    fn codeword(pow: usize) -> u8;
    /// Map the given nonzero codeword α<sup>i</sup> to its power i.
    fn power(codeword: usize) -> usize;

    /// Map the given power i to codeword α<sup>m</sup> ≡ α<sup>i</sup> (modulo the size
    /// of the field.)
    fn codeword_modded(pow: usize) -> u8 {
        Self::codeword(pow % Self::size())
    }
}

/// Codeword in a Galois field.
#[derive(Copy, Clone)]
pub struct Codeword<F: GaloisField> {
    field: std::marker::PhantomData<F>,
    bits: u8,
}

impl<F: GaloisField> Codeword<F> {
    /// Construct a new `Codeword` from the given bit pattern. Panic if the pattern is
    /// invalid in the field.
    pub fn new(bits: u8) -> Codeword<F> {
        assert!(F::valid_codeword(bits));

        Codeword {
            field: std::marker::PhantomData,
            bits,
        }
    }

    /// Construct a new `Codeword` α<sup>m</sup> ≡ α<sup>i</sup> (modulo the field) for
    /// the given power i.
    pub fn for_power(power: usize) -> Codeword<F> {
        Codeword::new(F::codeword_modded(power))
    }

    /// Retrieve the bit pattern of the codeword.
    pub fn bits(&self) -> u8 { self.bits }

    /// Check if the codeword is zero.
    pub fn zero(&self) -> bool { self.bits == 0 }

    /// Retrieve the power i of the current codeword α<sup>i</sup>. Return `Some(i)` if
    /// the power is defined and `None` if the codeword is zero.
    pub fn power(&self) -> Option<usize> {
        if self.zero() {
            None
        } else {
            Some(F::power(self.bits as usize))
        }
    }

    /// Find 1/α<sup>i</sup> for the current codeword α<sup>i</sup>. Panic if the codeword
    /// is zero.
    pub fn invert(self) -> Codeword<F> {
        match self.power() {
            Some(p) => Codeword::for_power(F::size() - p),
            None => panic!("invert zero"),
        }
    }

    /// Compute (α<sup>i</sup>)<sup>p</sup> for the current codeword α<sup>i</sup> and
    /// given power p.
    pub fn pow(&self, pow: usize) -> Codeword<F> {
        match self.power() {
            Some(p) => Codeword::for_power(p * pow),
            None => Codeword::default(),
        }
    }
}

impl<F: GaloisField> Default for Codeword<F> {
    /// Construct the additive identity codeword 0.
    fn default() -> Self {
        Codeword::new(0)
    }
}

/// Add codewords using Galois addition.
impl<F: GaloisField> std::ops::Add for Codeword<F> {
    type Output = Codeword<F>;

    fn add(self, rhs: Codeword<F>) -> Self::Output {
        Codeword::new(self.bits ^ rhs.bits)
    }
}

/// "Subtract" codewords, which is equivalent to addition.
impl<F: GaloisField> std::ops::Sub for Codeword<F> {
    type Output = Codeword<F>;

    fn sub(self, rhs: Codeword<F>) -> Self::Output {
        self + rhs
    }
}

/// Multiply codewords using Galois multiplication.
impl<F: GaloisField> std::ops::Mul for Codeword<F> {
    type Output = Codeword<F>;

    fn mul(self, rhs: Codeword<F>) -> Self::Output {
        match (self.power(), rhs.power()) {
            (Some(p), Some(q)) => Codeword::for_power(p + q),
            _ => Codeword::default(),
        }
    }
}

/// Divide codewords using Galois division. Panic if the divisor is zero.
impl<F: GaloisField> std::ops::Div for Codeword<F> {
    type Output = Codeword<F>;

    fn div(self, rhs: Codeword<F>) -> Self::Output {
        match (self.power(), rhs.power()) {
            // Ensure non-negative power.
            (Some(p), Some(q)) => Codeword::for_power(F::size() + p - q),
            (None, Some(_)) => Codeword::default(),
            (_, None) => panic!("divide by zero"),
        }
    }
}

impl<F: GaloisField> std::cmp::PartialEq for Codeword<F> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<F: GaloisField> std::cmp::Eq for Codeword<F> {}

/// Check equality of the codeword's bit pattern with raw bits.
impl<F: GaloisField> std::cmp::PartialEq<u8> for Codeword<F> {
    fn eq(&self, other: &u8) -> bool {
        self.bits == *other
    }
}

impl<F: GaloisField> std::fmt::Debug for Codeword<F> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self.power() {
            Some(p) => write!(fmt, "Codeword::for_power({})", p),
            None => write!(fmt, "Codeword::default()"),
        }
    }
}

/// Number of coefficients a `Polynomial` can hold, which bounds its degree at 63.
pub const MAX_COEFS: usize = 64;

/// Polynomial with GF(2<sup>6</sup>) symbols as coefficients and degree at most 63.
///
/// The degree bound covers every polynomial the Reed-Solomon decoder builds for
/// codes of length 63, including Λ(x)s(x) before it's truncated.
#[derive(Copy, Clone)]
pub struct Polynomial {
    /// Coefficients c<sub>0</sub>, c<sub>1</sub>, ..., with index i holding the
    /// coefficient of the x<sup>i</sup> term.
    coefs: [Symbol; MAX_COEFS],
}

impl Polynomial {
    /// Construct a new `Polynomial` from the given coefficients c<sub>0</sub>, ...,
    /// c<sub>k</sub>.
    ///
    /// The resulting polynomial has the form p(x) = c<sub>0</sub> + c<sub>1</sub>x + ···
    /// + c<sub>k</sub>x<sup>k</sup>.
    pub fn new<T: Iterator<Item = Symbol>>(mut init: T) -> Self {
        let mut coefs = [Symbol::default(); MAX_COEFS];
        init.collect_slice_exhaust(&mut coefs[..]);

        Polynomial { coefs }
    }

    /// Construct a new `Polynomial` with the single term p(x) = x<sup>n</sup>.
    pub fn unit_power(n: usize) -> Self {
        let mut p = Polynomial::default();
        p.coefs[n] = Symbol::for_power(0);
        p
    }

    /// Retrieve the degree-0 coefficient, c<sub>0</sub>.
    pub fn constant(&self) -> Symbol {
        self.coefs[0]
    }

    /// Compute deg(p(x)), returned as `Some(deg)` if the polynomial is nonzero, or
    /// `None` if p(x) = 0.
    pub fn degree(&self) -> Option<usize> {
        self.coefs.iter().rposition(|c| !c.zero())
    }

    /// Retrieve the coefficient c<sub>i</sub> associated with the x<sup>i</sup> term.
    ///
    /// If i > deg(p(x)), 0 is returned.
    pub fn coef(&self, i: usize) -> Symbol {
        match self.coefs.get(i) {
            Some(&c) => c,
            None => Symbol::default(),
        }
    }

    /// Evaluate p(x), substituting in the given x.
    pub fn eval(&self, x: Symbol) -> Symbol {
        // Horner's method, which avoids a call to `pow()` at each term.
        self.coefs.iter().rev().fold(Symbol::default(), |s, &coef| s * x + coef)
    }

    /// Truncate the polynomial so that deg(p(x)) ≤ d, where d is the given degree.
    pub fn truncate(mut self, deg: usize) -> Polynomial {
        for c in self.coefs.iter_mut().skip(deg + 1) {
            *c = Symbol::default();
        }

        self
    }

    /// Multiply by x<sup>n</sup>, discarding any terms pushed past the maximum degree.
    pub fn shift_up(self, n: usize) -> Polynomial {
        let mut out = Polynomial::default();

        for (i, &c) in self.coefs.iter().enumerate() {
            if let Some(dest) = out.coefs.get_mut(i + n) {
                *dest = c;
            }
        }

        out
    }

    /// Compute the formal derivative p'(x).
    pub fn deriv(mut self) -> Polynomial {
        for i in 0..MAX_COEFS {
            // In characteristic 2, (i+1)c_{i+1} vanishes for odd i+1.
            self.coefs[i] = if i % 2 == 0 {
                self.coef(i + 1)
            } else {
                Symbol::default()
            };
        }

        self
    }
}

impl Default for Polynomial {
    /// Construct an empty polynomial, p(x) = 0.
    fn default() -> Self {
        Polynomial::new(std::iter::empty())
    }
}

/// Provides a slice of coefficients starting at the degree-0 term, [c<sub>0</sub>,
/// c<sub>1</sub>, ...].
impl std::ops::Deref for Polynomial {
    type Target = [Symbol];
    fn deref(&self) -> &Self::Target { &self.coefs[..] }
}

impl std::ops::DerefMut for Polynomial {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.coefs[..] }
}

/// Add polynomials using Galois addition for coefficients.
impl std::ops::Add for Polynomial {
    type Output = Polynomial;

    fn add(mut self, rhs: Polynomial) -> Self::Output {
        for (c, &r) in self.coefs.iter_mut().zip(rhs.coefs.iter()) {
            *c = *c + r;
        }

        self
    }
}

/// Scale polynomial by a codeword.
impl std::ops::Mul<Symbol> for Polynomial {
    type Output = Polynomial;

    fn mul(mut self, rhs: Symbol) -> Self::Output {
        for coef in self.coefs.iter_mut() {
            *coef = *coef * rhs;
        }

        self
    }
}

/// Multiply polynomials using Galois multiplication for coefficients.
///
/// Terms of degree 64 or higher are silently discarded, effectively computing
/// p(x)q(x) mod x<sup>64</sup>.
impl std::ops::Mul<Polynomial> for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Polynomial) -> Self::Output {
        let mut out = Polynomial::default();

        for (i, &coef) in self.coefs.iter().enumerate().filter(|(_, c)| !c.zero()) {
            for (j, &mult) in rhs.coefs.iter().enumerate() {
                if let Some(c) = out.coefs.get_mut(i + j) {
                    *c = *c + coef * mult;
                }
            }
        }

        out
    }
}

impl std::fmt::Debug for Polynomial {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let len = self.degree().map_or(0, |d| d + 1);
        write!(fmt, "Polynomial({:?})", &self.coefs[..len])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tables() {
        // Spot checks against x^i mod (x^6 + x + 1).
        assert_eq!(EXP[0], 0b000001);
        assert_eq!(EXP[5], 0b100000);
        assert_eq!(EXP[6], 0b000011);
        assert_eq!(EXP[11], 0b100011);
        assert_eq!(EXP[62], 0b100001);

        for i in 0..63 {
            assert_eq!(LOG[EXP[i] as usize] as usize, i);
        }

        let mut seen = [false; 64];
        for &x in EXP.iter() {
            assert!(x != 0 && !seen[x as usize]);
            seen[x as usize] = true;
        }
    }

    #[test]
    fn test_for_power() {
        assert!(Symbol::for_power(0) == 0b000001);
        assert!(Symbol::for_power(62) == 0b100001);
        assert!(Symbol::for_power(63) == 0b000001);
    }

    #[test]
    fn test_add_sub() {
        assert!((Symbol::new(0b100000) + Symbol::new(0b010000)) == 0b110000);
        assert!((Symbol::new(0b100000) - Symbol::new(0b010000)) == 0b110000);
        assert!((Symbol::new(0b100001) + Symbol::new(0b100001)) == 0b000000);
        assert!((Symbol::new(0b100001) + Symbol::new(0b110100)) == 0b010101);
    }

    #[test]
    fn test_mul() {
        assert!((Symbol::new(0b000110) * Symbol::new(0b000101)) == 0b011110);
        assert!((Symbol::new(0b000000) * Symbol::new(0b000101)) == 0b000000);
        assert!((Symbol::new(0b000110) * Symbol::new(0b000000)) == 0b000000);
        assert!((Symbol::new(0b100001) * Symbol::new(0b000001)) == 0b100001);
        assert!((Symbol::new(0b100001) * Symbol::new(0b000010)) == 0b000001);
        assert!((Symbol::new(0b110011) * Symbol::new(0b110011)) == 0b111001);
        assert!((Symbol::new(0b101111) * Symbol::new(0b101111)) == 0b100110);
    }

    #[test]
    fn test_div() {
        assert!((Symbol::new(0b001000) / Symbol::new(0b000101)) == 0b010111);
        assert!((Symbol::new(0b000000) / Symbol::new(0b101000)) == 0b000000);
        assert!((Symbol::new(0b011110) / Symbol::new(0b000001)) == 0b011110);
        assert!((Symbol::new(0b011110) / Symbol::new(0b011110)) == 0b000001);

        for i in 1..64 {
            let x = Symbol::new(i);
            assert!(x * x.invert() == 0b000001);
        }
    }

    #[test]
    #[should_panic]
    fn test_div_zero() {
        let _ = Symbol::new(0b000001) / Symbol::default();
    }

    #[test]
    fn test_pow() {
        assert_eq!(Symbol::for_power(0).pow(10).power().unwrap(), 0);
        assert_eq!(Symbol::for_power(1).pow(10).power().unwrap(), 10);
        assert_eq!(Symbol::for_power(62).pow(10).power().unwrap(), 53);
        assert!(Symbol::default().pow(20).power().is_none());
    }

    #[test]
    fn test_eval() {
        // p(x) = 1 + x + x^2
        let p = Polynomial::new((0..3).map(|_| Symbol::for_power(0)));

        assert!(p.eval(Symbol::default()) == 0b000001);
        assert!(p.eval(Symbol::for_power(0)) == 0b000001);

        let x = Symbol::for_power(5);
        assert!(p.eval(x) == Symbol::for_power(0) + x + x * x);
    }

    #[test]
    fn test_degree() {
        assert_eq!(Polynomial::default().degree(), None);
        assert_eq!(Polynomial::unit_power(0).degree(), Some(0));
        assert_eq!(Polynomial::unit_power(17).degree(), Some(17));
        assert_eq!(Polynomial::unit_power(17).truncate(16).degree(), None);
        assert_eq!(Polynomial::unit_power(3).shift_up(4).degree(), Some(7));
        assert_eq!(Polynomial::unit_power(60).shift_up(4).degree(), None);
    }

    #[test]
    fn test_mul_poly() {
        // (1 + α^2 x)(1 + α^3 x) = 1 + (α^2 + α^3)x + α^5 x^2
        let a = Polynomial::new([Symbol::for_power(0), Symbol::for_power(2)].iter().cloned());
        let b = Polynomial::new([Symbol::for_power(0), Symbol::for_power(3)].iter().cloned());
        let p = a * b;

        assert_eq!(p.degree(), Some(2));
        assert!(p.coef(0) == Symbol::for_power(0));
        assert!(p.coef(1) == Symbol::for_power(2) + Symbol::for_power(3));
        assert!(p.coef(2) == Symbol::for_power(5));

        // Roots are the inverses of α^2 and α^3.
        assert!(p.eval(Symbol::for_power(2).invert()).zero());
        assert!(p.eval(Symbol::for_power(3).invert()).zero());
    }

    #[test]
    fn test_deriv() {
        // p(x) = c0 + c1 x + c2 x^2 + c3 x^3 => p'(x) = c1 + c3 x^2
        let p = Polynomial::new((1..5).map(Symbol::for_power));
        let d = p.deriv();

        assert!(d.coef(0) == Symbol::for_power(2));
        assert!(d.coef(1).zero());
        assert!(d.coef(2) == Symbol::for_power(4));
        assert_eq!(d.degree(), Some(2));
    }
}
