//! Weierstrass ↔ twisted Edwards coordinate transform.
//!
//! Some of the 34.10-2012 parameter sets define the same group twice: as
//! a short Weierstrass curve and as a twisted Edwards curve
//! `e·u² + v² = 1 + d·u²·v²`. The birational map between the two forms
//! uses two constants derived from `e` and `d`, computed on first use and
//! cached for the lifetime of the parameter set.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::One;

use crate::curve::Curve;
use crate::error::{Error, Result};

fn signed(v: &BigUint) -> BigInt {
    BigInt::from_biguint(Sign::Plus, v.clone())
}

impl Curve {
    /// Whether this parameter set carries a twisted Edwards form.
    pub fn is_edwards(&self) -> bool {
        self.e.is_some() && self.d.is_some()
    }

    /// Derived constants `edS = (e-d)/4` and `edT = (e+d)/6` modulo `p`.
    fn edwards_st(&self) -> Result<&(BigUint, BigUint)> {
        let (e, d) = match (&self.e, &self.d) {
            (Some(e), Some(d)) => (e, d),
            _ => return Err(Error::UnsupportedCurveForm),
        };
        Ok(self.edwards_st.get_or_init(|| {
            let s = self.pos(&(signed(e) - signed(d)));
            let s = (s * self.inv_p(&BigUint::from(4u32))) % self.p();
            let t = ((e + d) * self.inv_p(&BigUint::from(6u32))) % self.p();
            (s, t)
        }))
    }

    /// Map Weierstrass coordinates `(x, y)` to twisted Edwards `(u, v)`.
    pub fn to_edwards(&self, x: &BigUint, y: &BigUint) -> Result<(BigUint, BigUint)> {
        let (ed_s, ed_t) = {
            let st = self.edwards_st()?;
            (st.0.clone(), st.1.clone())
        };
        let xmt = self.pos(&(signed(&(x % self.p())) - signed(&ed_t)));
        let u = (&xmt * self.inv_p(&(y % self.p()))) % self.p();
        let v = self.pos(&(signed(&xmt) - signed(&ed_s)));
        let v = (v * self.inv_p(&((&xmt + &ed_s) % self.p()))) % self.p();
        Ok((u, v))
    }

    /// Map twisted Edwards coordinates `(u, v)` back to Weierstrass
    /// `(x, y)`.
    pub fn to_weierstrass(&self, u: &BigUint, v: &BigUint) -> Result<(BigUint, BigUint)> {
        let (ed_s, ed_t) = {
            let st = self.edwards_st()?;
            (st.0.clone(), st.1.clone())
        };
        let v = v % self.p();
        let tx = (((BigUint::one() + &v) % self.p()) * &ed_s) % self.p();
        let ty = self.pos(&(BigInt::one() - signed(&v)));
        let x = (&tx * self.inv_p(&ty) + &ed_t) % self.p();
        let y = (&tx * self.inv_p(&(((u % self.p()) * &ty) % self.p()))) % self.p();
        Ok((x, y))
    }
}
