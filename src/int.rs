use core::fmt::{Debug, Display};
use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use core::str::FromStr;

use num_traits::{
    CheckedAdd, CheckedMul, FromPrimitive, One, SaturatingSub, ToPrimitive, Zero,
};

/// A trait representing a capacity or flow amount which is typically a signed integer.
pub trait Int:
    Copy
    + Sum<Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Ord
    + AddAssign
    + SubAssign
    + Zero
    + One
    + CheckedAdd
    + CheckedMul
    + SaturatingSub
    + FromPrimitive
    + ToPrimitive
    + FromStr
    + Debug
    + Display
    + Default
{
}

impl Int for i32 {}

impl Int for i64 {}

impl Int for i128 {}
