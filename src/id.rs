use alloc::string::String;
use core::fmt::Debug;

/// A trait representing a node identifier.
pub trait Id: Clone + Ord + Debug {}

impl Id for i32 {}

impl Id for u64 {}

impl Id for usize {}

impl Id for String {}

impl Id for &str {}
