//! Accepted subject types for card numbers and security codes.
//!
//! Numbers arrive either as text (possibly with separators) or as unsigned
//! integers. Integers lose leading zeros, so a security code of `"012"`
//! must be passed as a string.

use std::borrow::Cow;

/// A value that can be checked as a card number or security code.
pub trait CardInput {
    /// Returns the raw textual form of the value.
    fn raw(&self) -> Cow<'_, str>;
}

impl CardInput for str {
    #[inline]
    fn raw(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl CardInput for String {
    #[inline]
    fn raw(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl<T: CardInput + ?Sized> CardInput for &T {
    #[inline]
    fn raw(&self) -> Cow<'_, str> {
        (**self).raw()
    }
}

macro_rules! impl_card_input_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl CardInput for $ty {
                #[inline]
                fn raw(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

impl_card_input_for_unsigned!(u8, u16, u32, u64, u128, usize);
