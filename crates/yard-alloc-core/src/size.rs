// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use std::fmt::Display;

/// Container size class.
///
/// `Short` containers occupy a single ground column (one TEU). `Long`
/// containers occupy two adjacent ground columns at the same tier (two TEU).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SizeClass {
    Short,
    Long,
}

impl SizeClass {
    /// Maps a TEU count to a size class. Only 1 and 2 are meaningful.
    #[inline]
    pub const fn from_teus(teus: u8) -> Option<Self> {
        match teus {
            1 => Some(SizeClass::Short),
            2 => Some(SizeClass::Long),
            _ => None,
        }
    }

    #[inline]
    pub const fn teus(self) -> usize {
        match self {
            SizeClass::Short => 1,
            SizeClass::Long => 2,
        }
    }

    #[inline]
    pub const fn is_long(self) -> bool {
        matches!(self, SizeClass::Long)
    }

    #[inline]
    pub const fn is_short(self) -> bool {
        matches!(self, SizeClass::Short)
    }

    #[inline]
    pub const fn other(self) -> Self {
        match self {
            SizeClass::Short => SizeClass::Long,
            SizeClass::Long => SizeClass::Short,
        }
    }
}

impl Display for SizeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SizeClass::Short => write!(f, "20"),
            SizeClass::Long => write!(f, "40"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_teus() {
        assert_eq!(SizeClass::from_teus(1), Some(SizeClass::Short));
        assert_eq!(SizeClass::from_teus(2), Some(SizeClass::Long));
        assert_eq!(SizeClass::from_teus(0), None);
        assert_eq!(SizeClass::from_teus(3), None);
    }

    #[test]
    fn test_teus_and_other() {
        assert_eq!(SizeClass::Short.teus(), 1);
        assert_eq!(SizeClass::Long.teus(), 2);
        assert_eq!(SizeClass::Short.other(), SizeClass::Long);
        assert!(SizeClass::Long.is_long());
        assert!(!SizeClass::Long.is_short());
    }
}
