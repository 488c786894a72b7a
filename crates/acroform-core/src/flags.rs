//! Field flags (`/Ff`) and annotation flags (`/F`).
//!
//! Flag bit positions are 1-based as in the PDF reference: bit *n* is the
//! mask `1 << (n - 1)`.

use crate::error::FormError;

/// Mask for 1-based bit position `n`, or `None` outside `1..=32`.
pub const fn flag_mask(bit: u32) -> Option<u32> {
    if bit >= 1 && bit <= 32 {
        Some(1u32 << (bit - 1))
    } else {
        None
    }
}

/// A 32-bit field flag set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldFlags(pub u32);

impl FieldFlags {
    // Common to all field types.
    pub const READ_ONLY: u32 = 1;
    pub const REQUIRED: u32 = 2;
    pub const NO_EXPORT: u32 = 3;

    // Text fields.
    pub const MULTILINE: u32 = 13;
    pub const PASSWORD: u32 = 14;
    pub const FILE_SELECT: u32 = 21;
    pub const DO_NOT_SPELL_CHECK: u32 = 23;
    pub const DO_NOT_SCROLL: u32 = 24;
    pub const COMB: u32 = 25;
    pub const RICH_TEXT: u32 = 26;

    // Button fields.
    pub const NO_TOGGLE_TO_OFF: u32 = 15;
    pub const RADIO: u32 = 16;
    pub const PUSH_BUTTON: u32 = 17;
    pub const RADIOS_IN_UNISON: u32 = 26;

    // Choice fields.
    pub const COMBO: u32 = 18;
    pub const EDIT: u32 = 19;
    pub const SORT: u32 = 20;
    pub const MULTI_SELECT: u32 = 22;
    pub const COMMIT_ON_SEL_CHANGE: u32 = 27;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Whether the 1-based flag bit is set. Out-of-range bits read as unset.
    pub fn contains(&self, bit: u32) -> bool {
        flag_mask(bit).is_some_and(|mask| self.0 & mask != 0)
    }

    /// Set or clear a 1-based flag bit, leaving all other bits untouched.
    pub fn set(&mut self, bit: u32, value: bool) -> Result<(), FormError> {
        let mask = flag_mask(bit).ok_or(FormError::InvalidFlagBit(bit))?;
        if value {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
        Ok(())
    }

    /// Builder form of [`set`](Self::set) for known-valid bits.
    pub fn with(mut self, bit: u32) -> Self {
        if let Some(mask) = flag_mask(bit) {
            self.0 |= mask;
        }
        self
    }
}

/// Annotation flags (`/F` on the widget annotation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotationFlags(pub u32);

impl AnnotationFlags {
    pub const INVISIBLE: u32 = 1;
    pub const HIDDEN: u32 = 2;
    pub const PRINT: u32 = 3;
    pub const NO_ZOOM: u32 = 4;
    pub const NO_ROTATE: u32 = 5;
    pub const NO_VIEW: u32 = 6;
    pub const READ_ONLY: u32 = 7;
    pub const LOCKED: u32 = 8;

    pub fn contains(&self, bit: u32) -> bool {
        flag_mask(bit).is_some_and(|mask| self.0 & mask != 0)
    }

    pub fn with(mut self, bit: u32) -> Self {
        if let Some(mask) = flag_mask(bit) {
            self.0 |= mask;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_is_one_based() {
        assert_eq!(flag_mask(1), Some(1));
        assert_eq!(flag_mask(13), Some(4096));
        assert_eq!(flag_mask(32), Some(0x8000_0000));
        assert_eq!(flag_mask(0), None);
        assert_eq!(flag_mask(33), None);
    }

    #[test]
    fn set_and_clear_every_bit_without_cross_contamination() {
        let base = FieldFlags(0b1010_0000_0000_0000_0000_0000_0101_0011);
        for bit in 1..=32 {
            let mut flags = base;
            flags.set(bit, true).unwrap();
            assert!(flags.contains(bit), "bit {bit} should be set");
            flags.set(bit, false).unwrap();
            assert!(!flags.contains(bit), "bit {bit} should be clear");
            let mask = flag_mask(bit).unwrap();
            assert_eq!(flags.0 & !mask, base.0 & !mask, "bit {bit} touched others");
        }
    }

    #[test]
    fn set_rejects_out_of_range_bits() {
        let mut flags = FieldFlags::empty();
        assert_eq!(flags.set(0, true), Err(FormError::InvalidFlagBit(0)));
        assert_eq!(flags.set(33, true), Err(FormError::InvalidFlagBit(33)));
        assert_eq!(flags, FieldFlags::empty());
        assert!(!flags.contains(40));
    }

    #[test]
    fn with_builds_combined_flags() {
        let flags = FieldFlags::empty()
            .with(FieldFlags::RADIO)
            .with(FieldFlags::NO_TOGGLE_TO_OFF);
        assert!(flags.contains(FieldFlags::RADIO));
        assert!(flags.contains(FieldFlags::NO_TOGGLE_TO_OFF));
        assert!(!flags.contains(FieldFlags::PUSH_BUTTON));
        assert_eq!(flags.bits(), (1 << 15) | (1 << 14));
    }

    #[test]
    fn annotation_print_flag() {
        let f = AnnotationFlags::default().with(AnnotationFlags::PRINT);
        assert_eq!(f.0, 4);
        assert!(f.contains(AnnotationFlags::PRINT));
    }
}
