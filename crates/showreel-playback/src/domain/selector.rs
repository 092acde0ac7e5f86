//! Circular index tracker over a fixed-size collection.

use showreel_core::error::PlaybackError;

/// Tracks the current position in a collection of `len` items, wrapping at
/// both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselSelector {
    index: usize,
    len: usize,
}

impl CarouselSelector {
    /// Creates a selector positioned on item 0.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::Configuration` if `len` is zero.
    pub fn new(len: usize) -> Result<Self, PlaybackError> {
        if len == 0 {
            return Err(PlaybackError::Configuration(
                "a carousel needs at least one item".to_owned(),
            ));
        }
        Ok(Self { index: 0, len })
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: construction rejects empty collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the current item is the last one.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.len
    }

    /// Moves to the next item, wrapping to 0 after the last. Returns the new
    /// index.
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.len;
        self.index
    }

    /// Moves to item `index`.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::IndexOutOfRange` if `index >= len`. The
    /// position is left unchanged.
    pub fn jump_to(&mut self, index: usize) -> Result<(), PlaybackError> {
        self.check(index)?;
        self.index = index;
        Ok(())
    }

    /// Moves back to item 0.
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Signed shortest circular distance from the current item to `index`.
    /// Positive is forward. When both directions are equally short the
    /// forward distance wins.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError::IndexOutOfRange` if `index >= len`.
    #[allow(clippy::cast_possible_wrap)]
    pub fn relative_offset(&self, index: usize) -> Result<isize, PlaybackError> {
        self.check(index)?;
        let forward = (index + self.len - self.index) % self.len;
        if forward * 2 > self.len {
            Ok(forward as isize - self.len as isize)
        } else {
            Ok(forward as isize)
        }
    }

    /// Offsets of every item, in item order.
    #[must_use]
    pub fn offsets(&self) -> Vec<isize> {
        (0..self.len)
            .filter_map(|index| self.relative_offset(index).ok())
            .collect()
    }

    fn check(&self, index: usize) -> Result<(), PlaybackError> {
        if index >= self.len {
            return Err(PlaybackError::IndexOutOfRange {
                what: "item",
                index,
                len: self.len,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_items() {
        assert!(matches!(
            CarouselSelector::new(0),
            Err(PlaybackError::Configuration(_))
        ));
    }

    #[test]
    fn test_advance_n_times_returns_to_start() {
        for len in 1..=7 {
            // Arrange
            let mut selector = CarouselSelector::new(len).unwrap();
            selector.jump_to(len / 2).unwrap();
            let start = selector.current_index();

            // Act
            for _ in 0..len {
                selector.advance();
            }

            // Assert
            assert_eq!(selector.current_index(), start, "len {len}");
        }
    }

    #[test]
    fn test_advance_wraps_after_last() {
        let mut selector = CarouselSelector::new(3).unwrap();

        assert_eq!(selector.advance(), 1);
        assert_eq!(selector.advance(), 2);
        assert!(selector.is_last());
        assert_eq!(selector.advance(), 0);
    }

    #[test]
    fn test_single_item_selector_is_always_last() {
        let mut selector = CarouselSelector::new(1).unwrap();

        assert!(selector.is_last());
        assert_eq!(selector.advance(), 0);
        assert_eq!(selector.offsets(), vec![0]);
    }

    #[test]
    fn test_jump_to_out_of_range_is_rejected_not_clamped() {
        // Arrange
        let mut selector = CarouselSelector::new(4).unwrap();
        selector.jump_to(2).unwrap();

        // Act
        let result = selector.jump_to(4);

        // Assert
        assert_eq!(
            result,
            Err(PlaybackError::IndexOutOfRange {
                what: "item",
                index: 4,
                len: 4
            })
        );
        assert_eq!(selector.current_index(), 2);
    }

    #[test]
    fn test_reset_returns_to_first_item() {
        let mut selector = CarouselSelector::new(5).unwrap();
        selector.jump_to(3).unwrap();

        selector.reset();

        assert_eq!(selector.current_index(), 0);
    }

    #[test]
    fn test_relative_offset_takes_shortest_direction() {
        // Arrange
        let mut selector = CarouselSelector::new(6).unwrap();
        selector.jump_to(1).unwrap();

        // Act
        let offsets = selector.offsets();

        // Assert: item 4 is three away both ways, so it is reported forward.
        assert_eq!(offsets, vec![-1, 0, 1, 2, 3, -2]);
    }

    #[test]
    fn test_relative_offset_magnitude_is_symmetric() {
        for len in 1..=8 {
            for a in 0..len {
                for b in 0..len {
                    let mut from_a = CarouselSelector::new(len).unwrap();
                    from_a.jump_to(a).unwrap();
                    let mut from_b = CarouselSelector::new(len).unwrap();
                    from_b.jump_to(b).unwrap();

                    let ab = from_a.relative_offset(b).unwrap();
                    let ba = from_b.relative_offset(a).unwrap();

                    assert_eq!(ab.unsigned_abs(), ba.unsigned_abs(), "len {len} {a}<->{b}");
                }
            }
        }
    }

    #[test]
    fn test_relative_offset_rejects_out_of_range_index() {
        let selector = CarouselSelector::new(3).unwrap();

        assert!(matches!(
            selector.relative_offset(3),
            Err(PlaybackError::IndexOutOfRange { .. })
        ));
    }
}
