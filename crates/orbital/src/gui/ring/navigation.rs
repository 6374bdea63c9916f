use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum Direction {
    #[strum(to_string = "next")]
    Next,
    #[strum(to_string = "prev", serialize = "previous")]
    Previous,
}

impl Direction {
    /// Index to select from `current` in a ring of `len` slides. The entry point from the
    /// unselected state is always the first slide; an empty ring cannot be navigated.
    pub fn target_index(self, current: Option<usize>, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let Some(current) = current.filter(|&i| i < len) else {
            return Some(0);
        };
        Some(match self {
            Self::Next => (current + 1) % len,
            Self::Previous => (current + len - 1) % len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_forward() {
        assert_eq!(Direction::Next.target_index(Some(3), 4), Some(0));
        assert_eq!(Direction::Next.target_index(Some(1), 4), Some(2));
    }

    #[test]
    fn test_wraps_backward() {
        assert_eq!(Direction::Previous.target_index(Some(0), 4), Some(3));
        assert_eq!(Direction::Previous.target_index(Some(2), 4), Some(1));
    }

    #[test]
    fn test_entry_is_first_slide() {
        assert_eq!(Direction::Next.target_index(None, 4), Some(0));
        assert_eq!(Direction::Previous.target_index(None, 4), Some(0));
        // stale index behaves like no selection
        assert_eq!(Direction::Previous.target_index(Some(9), 4), Some(0));
    }

    #[test]
    fn test_empty_ring() {
        assert_eq!(Direction::Next.target_index(None, 0), None);
        assert_eq!(Direction::Previous.target_index(Some(0), 0), None);
    }

    #[test]
    fn test_single_slide() {
        assert_eq!(Direction::Next.target_index(Some(0), 1), Some(0));
        assert_eq!(Direction::Previous.target_index(Some(0), 1), Some(0));
    }

    #[test]
    fn test_parse() {
        assert_eq!("NEXT".parse::<Direction>().unwrap(), Direction::Next);
        assert_eq!("prev".parse::<Direction>().unwrap(), Direction::Previous);
        assert_eq!("previous".parse::<Direction>().unwrap(), Direction::Previous);
    }
}
