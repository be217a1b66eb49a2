//! CMD2 manufacturer page selection

use platform::DsiLink;

use crate::encoder::{self, CommandSeq};
use crate::registers::{CMD2_PAGE_MAX, MAUCCTR_KEY, MCS_CMD_MAUCCTR};

/// A CMD2 page number, guaranteed to be in `0..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Page(u8);

impl Page {
    /// Page 0: compression, scaler, display output, frame rate.
    pub const P0: Self = Self(0);
    /// Page 1.
    pub const P1: Self = Self(1);
    /// Page 7: subpixel rendering.
    pub const P7: Self = Self(7);

    /// Validate a page number.
    pub const fn new(page: u8) -> Option<Self> {
        if page <= CMD2_PAGE_MAX {
            Some(Self(page))
        } else {
            None
        }
    }

    /// Page number.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The 6-byte unlock-and-select command for this page.
    pub const fn select_sequence(self) -> CommandSeq<6> {
        let [k0, k1, k2, k3] = MAUCCTR_KEY;
        CommandSeq::new([MCS_CMD_MAUCCTR, k0, k1, k2, k3, self.0])
    }
}

impl TryFrom<u8> for Page {
    type Error = u8;

    fn try_from(page: u8) -> Result<Self, u8> {
        Self::new(page).ok_or(page)
    }
}

/// Select `page` on `link`. Must be the primary endpoint.
pub fn select_page<L: DsiLink>(link: &mut L, page: Page) -> Result<usize, L::Error> {
    debug!("select CMD2 page {}", page.get());
    encoder::send(link, &page.select_sequence())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::mocks::{MockDsiLink, Recorder};

    #[test]
    fn select_sequence_bytes() {
        assert_eq!(
            Page::P7.select_sequence().as_bytes(),
            &[0xF0, 0x55, 0xAA, 0x52, 0x08, 0x07]
        );
        assert_eq!(
            Page::P0.select_sequence().as_bytes(),
            &[0xF0, 0x55, 0xAA, 0x52, 0x08, 0x00]
        );
    }

    #[test]
    fn pages_outside_cmd2_are_rejected() {
        assert_eq!(Page::new(7), Some(Page::P7));
        assert!(Page::new(8).is_none());
        assert_eq!(Page::try_from(255), Err(255));
    }

    #[test]
    fn every_valid_page_encodes_its_number() {
        for n in 0..=7u8 {
            let page = Page::new(n).unwrap();
            assert_eq!(page.select_sequence().as_bytes().last(), Some(&n));
        }
    }

    #[test]
    fn select_page_is_one_write() {
        let rec = Recorder::new();
        let mut link = MockDsiLink::new(0, &rec);
        select_page(&mut link, Page::P1).unwrap();
        assert_eq!(
            rec.writes_on(0),
            vec![vec![0xF0, 0x55, 0xAA, 0x52, 0x08, 0x01]]
        );
    }
}
