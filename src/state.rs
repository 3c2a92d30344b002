//! In-memory browsing state: the current photo batch and its cursor.

use crate::unsplash::PhotoRecord;

/// Ordered batch of photos with a wrapping cursor.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    photos: Vec<PhotoRecord>,
    cursor: usize,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole batch and rewind the cursor.
    pub fn replace(&mut self, photos: Vec<PhotoRecord>) {
        self.photos = photos;
        self.cursor = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Photo under the cursor, if any.
    pub fn current(&self) -> Option<&PhotoRecord> {
        self.photos.get(self.cursor)
    }

    /// Advance with wraparound. Returns false when there is nothing to show.
    pub fn show_next(&mut self) -> bool {
        if self.photos.is_empty() {
            return false;
        }
        self.cursor = (self.cursor + 1) % self.photos.len();
        true
    }

    /// Step back with wraparound. Returns false when there is nothing to show.
    pub fn show_previous(&mut self) -> bool {
        if self.photos.is_empty() {
            return false;
        }
        let len = self.photos.len();
        self.cursor = (self.cursor + len - 1) % len;
        true
    }
}

/// Tickets for preview requests; only the latest one may be displayed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewSequence {
    latest: u64,
}

impl PreviewSequence {
    /// Issue a ticket that supersedes every earlier one.
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.latest
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::unsplash::PhotoUrls;

    pub(crate) fn photos(count: usize) -> Vec<PhotoRecord> {
        (0..count)
            .map(|i| PhotoRecord {
                id: Some(format!("photo-{i}")),
                alt_description: None,
                user: None,
                urls: PhotoUrls {
                    regular: format!("https://images.example/{i}/regular"),
                    full: format!("https://images.example/{i}/full"),
                },
            })
            .collect()
    }

    #[test]
    fn next_wraps_back_to_start_after_len_steps() {
        for len in 1..=7 {
            let mut gallery = Gallery::new();
            gallery.replace(photos(len));
            for start in 0..len {
                while gallery.cursor() != start {
                    gallery.show_next();
                }
                for _ in 0..len {
                    assert!(gallery.show_next());
                }
                assert_eq!(gallery.cursor(), start);
            }
        }
    }

    #[test]
    fn previous_undoes_next() {
        let mut gallery = Gallery::new();
        gallery.replace(photos(5));
        for _ in 0..5 {
            let before = gallery.cursor();
            gallery.show_next();
            gallery.show_previous();
            assert_eq!(gallery.cursor(), before);
            gallery.show_previous();
            gallery.show_next();
            assert_eq!(gallery.cursor(), before);
            gallery.show_next();
        }
    }

    #[test]
    fn previous_from_first_wraps_to_last() {
        let mut gallery = Gallery::new();
        gallery.replace(photos(4));
        gallery.show_previous();
        assert_eq!(gallery.cursor(), 3);
    }

    #[test]
    fn empty_gallery_ignores_navigation() {
        let mut gallery = Gallery::new();
        assert!(!gallery.show_next());
        assert!(!gallery.show_previous());
        assert_eq!(gallery.cursor(), 0);
        assert!(gallery.current().is_none());
    }

    #[test]
    fn replace_resets_cursor_and_length() {
        let mut gallery = Gallery::new();
        gallery.replace(photos(10));
        gallery.show_next();
        gallery.show_next();
        gallery.replace(photos(3));
        assert_eq!(gallery.cursor(), 0);
        assert_eq!(gallery.len(), 3);
    }

    #[test]
    fn browse_forward_three_then_back_one() {
        let mut gallery = Gallery::new();
        gallery.replace(photos(10));
        assert_eq!(gallery.current().unwrap().id.as_deref(), Some("photo-0"));
        for _ in 0..3 {
            gallery.show_next();
        }
        assert_eq!(gallery.cursor(), 3);
        assert_eq!(gallery.current().unwrap().id.as_deref(), Some("photo-3"));
        gallery.show_previous();
        assert_eq!(gallery.cursor(), 2);
    }

    #[test]
    fn only_latest_ticket_is_current() {
        let mut seq = PreviewSequence::default();
        let first = seq.issue();
        let second = seq.issue();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        assert!(!seq.is_current(0));
    }
}
