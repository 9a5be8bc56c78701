use crate::capture::Capture;

/// Images the studio cycles through. Never empty.
#[derive(Debug)]
pub struct Playlist {
    items: Vec<Capture>,
    current: usize,
}

impl Playlist {
    /// Returns `None` for an empty list.
    pub fn new(items: Vec<Capture>) -> Option<Self> {
        (!items.is_empty()).then_some(Self { items, current: 0 })
    }

    pub fn current(&self) -> &Capture {
        &self.items[self.current]
    }

    pub fn advance(&mut self) -> &Capture {
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    pub fn retreat(&mut self) -> &Capture {
        self.current = (self.current + self.items.len() - 1) % self.items.len();
        self.current()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(label: &str) -> Capture {
        Capture {
            label: label.into(),
            data_url: format!("data:image/png;base64,{label}"),
        }
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(Playlist::new(Vec::new()).is_none());
    }

    #[test]
    fn advance_and_retreat_wrap() {
        let mut list = Playlist::new(vec![capture("a"), capture("b"), capture("c")]).unwrap();
        assert_eq!(list.current().label, "a");
        assert_eq!(list.advance().label, "b");
        assert_eq!(list.advance().label, "c");
        assert_eq!(list.advance().label, "a");
        assert_eq!(list.retreat().label, "c");
    }

    #[test]
    fn single_item_stays_put() {
        let mut list = Playlist::new(vec![capture("only")]).unwrap();
        assert_eq!(list.advance().label, "only");
        assert_eq!(list.retreat().label, "only");
        assert_eq!(list.len(), 1);
    }
}
