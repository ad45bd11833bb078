use rand::Rng;

/// Asset URLs the morph target is picked from.
#[derive(Clone, Debug, Default)]
pub struct ModelCatalogue {
    urls: Vec<String>,
    last: Option<usize>,
}

impl ModelCatalogue {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls, last: None }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.last.map(|i| self.urls[i].as_str())
    }

    /// Random pick that never repeats the previous one while there is a choice.
    pub fn pick_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&str> {
        let index = match (self.urls.len(), self.last) {
            (0, _) => return None,
            (1, _) => 0,
            (n, Some(last)) => {
                // draw from the n - 1 others, skipping over `last`
                let i = rng.gen_range(0..n - 1);
                if i >= last {
                    i + 1
                } else {
                    i
                }
            }
            (n, None) => rng.gen_range(0..n),
        };
        self.last = Some(index);
        Some(self.urls[index].as_str())
    }
}
