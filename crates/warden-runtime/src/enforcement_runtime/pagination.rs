#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of a bounded paginated listing. `Truncated` means the hard page
/// ceiling was reached before the tracker stopped paginating; callers decide
/// whether to proceed on partial data, and log the truncation either way.
pub enum Paginated<T> {
    Complete(Vec<T>),
    Truncated { items: Vec<T>, pages_seen: u32 },
}

impl<T> Paginated<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Self::Complete(items) => items,
            Self::Truncated { items, .. } => items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Complete(items) => items,
            Self::Truncated { items, .. } => items,
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::Paginated;

    #[test]
    fn unit_paginated_exposes_items_for_both_variants() {
        let complete = Paginated::Complete(vec![1, 2]);
        assert_eq!(complete.items(), &[1, 2]);
        assert!(!complete.is_truncated());

        let truncated = Paginated::Truncated {
            items: vec![3],
            pages_seen: 10,
        };
        assert_eq!(truncated.items(), &[3]);
        assert!(truncated.is_truncated());
        assert_eq!(truncated.into_items(), vec![3]);
    }
}
