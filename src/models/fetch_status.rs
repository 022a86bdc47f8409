/// Outcome of a fetch as seen by consumers.
///
/// Data is only ever present when every part of the fetch succeeded.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchStatus<T> {
    #[default]
    Loading,
    Failed,
    Ready(T),
}

impl<T> FetchStatus<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FetchStatus::Failed)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchStatus::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchStatus<U> {
        match self {
            FetchStatus::Loading => FetchStatus::Loading,
            FetchStatus::Failed => FetchStatus::Failed,
            FetchStatus::Ready(data) => FetchStatus::Ready(f(data)),
        }
    }

    /// Fold several independent outcomes into one.
    ///
    /// Any failure wins, then any pending part. Only when every part is
    /// ready are the values returned, in input order.
    pub fn combine(outcomes: impl IntoIterator<Item = FetchStatus<T>>) -> FetchStatus<Vec<T>> {
        let mut ready = Vec::new();
        let mut loading = false;
        for outcome in outcomes {
            match outcome {
                FetchStatus::Failed => return FetchStatus::Failed,
                FetchStatus::Loading => loading = true,
                FetchStatus::Ready(data) => ready.push(data),
            }
        }
        if loading {
            FetchStatus::Loading
        } else {
            FetchStatus::Ready(ready)
        }
    }
}

impl<T> From<anyhow::Result<T>> for FetchStatus<T> {
    fn from(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(data) => FetchStatus::Ready(data),
            Err(_) => FetchStatus::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_ready() {
        let combined = FetchStatus::combine(vec![
            FetchStatus::Ready(1),
            FetchStatus::Ready(2),
            FetchStatus::Ready(3),
            FetchStatus::Ready(4),
        ]);
        assert_eq!(combined, FetchStatus::Ready(vec![1, 2, 3, 4]));
    }

    #[test]
    fn test_any_pending_suppresses_data() {
        let combined = FetchStatus::combine(vec![
            FetchStatus::Ready(1),
            FetchStatus::Loading,
            FetchStatus::Ready(3),
            FetchStatus::Ready(4),
        ]);
        assert!(combined.is_loading());
        assert!(!combined.is_error());
        assert!(combined.data().is_none());
    }

    #[test]
    fn test_failure_wins_over_pending() {
        let combined = FetchStatus::combine(vec![
            FetchStatus::Loading,
            FetchStatus::Ready(2),
            FetchStatus::Failed,
            FetchStatus::Ready(4),
        ]);
        assert!(combined.is_error());
        assert!(!combined.is_loading());
        assert!(combined.data().is_none());
    }

    #[test]
    fn test_from_result() {
        let ok: FetchStatus<u8> = anyhow::Ok(5).into();
        let err: FetchStatus<u8> = Err(anyhow::anyhow!("boom")).into();
        assert_eq!(ok, FetchStatus::Ready(5));
        assert_eq!(err, FetchStatus::Failed);
    }
}
