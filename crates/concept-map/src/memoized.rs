/// Value derived from `S`, recomputed only when its key changes.
pub struct Memoized<S, K, V> {
    last: Option<(K, V)>,
    get_key: Box<dyn Fn(&S) -> K>,
    calc: Box<dyn Fn(&S) -> V>,
}

impl<S, K, V> Memoized<S, K, V>
where
    K: PartialEq,
{
    pub fn new(
        get_key: impl Fn(&S) -> K + 'static,
        calc: impl Fn(&S) -> V + 'static,
    ) -> Self {
        Self {
            last: None,
            get_key: Box::new(get_key),
            calc: Box::new(calc),
        }
    }

    /// Recompute only if the key changed; return the cached value.
    pub fn get<'a>(&'a mut self, source: &S) -> &'a V {
        let key = (self.get_key)(source);
        let stale = !matches!(&self.last, Some((k, _)) if *k == key);
        if stale {
            self.last = None;
        }
        let (_, value) = self
            .last
            .get_or_insert_with(|| (key, (self.calc)(source)));
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_recomputes_only_on_key_change() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut doubled = Memoized::new(
            |s: &(u64, i32)| s.0,
            move |s: &(u64, i32)| {
                counter.set(counter.get() + 1);
                s.1 * 2
            },
        );

        assert_eq!(*doubled.get(&(1, 10)), 20);
        assert_eq!(*doubled.get(&(1, 99)), 20);
        assert_eq!(calls.get(), 1);

        assert_eq!(*doubled.get(&(2, 99)), 198);
        assert_eq!(calls.get(), 2);
    }
}
